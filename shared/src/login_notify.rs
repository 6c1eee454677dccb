use serde::Deserialize;

use crate::directory::IdentityDirectory;
use crate::error::HandlerError;
use crate::notify::NotificationPublisher;
use crate::store::RecordStore;
use crate::types::LoginRecord;

/// Login event payload. The identifier is an opaque user id (the identity
/// pool's sub); legacy producers still send it under `email` or `userEmail`,
/// accepted here and nowhere else.
#[derive(Debug, Default, Deserialize)]
pub struct LoginEvent {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    email: Option<String>,
    #[serde(rename = "userEmail")]
    user_email: Option<String>,
}

impl LoginEvent {
    /// Canonical identifier, falling back to the legacy field spellings.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.email.as_deref())
            .or(self.user_email.as_deref())
    }
}

/// Resolve the user's email, notify the topic, and append a login record.
/// The publish and the record write are independent; neither is rolled back
/// when the other fails.
pub async fn notify_login<D, N, S>(
    directory: &D,
    notifier: &N,
    store: &S,
    event: &LoginEvent,
) -> Result<String, HandlerError>
where
    D: IdentityDirectory,
    N: NotificationPublisher,
    S: RecordStore,
{
    let user_id = event
        .user_id()
        .ok_or_else(|| HandlerError::Validation("missing userId in login event".to_string()))?;

    tracing::info!("Fetching email for user: {}", user_id);
    let email = directory.email_for_user(user_id).await?.ok_or_else(|| {
        HandlerError::NotFound(format!("no email attribute found for user {}", user_id))
    })?;

    let message = format!("Hello {}, your login to ScootRide was successful!", email);
    notifier.publish("ScootRide Login Notification", &message).await?;

    let record = LoginRecord {
        user_id: user_id.to_string(),
        login_timestamp: chrono::Utc::now().to_rfc3339(),
        email: Some(email),
        success: None,
        message: None,
    };
    store.put_login(&record).await?;

    Ok("Login email sent and activity logged".to_string())
}
