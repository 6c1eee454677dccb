use serde::Deserialize;

use crate::error::HandlerError;
use crate::notify::NotificationPublisher;
use crate::queue::MessageQueue;
use crate::store::RecordStore;
use crate::types::UserRecord;

/// Role stored when the signup omits one; the dashboard counts exactly this
/// role.
pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub question: String,
    pub answer: String,
    pub email: String,
    pub role: Option<String>,
}

/// Persist the security Q&A and role, then run the configuration-gated side
/// effects: subscribe the email to the notification topic and queue the
/// deferred welcome message. An unset topic or queue skips its step without
/// failing the request.
pub async fn register<S, N, Q>(
    store: &S,
    notifier: Option<&N>,
    queue: Option<&Q>,
    request: RegistrationRequest,
) -> Result<(), HandlerError>
where
    S: RecordStore,
    N: NotificationPublisher,
    Q: MessageQueue,
{
    let role = request.role.unwrap_or_else(|| DEFAULT_ROLE.to_string());

    tracing::info!("Storing registration record for user: {}", request.user_id);
    let user = UserRecord {
        user_id: request.user_id,
        email: request.email.clone(),
        role,
        security_question: request.question,
        security_answer: request.answer,
    };
    store.put_user(&user).await?;

    if let Some(notifier) = notifier {
        if !request.email.is_empty() {
            tracing::info!("Subscribing {} to the notification topic", request.email);
            notifier.subscribe_email(&request.email).await?;
        }
    }

    if let Some(queue) = queue {
        tracing::info!("Queueing welcome message for {}", request.email);
        let body = serde_json::json!({ "email": request.email, "type": "registration" });
        queue.send(&body.to_string()).await?;
    }

    Ok(())
}
