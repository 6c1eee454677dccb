use serde::Deserialize;

use crate::error::HandlerError;
use crate::store::RecordStore;
use crate::types::LoginRecord;

/// Login report body. The frontend historically posts the identifier as
/// `username`; both spellings deserialize into the canonical field.
#[derive(Debug, Deserialize)]
pub struct LoginLogRequest {
    #[serde(rename = "userId", alias = "username")]
    pub user_id: String,
    pub success: Option<bool>,
    pub message: Option<String>,
}

/// Append one login record with the current UTC timestamp. The identifier is
/// not checked against the user table; a write failure propagates.
pub async fn record_login<S: RecordStore>(
    store: &S,
    request: &LoginLogRequest,
) -> Result<LoginRecord, HandlerError> {
    let record = LoginRecord {
        user_id: request.user_id.clone(),
        login_timestamp: chrono::Utc::now().to_rfc3339(),
        email: None,
        success: request.success,
        message: request.message.clone(),
    };

    tracing::info!("Writing login record for user: {}", record.user_id);
    store.put_login(&record).await?;

    Ok(record)
}
