use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;

use crate::error::HandlerError;

/// User-attribute lookup seam, keyed by opaque user id.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Look up a user's email attribute. `Ok(None)` means the account exists
    /// but carries no email attribute.
    async fn email_for_user(&self, user_id: &str) -> Result<Option<String>, HandlerError>;
}

#[derive(Clone)]
pub struct CognitoDirectory {
    client: CognitoClient,
    user_pool_id: String,
}

impl CognitoDirectory {
    pub fn new(client: CognitoClient, user_pool_id: String) -> Self {
        Self { client, user_pool_id }
    }
}

#[async_trait]
impl IdentityDirectory for CognitoDirectory {
    async fn email_for_user(&self, user_id: &str) -> Result<Option<String>, HandlerError> {
        let user = self
            .client
            .admin_get_user()
            .user_pool_id(&self.user_pool_id)
            .username(user_id)
            .send()
            .await
            .map_err(|e| {
                HandlerError::Dependency(format!("failed to look up user {}: {}", user_id, e))
            })?;

        Ok(user
            .user_attributes()
            .iter()
            .find(|attr| attr.name() == "email")
            .and_then(|attr| attr.value().map(|v| v.to_string())))
    }
}
