use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;

use crate::error::HandlerError;

/// Topic-based notification seam: publish a message, or subscribe an email
/// endpoint to the topic.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), HandlerError>;

    async fn subscribe_email(&self, endpoint: &str) -> Result<(), HandlerError>;
}

#[derive(Clone)]
pub struct SnsPublisher {
    client: SnsClient,
    topic_arn: String,
}

impl SnsPublisher {
    pub fn new(client: SnsClient, topic_arn: String) -> Self {
        Self { client, topic_arn }
    }
}

#[async_trait]
impl NotificationPublisher for SnsPublisher {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), HandlerError> {
        self.client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to publish notification: {}", e)))?;
        Ok(())
    }

    async fn subscribe_email(&self, endpoint: &str) -> Result<(), HandlerError> {
        self.client
            .subscribe()
            .topic_arn(&self.topic_arn)
            .protocol("email")
            .endpoint(endpoint)
            .return_subscription_arn(true)
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to subscribe email: {}", e)))?;
        Ok(())
    }
}
