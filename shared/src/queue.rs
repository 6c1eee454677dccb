use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;

use crate::error::HandlerError;

/// At-least-once message submission seam for deferred work.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    async fn send(&self, body: &str) -> Result<(), HandlerError>;
}

#[derive(Clone)]
pub struct SqsQueue {
    client: SqsClient,
    queue_url: String,
}

impl SqsQueue {
    pub fn new(client: SqsClient, queue_url: String) -> Self {
        Self { client, queue_url }
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn send(&self, body: &str) -> Result<(), HandlerError> {
        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to queue message: {}", e)))?;
        Ok(())
    }
}
