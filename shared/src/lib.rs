pub mod assistant;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod http;
pub mod login_log;
pub mod login_notify;
pub mod notify;
pub mod queue;
pub mod registration;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

use std::sync::Arc;
use std::time::Duration;

use aws_config::timeout::TimeoutConfig;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_sns::Client as SnsClient;
use aws_sdk_sqs::Client as SqsClient;

use crate::config::Config;
use crate::directory::CognitoDirectory;
use crate::notify::SnsPublisher;
use crate::queue::SqsQueue;
use crate::store::DynamoStore;

/// Shared application state: every client is constructed once at startup and
/// injected into the handlers. Collaborators whose configuration is unset
/// stay `None` and the dependent side effects are skipped.
pub struct AppState {
    pub config: Config,
    pub store: DynamoStore,
    pub notifier: Option<SnsPublisher>,
    pub queue: Option<SqsQueue>,
    pub directory: Option<CognitoDirectory>,
}

impl AppState {
    pub async fn from_env() -> Arc<Self> {
        let config = Config::from_env();

        // One conservative timeout for every external call; a timed-out call
        // fails like any other dependency error.
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(10))
                    .build(),
            )
            .load()
            .await;

        let store = DynamoStore::new(DynamoClient::new(&aws_config), config.tables.clone());

        let notifier = config
            .sns_topic_arn
            .clone()
            .map(|arn| SnsPublisher::new(SnsClient::new(&aws_config), arn));

        let queue = config
            .registration_queue_url
            .clone()
            .map(|url| SqsQueue::new(SqsClient::new(&aws_config), url));

        let directory = config
            .user_pool_id
            .clone()
            .map(|pool| CognitoDirectory::new(CognitoClient::new(&aws_config), pool));

        Arc::new(Self {
            config,
            store,
            notifier,
            queue,
            directory,
        })
    }
}
