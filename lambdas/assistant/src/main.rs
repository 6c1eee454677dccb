use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use scootride_shared::assistant;
use scootride_shared::AppState;
use serde_json::Value;

/// Assistant Lambda: one entry point for chat over API Gateway and for bot
/// fulfillment events. The routing itself lives in the shared crate; this
/// binary only wires the state in.
#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let state = AppState::from_env().await;

    run(service_fn(move |event: LambdaEvent<Value>| {
        let state = Arc::clone(&state);
        async move {
            tracing::info!("Assistant event received");
            Ok::<Value, Error>(assistant::handle_event(&state.store, &event.payload).await)
        }
    }))
    .await
}
