use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use scootride_shared::directory::CognitoDirectory;
use scootride_shared::login_notify::{notify_login, LoginEvent};
use scootride_shared::notify::SnsPublisher;
use scootride_shared::AppState;
use serde_json::{json, Value};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let state = AppState::from_env().await;

    // Both collaborators are mandatory for this handler; fail at startup
    // rather than per event.
    let directory = match state.directory.clone() {
        Some(directory) => directory,
        None => return Err("USER_POOL_ID must be set".into()),
    };
    let notifier = match state.notifier.clone() {
        Some(notifier) => notifier,
        None => return Err("SNS_TOPIC_ARN must be set".into()),
    };

    run(service_fn(move |event: LambdaEvent<Value>| {
        let state = Arc::clone(&state);
        let directory = directory.clone();
        let notifier = notifier.clone();
        async move { Ok::<Value, Error>(function_handler(&state, &directory, &notifier, event).await) }
    }))
    .await
}

async fn function_handler(
    state: &AppState,
    directory: &CognitoDirectory,
    notifier: &SnsPublisher,
    event: LambdaEvent<Value>,
) -> Value {
    tracing::info!("Login event received");

    let login_event: LoginEvent = match serde_json::from_value(event.payload) {
        Ok(login_event) => login_event,
        Err(e) => {
            tracing::error!("Invalid login event payload: {}", e);
            return envelope(500, &json!({ "error": format!("invalid login event: {}", e) }));
        }
    };

    match notify_login(directory, notifier, &state.store, &login_event).await {
        Ok(message) => envelope(200, &json!({ "message": message })),
        Err(e) => {
            tracing::error!("Error handling login event: {}", e);
            envelope(500, &json!({ "error": e.to_string() }))
        }
    }
}

fn envelope(status: u16, body: &Value) -> Value {
    json!({ "statusCode": status, "body": body.to_string() })
}
