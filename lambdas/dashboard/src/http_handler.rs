use std::sync::Arc;

use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Request, Response};
use scootride_shared::dashboard;
use scootride_shared::http::{error_response, json_response, preflight};
use scootride_shared::AppState;

/// Dashboard Lambda: user count, active-booking count, and the recent login
/// window, each from its own scan.
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    tracing::info!("Dashboard Lambda invoked");

    if event.method() == "OPTIONS" {
        return preflight("GET, POST, OPTIONS");
    }

    if event.method() != "GET" {
        return json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &serde_json::json!({ "error": "Method not allowed" }),
        );
    }

    match dashboard::summarize(&state.store).await {
        Ok(summary) => json_response(StatusCode::OK, &serde_json::to_value(&summary)?),
        Err(e) => {
            tracing::error!("Dashboard aggregation failed: {}", e);
            error_response(&e)
        }
    }
}
