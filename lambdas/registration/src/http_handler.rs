use std::sync::Arc;

use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Request, Response};
use scootride_shared::http::{body_str, error_response, json_response, preflight};
use scootride_shared::registration::{register, RegistrationRequest};
use scootride_shared::AppState;

/// Registration Lambda: store the security Q&A and role, then the
/// configuration-gated topic subscription and welcome-queue message.
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    tracing::info!("Registration Lambda invoked");

    if event.method() == "OPTIONS" {
        return preflight("POST, OPTIONS");
    }

    if event.method() != "POST" {
        return json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &serde_json::json!({ "error": "Method not allowed" }),
        );
    }

    let request: RegistrationRequest = match serde_json::from_str(body_str(event.body())) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Failed to parse request body: {}", e);
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &serde_json::json!({ "error": format!("invalid request body: {}", e) }),
            );
        }
    };

    match register(
        &state.store,
        state.notifier.as_ref(),
        state.queue.as_ref(),
        request,
    )
    .await
    {
        Ok(()) => json_response(
            StatusCode::OK,
            &serde_json::json!({
                "message": "Q&A and role stored successfully. Confirmation email sent."
            }),
        ),
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            error_response(&e)
        }
    }
}
