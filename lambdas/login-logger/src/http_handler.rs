use std::sync::Arc;

use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Request, Response};
use scootride_shared::http::{body_str, error_response, json_response, preflight};
use scootride_shared::login_log::{record_login, LoginLogRequest};
use scootride_shared::AppState;

/// Login activity Lambda: append one login record per report.
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    tracing::info!("Login logger Lambda invoked");

    if event.method() == "OPTIONS" {
        return preflight("POST, OPTIONS");
    }

    if event.method() != "POST" {
        return json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            &serde_json::json!({ "error": "Method not allowed" }),
        );
    }

    let request: LoginLogRequest = match serde_json::from_str(body_str(event.body())) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("Failed to parse request body: {}", e);
            return json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &serde_json::json!({ "error": format!("invalid request body: {}", e) }),
            );
        }
    };

    match record_login(&state.store, &request).await {
        Ok(_) => json_response(
            StatusCode::OK,
            &serde_json::json!({ "message": "Login log stored successfully" }),
        ),
        Err(e) => {
            tracing::error!("Login log write failed: {}", e);
            error_response(&e)
        }
    }
}
