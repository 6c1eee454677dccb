use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Response};

use crate::error::HandlerError;

/// Extract the request body as a string slice.
pub fn body_str(body: &Body) -> &str {
    match body {
        Body::Text(text) => text,
        Body::Binary(bytes) => std::str::from_utf8(bytes).unwrap_or(""),
        Body::Empty => "",
    }
}

/// Short-circuit response for an OPTIONS preflight: 200, CORS headers, no
/// body processing.
pub fn preflight(methods: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", methods)
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Empty)
        .map_err(Box::new)?)
}

/// JSON response with the CORS headers every handler sends.
pub fn json_response(status: StatusCode, body: &serde_json::Value) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(body.to_string().into())
        .map_err(Box::new)?)
}

/// Generic 500 envelope carrying the error text. Error kinds do not get
/// distinct status codes; the message is the detail.
pub fn error_response(err: &HandlerError) -> Result<Response<Body>, Error> {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &serde_json::json!({ "error": err.to_string() }),
    )
}
