pub mod intent;
pub mod router;

use serde_json::{json, Value};

use crate::store::RecordStore;
use intent::DialogTurn;

const UNREADABLE_REPLY: &str = "I'm sorry, I couldn't read that message. Please try again.";

/// Dialog-state envelope for bot-originated calls.
pub fn dialog_response(intent_name: &str, fulfilled: bool, message: &str) -> Value {
    let state = if fulfilled { "Fulfilled" } else { "Failed" };
    json!({
        "sessionState": {
            "dialogAction": { "type": "Close", "fulfillmentState": state },
            "intent": { "name": intent_name, "state": state }
        },
        "messages": [
            { "contentType": "PlainText", "content": message }
        ]
    })
}

fn cors_headers() -> Value {
    json!({
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Headers": "Content-Type",
        "Access-Control-Allow-Methods": "POST, OPTIONS"
    })
}

fn http_envelope(status: u16, body: &Value) -> Value {
    json!({ "statusCode": status, "headers": cors_headers(), "body": body.to_string() })
}

/// Single entry point for the assistant. API Gateway wraps the caller's JSON
/// in a `body` string; bot invocations deliver the payload directly. Either
/// way the parsed payload goes through `route_payload`.
pub async fn handle_event<S: RecordStore>(store: &S, event: &Value) -> Value {
    let http_shaped = event.get("httpMethod").is_some() || event.get("requestContext").is_some();
    if !http_shaped {
        return route_payload(store, event).await;
    }

    let method = event
        .get("httpMethod")
        .and_then(Value::as_str)
        .or_else(|| event.pointer("/requestContext/http/method").and_then(Value::as_str))
        .unwrap_or("POST");
    if method.eq_ignore_ascii_case("OPTIONS") {
        return json!({ "statusCode": 200, "headers": cors_headers(), "body": "" });
    }

    let payload: Value = match event
        .get("body")
        .and_then(Value::as_str)
        .map(serde_json::from_str)
    {
        Some(Ok(payload)) => payload,
        _ => return http_envelope(200, &json!({ "message": UNREADABLE_REPLY })),
    };

    let response = route_payload(store, &payload).await;
    http_envelope(200, &response)
}

/// Route one parsed payload. A raw-text `message` field selects free-text
/// chat mode (flat `{message}` envelope); its absence means a structured bot
/// event (dialog-state envelope). Bot calls never carry `message`.
pub async fn route_payload<S: RecordStore>(store: &S, payload: &Value) -> Value {
    if let Some(text) = payload.get("message").and_then(Value::as_str) {
        let rule = router::classify(text);
        let mut body = json!({ "message": rule.reply, "intent": rule.name });
        if let Some(session_id) = payload.get("sessionId").and_then(Value::as_str) {
            body["sessionId"] = json!(session_id);
        }
        return body;
    }

    match DialogTurn::from_bot_event(payload) {
        Some(turn) => {
            let reply = router::fulfill(store, &turn).await;
            dialog_response(turn.intent.name(), true, &reply)
        }
        None => dialog_response("Unknown", false, UNREADABLE_REPLY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemoryStore;

    #[tokio::test]
    async fn bot_event_gets_a_dialog_envelope() {
        let store = MemoryStore::default();
        let event = json!({
            "sessionState": { "intent": { "name": "GetHelp", "slots": {} } }
        });

        let response = handle_event(&store, &event).await;

        assert_eq!(
            response.pointer("/sessionState/dialogAction/fulfillmentState"),
            Some(&json!("Fulfilled"))
        );
        assert_eq!(
            response.pointer("/sessionState/intent/name"),
            Some(&json!("GetHelp"))
        );
        assert_eq!(
            response.pointer("/messages/0/content"),
            Some(&json!(router::HELP_REPLY))
        );
    }

    #[tokio::test]
    async fn http_chat_gets_a_flat_envelope() {
        let store = MemoryStore::default();
        let event = json!({
            "httpMethod": "POST",
            "body": json!({ "message": "what are your rates", "sessionId": "s-1" }).to_string()
        });

        let response = handle_event(&store, &event).await;

        assert_eq!(response["statusCode"], 200);
        let body: Value =
            serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
        assert_eq!(body["message"], router::RATES_REPLY);
        assert_eq!(body["sessionId"], "s-1");
    }

    #[tokio::test]
    async fn preflight_short_circuits() {
        let store = MemoryStore::default();
        let event = json!({ "httpMethod": "OPTIONS" });

        let response = handle_event(&store, &event).await;

        assert_eq!(response["statusCode"], 200);
        assert_eq!(
            response["headers"]["Access-Control-Allow-Origin"],
            "*"
        );
    }

    #[tokio::test]
    async fn unreadable_http_body_still_answers() {
        let store = MemoryStore::default();
        let event = json!({ "httpMethod": "POST", "body": "not json" });

        let response = handle_event(&store, &event).await;

        assert_eq!(response["statusCode"], 200);
        assert!(response["body"].as_str().unwrap().contains("couldn't read"));
    }

    #[tokio::test]
    async fn malformed_bot_event_fails_politely() {
        let store = MemoryStore::default();
        let event = json!({ "sessionState": {} });

        let response = handle_event(&store, &event).await;

        assert_eq!(
            response.pointer("/sessionState/dialogAction/fulfillmentState"),
            Some(&json!("Failed"))
        );
    }
}
