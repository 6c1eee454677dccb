use std::collections::HashMap;

use serde_json::Value;

/// Classified category of a user request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    BookScooter,
    CheckBooking,
    CancelBooking,
    GetHelp,
    GetVehicleTypes,
    Navigation,
    CustomerConcern,
    BookingLookup,
    Other(String),
}

impl Intent {
    pub fn parse(name: &str) -> Self {
        match name {
            "BookScooter" => Self::BookScooter,
            "CheckBooking" => Self::CheckBooking,
            "CancelBooking" => Self::CancelBooking,
            "GetHelp" => Self::GetHelp,
            "GetVehicleTypes" => Self::GetVehicleTypes,
            "NavigationIntent" => Self::Navigation,
            "CustomerConcernIntent" => Self::CustomerConcern,
            "BookingLookupIntent" => Self::BookingLookup,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::BookScooter => "BookScooter",
            Self::CheckBooking => "CheckBooking",
            Self::CancelBooking => "CancelBooking",
            Self::GetHelp => "GetHelp",
            Self::GetVehicleTypes => "GetVehicleTypes",
            Self::Navigation => "NavigationIntent",
            Self::CustomerConcern => "CustomerConcernIntent",
            Self::BookingLookup => "BookingLookupIntent",
            Self::Other(name) => name,
        }
    }
}

/// Slot values for one turn. A slot may appear in the bot event without an
/// interpreted value; only interpreted values land here.
#[derive(Debug, Default, Clone)]
pub struct Slots(HashMap<String, String>);

impl Slots {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }

    /// Parse the bot's slot map: `slots.<Name>.value.interpretedValue`.
    pub fn from_bot_slots(value: &Value) -> Self {
        let mut slots = HashMap::new();
        if let Some(map) = value.as_object() {
            for (name, slot) in map {
                if let Some(v) = slot
                    .pointer("/value/interpretedValue")
                    .and_then(Value::as_str)
                {
                    slots.insert(name.clone(), v.to_string());
                }
            }
        }
        Self(slots)
    }
}

/// One conversational turn. Exists only for the duration of a request;
/// never persisted.
#[derive(Debug)]
pub struct DialogTurn {
    pub intent: Intent,
    pub slots: Slots,
    pub transcript: Option<String>,
    pub user_id: Option<String>,
}

impl DialogTurn {
    /// Build a turn from a bot fulfillment event: intent name and slots from
    /// `sessionState.intent`, the caller identity from the session
    /// attributes, and the raw transcript when the bot forwards one.
    pub fn from_bot_event(event: &Value) -> Option<Self> {
        let intent_name = event
            .pointer("/sessionState/intent/name")
            .and_then(Value::as_str)?;

        let slots = event
            .pointer("/sessionState/intent/slots")
            .map(Slots::from_bot_slots)
            .unwrap_or_default();

        let user_id = event
            .pointer("/sessionState/sessionAttributes/userId")
            .and_then(Value::as_str)
            .map(str::to_string);

        let transcript = event
            .get("inputTranscript")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self {
            intent: Intent::parse(intent_name),
            slots,
            transcript,
            user_id,
        })
    }
}
