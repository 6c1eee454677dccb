use crate::assistant::intent::{DialogTurn, Intent};
use crate::store::RecordStore;
use crate::types::BookingRecord;

pub const HELP_REPLY: &str = "I can help you with booking scooters, checking your bookings, and canceling bookings. What would you like to do?";

pub const VEHICLE_TYPES_REPLY: &str = "We offer three vehicle types: eBikes, gyroscooters, and Segways. All of them can be booked by the hour from any station.";

pub const RATES_REPLY: &str = "Our standard rate is $5 per hour for eBikes, $7 for gyroscooters, and $9 for Segways. Weekend discounts apply automatically.";

pub const FALLBACK_REPLY: &str = "I'm here to help with your scooter rental needs. You can book a ride, check your bookings, or cancel a booking. How can I assist you?";

const SIGN_IN_REPLY: &str = "I couldn't tell who you are. Please sign in and try again.";

const BOOK_RETRY_REPLY: &str =
    "I'm sorry, I couldn't complete your booking at the moment. Please try again or contact support.";

const CHECK_RETRY_REPLY: &str =
    "I'm having trouble checking your bookings right now. Please try again later.";

const CANCEL_RETRY_REPLY: &str =
    "I'm sorry, I couldn't cancel your booking at the moment. Please try again or contact support.";

/// One free-text classification rule: a reply template guarded by a keyword
/// set.
pub struct KeywordRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

/// Fallback when no rule matches.
pub static FALLBACK_RULE: KeywordRule = KeywordRule {
    name: "FallbackIntent",
    keywords: &[],
    reply: FALLBACK_REPLY,
};

/// Ordered rule table for free-text messages, evaluated top to bottom with
/// first match wins. The slice order IS the priority order: cancellation
/// before booking, so "cancel my booking" lands on cancellation.
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        name: "CancelBooking",
        keywords: &["cancel"],
        reply: "To cancel a booking, tell me 'Cancel booking' followed by your booking ID, for example 'Cancel booking BK1718000000'.",
    },
    KeywordRule {
        name: "BookScooter",
        keywords: &["book", "reserve", "rent", "ride"],
        reply: "You can book a ride by telling me the location and how long you need it, for example 'Book a scooter at City Hall for 2 hours'.",
    },
    KeywordRule {
        name: "GetVehicleTypes",
        keywords: &["vehicle", "scooter", "bike", "segway", "types"],
        reply: VEHICLE_TYPES_REPLY,
    },
    KeywordRule {
        name: "GetRates",
        keywords: &["rate", "price", "cost", "fee"],
        reply: RATES_REPLY,
    },
    KeywordRule {
        name: "GetRegistered",
        keywords: &["register", "sign up", "signup", "account"],
        reply: "You can register from the home page: choose Sign up, pick a security question, and we'll email you a confirmation.",
    },
    KeywordRule {
        name: "GetHours",
        keywords: &["hour", "open", "station", "where"],
        reply: "We're available around the clock. Stations are shown on the map in the app, and every station supports pickup and drop-off.",
    },
];

/// Pick the rule for a free-text message: lowercase it and return the first
/// rule with any keyword contained in the text.
pub fn classify(message: &str) -> &'static KeywordRule {
    let text = message.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| text.contains(k)))
        .unwrap_or(&FALLBACK_RULE)
}

/// Fulfill one classified turn. This function never fails: every internal
/// error is logged and mapped to a polite retry template, so the assistant
/// always answers.
pub async fn fulfill<S: RecordStore>(store: &S, turn: &DialogTurn) -> String {
    match &turn.intent {
        Intent::BookScooter => book_scooter(store, turn).await,
        Intent::CheckBooking => check_booking(store, turn).await,
        Intent::CancelBooking => cancel_booking(store, turn).await,
        Intent::GetHelp => HELP_REPLY.to_string(),
        Intent::GetVehicleTypes => VEHICLE_TYPES_REPLY.to_string(),
        Intent::Navigation | Intent::CustomerConcern | Intent::BookingLookup => {
            classify(turn.transcript.as_deref().unwrap_or("")).reply.to_string()
        }
        Intent::Other(name) => {
            tracing::info!("Unrecognized intent: {}", name);
            FALLBACK_REPLY.to_string()
        }
    }
}

async fn book_scooter<S: RecordStore>(store: &S, turn: &DialogTurn) -> String {
    let duration = turn.slots.get("Duration").unwrap_or("1 hour");
    let location = turn.slots.get("Location").unwrap_or("Unknown");
    let user_id = turn.user_id.as_deref().unwrap_or("guest");

    let now = chrono::Utc::now();
    let booking = BookingRecord {
        id: format!("BK{}", now.timestamp()),
        user_id: user_id.to_string(),
        location: location.to_string(),
        duration: duration.to_string(),
        status: "confirmed".to_string(),
        created_at: now.to_rfc3339(),
        updated_at: now.to_rfc3339(),
    };

    match store.put_booking(&booking).await {
        Ok(()) => format!(
            "I've successfully booked a scooter for you at {} for {}. Your booking ID is {}. You can check your booking status anytime!",
            location, duration, booking.id
        ),
        Err(e) => {
            tracing::error!("Booking write failed: {}", e);
            BOOK_RETRY_REPLY.to_string()
        }
    }
}

async fn check_booking<S: RecordStore>(store: &S, turn: &DialogTurn) -> String {
    let user_id = match turn.user_id.as_deref() {
        Some(id) => id,
        None => return SIGN_IN_REPLY.to_string(),
    };

    match store.bookings_for_user(user_id).await {
        Ok(bookings) => {
            if bookings.is_empty() {
                return "You don't have any bookings in our system.".to_string();
            }
            let mut active: Vec<BookingRecord> = bookings
                .into_iter()
                .filter(|b| b.status == "confirmed")
                .collect();
            if active.is_empty() {
                return "You don't have any active bookings at the moment.".to_string();
            }
            active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            format!(
                "You have {} active booking(s). The most recent is booking ID {}.",
                active.len(),
                active[0].id
            )
        }
        Err(e) => {
            tracing::error!("Booking lookup failed: {}", e);
            CHECK_RETRY_REPLY.to_string()
        }
    }
}

async fn cancel_booking<S: RecordStore>(store: &S, turn: &DialogTurn) -> String {
    let booking_id = turn.slots.get("BookingId").unwrap_or("Unknown");
    let user_id = match turn.user_id.as_deref() {
        Some(id) => id,
        None => return SIGN_IN_REPLY.to_string(),
    };

    // The lookup keys on (id, userId), so another user's booking id never
    // resolves here and never gets mutated.
    match store.get_booking(booking_id, user_id).await {
        Ok(Some(_)) => {
            let updated_at = chrono::Utc::now().to_rfc3339();
            match store.mark_booking_cancelled(booking_id, user_id, &updated_at).await {
                Ok(()) => format!(
                    "I've successfully canceled your booking {}. You should receive a confirmation shortly.",
                    booking_id
                ),
                Err(e) => {
                    tracing::error!("Booking cancel failed: {}", e);
                    CANCEL_RETRY_REPLY.to_string()
                }
            }
        }
        Ok(None) => format!(
            "I couldn't find booking {} in your account. Please check the booking ID and try again.",
            booking_id
        ),
        Err(e) => {
            tracing::error!("Booking lookup failed: {}", e);
            CANCEL_RETRY_REPLY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::intent::Slots;
    use crate::testutil::MemoryStore;

    fn turn(intent: Intent, slots: Slots, user_id: Option<&str>) -> DialogTurn {
        DialogTurn {
            intent,
            slots,
            transcript: None,
            user_id: user_id.map(str::to_string),
        }
    }

    #[test]
    fn cancellation_outranks_booking() {
        let rule = classify("how do I cancel my booking that I need to book");
        assert_eq!(rule.name, "CancelBooking");
    }

    #[test]
    fn rates_template_is_returned_verbatim() {
        assert_eq!(classify("what are your rates").reply, RATES_REPLY);
    }

    #[test]
    fn unmatched_text_falls_back() {
        assert_eq!(classify("tell me a joke").reply, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn book_scooter_creates_a_confirmed_booking() {
        let store = MemoryStore::default();
        let slots = Slots::default()
            .with("Duration", "2 hours")
            .with("Location", "Library");

        let reply = fulfill(&store, &turn(Intent::BookScooter, slots, Some("user-1"))).await;

        assert!(reply.contains("2 hours"));
        assert!(reply.contains("Library"));

        let bookings = store.bookings.lock().unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].status, "confirmed");
        assert_eq!(bookings[0].user_id, "user-1");
        assert!(bookings[0].id.starts_with("BK"));
        assert!(bookings[0].id[2..].chars().all(|c| c.is_ascii_digit()));
        assert!(reply.contains(&bookings[0].id));
    }

    #[tokio::test]
    async fn book_scooter_applies_slot_defaults() {
        let store = MemoryStore::default();

        let reply = fulfill(
            &store,
            &turn(Intent::BookScooter, Slots::default(), Some("user-1")),
        )
        .await;

        assert!(reply.contains("1 hour"));
        assert!(reply.contains("Unknown"));
    }

    #[tokio::test]
    async fn cancel_does_not_touch_another_users_booking() {
        let store = MemoryStore::default();
        let slots = Slots::default()
            .with("Duration", "1 hour")
            .with("Location", "Harbor");
        fulfill(&store, &turn(Intent::BookScooter, slots, Some("alice"))).await;
        let booking_id = store.bookings.lock().unwrap()[0].id.clone();

        let reply = fulfill(
            &store,
            &turn(
                Intent::CancelBooking,
                Slots::default().with("BookingId", &booking_id),
                Some("bob"),
            ),
        )
        .await;

        assert!(reply.contains("couldn't find booking"));
        assert_eq!(store.bookings.lock().unwrap()[0].status, "confirmed");
    }

    #[tokio::test]
    async fn book_check_cancel_round_trip() {
        let store = MemoryStore::default();
        let slots = Slots::default()
            .with("Duration", "2 hours")
            .with("Location", "Library");
        fulfill(&store, &turn(Intent::BookScooter, slots, Some("user-1"))).await;
        let booking_id = store.bookings.lock().unwrap()[0].id.clone();

        let reply = fulfill(
            &store,
            &turn(Intent::CheckBooking, Slots::default(), Some("user-1")),
        )
        .await;
        assert!(reply.contains("1 active booking"));
        assert!(reply.contains(&booking_id));

        let reply = fulfill(
            &store,
            &turn(
                Intent::CancelBooking,
                Slots::default().with("BookingId", &booking_id),
                Some("user-1"),
            ),
        )
        .await;
        assert!(reply.contains("successfully canceled"));

        let reply = fulfill(
            &store,
            &turn(Intent::CheckBooking, Slots::default(), Some("user-1")),
        )
        .await;
        assert_eq!(reply, "You don't have any active bookings at the moment.");
    }

    #[tokio::test]
    async fn store_failure_becomes_polite_text() {
        let store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };

        let reply = fulfill(
            &store,
            &turn(Intent::BookScooter, Slots::default(), Some("user-1")),
        )
        .await;

        assert_eq!(reply, BOOK_RETRY_REPLY);
    }

    #[tokio::test]
    async fn transcript_intents_classify_the_transcript() {
        let store = MemoryStore::default();
        let turn = DialogTurn {
            intent: Intent::CustomerConcern,
            slots: Slots::default(),
            transcript: Some("What vehicle types are available?".to_string()),
            user_id: None,
        };

        let reply = fulfill(&store, &turn).await;
        assert_eq!(reply, VEHICLE_TYPES_REPLY);
    }

    #[tokio::test]
    async fn unrecognized_intent_falls_back() {
        let store = MemoryStore::default();
        let reply = fulfill(
            &store,
            &turn(Intent::Other("OrderPizza".to_string()), Slots::default(), None),
        )
        .await;
        assert_eq!(reply, FALLBACK_REPLY);
    }
}
