//! In-memory fakes for the external-collaborator seams, shared by the
//! handler test modules.

use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::directory::IdentityDirectory;
use crate::error::HandlerError;
use crate::notify::NotificationPublisher;
use crate::queue::MessageQueue;
use crate::store::{Page, PageKey, RecordStore};
use crate::types::{BookingRecord, LoginRecord, UserRecord};

/// In-memory record store. Scans serve a single page from the flat vectors,
/// unless `user_pages` / `booking_pages` are set, in which case the
/// pre-built pages are served in order with continuation tokens between
/// them.
#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<Vec<UserRecord>>,
    pub logins: Mutex<Vec<LoginRecord>>,
    pub bookings: Mutex<Vec<BookingRecord>>,
    pub user_pages: Vec<Vec<UserRecord>>,
    pub booking_pages: Vec<Vec<BookingRecord>>,
    pub fail_writes: bool,
}

fn page_token(next_index: usize) -> PageKey {
    let mut key = PageKey::new();
    key.insert("page".to_string(), AttributeValue::N(next_index.to_string()));
    key
}

fn token_index(start: &Option<PageKey>) -> usize {
    start
        .as_ref()
        .and_then(|key| key.get("page"))
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn paged<T: Clone>(pages: &[Vec<T>], start: Option<PageKey>) -> Page<T> {
    let index = token_index(&start);
    let items = pages.get(index).cloned().unwrap_or_default();
    let next = if index + 1 < pages.len() {
        Some(page_token(index + 1))
    } else {
        None
    };
    Page { items, next }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put_user(&self, user: &UserRecord) -> Result<(), HandlerError> {
        if self.fail_writes {
            return Err(HandlerError::Dependency("write refused".to_string()));
        }
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn put_login(&self, record: &LoginRecord) -> Result<(), HandlerError> {
        if self.fail_writes {
            return Err(HandlerError::Dependency("write refused".to_string()));
        }
        self.logins.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn scan_users_page(
        &self,
        role: &str,
        start: Option<PageKey>,
    ) -> Result<Page<UserRecord>, HandlerError> {
        if !self.user_pages.is_empty() {
            return Ok(paged(&self.user_pages, start));
        }
        let items = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect();
        Ok(Page { items, next: None })
    }

    async fn scan_active_bookings_page(
        &self,
        start: Option<PageKey>,
    ) -> Result<Page<BookingRecord>, HandlerError> {
        if !self.booking_pages.is_empty() {
            return Ok(paged(&self.booking_pages, start));
        }
        let items = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.status == "confirmed" || b.status == "active")
            .cloned()
            .collect();
        Ok(Page { items, next: None })
    }

    async fn recent_logins(&self, limit: i32) -> Result<Vec<LoginRecord>, HandlerError> {
        let logins = self.logins.lock().unwrap();
        Ok(logins.iter().take(limit as usize).cloned().collect())
    }

    async fn put_booking(&self, booking: &BookingRecord) -> Result<(), HandlerError> {
        if self.fail_writes {
            return Err(HandlerError::Dependency("write refused".to_string()));
        }
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(())
    }

    async fn get_booking(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<BookingRecord>, HandlerError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned())
    }

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<BookingRecord>, HandlerError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.iter().filter(|b| b.user_id == user_id).cloned().collect())
    }

    async fn mark_booking_cancelled(
        &self,
        id: &str,
        user_id: &str,
        updated_at: &str,
    ) -> Result<(), HandlerError> {
        let mut bookings = self.bookings.lock().unwrap();
        if let Some(booking) = bookings
            .iter_mut()
            .find(|b| b.id == id && b.user_id == user_id)
        {
            booking.status = "cancelled".to_string();
            booking.updated_at = updated_at.to_string();
        }
        Ok(())
    }
}

/// Records publishes and subscriptions instead of calling out.
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<(String, String)>>,
    pub subscribed: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, subject: &str, message: &str) -> Result<(), HandlerError> {
        self.published
            .lock()
            .unwrap()
            .push((subject.to_string(), message.to_string()));
        Ok(())
    }

    async fn subscribe_email(&self, endpoint: &str) -> Result<(), HandlerError> {
        self.subscribed.lock().unwrap().push(endpoint.to_string());
        Ok(())
    }
}

/// Records queued message bodies.
#[derive(Default)]
pub struct RecordingQueue {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl MessageQueue for RecordingQueue {
    async fn send(&self, body: &str) -> Result<(), HandlerError> {
        self.sent.lock().unwrap().push(body.to_string());
        Ok(())
    }
}

/// Directory fake: `None` models an account without an email attribute.
#[derive(Default)]
pub struct FakeDirectory {
    pub email: Option<String>,
}

impl FakeDirectory {
    pub fn with_email(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
        }
    }
}

#[async_trait]
impl IdentityDirectory for FakeDirectory {
    async fn email_for_user(&self, _user_id: &str) -> Result<Option<String>, HandlerError> {
        Ok(self.email.clone())
    }
}
