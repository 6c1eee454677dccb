use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use crate::config::TableNames;
use crate::error::HandlerError;
use crate::types::{BookingRecord, LoginRecord, UserRecord};

/// Continuation token for paginated scans, mirroring the store's
/// last-evaluated-key shape.
pub type PageKey = HashMap<String, AttributeValue>;

/// One page of scan results plus the token for the next page, if any.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageKey>,
}

/// Record store seam. `DynamoStore` below is the AWS-backed implementation;
/// tests inject in-memory fakes. Scans are page-at-a-time: callers loop on
/// the returned continuation token until none remains.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put_user(&self, user: &UserRecord) -> Result<(), HandlerError>;

    async fn put_login(&self, record: &LoginRecord) -> Result<(), HandlerError>;

    async fn scan_users_page(
        &self,
        role: &str,
        start: Option<PageKey>,
    ) -> Result<Page<UserRecord>, HandlerError>;

    async fn scan_active_bookings_page(
        &self,
        start: Option<PageKey>,
    ) -> Result<Page<BookingRecord>, HandlerError>;

    async fn recent_logins(&self, limit: i32) -> Result<Vec<LoginRecord>, HandlerError>;

    async fn put_booking(&self, booking: &BookingRecord) -> Result<(), HandlerError>;

    async fn get_booking(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<BookingRecord>, HandlerError>;

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<BookingRecord>, HandlerError>;

    async fn mark_booking_cancelled(
        &self,
        id: &str,
        user_id: &str,
        updated_at: &str,
    ) -> Result<(), HandlerError>;
}

/// DynamoDB-backed record store. Bookings use a composite key
/// (partition `userId`, sort `id`), so every read and mutation by id also
/// keys on the owner.
#[derive(Clone)]
pub struct DynamoStore {
    client: DynamoClient,
    tables: TableNames,
}

impl DynamoStore {
    pub fn new(client: DynamoClient, tables: TableNames) -> Self {
        Self { client, tables }
    }
}

fn attr_s(item: &HashMap<String, AttributeValue>, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).map(|s| s.to_string())
}

fn attr_bool(item: &HashMap<String, AttributeValue>, key: &str) -> Option<bool> {
    item.get(key).and_then(|v| v.as_bool().ok()).copied()
}

fn user_from_item(item: &HashMap<String, AttributeValue>) -> UserRecord {
    UserRecord {
        user_id: attr_s(item, "userId").unwrap_or_default(),
        email: attr_s(item, "email").unwrap_or_default(),
        role: attr_s(item, "role").unwrap_or_default(),
        security_question: attr_s(item, "securityQuestion").unwrap_or_default(),
        security_answer: attr_s(item, "securityAnswer").unwrap_or_default(),
    }
}

fn login_from_item(item: &HashMap<String, AttributeValue>) -> LoginRecord {
    LoginRecord {
        user_id: attr_s(item, "userId").unwrap_or_default(),
        login_timestamp: attr_s(item, "loginTimestamp").unwrap_or_default(),
        email: attr_s(item, "email"),
        success: attr_bool(item, "success"),
        message: attr_s(item, "message"),
    }
}

fn booking_from_item(item: &HashMap<String, AttributeValue>) -> BookingRecord {
    BookingRecord {
        id: attr_s(item, "id").unwrap_or_default(),
        user_id: attr_s(item, "userId").unwrap_or_default(),
        location: attr_s(item, "location").unwrap_or_default(),
        duration: attr_s(item, "duration").unwrap_or_default(),
        status: attr_s(item, "status").unwrap_or_default(),
        created_at: attr_s(item, "createdAt").unwrap_or_default(),
        updated_at: attr_s(item, "updatedAt").unwrap_or_default(),
    }
}

#[async_trait]
impl RecordStore for DynamoStore {
    async fn put_user(&self, user: &UserRecord) -> Result<(), HandlerError> {
        self.client
            .put_item()
            .table_name(&self.tables.users)
            .item("userId", AttributeValue::S(user.user_id.clone()))
            .item("email", AttributeValue::S(user.email.clone()))
            .item("role", AttributeValue::S(user.role.clone()))
            .item("securityQuestion", AttributeValue::S(user.security_question.clone()))
            .item("securityAnswer", AttributeValue::S(user.security_answer.clone()))
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to store user: {}", e)))?;
        Ok(())
    }

    async fn put_login(&self, record: &LoginRecord) -> Result<(), HandlerError> {
        let mut put_request = self
            .client
            .put_item()
            .table_name(&self.tables.logins)
            .item("userId", AttributeValue::S(record.user_id.clone()))
            .item("loginTimestamp", AttributeValue::S(record.login_timestamp.clone()));

        if let Some(email) = &record.email {
            put_request = put_request.item("email", AttributeValue::S(email.clone()));
        }
        if let Some(success) = record.success {
            put_request = put_request.item("success", AttributeValue::Bool(success));
        }
        if let Some(message) = &record.message {
            put_request = put_request.item("message", AttributeValue::S(message.clone()));
        }

        put_request
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to store login record: {}", e)))?;
        Ok(())
    }

    async fn scan_users_page(
        &self,
        role: &str,
        start: Option<PageKey>,
    ) -> Result<Page<UserRecord>, HandlerError> {
        let mut request = self
            .client
            .scan()
            .table_name(&self.tables.users)
            .filter_expression("#r = :role")
            .expression_attribute_names("#r", "role")
            .expression_attribute_values(":role", AttributeValue::S(role.to_string()));

        if let Some(key) = start {
            request = request.set_exclusive_start_key(Some(key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to scan users: {}", e)))?;

        Ok(Page {
            items: response.items().iter().map(user_from_item).collect(),
            next: response.last_evaluated_key().cloned(),
        })
    }

    async fn scan_active_bookings_page(
        &self,
        start: Option<PageKey>,
    ) -> Result<Page<BookingRecord>, HandlerError> {
        let mut request = self
            .client
            .scan()
            .table_name(&self.tables.bookings)
            .filter_expression("#s = :confirmed OR #s = :active")
            .expression_attribute_names("#s", "status")
            .expression_attribute_values(":confirmed", AttributeValue::S("confirmed".to_string()))
            .expression_attribute_values(":active", AttributeValue::S("active".to_string()));

        if let Some(key) = start {
            request = request.set_exclusive_start_key(Some(key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to scan bookings: {}", e)))?;

        Ok(Page {
            items: response.items().iter().map(booking_from_item).collect(),
            next: response.last_evaluated_key().cloned(),
        })
    }

    async fn recent_logins(&self, limit: i32) -> Result<Vec<LoginRecord>, HandlerError> {
        let response = self
            .client
            .scan()
            .table_name(&self.tables.logins)
            .limit(limit)
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to scan login records: {}", e)))?;

        Ok(response.items().iter().map(login_from_item).collect())
    }

    async fn put_booking(&self, booking: &BookingRecord) -> Result<(), HandlerError> {
        self.client
            .put_item()
            .table_name(&self.tables.bookings)
            .item("userId", AttributeValue::S(booking.user_id.clone()))
            .item("id", AttributeValue::S(booking.id.clone()))
            .item("location", AttributeValue::S(booking.location.clone()))
            .item("duration", AttributeValue::S(booking.duration.clone()))
            .item("status", AttributeValue::S(booking.status.clone()))
            .item("createdAt", AttributeValue::S(booking.created_at.clone()))
            .item("updatedAt", AttributeValue::S(booking.updated_at.clone()))
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to store booking: {}", e)))?;
        Ok(())
    }

    async fn get_booking(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<Option<BookingRecord>, HandlerError> {
        let response = self
            .client
            .get_item()
            .table_name(&self.tables.bookings)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to read booking: {}", e)))?;

        Ok(response.item().map(booking_from_item))
    }

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<BookingRecord>, HandlerError> {
        let response = self
            .client
            .query()
            .table_name(&self.tables.bookings)
            .key_condition_expression("userId = :user_id")
            .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to query bookings: {}", e)))?;

        Ok(response.items().iter().map(booking_from_item).collect())
    }

    async fn mark_booking_cancelled(
        &self,
        id: &str,
        user_id: &str,
        updated_at: &str,
    ) -> Result<(), HandlerError> {
        self.client
            .update_item()
            .table_name(&self.tables.bookings)
            .key("userId", AttributeValue::S(user_id.to_string()))
            .key("id", AttributeValue::S(id.to_string()))
            .update_expression("SET #s = :status, updatedAt = :updated_at")
            .expression_attribute_names("#s", "status")
            .expression_attribute_values(":status", AttributeValue::S("cancelled".to_string()))
            .expression_attribute_values(":updated_at", AttributeValue::S(updated_at.to_string()))
            .send()
            .await
            .map_err(|e| HandlerError::Dependency(format!("failed to cancel booking: {}", e)))?;
        Ok(())
    }
}
