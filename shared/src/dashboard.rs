use serde::Serialize;

use crate::error::HandlerError;
use crate::store::RecordStore;
use crate::types::LoginRecord;

/// Bounded window of login records returned to the dashboard.
pub const LOGIN_ACTIVITY_LIMIT: i32 = 100;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_users: u64,
    pub total_active_bookings: u64,
    pub login_activity: Vec<LoginRecord>,
    pub timestamp: String,
}

/// Compute the three dashboard aggregates. The scans are independent and may
/// observe different snapshots of the store; any scan failure fails the
/// whole request, so no partial aggregate is ever returned.
pub async fn summarize<S: RecordStore>(store: &S) -> Result<DashboardSummary, HandlerError> {
    let mut total_users: u64 = 0;
    let mut start = None;
    loop {
        let page = store.scan_users_page("user", start).await?;
        total_users += page.items.len() as u64;
        match page.next {
            Some(key) => start = Some(key),
            None => break,
        }
    }

    let mut total_active_bookings: u64 = 0;
    let mut start = None;
    loop {
        let page = store.scan_active_bookings_page(start).await?;
        total_active_bookings += page.items.len() as u64;
        match page.next {
            Some(key) => start = Some(key),
            None => break,
        }
    }

    let login_activity = store.recent_logins(LOGIN_ACTIVITY_LIMIT).await?;

    Ok(DashboardSummary {
        total_users,
        total_active_bookings,
        login_activity,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
