use serde::{Deserialize, Serialize};

// ========== USER ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub role: String, // user | franchise
    #[serde(rename = "securityQuestion")]
    pub security_question: String,
    #[serde(rename = "securityAnswer")]
    pub security_answer: String,
}

// ========== LOGIN RECORD ==========
// Append-only; one record per login attempt.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoginRecord {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "loginTimestamp")]
    pub login_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ========== BOOKING ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BookingRecord {
    pub id: String, // BK<unix seconds>
    #[serde(rename = "userId")]
    pub user_id: String,
    pub location: String,
    pub duration: String,
    pub status: String, // confirmed | cancelled (legacy rows: active)
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}
