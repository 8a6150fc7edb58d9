use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An urgent blood-need request, as created by the requesting flow.
///
/// The stored row also carries a store-assigned `id` and `created_at`;
/// the dispatch pipeline receives the id alongside this record and treats
/// the row as immutable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SosRequest {
    pub district: String,
    pub blood_group: String,
    pub note: Option<String>,
}

/// A registered user eligible for push notifications.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotifiableUser {
    pub id: Uuid,
    pub district: String,
    pub blood_group: String,
    pub is_blood_clear: bool,
    pub fcm_token: Option<String>,
}

/// A registered donor contact reachable by SMS.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donor {
    pub id: Uuid,
    pub district: String,
    pub blood_group: String,
    pub is_blood_clear: bool,
    pub phone: Option<String>,
}

/// SMS queue record status.
///
/// The dispatch pipeline only ever writes `Pending`; the downstream
/// sender owns the transition to `Sent` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum SmsStatus {
    Pending,
    Sent,
    Failed,
}

impl std::fmt::Display for SmsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmsStatus::Pending => write!(f, "pending"),
            SmsStatus::Sent => write!(f, "sent"),
            SmsStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A queued SMS job awaiting a downstream sender.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PendingSms {
    pub id: Uuid,
    pub sos_id: Uuid,
    pub donor_id: Uuid,
    pub phone: String,
    pub message: String,
    pub status: SmsStatus,
    pub created_at: DateTime<Utc>,
}

/// Structured data section of a push payload.
///
/// Key spelling matches what the mobile client expects: camelCase fields
/// plus the snake_case `click_action` routing marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushData {
    pub sos_id: Uuid,
    pub district: String,
    pub blood_group: String,
    /// Empty string when the request carries no note.
    pub note: String,
    #[serde(rename = "click_action")]
    pub click_action: String,
}

/// A push notification payload shared across all recipient device tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub data: PushData,
}
