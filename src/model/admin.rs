use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: String,
    pub admin_email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_polls: u64,
    pub total_votes: u64,
    pub total_notifications: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub signed_up: String,
}

/// Admin-side poll listing row; carries aggregates the public poll
/// shape does not.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPoll {
    #[serde(rename = "_id")]
    pub id: String,
    pub poll_name: String,
    #[serde(default)]
    pub created_by_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total_votes: u64,
    pub created_at: DateTime<Utc>,
    pub poll_duration: DateTime<Utc>,
    #[serde(default)]
    pub options: Vec<super::poll::PollOption>,
    #[serde(default)]
    pub share_able: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollQuestion {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationVoter {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub device_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPoll {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_by_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub voter: Option<NotificationVoter>,
    #[serde(default)]
    pub voter_city: Option<String>,
    #[serde(default)]
    pub voter_country: Option<String>,
    #[serde(default)]
    pub voter_device_name: Option<String>,
    #[serde(default)]
    pub poll: Option<NotificationPoll>,
    #[serde(default)]
    pub location_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}
