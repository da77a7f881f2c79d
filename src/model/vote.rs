use serde::{Deserialize, Serialize};

/// Write-once vote submission. Location and device-name fields are
/// best-effort metadata; the server accepts the vote without them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub option_id: String,
    pub unique_device_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_device_name: Option<String>,
}

/// Poll state as fetched for one device: the poll plus that device's
/// existing vote, if the server has one recorded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSnapshot {
    pub poll: super::poll::Poll,
    #[serde(default)]
    pub my_vote: Option<String>,
}
