use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    #[serde(rename = "_id")]
    pub id: String,
    pub option_text: String,
    #[serde(default)]
    pub vote_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: String,
    pub poll_name: String,
    /// End timestamp. "Ended" is always derived from this at evaluation
    /// time, never cached.
    pub poll_duration: DateTime<Utc>,
    #[serde(default)]
    pub is_poll_active: bool,
    #[serde(default)]
    pub options: Vec<PollOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_able: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
}

impl Poll {
    pub fn is_ended(&self, now: DateTime<Utc>) -> bool {
        self.poll_duration <= now
    }

    pub fn owner_name(&self) -> &str {
        self.created_by_name.as_deref().unwrap_or("Poll")
    }

    /// Countdown line shown above the ballot, e.g. "Ends in 3h 12min".
    pub fn ends_text(&self, now: DateTime<Utc>) -> String {
        let diff = self.poll_duration - now;
        if diff <= chrono::Duration::zero() {
            return "Poll ended".to_string();
        }
        let hrs = diff.num_hours();
        let mins = diff.num_minutes() % 60;
        format!("Ends in {hrs}h {mins}min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn poll_ending_at(ts: i64) -> Poll {
        Poll {
            id: "p1".into(),
            poll_name: "Best snack".into(),
            poll_duration: Utc.timestamp_opt(ts, 0).unwrap(),
            is_poll_active: true,
            options: vec![],
            share_able: None,
            created_by_name: None,
        }
    }

    #[test]
    fn ended_is_derived_from_the_clock() {
        let poll = poll_ending_at(1_000);
        assert!(!poll.is_ended(Utc.timestamp_opt(999, 0).unwrap()));
        assert!(poll.is_ended(Utc.timestamp_opt(1_000, 0).unwrap()));
        assert!(poll.is_ended(Utc.timestamp_opt(1_001, 0).unwrap()));
    }

    #[test]
    fn ends_text_counts_down_in_hours_and_minutes() {
        let poll = poll_ending_at(3 * 3600 + 12 * 60);
        let now = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(poll.ends_text(now), "Ends in 3h 12min");
        assert_eq!(poll.ends_text(poll.poll_duration), "Poll ended");
    }

    #[test]
    fn deserializes_wire_shape() {
        let raw = r#"{
            "_id": "665f1",
            "pollName": "Best snack",
            "pollDuration": "2025-06-01T12:00:00Z",
            "isPollActive": true,
            "options": [
                { "_id": "a", "optionText": "Chips", "voteCount": 3 },
                { "_id": "b", "optionText": "Fruit" }
            ]
        }"#;
        let poll: Poll = serde_json::from_str(raw).unwrap();
        assert_eq!(poll.options.len(), 2);
        assert_eq!(poll.options[0].vote_count, 3);
        assert_eq!(poll.options[1].vote_count, 0);
        assert_eq!(poll.owner_name(), "Poll");
    }
}
