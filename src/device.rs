use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use uuid::Uuid;

const DEVICE_ID_FILE: &str = "tbf_device_id";

/// File-backed store for the per-device identifier. One opaque string,
/// written once, reused for every poll this device ever opens.
pub struct DeviceStore {
    root: Option<PathBuf>,
}

impl DeviceStore {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Returns the persisted device id, generating and persisting one on
    /// first use. Returns an empty string when local storage is
    /// unavailable: the caller still votes, the server just cannot apply
    /// duplicate prevention to this client.
    pub fn get_or_create(&self) -> String {
        let Some(root) = self.root.as_deref() else {
            return String::new();
        };
        let path = root.join(DEVICE_ID_FILE);
        if let Ok(existing) = fs::read_to_string(&path) {
            let trimmed = existing.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        let id = new_device_id();
        if let Err(err) = persist(root, &path, &id) {
            warn!(%err, "device id not persisted, continuing anonymously");
            return String::new();
        }
        id
    }
}

fn persist(root: &Path, path: &Path, id: &str) -> std::io::Result<()> {
    fs::create_dir_all(root)?;
    fs::write(path, id)
}

/// UUIDv4 plus a base36 millisecond suffix. The suffix keeps ids
/// distinguishable even if the random source were ever degraded.
fn new_device_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    format!("{}-{}", Uuid::new_v4(), base36(millis))
}

fn base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(std::char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}

static UA_PLATFORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("valid regex"));

/// Extracts a human-readable platform name from a user-agent string,
/// e.g. "Linux x86_64" out of "Mozilla/5.0 (X11; Linux x86_64) ...".
/// Falls back to the whole string when nothing better is found.
pub fn readable_device_name(user_agent: &str) -> String {
    let Some(caps) = UA_PLATFORM.captures(user_agent) else {
        return user_agent.to_string();
    };
    let parts: Vec<&str> = caps[1].split(';').map(str::trim).collect();
    if parts.len() >= 2 {
        return parts[1].to_string();
    }
    match parts.first() {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => user_agent.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("tbf-poll-test-{}", Uuid::new_v4()))
    }

    #[test]
    fn id_is_stable_across_calls() {
        let dir = scratch_dir();
        let store = DeviceStore::new(Some(dir.clone()));
        let first = store.get_or_create();
        let second = store.get_or_create();
        assert!(!first.is_empty());
        assert_eq!(first, second);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn separate_stores_on_same_root_agree() {
        let dir = scratch_dir();
        let first = DeviceStore::new(Some(dir.clone())).get_or_create();
        let second = DeviceStore::new(Some(dir.clone())).get_or_create();
        assert_eq!(first, second);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_storage_yields_empty_id() {
        let store = DeviceStore::new(None);
        assert_eq!(store.get_or_create(), "");
    }

    #[test]
    fn generated_ids_carry_a_suffix() {
        let id = new_device_id();
        // uuid is 36 chars; the suffix sits after the fifth dash
        assert!(id.len() > 37);
        assert_eq!(id.matches('-').count(), 5);
    }

    #[test]
    fn base36_round_values() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1_000_000), "lfls");
    }

    #[test]
    fn device_name_prefers_second_segment() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";
        assert_eq!(readable_device_name(ua), "Linux x86_64");
    }

    #[test]
    fn device_name_single_segment() {
        assert_eq!(readable_device_name("curl/8.0 (x86_64-pc-linux-gnu)"), "x86_64-pc-linux-gnu");
    }

    #[test]
    fn device_name_without_parens_is_passed_through() {
        assert_eq!(readable_device_name("tbf-vote/0.1"), "tbf-vote/0.1");
    }
}
