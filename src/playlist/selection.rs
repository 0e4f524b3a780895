//! Selection value type

use serde::Serialize;

/// Current wall-clock time in Unix seconds
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// A request to play something in the library
///
/// Selections are only constructed after the resource name has been checked
/// against the library, and are immutable afterwards. Serializes as
/// `{"resource": "...", "timestamp": N}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    resource: String,
    timestamp: i64,
}

impl Selection {
    pub(crate) fn new(resource: impl Into<String>, timestamp: i64) -> Self {
        Self {
            resource: resource.into(),
            timestamp,
        }
    }

    /// Library name of the requested resource
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// When the selection was made, in Unix seconds
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Age in seconds relative to `now`
    pub fn age_at(&self, now: i64) -> i64 {
        now.saturating_sub(self.timestamp)
    }

    /// Whether this selection is strictly younger than `window_secs` at `now`
    pub fn newer_than(&self, window_secs: i64, now: i64) -> bool {
        self.age_at(now) < window_secs
    }
}
