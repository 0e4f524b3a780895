//! Statistics for the playlist and the broadcast hub

use std::time::Duration;

use serde::Serialize;

/// Selection log statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistStats {
    /// Selections currently queued
    pub len: usize,
    /// Total selections ever appended
    pub appended: u64,
    /// Total selections ever pruned
    pub pruned: u64,
    /// Backlog recorded by the last batch prune
    pub last_batch_size: usize,
    /// When the last batch prune ran (Unix seconds)
    pub last_batch_at: Option<i64>,
}

/// Broadcast hub statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    /// Currently registered subscribers
    pub subscribers: usize,
    /// Total publish calls
    pub published: u64,
    /// Total messages placed in a mailbox
    pub delivered: u64,
    /// Subscribers evicted for not draining their mailbox
    pub evicted: u64,
}

impl HubStats {
    /// Average number of mailboxes reached per publish
    pub fn fan_out(&self) -> f64 {
        if self.published > 0 {
            self.delivered as f64 / self.published as f64
        } else {
            0.0
        }
    }
}

/// Server-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerStats {
    /// Seconds since the server was created
    pub uptime_secs: u64,
    /// Poll path
    pub playlist: PlaylistStats,
    /// Push path
    pub hub: HubStats,
    /// Average mailboxes reached per publish
    pub fan_out: f64,
}

impl ServerStats {
    pub fn new(uptime: Duration, playlist: PlaylistStats, hub: HubStats) -> Self {
        Self {
            uptime_secs: uptime.as_secs(),
            fan_out: hub.fan_out(),
            playlist,
            hub,
        }
    }
}
