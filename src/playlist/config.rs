//! Playlist configuration

use std::time::Duration;

/// Default retention window for [`PrunePolicy::AgeWindow`]
pub const DEFAULT_EXPIRE_SECS: u64 = 5;

/// Default interval between prune cycles
pub const DEFAULT_PRUNE_INTERVAL: Duration = Duration::from_secs(1);

/// Eviction policy applied on every prune cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrunePolicy {
    /// Keep entries strictly younger than `timeout`, drop the rest
    AgeWindow {
        /// Retention window; ages are whole seconds, so the window rounds up
        timeout: Duration,
    },
    /// Drop the backlog that was already present at the previous prune
    ///
    /// An entry survives exactly one full prune interval, so every client
    /// polling at least once per interval observes it.
    Batch,
}

impl Default for PrunePolicy {
    fn default() -> Self {
        PrunePolicy::AgeWindow {
            timeout: Duration::from_secs(DEFAULT_EXPIRE_SECS),
        }
    }
}

/// Configuration for the selection log
#[derive(Debug, Clone)]
pub struct PlaylistConfig {
    /// Eviction policy
    pub policy: PrunePolicy,

    /// How often the background task prunes
    pub prune_interval: Duration,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            policy: PrunePolicy::default(),
            prune_interval: DEFAULT_PRUNE_INTERVAL,
        }
    }
}

impl PlaylistConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the eviction policy
    pub fn policy(mut self, policy: PrunePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use the age-window policy with the given retention window
    pub fn age_window(self, timeout: Duration) -> Self {
        self.policy(PrunePolicy::AgeWindow { timeout })
    }

    /// Use the batch-consumption policy
    pub fn batch(self) -> Self {
        self.policy(PrunePolicy::Batch)
    }

    /// Set the prune interval
    ///
    /// A zero interval is bumped to one millisecond; `tokio::time::interval`
    /// rejects zero.
    pub fn prune_interval(mut self, interval: Duration) -> Self {
        self.prune_interval = interval.max(Duration::from_millis(1));
        self
    }
}
