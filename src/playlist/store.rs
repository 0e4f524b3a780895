//! Selection log implementation
//!
//! The shared, lock-protected queue of selections plus its pruning policy.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::library::Library;
use crate::stats::PlaylistStats;

use super::config::{PlaylistConfig, PrunePolicy};
use super::error::PlaylistError;
use super::selection::{unix_now, Selection};

/// Mutable state guarded by the log's lock
#[derive(Debug, Default)]
struct LogState {
    /// Selections in arrival order
    selections: VecDeque<Selection>,

    /// Entries left over after the previous batch prune
    last_batch_size: usize,

    /// When the previous batch prune ran
    last_batch_at: Option<i64>,

    /// Total selections ever appended
    appended: u64,

    /// Total selections ever pruned
    pruned: u64,
}

/// Ordered, time-bounded log of play requests
///
/// Thread-safe via `RwLock`: `append` and `prune` take the write lock,
/// `snapshot` takes the read lock and returns an owned copy.
#[derive(Debug)]
pub struct SelectionLog {
    state: RwLock<LogState>,
    library: Arc<Library>,
    config: PlaylistConfig,
}

impl SelectionLog {
    /// Create a new log with default configuration
    pub fn new(library: Arc<Library>) -> Self {
        Self::with_config(library, PlaylistConfig::default())
    }

    /// Create a new log with custom configuration
    pub fn with_config(library: Arc<Library>, config: PlaylistConfig) -> Self {
        Self {
            state: RwLock::new(LogState::default()),
            library,
            config,
        }
    }

    /// Get the log configuration
    pub fn config(&self) -> &PlaylistConfig {
        &self.config
    }

    /// Get the library used to validate appends
    pub fn library(&self) -> &Arc<Library> {
        &self.library
    }

    /// Append a selection for `name`, stamped with the current time
    ///
    /// Returns `InvalidResource` without touching the log if `name` is not in
    /// the library.
    pub async fn append(&self, name: &str) -> Result<Selection, PlaylistError> {
        self.append_at(name, unix_now()).await
    }

    /// Append with an explicit clock reading
    ///
    /// The stored timestamp is never earlier than the newest entry's, so the
    /// log stays sorted even if the clock steps backwards.
    pub(crate) async fn append_at(&self, name: &str, now: i64) -> Result<Selection, PlaylistError> {
        if !self.library.contains(name) {
            tracing::debug!(resource = %name, "Rejected selection for unknown resource");
            return Err(PlaylistError::InvalidResource(name.to_owned()));
        }

        let mut state = self.state.write().await;

        let timestamp = state
            .selections
            .back()
            .map_or(now, |last| last.timestamp().max(now));
        let selection = Selection::new(name, timestamp);

        state.selections.push_back(selection.clone());
        state.appended += 1;

        tracing::debug!(
            resource = %name,
            timestamp = timestamp,
            queued = state.selections.len(),
            "Selection appended"
        );

        Ok(selection)
    }

    /// Copy of the current contents, oldest first
    pub async fn snapshot(&self) -> Vec<Selection> {
        let state = self.state.read().await;
        state.selections.iter().cloned().collect()
    }

    /// Number of queued selections
    pub async fn len(&self) -> usize {
        self.state.read().await.selections.len()
    }

    /// Check if the log is empty
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.selections.is_empty()
    }

    /// Run one prune cycle against the current time
    ///
    /// Returns the number of evicted selections.
    pub async fn prune(&self) -> usize {
        self.prune_at(unix_now()).await
    }

    /// Run one prune cycle against an explicit clock reading
    pub async fn prune_at(&self, now: i64) -> usize {
        let mut state = self.state.write().await;

        let removed = match self.config.policy {
            PrunePolicy::AgeWindow { timeout } => {
                // Ages are whole seconds, so `age < timeout` is `age < ceil(timeout)`
                let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
                let window = i64::try_from(secs).unwrap_or(i64::MAX);

                // First entry still inside the window; everything before it goes
                let keep_from = state
                    .selections
                    .iter()
                    .position(|s| s.newer_than(window, now))
                    .unwrap_or(state.selections.len());

                state.selections.drain(..keep_from);
                keep_from
            }
            PrunePolicy::Batch => {
                let count = state.last_batch_size.min(state.selections.len());

                state.selections.drain(..count);
                state.last_batch_size = state.selections.len();
                state.last_batch_at = Some(now);
                count
            }
        };

        state.pruned += removed as u64;

        if removed > 0 {
            tracing::debug!(
                removed = removed,
                remaining = state.selections.len(),
                "Playlist pruned"
            );
        } else {
            tracing::trace!(remaining = state.selections.len(), "Nothing to prune");
        }

        removed
    }

    /// Get log statistics
    pub async fn stats(&self) -> PlaylistStats {
        let state = self.state.read().await;

        PlaylistStats {
            len: state.selections.len(),
            appended: state.appended,
            pruned: state.pruned,
            last_batch_size: state.last_batch_size,
            last_batch_at: state.last_batch_at,
        }
    }

    /// Spawn background prune task
    ///
    /// Returns a handle that can be used to abort the task.
    pub fn spawn_prune_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let log = Arc::clone(self);
        let interval = log.config.prune_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                log.prune().await;
            }
        })
    }
}
