//! Hub configuration

/// Default number of undelivered messages a subscriber may hold
pub const DEFAULT_MAILBOX_CAPACITY: usize = 64;

/// Configuration for the broadcast hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Capacity of each subscriber mailbox
    ///
    /// A subscriber whose mailbox is full when a message is published gets
    /// evicted. Values below 1 are treated as 1.
    pub mailbox_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

impl HubConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-subscriber mailbox capacity
    pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity.max(1);
        self
    }
}
