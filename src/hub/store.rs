//! Broadcast hub implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};

use crate::playlist::Selection;
use crate::stats::HubStats;

use super::config::HubConfig;
use super::subscriber::{Subscriber, SubscriberId};

/// Fan-out hub for push delivery
///
/// All membership changes and publishes go through a single `Mutex`, so
/// "is this subscriber registered" is never observed half-updated.
#[derive(Debug)]
pub struct Hub {
    /// Registered mailboxes
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<Selection>>>,

    next_id: AtomicU64,
    published: AtomicU64,
    delivered: AtomicU64,
    evicted: AtomicU64,

    config: HubConfig,
}

impl Hub {
    /// Create a new hub with default configuration
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a new hub with custom configuration
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            published: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            config,
        }
    }

    /// Get the hub configuration
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Register a new subscriber with its own bounded mailbox
    pub async fn subscribe(&self) -> Subscriber {
        let (tx, rx) = mpsc::channel(self.config.mailbox_capacity.max(1));
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut subscribers = self.subscribers.lock().await;
        subscribers.insert(id, tx);

        tracing::info!(
            subscriber = %id,
            subscribers = subscribers.len(),
            "Subscriber added"
        );

        Subscriber::new(id, rx)
    }

    /// Unregister a subscriber and close its mailbox
    ///
    /// Idempotent: returns `false` if the subscriber was already gone.
    pub async fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.lock().await;
        let removed = subscribers.remove(&id).is_some();

        if removed {
            tracing::info!(
                subscriber = %id,
                subscribers = subscribers.len(),
                "Subscriber removed"
            );
        }

        removed
    }

    /// Deliver a selection to every registered subscriber
    ///
    /// Never waits on a subscriber. A full mailbox evicts its subscriber; a
    /// mailbox whose receiver was dropped is cleaned up. Returns the number of
    /// mailboxes the selection was placed in.
    pub async fn publish(&self, selection: Selection) -> usize {
        let mut subscribers = self.subscribers.lock().await;
        let mut delivered = 0usize;
        let mut evicted = 0u64;

        subscribers.retain(|id, tx| match tx.try_send(selection.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    subscriber = %id,
                    resource = %selection.resource(),
                    "Slow consumer evicted"
                );
                evicted += 1;
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(subscriber = %id, "Subscriber mailbox closed, removing");
                false
            }
        });

        self.published.fetch_add(1, Ordering::Relaxed);
        self.delivered.fetch_add(delivered as u64, Ordering::Relaxed);
        self.evicted.fetch_add(evicted, Ordering::Relaxed);

        tracing::debug!(
            resource = %selection.resource(),
            delivered = delivered,
            subscribers = subscribers.len(),
            "Selection published"
        );

        delivered
    }

    /// Check whether a subscriber is still registered
    pub async fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().await.contains_key(&id)
    }

    /// Number of registered subscribers
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Get hub statistics
    pub async fn stats(&self) -> HubStats {
        HubStats {
            subscribers: self.subscriber_count().await,
            published: self.published.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
