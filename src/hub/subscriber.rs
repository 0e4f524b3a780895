//! Subscriber handles

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::playlist::Selection;

/// Unique identifier for a subscriber
///
/// Ids are allocated from a counter and never reused, so a reconnecting
/// client always gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub(crate) u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiving end of a subscription
///
/// Returned by [`Hub::subscribe`](super::Hub::subscribe). Once the hub has
/// unregistered the subscriber, `recv` drains what is left and then returns
/// `None`.
#[derive(Debug)]
pub struct Subscriber {
    id: SubscriberId,
    mailbox: mpsc::Receiver<Selection>,
}

impl Subscriber {
    pub(super) fn new(id: SubscriberId, mailbox: mpsc::Receiver<Selection>) -> Self {
        Self { id, mailbox }
    }

    /// The id to pass to [`Hub::unsubscribe`](super::Hub::unsubscribe)
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next published selection
    pub async fn recv(&mut self) -> Option<Selection> {
        self.mailbox.recv().await
    }

    /// Take the next selection if one is already waiting
    pub fn try_recv(&mut self) -> Result<Selection, TryRecvError> {
        self.mailbox.try_recv()
    }
}
