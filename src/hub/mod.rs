//! Broadcast hub for push-based delivery
//!
//! The hub owns one bounded mailbox per connected subscriber and fans every
//! published [`Selection`](crate::playlist::Selection) out to all of them.
//!
//! # Architecture
//!
//! ```text
//!                          Arc<Hub>
//!                ┌──────────────────────────────┐
//!                │ subscribers: Mutex<HashMap<  │
//!                │   SubscriberId,              │
//!                │   mpsc::Sender<Selection>,   │
//!                │ >>                           │
//!                └──────────────┬───────────────┘
//!                               │ try_send
//!        ┌──────────────────────┼──────────────────────┐
//!        ▼                      ▼                      ▼
//!   [Subscriber 1]         [Subscriber 2]         [Subscriber 3]
//!   mailbox.recv()         mailbox.recv()         (full → evicted)
//!        │                      │
//!        └──► WebSocket         └──► WebSocket
//! ```
//!
//! # Backpressure
//!
//! Publishing never waits on a subscriber. A mailbox that is full when a
//! message arrives marks its subscriber as a slow consumer: the hub drops the
//! sender, which closes the mailbox, and the gateway ends that connection.
//! Membership changes and publishes share one mutex, so a subscriber is never
//! sent to after it has been unregistered.

pub mod config;
pub mod store;
pub mod subscriber;

pub use config::HubConfig;
pub use store::Hub;
pub use subscriber::{Subscriber, SubscriberId};
