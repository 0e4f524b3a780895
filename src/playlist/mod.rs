//! Selection log for poll-based delivery
//!
//! The playlist is a time-bounded FIFO of [`Selection`]s. Clients append to it
//! through `POST /play/{name}` and poll it through `GET /playlist/`; a
//! background task prunes the oldest entries on a fixed interval.
//!
//! # Architecture
//!
//! ```text
//!                       Arc<SelectionLog>
//!                 ┌───────────────────────────┐
//!                 │ state: RwLock<LogState {  │
//!                 │   selections: VecDeque,   │
//!                 │   last_batch_size,        │
//!                 │ }>                        │
//!                 │ library: Arc<Library>     │
//!                 └─────────────┬─────────────┘
//!                               │
//!        ┌──────────────────────┼──────────────────────┐
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//!   [POST /play]          [GET /playlist]        [prune task]
//!   append() ──write──►   snapshot() ◄──read──   prune() ──write──►
//! ```
//!
//! # Ordering
//!
//! Append order equals timestamp order equals snapshot order. Timestamps are
//! clamped under the write lock so a wall clock stepping backwards never
//! produces an out-of-order entry. Pruning only ever removes a prefix.

pub mod config;
pub mod error;
pub mod selection;
pub mod store;

pub use config::{PlaylistConfig, PrunePolicy};
pub use error::PlaylistError;
pub use selection::{unix_now, Selection};
pub use store::SelectionLog;
