//! Shared jukebox server
//!
//! Any connected client can ask for a named sound to be played, and every
//! other client hears it. Two delivery paths are provided:
//!
//! - **Poll**: play requests are appended to a time-bounded
//!   [`SelectionLog`](playlist::SelectionLog); clients fetch snapshots and a
//!   background task prunes old entries.
//! - **Push**: play requests are published to a [`Hub`](hub::Hub), which fans
//!   them out to one bounded mailbox per WebSocket client and evicts clients
//!   that fall behind.
//!
//! The two paths are independent event streams.
//!
//! # Example
//! ```no_run
//! use jukebox::{JukeboxServer, ServerConfig};
//!
//! # async fn example() -> jukebox::error::Result<()> {
//! let config = ServerConfig::default().library_path("sounds.json");
//! let server = JukeboxServer::from_config(config)?;
//!
//! server.run_until(async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error;
pub mod hub;
pub mod library;
pub mod playlist;
pub mod server;
pub mod stats;

pub use error::{Error, Result};
pub use hub::{Hub, HubConfig, Subscriber, SubscriberId};
pub use library::Library;
pub use playlist::{PlaylistConfig, PlaylistError, PrunePolicy, Selection, SelectionLog};
pub use server::{DeliveryMode, JukeboxServer, ServerConfig};
