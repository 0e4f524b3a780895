//! HTTP/WebSocket gateway
//!
//! Wires the [`Library`](crate::library::Library), the
//! [`SelectionLog`](crate::playlist::SelectionLog) and the
//! [`Hub`](crate::hub::Hub) behind axum routes.

pub mod config;
pub mod listener;
pub mod page;
pub mod routes;

pub use config::{ConfigError, DeliveryMode, ServerConfig};
pub use listener::JukeboxServer;
pub use routes::{router, AppState};
