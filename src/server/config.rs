//! Server configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::hub::HubConfig;
use crate::playlist::{PlaylistConfig, PrunePolicy};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Error parsing a configuration value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Unknown delivery mode name
    #[error("unknown delivery mode '{0}', expected 'poll' or 'push'")]
    UnknownDeliveryMode(String),
}

/// Which delivery path the served page uses
///
/// Both paths are always routed; this only picks the client script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Page polls `GET /playlist/` and plays new entries
    #[default]
    Poll,
    /// Page holds a WebSocket on `/ws` and plays what the hub pushes
    Push,
}

impl FromStr for DeliveryMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "poll" => Ok(DeliveryMode::Poll),
            "push" | "ws" => Ok(DeliveryMode::Push),
            _ => Err(ConfigError::UnknownDeliveryMode(s.to_owned())),
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Poll => f.write_str("poll"),
            DeliveryMode::Push => f.write_str("push"),
        }
    }
}

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// JSON file mapping resource names to URIs
    pub library_path: PathBuf,

    /// Directory served under `/sounds/`
    pub sounds_dir: PathBuf,

    /// Delivery path used by the served page
    pub delivery: DeliveryMode,

    /// Selection log settings
    pub playlist: PlaylistConfig,

    /// Broadcast hub settings
    pub hub: HubConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            library_path: PathBuf::from("sounds.json"),
            sounds_dir: PathBuf::from("sounds"),
            delivery: DeliveryMode::default(),
            playlist: PlaylistConfig::default(),
            hub: HubConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the library file
    pub fn library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = path.into();
        self
    }

    /// Set the static sounds directory
    pub fn sounds_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sounds_dir = dir.into();
        self
    }

    /// Set the page delivery mode
    pub fn delivery(mut self, mode: DeliveryMode) -> Self {
        self.delivery = mode;
        self
    }

    /// Set the playlist prune policy
    pub fn prune_policy(mut self, policy: PrunePolicy) -> Self {
        self.playlist.policy = policy;
        self
    }

    /// Set the playlist prune interval
    pub fn prune_interval(mut self, interval: Duration) -> Self {
        self.playlist = self.playlist.prune_interval(interval);
        self
    }

    /// Set the hub mailbox capacity
    pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
        self.hub = self.hub.mailbox_capacity(capacity);
        self
    }
}
