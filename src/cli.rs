//! Command-line parsing for the `jukebox` binary

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::playlist::config::DEFAULT_EXPIRE_SECS;
use crate::playlist::PrunePolicy;
use crate::server::config::{DeliveryMode, ServerConfig, DEFAULT_PORT};

/// What the binary was asked to do
#[derive(Debug, Clone)]
pub enum Command {
    /// Print usage and exit
    Help,
    /// Start the server
    Run(ServerConfig),
}

/// Which prune policy `--policy` selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PolicyKind {
    Age,
    Batch,
}

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:8080
/// - "localhost:8081" -> 127.0.0.1:8081
/// - "127.0.0.1" -> 127.0.0.1:8080
/// - "0.0.0.0:8080" -> 0.0.0.0:8080
pub fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

/// Parse the arguments that follow the program name
pub fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut config = ServerConfig::default();
    let mut policy = PolicyKind::Age;
    let mut expire_secs: Option<u64> = None;
    let mut bind_seen = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--library" => config.library_path = value(&mut args, &arg)?.into(),
            "--sounds" => config.sounds_dir = value(&mut args, &arg)?.into(),
            "--delivery" => {
                config.delivery = value(&mut args, &arg)?
                    .parse::<DeliveryMode>()
                    .map_err(|e| e.to_string())?;
            }
            "--policy" => {
                policy = match value(&mut args, &arg)?.as_str() {
                    "age" => PolicyKind::Age,
                    "batch" => PolicyKind::Batch,
                    other => {
                        return Err(format!(
                            "Invalid policy: '{}'. Expected 'age' or 'batch'",
                            other
                        ))
                    }
                };
            }
            "--expire-secs" => expire_secs = Some(number(&mut args, &arg)?),
            "--prune-interval-ms" => {
                let ms = number(&mut args, &arg)?;
                config = config.prune_interval(Duration::from_millis(ms));
            }
            "--mailbox-capacity" => {
                let capacity = number(&mut args, &arg)?;
                let capacity = usize::try_from(capacity)
                    .map_err(|_| format!("Mailbox capacity too large: {}", capacity))?;
                config = config.mailbox_capacity(capacity);
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown option: '{}'", flag)),
            addr if !bind_seen => {
                config.bind_addr = parse_bind_addr(addr)?;
                bind_seen = true;
            }
            extra => return Err(format!("Unexpected argument: '{}'", extra)),
        }
    }

    config.playlist.policy = match policy {
        PolicyKind::Age => PrunePolicy::AgeWindow {
            timeout: Duration::from_secs(expire_secs.unwrap_or(DEFAULT_EXPIRE_SECS)),
        },
        PolicyKind::Batch => PrunePolicy::Batch,
    };

    Ok(Command::Run(config))
}

fn value<I>(args: &mut I, flag: &str) -> Result<String, String>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| format!("Missing value for '{}'", flag))
}

fn number<I>(args: &mut I, flag: &str) -> Result<u64, String>
where
    I: Iterator<Item = String>,
{
    let raw = value(args, flag)?;
    raw.parse()
        .map_err(|_| format!("Invalid number for '{}': '{}'", flag, raw))
}

/// Usage text printed for `--help` and on argument errors
pub fn usage() -> &'static str {
    "\
Usage: jukebox [BIND_ADDR] [OPTIONS]

Arguments:
  BIND_ADDR                 Address to bind to (default: 0.0.0.0:8080)

Options:
  --library PATH            Library JSON file (default: sounds.json)
  --sounds DIR              Directory served under /sounds/ (default: sounds)
  --delivery poll|push      Delivery path used by the page (default: poll)
  --policy age|batch        Playlist prune policy (default: age)
  --expire-secs N           Retention window for the age policy (default: 5)
  --prune-interval-ms N     Prune interval in milliseconds (default: 1000)
  --mailbox-capacity N      Per-subscriber mailbox size (default: 64)
  -h, --help                Print this help

Examples:
  jukebox                               # binds to 0.0.0.0:8080
  jukebox localhost:8081 --delivery push
  jukebox --policy batch --prune-interval-ms 2000
"
}
