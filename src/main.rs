//! Jukebox server binary
//!
//! Run with: jukebox [BIND_ADDR] [OPTIONS]
//!
//! Loads `sounds.json` (a JSON object of name -> URI), serves the page on
//! port 8080 and plays every requested sound for everyone who has the page
//! open. See `jukebox --help` for the full option list.

use jukebox::cli::{self, Command};
use jukebox::JukeboxServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            eprint!("{}", cli::usage());
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprint!("{}", cli::usage());
            std::process::exit(2);
        }
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jukebox=info".parse()?),
        )
        .init();

    let server = JukeboxServer::from_config(config)?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
