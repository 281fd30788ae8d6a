//! Lectern server binary.
//!
//! # Usage
//!
//! ```bash
//! # Start with self-signed certificate and a generated password (development)
//! lectern-server --bind 0.0.0.0:4433
//!
//! # Start with TLS certificate and a fixed password
//! LECTERN_PASSWORD=hunter2 lectern-server --cert cert.pem --key key.pem
//! ```

use clap::Parser;
use lectern_server::{DriverConfig, Server, ServerRuntimeConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Lectern presenter-sync server
#[derive(Parser)]
#[command(name = "lectern-server")]
#[command(about = "Shared slide-position synchronization server")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:4433")]
    bind: String,

    /// Path to TLS certificate (PEM format)
    #[arg(short, long)]
    cert: Option<String>,

    /// Path to TLS private key (PEM format)
    #[arg(short, long)]
    key: Option<String>,

    /// Password required to claim presenter mode (generated when unset)
    #[arg(long, env = "LECTERN_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Maximum concurrent connections
    #[arg(long, default_value = "10000")]
    max_connections: usize,

    /// Outbound messages buffered per connection before dropping
    #[arg(long, default_value = "64")]
    outbound_queue: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Lectern server starting");
    tracing::info!("Binding to {}", args.bind);

    let config = ServerRuntimeConfig {
        bind_address: args.bind,
        cert_path: args.cert,
        key_path: args.key,
        claim_secret: args.password,
        driver: DriverConfig {
            max_connections: args.max_connections,
            outbound_queue: args.outbound_queue,
        },
    };

    let server = Server::bind(config)?;

    tracing::info!("Server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
