//! dayplan - calendar/to-do HTTP service backed by MongoDB
//!
//! Usage:
//!   dayplan                                # serve on 127.0.0.1:8888
//!   dayplan --debug                        # debug logging to console
//!   MONGODB_URI=... dayplan -b 0.0.0.0:80  # custom bind and database
//!
//! Environment variables:
//!   RUST_LOG       # Log filter (default: info)
//!   MONGODB_URI    # MongoDB connection string
//!   DAYPLAN_DB     # Database name (default: dayplan)

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dayplan_server::{run_server, ServerConfig, WritePolicy};
use dayplan_store::{Store, StoreConfig};

#[derive(Parser, Debug)]
#[command(name = "dayplan", about = "Calendar/to-do HTTP service backed by MongoDB", version)]
struct Args {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8888")]
    bind: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://127.0.0.1:27017")]
    mongodb_uri: String,

    /// Database name
    #[arg(long, env = "DAYPLAN_DB", default_value = "dayplan")]
    database: String,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    cors_permissive: bool,

    /// Fail day replaces on the first insert error instead of logging it
    #[arg(long)]
    strict_writes: bool,

    /// Enable debug logging (sets the filter to debug unless RUST_LOG is set)
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug) // Show targets in debug mode
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    tracing::info!("Starting dayplan server on {}", args.bind);

    let store_config = StoreConfig::new(args.mongodb_uri).with_database(args.database);
    let store = Store::connect(store_config)
        .await
        .context("Failed to connect to MongoDB")?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        write_policy: if args.strict_writes { WritePolicy::Strict } else { WritePolicy::Lenient },
    };

    run_server(store, config).await.context("Server error")?;

    Ok(())
}
