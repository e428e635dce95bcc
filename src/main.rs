//! Resource provider webhook entry point.

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use provider_webhook::api::routes::route_table;
use provider_webhook::api::{create_router, AppState};
use provider_webhook::config::Config;
use provider_webhook::metrics;
use provider_webhook::utils::shutdown_signal;

/// Resource provider lifecycle webhook.
#[derive(Parser, Debug)]
#[command(name = "provider-webhook")]
#[command(about = "HTTP callbacks for resource creation and deletion lifecycles")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the webhook endpoints (default).
    Serve {
        /// Listener port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Listener interface (overrides HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print the lifecycle route table.
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration before logging so RUST_LOG/LOG_JSON from .env apply
    let config = Config::load()?;

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("provider_webhook=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config),
        Some(Command::Routes) => {
            cmd_routes();
            Ok(())
        }
        Some(Command::Serve { port, host }) => cmd_serve(config, port, host).await,
        None => cmd_serve(config, None, None).await,
    }
}

/// Check configuration validity.
fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PROVIDER WEBHOOK - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    if let Err(e) = config.validate() {
        println!("FAILED");
        println!("  Error: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }
    println!("OK");

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen Address: {}", config.bind_address());
    println!("  Body Limit: {} bytes", config.body_limit_bytes);
    println!("  Log Filter: {}", config.rust_log);
    println!("  Log Format: {}", if config.log_json { "JSON" } else { "Text" });
    println!("  Table Name: {}", config.table_name);
    println!("  Metadata Description: {}", config.internal_metadata_description);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the lifecycle route table.
fn cmd_routes() {
    for (method, path) in route_table() {
        println!("{:<6} {}", method, path);
    }
}

/// Serve the webhook endpoints until shutdown.
async fn cmd_serve(
    mut config: Config,
    port: Option<u16>,
    host: Option<String>,
) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(host) = host {
        config.host = host;
    }
    config.validate()?;

    let mut app_state = AppState::new(&config);
    match metrics::install_recorder() {
        Ok(handle) => app_state = app_state.with_prometheus(handle),
        Err(e) => warn!(error = %e, "Prometheus recorder unavailable, /metrics will be empty"),
    }

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);
    info!("Collector table: {}", config.table_name);

    let router = create_router(app_state, config.body_limit_bytes);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
