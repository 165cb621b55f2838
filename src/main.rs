//! pagewire: local preview server for page templates.
//!
//! Renders the templates of a project directory with mock data, so pages
//! can be designed without the application that normally serves them.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────┐
//!                     │                     PAGEWIRE                      │
//!                     │                                                   │
//!   Browser request   │  ┌────────┐   ┌─────────────┐   ┌──────────────┐  │
//!   ──────────────────┼─▶│  http  │──▶│ controllers │──▶│    model     │  │
//!                     │  │ server │   │ tpl/res/idx │   │   resolve    │  │
//!                     │  └────────┘   └─────────────┘   └──────┬───────┘  │
//!                     │                                        │          │
//!                     │                                        ▼          │
//!   HTML response     │  ┌────────┐                     ┌──────────────┐  │
//!   ◀─────────────────┼──│ render │◀────────────────────│ RenderPlan   │  │
//!                     │  │  tera  │                     │ or redirect  │  │
//!                     │  └────────┘                     └──────────────┘  │
//!                     │                                                   │
//!                     │  site snapshot (routing + discovery + layouts)    │
//!                     │  swapped by: watcher │ SIGHUP                     │
//!                     └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use pagewire::config::loader::load_server_config;
use pagewire::config::ServerConfig;
use pagewire::lifecycle::{signals, startup, Shutdown};
use pagewire::observability::logging;

#[derive(Parser)]
#[command(name = "pagewire")]
#[command(about = "Local preview server for server-rendered page templates", long_about = None)]
struct Cli {
    /// Project root directory
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Server configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not reload on project changes
    #[arg(long)]
    no_watch: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_server_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = cli.port {
        startup::override_port(&mut config, port);
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if cli.no_watch {
        config.watch.enabled = false;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("pagewire v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        watch = config.watch.enabled,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on(signals::shutdown_signal());
    startup::run(&cli.dir, config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
