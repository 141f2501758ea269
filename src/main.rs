//! Mock HTTP server.
//!
//! ```text
//!     Client Request
//!     ─────▶ request id ─▶ CORS ─▶ logger ─▶ delay ─▶ route handler
//!                                                        │
//!                                                        ▼
//!                                                   dispatcher
//!                                      static: copy baseline ─▶ query transforms
//!                                      dynamic: call response function
//!                                                        │
//!     Client Response                                    ▼
//!     ◀───── status by method + JSON body ◀──────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use mock_server::config::{load_config, validate_config, ConfigError, MockConfig};
use mock_server::dispatch::{Reporter, TracingReporter};
use mock_server::lifecycle::{build_registry, Shutdown, StartupError};
use mock_server::observability::{init_logging, init_metrics, metrics};
use mock_server::MockServer;

#[derive(Parser)]
#[command(name = "mock-server")]
#[command(about = "Serve synthetic JSON responses from a declarative route table", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Artificial latency in milliseconds, overriding `middleware.delay_ms`.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Skip the built-in `users` and `products` routes.
    #[arg(long)]
    no_builtin_routes: bool,

    /// Log level, overriding `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut MockConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.middleware.delay_ms = delay_ms;
        }
        if self.no_builtin_routes {
            config.registry.builtin_routes = false;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MockConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability)?;
    tracing::info!("mock-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        delay_ms = config.middleware.delay_ms,
        builtin_routes = config.registry.builtin_routes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            if let Err(e) = init_metrics(addr) {
                tracing::error!(error = %e, "Failed to start metrics endpoint");
            }
        }
    }

    let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter);
    let registry = build_registry(&config, reporter)?;
    metrics::record_routes_registered(registry.len());

    let address = config.listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let server = MockServer::new(config, registry);
    server.run(listener, shutdown.listener()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
