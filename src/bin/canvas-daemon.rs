//! Canvas Daemon
//!
//! Standalone server process for the canvas core. External controllers
//! mutate surfaces through the library API (or a protocol binding built
//! on it); viewers connect to this daemon over HTTP/WebSocket.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (0.0.0.0:8080, persistence under ~/.canvas-core)
//! canvas-daemon
//!
//! # Custom port and no persistence
//! CANVAS_PORT=9090 CANVAS_PERSISTENCE=0 canvas-daemon
//!
//! # With verbose logging
//! RUST_LOG=debug canvas-daemon
//! ```
//!
//! # Environment Variables
//!
//! - `CANVAS_CONFIG`: Path to a TOML config file
//! - `CANVAS_HOST`: Bind host (default 0.0.0.0)
//! - `CANVAS_PORT`: Web server port (default 8080)
//! - `CANVAS_EXTERNAL_HOST`: Host used in viewer URLs
//! - `CANVAS_PERSISTENCE`: "0" or "false" to disable persistence
//! - `CANVAS_PERSISTENCE_PATH`: Surface record directory
//! - `CANVAS_DEFAULT_SIZE`: Size preset for new surfaces (default tv_1080p)
//! - `CANVAS_PING_INTERVAL`: Viewer keep-alive interval in seconds
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)
//!
//! # Signals
//!
//! - SIGTERM/SIGINT: Graceful shutdown

use std::path::PathBuf;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};

use canvas_core::{
    default_config_path, load_config_from_path, CanvasConfig, CanvasWebServer, SurfaceStore,
};

/// Resolve configuration: TOML file (if any) under env overrides
fn resolve_config() -> CanvasConfig {
    let explicit = std::env::var("CANVAS_CONFIG").ok().map(PathBuf::from);
    let candidate = explicit.or_else(default_config_path);

    let mut config = match candidate {
        Some(path) if path.exists() => match load_config_from_path(&path) {
            Ok(config) => {
                info!(path = ?path, "Loaded config file");
                config
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Ignoring unreadable config file");
                CanvasConfig::default()
            }
        },
        _ => CanvasConfig::default(),
    };
    config.apply_env();
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("canvas_daemon=info".parse()?)
                .add_directive("canvas_core=info".parse()?),
        )
        .with_target(true)
        .init();

    info!("Starting Canvas Daemon");
    info!("PID: {}", std::process::id());

    let config = resolve_config();
    info!(
        host = %config.host,
        port = config.port,
        persistence = config.persistence_enabled,
        default_size = %config.default_size.preset.name(),
        "Configuration resolved"
    );

    let store = Arc::new(SurfaceStore::new(config.clone()));
    store.initialize().await;

    let mut server = CanvasWebServer::new(config, Arc::clone(&store));
    server.start().await?;

    // Wait for shutdown signal
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            _ = signal::ctrl_c() => info!("Received SIGINT"),
            _ = sigterm.recv() => info!("Received SIGTERM"),
        }
    }
    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received interrupt");
    }

    info!("Shutting down");
    server.stop().await;
    Ok(())
}
