//! Canvas Configuration
//!
//! Configuration for the canvas core and its viewer web server: bind
//! address, externally visible host for viewer URLs, persistence location,
//! default canvas size, and keep-alive cadence. Values come from defaults,
//! an optional TOML file, and environment overrides, in that order.

use std::net::UdpSocket;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::surface::CanvasSize;

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the canvas core
#[derive(Clone, Debug)]
pub struct CanvasConfig {
    /// Host the web server binds to
    pub host: String,
    /// Port for the web server
    pub port: u16,
    /// External host for viewer URLs; when None and the bind host is
    /// `0.0.0.0`, the primary local network IP is auto-detected so
    /// external viewers (cast receivers) can connect
    pub external_host: Option<String>,
    /// Whether surface state is persisted to disk
    pub persistence_enabled: bool,
    /// Directory holding one JSON record per surface
    pub persistence_path: PathBuf,
    /// Default canvas size for new surfaces
    pub default_size: CanvasSize,
    /// Interval between keep-alive pings to viewer connections
    pub ping_interval: Duration,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let persistence_path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".canvas-core")
            .join("surfaces");
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            external_host: None,
            persistence_enabled: true,
            persistence_path,
            default_size: CanvasSize::from_preset_name("tv_1080p")
                .unwrap_or_default(),
            ping_interval: Duration::from_secs(30),
        }
    }
}

impl CanvasConfig {
    /// Create a config suitable for tests: localhost, no persistence
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            host: "localhost".to_string(),
            persistence_enabled: false,
            ..Default::default()
        }
    }

    /// Set the persistence directory
    #[must_use]
    pub fn with_persistence_path(mut self, path: PathBuf) -> Self {
        self.persistence_enabled = true;
        self.persistence_path = path;
        self
    }

    /// Set the bind port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Load configuration from environment variables over defaults
    ///
    /// Environment variables:
    /// - `CANVAS_HOST`: bind host (default `0.0.0.0`)
    /// - `CANVAS_PORT`: web server port (default 8080)
    /// - `CANVAS_EXTERNAL_HOST`: host for viewer URLs (auto-detected if unset)
    /// - `CANVAS_PERSISTENCE`: "0" or "false" to disable persistence
    /// - `CANVAS_PERSISTENCE_PATH`: surface record directory
    /// - `CANVAS_DEFAULT_SIZE`: size preset name for new surfaces
    /// - `CANVAS_PING_INTERVAL`: keep-alive interval in seconds
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply environment variable overrides to this config
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("CANVAS_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("CANVAS_PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }
        if let Ok(external) = std::env::var("CANVAS_EXTERNAL_HOST") {
            self.external_host = Some(external);
        }
        if let Ok(persist) = std::env::var("CANVAS_PERSISTENCE") {
            self.persistence_enabled = !matches!(persist.as_str(), "0" | "false" | "no");
        }
        if let Ok(path) = std::env::var("CANVAS_PERSISTENCE_PATH") {
            self.persistence_path = PathBuf::from(path);
        }
        if let Ok(preset) = std::env::var("CANVAS_DEFAULT_SIZE") {
            if let Some(size) = CanvasSize::from_preset_name(&preset) {
                self.default_size = size;
            }
        }
        if let Ok(interval) = std::env::var("CANVAS_PING_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.ping_interval = Duration::from_secs(secs);
            }
        }
    }

    /// The host external viewers should use in URLs
    #[must_use]
    pub fn display_host(&self) -> String {
        if let Some(external) = &self.external_host {
            return external.clone();
        }
        if self.host == "0.0.0.0" {
            return local_ip().unwrap_or_else(|| "localhost".to_string());
        }
        self.host.clone()
    }

    /// HTTP and WebSocket URLs for a surface
    #[must_use]
    pub fn surface_urls(&self, surface_id: &str) -> (String, String) {
        let base = format!("{}:{}", self.display_host(), self.port);
        (
            format!("http://{base}/canvas/{surface_id}"),
            format!("ws://{base}/ws/{surface_id}"),
        )
    }

    /// Path of the device cursor record inside the persistence directory
    ///
    /// The leading underscore keeps it out of surface record restore,
    /// which skips `_`-prefixed files.
    #[must_use]
    pub fn cursors_file(&self) -> PathBuf {
        self.persistence_path.join("_device_cursors.json")
    }
}

/// Optional TOML overrides for [`CanvasConfig`]
#[derive(Debug, Default, Deserialize)]
pub struct CanvasToml {
    /// Bind host
    pub host: Option<String>,
    /// Web server port
    pub port: Option<u16>,
    /// Host for viewer URLs
    pub external_host: Option<String>,
    /// Whether persistence is enabled
    pub persistence: Option<bool>,
    /// Surface record directory
    pub persistence_path: Option<PathBuf>,
    /// Size preset name for new surfaces
    pub default_size: Option<String>,
    /// Keep-alive interval in seconds
    pub ping_interval_secs: Option<u64>,
}

impl CanvasToml {
    /// Apply these overrides onto a config
    pub fn apply(self, config: &mut CanvasConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(external) = self.external_host {
            config.external_host = Some(external);
        }
        if let Some(persist) = self.persistence {
            config.persistence_enabled = persist;
        }
        if let Some(path) = self.persistence_path {
            config.persistence_path = path;
        }
        if let Some(preset) = self.default_size {
            if let Some(size) = CanvasSize::from_preset_name(&preset) {
                config.default_size = size;
            } else {
                tracing::warn!(preset = %preset, "Unknown size preset in config file");
            }
        }
        if let Some(secs) = self.ping_interval_secs {
            config.ping_interval = Duration::from_secs(secs);
        }
    }
}

/// Default config file location: `$XDG_CONFIG_HOME/canvas-core/config.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("canvas-core").join("config.toml"))
}

/// Load configuration from a TOML file over defaults
pub fn load_config_from_path(path: &Path) -> Result<CanvasConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let overrides: CanvasToml = toml::from_str(&contents)?;
    let mut config = CanvasConfig::default();
    overrides.apply(&mut config);
    Ok(config)
}

/// Detect the primary local IP address of this machine
///
/// Uses a UDP socket connect (no data is sent) to find the address that
/// would be used to reach external hosts.
fn local_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip().to_string())
}
