//! Application settings loaded from `config.toml`, overridden by environment variables.
//!
//! The file is optional: every section has defaults, so a bare checkout runs with
//! an empty ledger on `127.0.0.1:3000` and AI features degraded until
//! `GEMINI_API_KEY` is provided.

use crate::{
    errors::{Error, Result},
    models::{NewCustomer, RecordInput},
};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use tracing::{debug, info};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Text-generation service settings
    pub ai: AiConfig,
    /// Customers to insert into an empty database
    pub customers: Vec<SeedCustomer>,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:3000`
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Text-generation service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Gemini model name
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Upper bound on a single summarize/highlight call
    pub timeout_secs: u64,
    /// API key; normally supplied through `GEMINI_API_KEY` rather than the file
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            base_url: crate::gateway::gemini::GEMINI_BASE_URL.to_string(),
            timeout_secs: 30,
            api_key: None,
        }
    }
}

impl AiConfig {
    /// Timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// A customer (with records) to seed on first run.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCustomer {
    /// Customer fields
    #[serde(flatten)]
    pub customer: NewCustomer,
    /// Records owned by this customer
    #[serde(default)]
    pub records: Vec<RecordInput>,
}

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Applies `LEDGER_BIND_ADDR`, `GEMINI_API_KEY` and `GEMINI_MODEL` on top of `config`.
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(addr) = std::env::var("LEDGER_BIND_ADDR") {
        config.server.bind_addr = addr;
    }
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.trim().is_empty() {
            config.ai.api_key = Some(key);
        }
    }
    if let Ok(model) = std::env::var("GEMINI_MODEL") {
        config.ai.model = model;
    }
}

/// Loads `config.toml` when present (defaults otherwise) and applies environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("LEDGER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!("Loaded configuration from {path}");
        config
    } else {
        info!("No configuration file at {path}, using defaults");
        AppConfig::default()
    };
    apply_env_overrides(&mut config);
    Ok(config)
}
