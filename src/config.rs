//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. User config: `~/.config/wikidata-mcp/config.toml` (XDG) or platform config dir
//! 3. Project config: `.wikidata-mcp.toml`
//! 4. Environment variables: `WIKIDATA_MCP_<SECTION>__<KEY>`
//!
//! Every key has a default, so the server runs without any config file.
//!
//! ```toml
//! [wikidata]
//! language = "de"
//! timeout_secs = 60
//!
//! [retry]
//! max_attempts = 5
//! initial_backoff_ms = 500
//!
//! [server]
//! port = 9000
//! ```

use std::ops::Deref;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wikidata: WikidataConfig,
    pub retry: RetryConfig,
    pub server: ServerConfig,
}

/// Upstream Wikidata endpoints and request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikidataConfig {
    /// MediaWiki action API used for search and metadata lookups.
    pub api_url: String,
    /// SPARQL query service endpoint.
    pub sparql_endpoint: String,
    /// `User-Agent` sent with every request. Wikimedia rejects anonymous clients.
    pub user_agent: String,
    /// Language code for labels, descriptions and search.
    pub language: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.wikidata.org/w/api.php".to_string(),
            sparql_endpoint: "https://query.wikidata.org/sparql".to_string(),
            user_agent: concat!(
                "wikidata-mcp/",
                env!("CARGO_PKG_VERSION"),
                " (Wikidata MCP server)"
            )
            .to_string(),
            language: "en".to_string(),
            timeout_secs: 30,
        }
    }
}

impl WikidataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry policy for SPARQL execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Backoff seed; doubled before every wait.
    pub initial_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1000,
        }
    }
}

/// HTTP transport settings for `serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(Self::user_config_path()))
            .merge(Toml::file(".wikidata-mcp.toml"))
            // Double underscore so keys like `api_url` survive the split.
            .merge(Env::prefixed("WIKIDATA_MCP_").split("__"))
    }

    /// User config path: ~/.config/wikidata-mcp/config.toml (XDG) or platform config dir.
    fn user_config_path() -> std::path::PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("wikidata-mcp").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("wikidata-mcp").join("config.toml"))
            .unwrap_or_default()
    }
}
