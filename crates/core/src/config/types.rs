use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("bttrove.db")
}

/// Full-text index (Elasticsearch) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Base URL of the index service (e.g., "http://localhost:9200")
    #[serde(default = "default_index_url")]
    pub url: String,
    /// Index holding torrent documents
    #[serde(default = "default_index_name")]
    pub name: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            name: default_index_name(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_index_url() -> String {
    "http://127.0.0.1:9200".to_string()
}

fn default_index_name() -> String {
    "torrent".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Keyword search behaviour
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Demo mode: skip moderation and only serve keywords from the
    /// recommendation list.
    #[serde(default)]
    pub demo: bool,
}

/// Config summary safe to log (index URL credentials stripped)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub index: SanitizedIndexConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedIndexConfig {
    pub url: String,
    pub name: String,
    pub timeout_secs: u32,
}

/// Drop any `user:password@` part of a URL.
fn strip_credentials(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}{}", &url[..scheme_end + 3], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            index: SanitizedIndexConfig {
                url: strip_credentials(&config.index.url),
                name: config.index.name.clone(),
                timeout_secs: config.index.timeout_secs,
            },
            search: config.search.clone(),
        }
    }
}
