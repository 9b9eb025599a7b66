// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
///
/// Built once at startup and shared read-only by every request handler.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Listener and content root
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served as `/`. Empty means the current working directory.
    pub root: PathBuf,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            root: PathBuf::new(),
            workers: None,
        }
    }
}

/// File serving behaviour
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Emit `Last-Modified` and honor `If-Modified-Since`
    pub cache: bool,
    /// `Cache-Control: max-age` value, only used when `cache` is on.
    /// Zero or negative sends `no-cache` instead.
    pub max_age: i64,
    /// List directory entries when the index file is missing
    pub list: bool,
    pub index_file: String,
    /// Retry a missing path with `.html` appended
    pub html_fallback: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            cache: false,
            max_age: -1,
            list: false,
            index_file: "index.html".to_string(),
            html_fallback: true,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HttpConfig {
    /// Value of the `Server` response header, omitted when unset
    #[serde(default)]
    pub server_name: Option<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (simple, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "simple".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Seconds; zero disables keep-alive
    pub keep_alive_timeout: u64,
    /// Seconds allowed for a client to send the request head
    pub read_timeout: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
        }
    }
}
