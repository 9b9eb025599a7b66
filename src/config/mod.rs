// Configuration module entry point
// Loads the immutable server configuration once at startup

mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

// Re-export public types
pub use types::{
    Config, FilesConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

impl Config {
    /// Load configuration from the config file, `SERVER_*` environment
    /// variables and command-line flags, in increasing priority.
    ///
    /// Nested keys use a double underscore in the environment,
    /// e.g. `SERVER_FILES__CACHE=true`.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.root", "")?
            .set_default("files.cache", false)?
            .set_default("files.max_age", -1)?
            .set_default("files.list", false)?
            .set_default("files.index_file", "index.html")?
            .set_default("files.html_fallback", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "simple")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "server.root",
                cli.dir.as_ref().map(|d| d.to_string_lossy().into_owned()),
            )?
            .set_override_option("server.host", cli.host.clone())?
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option("files.cache", cli.cache.then_some(true))?
            .set_override_option("files.max_age", cli.max_age)?
            .set_override_option("files.list", cli.list.then_some(true))?
            .set_override_option("logging.level", cli.level_override())?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        cfg.server.root = resolve_root(&cfg.server.root)?;
        Ok(cfg)
    }

    /// Default configuration serving `root`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let mut cfg = Self::default();
        cfg.server.root = root.into();
        cfg
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Turn the configured root into an absolute, existing directory.
///
/// An empty root means the current working directory.
fn resolve_root(root: &Path) -> Result<PathBuf, config::ConfigError> {
    let root = if root.as_os_str().is_empty() {
        std::env::current_dir().map_err(|e| {
            config::ConfigError::Message(format!("Cannot determine working directory: {e}"))
        })?
    } else {
        root.to_path_buf()
    };

    let canonical = root.canonicalize().map_err(|e| {
        config::ConfigError::Message(format!("Root directory '{}': {e}", root.display()))
    })?;
    if !canonical.is_dir() {
        return Err(config::ConfigError::Message(format!(
            "Root '{}' is not a directory",
            canonical.display()
        )));
    }
    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["static-server", "--config", "does-not-exist"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_string_lossy().into_owned();
        let cfg = Config::load(&cli(&["--dir", &dir_arg])).unwrap();

        assert_eq!(cfg.server.port, 8080);
        assert!(!cfg.files.cache);
        assert_eq!(cfg.files.max_age, -1);
        assert!(!cfg.files.list);
        assert_eq!(cfg.files.index_file, "index.html");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.server.root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_string_lossy().into_owned();
        let cfg = Config::load(&cli(&[
            "--dir", &dir_arg, "--port", "9090", "--cache", "--max-age", "120", "--list",
            "--debug",
        ]))
        .unwrap();

        assert_eq!(cfg.server.port, 9090);
        assert!(cfg.files.cache);
        assert_eq!(cfg.files.max_age, 120);
        assert!(cfg.files.list);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server.toml");
        std::fs::write(
            &file,
            "[files]\ncache = true\nmax_age = 60\n\n[logging]\naccess_log_format = \"json\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "static-server",
            "--config",
            &file.to_string_lossy(),
            "--dir",
            &dir.path().to_string_lossy(),
        ]);
        let cfg = Config::load(&cli).unwrap();
        assert!(cfg.files.cache);
        assert_eq!(cfg.files.max_age, 60);
        assert_eq!(cfg.logging.access_log_format, "json");
    }

    #[test]
    fn test_performance_section() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_string_lossy().into_owned();
        let cfg = Config::load(&cli(&["--dir", &dir_arg])).unwrap();
        assert_eq!(cfg.performance.keep_alive_timeout, 75);
        assert_eq!(cfg.performance.read_timeout, 30);

        let file = dir.path().join("perf.toml");
        std::fs::write(&file, "[performance]\nread_timeout = 0\n").unwrap();
        let cli = Cli::parse_from([
            "static-server",
            "--config",
            &file.to_string_lossy(),
            "--dir",
            &dir_arg,
        ]);
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.performance.read_timeout, 0);
        assert_eq!(cfg.performance.keep_alive_timeout, 75);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope").to_string_lossy().into_owned();
        assert!(Config::load(&cli(&["--dir", &missing])).is_err());
    }

    #[test]
    fn test_root_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let arg = file.to_string_lossy().into_owned();
        assert!(Config::load(&cli(&["--dir", &arg])).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::for_root("/srv");
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 3000;
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 3000);

        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
