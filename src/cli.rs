//! Command-line flags
//!
//! Every flag is optional; anything left unset falls back to the config
//! file, then `SERVER_*` environment variables, then built-in defaults.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "static-server", version, about = "Serve a directory over HTTP")]
pub struct Cli {
    /// Config file path (extension optional)
    #[arg(long, default_value = "config")]
    pub config: String,

    /// Directory to serve, defaults to the current working directory
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Enable HTTP cache support (Last-Modified / If-Modified-Since)
    #[arg(long)]
    pub cache: bool,

    /// `max-age` for the Cache-Control header, used only with --cache
    #[arg(long, allow_negative_numbers = true)]
    pub max_age: Option<i64>,

    /// List directories that have no index.html
    #[arg(long)]
    pub list: bool,

    /// Enable DEBUG level log output
    #[arg(long)]
    pub debug: bool,

    /// Enable TRACE level log output
    #[arg(long)]
    pub trace: bool,
}

impl Cli {
    /// Log level requested on the command line, if any. `--trace` wins over `--debug`.
    pub const fn level_override(&self) -> Option<&'static str> {
        if self.trace {
            Some("trace")
        } else if self.debug {
            Some("debug")
        } else {
            None
        }
    }
}
