//! Command-line arguments and the optional JSON config file
//!
//! Precedence: flag > `RCON_*` environment variable > config file > default.
//! The password is never read from or written to the config file.

use anyhow::{Context, Result};
use clap::Parser;
use rcon_core::{ConnectForm, TcpRconConfig, DEFAULT_RCON_PORT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Interactive RCON client
#[derive(Parser, Debug)]
#[command(name = "rcon-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive remote console client", long_about = None)]
pub struct Args {
    /// Server host name or address
    #[arg(short = 'H', long, env = "RCON_HOST")]
    pub host: Option<String>,

    /// Server RCON port (validated at connect time)
    #[arg(short, long, env = "RCON_PORT")]
    pub port: Option<String>,

    /// RCON password
    #[arg(short = 'P', long, env = "RCON_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Connect immediately on start
    #[arg(short, long, default_value_t = false)]
    pub connect: bool,

    /// Seconds allowed for TCP connect plus authentication
    #[arg(long, env = "RCON_CONNECT_TIMEOUT")]
    pub connect_timeout: Option<u64>,

    /// Seconds allowed for one command round trip (unset = wait forever)
    #[arg(long, env = "RCON_COMMAND_TIMEOUT")]
    pub command_timeout: Option<u64>,

    /// Config file path (default: <config dir>/rcon-cli/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Log file (default: <data dir>/rcon-cli/rcon-cli.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Defaults stored on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub connect_timeout_secs: Option<u64>,
    pub command_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Platform config location
    ///
    /// - **Linux**: `~/.config/rcon-cli/config.json`
    /// - **macOS**: `~/Library/Application Support/rcon-cli/config.json`
    /// - **Windows**: `%APPDATA%\rcon-cli\config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rcon-cli").join("config.json"))
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `--config` or the platform location
    pub fn load_for(args: &Args) -> Result<Self> {
        match args.config.clone().or_else(Self::default_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Effective settings after merging every source
#[derive(Debug, Clone)]
pub struct Settings {
    pub form: ConnectForm,
    pub connect_now: bool,
    pub connect_timeout: Duration,
    pub command_timeout: Option<Duration>,
}

impl Settings {
    pub fn resolve(args: &Args, file: &FileConfig) -> Self {
        let host = args
            .host
            .clone()
            .or_else(|| file.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = args
            .port
            .clone()
            .or_else(|| file.port.map(|p| p.to_string()))
            .unwrap_or_else(|| DEFAULT_RCON_PORT.to_string());
        let password = args.password.clone().unwrap_or_default();

        let connect_timeout = args
            .connect_timeout
            .or(file.connect_timeout_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        let command_timeout = args.command_timeout.or(file.command_timeout_secs);

        Self {
            form: ConnectForm::new(host, port, password),
            connect_now: args.connect,
            connect_timeout: Duration::from_secs(connect_timeout),
            command_timeout: command_timeout.map(Duration::from_secs),
        }
    }

    pub fn tcp_config(&self) -> TcpRconConfig {
        let config = TcpRconConfig::default().with_connect_timeout(self.connect_timeout);
        match self.command_timeout {
            Some(limit) => config.with_command_timeout(limit),
            None => config,
        }
    }
}
