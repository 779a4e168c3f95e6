use crate::config::{SentinelAddr, ServerRole, WriterConfig};
use crate::config_parser::parse_config_file;
use clap::Parser;

use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "kv-sentinel-writer")]
#[command(version)]
#[command(
    about = "Writes random keys to the master of a Sentinel-managed redis set",
    long_about = None
)]
pub struct Cli {
    /// Configuration file path
    #[arg(value_name = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Sentinel address (HOST:PORT), repeatable; replaces the configured list
    #[arg(long = "sentinel", value_name = "HOST:PORT")]
    pub sentinels: Vec<SentinelAddr>,

    /// Master set name (default: mymaster)
    #[arg(long)]
    pub master_name: Option<String>,

    /// Role to write to (master, replica)
    #[arg(long)]
    pub role: Option<ServerRole>,

    /// Pause after each successful write, in milliseconds (default: 300)
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Log level (debug, verbose, notice, warning, nothing)
    #[arg(long)]
    pub loglevel: Option<String>,

    /// Log file path (default: stdout)
    #[arg(long)]
    pub logfile: Option<String>,
}

impl Cli {
    pub fn load_config() -> Result<WriterConfig, String> {
        Cli::parse().into_config()
    }

    /// Defaults, then the config file, then flags
    pub fn into_config(self) -> Result<WriterConfig, String> {
        let mut config = WriterConfig::default();

        if let Some(path) = &self.config_file {
            parse_config_file(path, &mut config)?;
        }

        if !self.sentinels.is_empty() {
            config.sentinels = self.sentinels;
        }
        if let Some(name) = self.master_name {
            config.master_name = name;
        }
        if let Some(role) = self.role {
            config.role = role;
        }
        if let Some(ms) = self.interval_ms {
            config.interval = Duration::from_millis(ms);
        }
        if let Some(loglevel) = self.loglevel {
            config.loglevel = loglevel;
        }
        if let Some(logfile) = self.logfile {
            config.logfile = logfile;
        }

        config.validate()?;
        Ok(config)
    }
}
