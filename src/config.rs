//! Writer configuration

use std::fmt;
use std::time::Duration;

/// Default sentinel port
pub const DEFAULT_SENTINEL_PORT: u16 = 26379;

/// Default master set name monitored by the sentinels
pub const DEFAULT_MASTER_NAME: &str = "mymaster";

/// Default pause between successful writes
pub const DEFAULT_INTERVAL_MS: u64 = 300;

/// A sentinel endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelAddr {
    pub host: String,
    pub port: u16,
}

impl SentinelAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Connection URL understood by the redis client
    pub fn to_url(&self) -> String {
        if self.host.contains(':') {
            format!("redis://[{}]:{}/", self.host, self.port)
        } else {
            format!("redis://{}:{}/", self.host, self.port)
        }
    }
}

impl fmt::Display for SentinelAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl std::str::FromStr for SentinelAddr {
    type Err = String;

    /// Accepts `host:port`, `[v6]:port` or a bare host (default sentinel port)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty sentinel address".to_string());
        }

        if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| format!("Invalid sentinel address: {}", s))?;
            let port = match tail.strip_prefix(':') {
                Some(p) => parse_port(p, s)?,
                None if tail.is_empty() => DEFAULT_SENTINEL_PORT,
                None => return Err(format!("Invalid sentinel address: {}", s)),
            };
            return Ok(Self::new(host, port));
        }

        match s.rsplit_once(':') {
            Some((host, _)) if host.contains(':') => {
                Err(format!("IPv6 sentinel address must be bracketed: {}", s))
            }
            Some((host, port)) if !host.is_empty() => Ok(Self::new(host, parse_port(port, s)?)),
            Some(_) => Err(format!("Invalid sentinel address: {}", s)),
            None => Ok(Self::new(s, DEFAULT_SENTINEL_PORT)),
        }
    }
}

fn parse_port(port: &str, addr: &str) -> Result<u16, String> {
    port.parse::<u16>()
        .map_err(|_| format!("Invalid port in sentinel address: {}", addr))
}

/// Which node of the monitored set receives the writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerRole {
    #[default]
    Master,
    Replica,
}

impl std::str::FromStr for ServerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "master" | "primary" => Ok(Self::Master),
            "replica" | "slave" => Ok(Self::Replica),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl fmt::Display for ServerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master => f.write_str("master"),
            Self::Replica => f.write_str("replica"),
        }
    }
}

/// Writer configuration
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Sentinels asked for the current master
    pub sentinels: Vec<SentinelAddr>,
    /// Master set name (default: "mymaster")
    pub master_name: String,
    /// Desired role (default: master)
    pub role: ServerRole,
    /// Pause after each successful write (default: 300ms)
    pub interval: Duration,
    /// Log level (default: "notice")
    pub loglevel: String,
    /// Log file path (default: "" - stdout)
    pub logfile: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            sentinels: vec![
                SentinelAddr::new("127.0.0.1", 5000),
                SentinelAddr::new("127.0.0.1", 5001),
                SentinelAddr::new("127.0.0.1", 5002),
            ],
            master_name: DEFAULT_MASTER_NAME.to_string(),
            role: ServerRole::Master,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            loglevel: "notice".to_string(),
            logfile: String::new(),
        }
    }
}

impl WriterConfig {
    /// Reject configurations the writer cannot start with
    pub fn validate(&self) -> Result<(), String> {
        if self.sentinels.is_empty() {
            return Err("at least one sentinel address is required".to_string());
        }
        if self.master_name.is_empty() {
            return Err("master name must not be empty".to_string());
        }
        Ok(())
    }
}
