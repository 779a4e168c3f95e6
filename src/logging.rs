//! Logging configuration module
//!
//! Redis-style log lines behind the `log` facade:
//! - Log levels (debug, verbose, notice, warning, nothing)
//! - Stdout or append-only log file

use crate::config::WriterConfig;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use std::time::SystemTime;

/// Redis-style log levels mapped to Rust log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedisLogLevel {
    Debug,
    Verbose,
    Notice,
    Warning,
    Nothing,
}

impl RedisLogLevel {
    /// Parse Redis-style log level string, unknown values fall back to notice
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "debug" => Self::Debug,
            "verbose" => Self::Verbose,
            "notice" => Self::Notice,
            "warning" => Self::Warning,
            "nothing" => Self::Nothing,
            _ => Self::Notice,
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::Debug,
            Self::Verbose => LevelFilter::Info,
            Self::Notice => LevelFilter::Info,
            Self::Warning => LevelFilter::Warn,
            Self::Nothing => LevelFilter::Off,
        }
    }
}

/// Logger writing to a file when configured, stdout otherwise
pub struct WriterLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl WriterLogger {
    pub fn new(config: &WriterConfig) -> Self {
        let level = RedisLogLevel::parse(&config.loglevel).to_level_filter();

        let file = if !config.logfile.is_empty() {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.logfile)
            {
                Ok(f) => Some(Mutex::new(f)),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to open log file '{}': {}",
                        config.logfile, e
                    );
                    None
                }
            }
        } else {
            None
        };

        Self { level, file }
    }

    /// Format as `<pid>:<marker> <secs>.<millis> <message>`
    fn format_record(&self, record: &Record) -> String {
        let level_char = match record.level() {
            log::Level::Error => '!',
            log::Level::Warn => '#',
            log::Level::Info => '*',
            log::Level::Debug => '-',
            log::Level::Trace => '.',
        };

        format!(
            "{}:{} {} {}\n",
            std::process::id(),
            level_char,
            timestamp(),
            record.args()
        )
    }
}

impl Log for WriterLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let formatted = self.format_record(record);

        if let Some(ref file) = self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.write_all(formatted.as_bytes());
            }
        } else {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(formatted.as_bytes());
            let _ = out.flush();
        }
    }

    fn flush(&self) {
        if let Some(ref file) = self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        } else {
            let _ = std::io::stdout().flush();
        }
    }
}

/// Seconds since epoch with millisecond precision
fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();

    format!("{}.{:03}", now.as_secs(), now.subsec_millis())
}

/// Install the logger described by `config`
pub fn init_logging(config: &WriterConfig) -> Result<(), log::SetLoggerError> {
    let logger = Box::new(WriterLogger::new(config));
    let level = RedisLogLevel::parse(&config.loglevel).to_level_filter();

    log::set_boxed_logger(logger)?;
    log::set_max_level(level);

    Ok(())
}

/// Install the configured logger, falling back to env_logger when a logger is
/// already set. Returns whether the configured logger was installed.
pub fn init_logging_or_fallback(config: &WriterConfig) -> bool {
    match init_logging(config) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            let _ = env_logger::try_init();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(
            RedisLogLevel::parse("debug").to_level_filter(),
            LevelFilter::Debug
        );
        assert_eq!(
            RedisLogLevel::parse("verbose").to_level_filter(),
            LevelFilter::Info
        );
        assert_eq!(
            RedisLogLevel::parse("NOTICE").to_level_filter(),
            LevelFilter::Info
        );
        assert_eq!(
            RedisLogLevel::parse("warning").to_level_filter(),
            LevelFilter::Warn
        );
        assert_eq!(
            RedisLogLevel::parse("nothing").to_level_filter(),
            LevelFilter::Off
        );
        // Unknown defaults to notice
        assert_eq!(
            RedisLogLevel::parse("loud").to_level_filter(),
            LevelFilter::Info
        );
    }

    #[test]
    fn test_format_record() {
        let logger = WriterLogger {
            level: LevelFilter::Debug,
            file: None,
        };
        let line = logger.format_record(
            &Record::builder()
                .args(format_args!("wrote key {}", "abc"))
                .level(log::Level::Error)
                .build(),
        );
        assert!(line.starts_with(&format!("{}:! ", std::process::id())));
        assert!(line.ends_with(" wrote key abc\n"));
    }

    #[test]
    fn test_writes_to_logfile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.log");
        let config = WriterConfig {
            loglevel: "warning".to_string(),
            logfile: path.to_string_lossy().into_owned(),
            ..Default::default()
        };
        let logger = WriterLogger::new(&config);

        logger.log(
            &Record::builder()
                .args(format_args!("suppressed"))
                .level(log::Level::Info)
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("connection refused"))
                .level(log::Level::Warn)
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(":# "));
        assert!(content.contains("connection refused"));
        assert!(!content.contains("suppressed"));
    }
}
