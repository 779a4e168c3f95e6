//! Writer Configuration Parser
//!
//! Parses redis-style config files:
//!
//! ```text
//! sentinel 10.0.0.1 26379
//! sentinel 10.0.0.2 26379
//! master-name mymaster
//! role master
//! interval-ms 300
//! loglevel notice
//! logfile ""
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::{SentinelAddr, ServerRole, WriterConfig};

/// Parse a config file on top of `config`
pub fn parse_config_file(path: &Path, config: &mut WriterConfig) -> Result<(), String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
    parse_config_str(&content, config)
}

/// Parse config file contents on top of `config`
pub fn parse_config_str(content: &str, config: &mut WriterConfig) -> Result<(), String> {
    // The first `sentinel` line replaces the compiled-in list
    let mut sentinels_seen = false;

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts = split_args(line).map_err(|e| format!("line {}: {}", line_num + 1, e))?;
        if parts.is_empty() {
            continue;
        }

        parse_line(&parts, config, &mut sentinels_seen)
            .map_err(|e| format!("line {}: {}", line_num + 1, e))?;
    }

    Ok(())
}

fn parse_line(
    parts: &[String],
    config: &mut WriterConfig,
    sentinels_seen: &mut bool,
) -> Result<(), String> {
    let directive = parts[0].to_lowercase();
    let args = &parts[1..];

    match directive.as_str() {
        "sentinel" => {
            // sentinel <host> <port> | sentinel <host:port>
            let addr = match args {
                [host, port] => SentinelAddr::new(
                    host.as_str(),
                    port.parse::<u16>()
                        .map_err(|_| format!("invalid sentinel port: {}", port))?,
                ),
                [addr] => addr.parse()?,
                _ => return Err("sentinel requires: host port".to_string()),
            };
            if !*sentinels_seen {
                config.sentinels.clear();
                *sentinels_seen = true;
            }
            config.sentinels.push(addr);
        }
        "master-name" => {
            let name = first_arg(args, "master-name")?;
            if name.is_empty() {
                return Err("master-name must not be empty".to_string());
            }
            config.master_name = name.to_string();
        }
        "role" => {
            config.role = first_arg(args, "role")?.parse::<ServerRole>()?;
        }
        "interval-ms" => {
            let raw = first_arg(args, "interval-ms")?;
            let ms = raw
                .parse::<u64>()
                .map_err(|_| format!("invalid interval-ms: {}", raw))?;
            config.interval = Duration::from_millis(ms);
        }
        "loglevel" => {
            config.loglevel = first_arg(args, "loglevel")?.to_string();
        }
        "logfile" => {
            config.logfile = first_arg(args, "logfile")?.to_string();
        }
        _ => {
            // Ignore unknown directives for compatibility
        }
    }

    Ok(())
}

fn first_arg<'a>(args: &'a [String], directive: &str) -> Result<&'a str, String> {
    args.first()
        .map(|s| s.as_str())
        .ok_or_else(|| format!("{} directive requires a value", directive))
}

/// Split a config line on whitespace; `"..."` keeps spaces and allows `""`
fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted.find('"').ok_or("Unclosed quote")?;
            args.push(quoted[..end].to_string());
            rest = &quoted[end + 1..];
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            args.push(rest[..end].to_string());
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args() {
        assert_eq!(
            split_args("sentinel 10.0.0.1 26379").unwrap(),
            vec!["sentinel", "10.0.0.1", "26379"]
        );
        assert_eq!(split_args("logfile \"\"").unwrap(), vec!["logfile", ""]);
        assert_eq!(
            split_args("logfile \"/var/log/my writer.log\"").unwrap(),
            vec!["logfile", "/var/log/my writer.log"]
        );
        assert!(split_args("master-name \"unterminated").is_err());
    }

    #[test]
    fn test_parse_full_config() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "
            # sentinels for the demo cluster
            sentinel 10.0.0.1 26379
            sentinel 10.0.0.2:26380
            master-name cache-primary
            role master
            interval-ms 1000
            loglevel debug
            logfile \"/tmp/writer.log\"
            some-future-directive 42
        "
        )
        .unwrap();
        file.flush().unwrap();

        let mut config = WriterConfig::default();
        parse_config_file(file.path(), &mut config).unwrap();

        assert_eq!(
            config.sentinels,
            vec![
                SentinelAddr::new("10.0.0.1", 26379),
                SentinelAddr::new("10.0.0.2", 26380),
            ]
        );
        assert_eq!(config.master_name, "cache-primary");
        assert_eq!(config.role, ServerRole::Master);
        assert_eq!(config.interval, Duration::from_secs(1));
        assert_eq!(config.loglevel, "debug");
        assert_eq!(config.logfile, "/tmp/writer.log");
    }

    #[test]
    fn test_sample_config_matches_defaults() {
        let mut config = WriterConfig::default();
        parse_config_str(include_str!("../writer.conf"), &mut config).unwrap();

        let defaults = WriterConfig::default();
        assert_eq!(config.sentinels, defaults.sentinels);
        assert_eq!(config.master_name, defaults.master_name);
        assert_eq!(config.role, defaults.role);
        assert_eq!(config.interval, defaults.interval);
        assert_eq!(config.loglevel, defaults.loglevel);
        assert_eq!(config.logfile, "");
    }

    #[test]
    fn test_defaults_kept_without_sentinel_lines() {
        let mut config = WriterConfig::default();
        parse_config_str("master-name other\nrole replica\n", &mut config).unwrap();

        assert_eq!(config.sentinels, WriterConfig::default().sentinels);
        assert_eq!(config.master_name, "other");
        assert_eq!(config.role, ServerRole::Replica);
    }

    #[test]
    fn test_malformed_lines_are_errors() {
        let mut config = WriterConfig::default();
        let err = parse_config_str("interval-ms soon\n", &mut config).unwrap_err();
        assert!(err.starts_with("line 1:"));

        assert!(parse_config_str("sentinel\n", &mut config).is_err());
        assert!(parse_config_str("sentinel host 99999\n", &mut config).is_err());
        assert!(parse_config_str("role leader\n", &mut config).is_err());
        assert!(parse_config_str("master-name\n", &mut config).is_err());
    }

    #[test]
    fn test_missing_file() {
        let mut config = WriterConfig::default();
        let err = parse_config_file(Path::new("/nonexistent/writer.conf"), &mut config)
            .unwrap_err();
        assert!(err.contains("Failed to read config file"));
    }
}
