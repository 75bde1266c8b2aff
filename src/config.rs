//! Runtime configuration read from `DOCRANK_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::DocrankError;

pub const ARTIFACT_DIR_ENV: &str = "DOCRANK_ARTIFACT_DIR";
pub const BIND_ADDR_ENV: &str = "DOCRANK_BIND_ADDR";
pub const REQUIRE_MANIFEST_ENV: &str = "DOCRANK_REQUIRE_MANIFEST";
pub const API_URL_ENV: &str = "DOCRANK_API_URL";
pub const HTTP_TIMEOUT_ENV: &str = "DOCRANK_HTTP_TIMEOUT_SECS";
pub const LOG_MODE_ENV: &str = "DOCRANK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "DOCRANK_LOG_FILE";

const DEFAULT_ARTIFACT_DIR: &str = "model";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILE: &str = "docrank-dashboard.log";

fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}

/// Settings for the recommendation service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Directory holding the classifier, scaler and roster artifacts
    pub artifact_dir: PathBuf,
    /// Listen address for the HTTP API
    pub bind_addr: SocketAddr,
    /// Refuse to start without a verified `manifest.json`
    pub require_manifest: bool,
}

impl ServiceConfig {
    /// Read from the process environment.
    ///
    /// # Errors
    /// Returns `DocrankError::Config` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, DocrankError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `DocrankError::Config` if a value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DocrankError> {
        let artifact_dir = lookup(ARTIFACT_DIR_ENV)
            .unwrap_or_else(|| DEFAULT_ARTIFACT_DIR.to_string())
            .into();

        let bind_raw = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.trim().parse::<SocketAddr>().map_err(|e| {
            DocrankError::Config(format!("{BIND_ADDR_ENV}={bind_raw:?} is not a socket address: {e}"))
        })?;

        let require_manifest = lookup(REQUIRE_MANIFEST_ENV)
            .map(|v| parse_bool(v.trim()))
            .unwrap_or(false);

        Ok(Self {
            artifact_dir,
            bind_addr,
            require_manifest,
        })
    }
}

/// Settings for the dashboard's HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the recommendation service
    pub api_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Read from the process environment.
    ///
    /// # Errors
    /// Returns `DocrankError::Config` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, DocrankError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `DocrankError::Config` if a value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DocrankError> {
        let api_url = lookup(API_URL_ENV)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match lookup(HTTP_TIMEOUT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&s| s > 0)
                .ok_or_else(|| {
                    DocrankError::Config(format!(
                        "{HTTP_TIMEOUT_ENV}={raw:?} must be a positive number of seconds"
                    ))
                })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    File(PathBuf),
}

/// Resolve the log target.
///
/// `DOCRANK_LOG_MODE` is `file`, `stdout` or `auto`; `auto` picks a file when
/// `owns_terminal` is set (a TUI would be corrupted by terminal logging).
#[must_use]
pub fn log_target(lookup: impl Fn(&str) -> Option<String>, owns_terminal: bool) -> LogTarget {
    let mode = lookup(LOG_MODE_ENV).unwrap_or_else(|| "auto".to_string());
    let use_file = match mode.as_str() {
        "file" => true,
        "stdout" => false,
        _ => owns_terminal,
    };

    if use_file {
        let path = lookup(LOG_FILE_ENV).unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
        LogTarget::File(path.into())
    } else {
        LogTarget::Stdout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_service_defaults() {
        let cfg = ServiceConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(cfg.artifact_dir, PathBuf::from("model"));
        assert_eq!(cfg.bind_addr, "0.0.0.0:8000".parse().unwrap());
        assert!(!cfg.require_manifest);
    }

    #[test]
    fn test_service_overrides() {
        let cfg = ServiceConfig::from_lookup(env(&[
            (ARTIFACT_DIR_ENV, "/srv/artifacts"),
            (BIND_ADDR_ENV, "127.0.0.1:9100"),
            (REQUIRE_MANIFEST_ENV, "yes"),
        ]))
        .unwrap();
        assert_eq!(cfg.artifact_dir, PathBuf::from("/srv/artifacts"));
        assert_eq!(cfg.bind_addr.port(), 9100);
        assert!(cfg.require_manifest);
    }

    #[test]
    fn test_bad_bind_addr() {
        let err = ServiceConfig::from_lookup(env(&[(BIND_ADDR_ENV, "localhost")])).unwrap_err();
        assert!(err.to_string().contains(BIND_ADDR_ENV));
    }

    #[test]
    fn test_client_config() {
        let cfg = ClientConfig::from_lookup(env(&[])).unwrap();
        assert_eq!(cfg.api_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.timeout, Duration::from_secs(30));

        let cfg = ClientConfig::from_lookup(env(&[
            (API_URL_ENV, "http://api:8000/"),
            (HTTP_TIMEOUT_ENV, "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_url, "http://api:8000");
        assert_eq!(cfg.timeout, Duration::from_secs(5));

        assert!(ClientConfig::from_lookup(env(&[(HTTP_TIMEOUT_ENV, "0")])).is_err());
    }

    #[test]
    fn test_log_target() {
        assert_eq!(log_target(env(&[]), false), LogTarget::Stdout);
        assert_eq!(
            log_target(env(&[]), true),
            LogTarget::File("docrank-dashboard.log".into())
        );
        assert_eq!(
            log_target(env(&[(LOG_MODE_ENV, "stdout")]), true),
            LogTarget::Stdout
        );
        assert_eq!(
            log_target(env(&[(LOG_MODE_ENV, "file"), (LOG_FILE_ENV, "/tmp/x.log")]), false),
            LogTarget::File("/tmp/x.log".into())
        );
    }
}
