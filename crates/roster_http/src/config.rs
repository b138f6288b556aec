//! Server configuration.
//!
//! Defaults, then `ROSTER_*` environment overrides, then whatever the caller
//! sets through the builder (CLI flags).

use std::path::PathBuf;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
pub const DB_PATH_ENV: &str = "ROSTER_DB_PATH";
pub const LISTEN_ADDR_ENV: &str = "ROSTER_LISTEN_ADDR";
const DB_FILE_NAME: &str = "roster.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP listen address; port 0 picks a free port.
    pub listen_addr: String,

    /// SQLite file holding the record store.
    pub db_path: PathBuf,

    /// Async worker threads of the server runtime.
    pub worker_threads: usize,

    /// Largest accepted request body, however it is framed.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            db_path: std::env::temp_dir().join(DB_FILE_NAME),
            worker_threads: 4,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Defaults with `ROSTER_DB_PATH` / `ROSTER_LISTEN_ADDR` applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup(DB_PATH_ENV).filter(|value| !value.trim().is_empty()) {
            config.db_path = PathBuf::from(path.trim());
        }
        if let Some(addr) = lookup(LISTEN_ADDR_ENV).filter(|value| !value.trim().is_empty()) {
            config.listen_addr = addr.trim().to_string();
        }
        config
    }
}

/// Builder for [`ServerConfig`].
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Starts from [`ServerConfig::from_env`] instead of the bare defaults.
    pub fn from_env() -> Self {
        Self {
            config: ServerConfig::from_env(),
        }
    }

    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count.max(1);
        self
    }

    pub fn max_body_bytes(mut self, bytes: usize) -> Self {
        self.config.max_body_bytes = bytes;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, DB_PATH_ENV, DEFAULT_LISTEN_ADDR, LISTEN_ADDR_ENV};
    use std::path::PathBuf;

    #[test]
    fn defaults_match_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert!(config.db_path.ends_with("roster.sqlite3"));
        assert_eq!(config.worker_threads, 4);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn env_lookup_overrides_defaults_and_ignores_blank_values() {
        let config = ServerConfig::from_lookup(|key| match key {
            DB_PATH_ENV => Some("/var/lib/roster/db.sqlite3".to_string()),
            LISTEN_ADDR_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/var/lib/roster/db.sqlite3"));
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn builder_sets_every_field() {
        let config = ServerConfig::builder()
            .listen_addr("0.0.0.0:8080")
            .db_path("/tmp/x.sqlite3")
            .worker_threads(0)
            .max_body_bytes(256)
            .build();

        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.sqlite3"));
        assert_eq!(config.worker_threads, 1);
        assert_eq!(config.max_body_bytes, 256);
    }
}
