// Configuration module entry point
// Loads layered configuration and builds the immutable application state

mod cli;
mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

use crate::error::ServerError;

// Re-export public types
pub use cli::parse_port_arg;
pub use state::AppState;
pub use types::{Config, HttpConfig, LogLevel, LoggingConfig, PerformanceConfig, ServerConfig};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ROOT: &str = "www";

/// Config file looked up in the launch directory (extension inferred)
const DEFAULT_CONFIG_FILE: &str = "config";

impl Config {
    /// Load `config.toml` (optional) and `WWW_*` environment overrides
    pub fn load() -> Result<Self, ServerError> {
        Ok(Self::load_from(DEFAULT_CONFIG_FILE)?)
    }

    /// Load configuration from the given file path; missing files are skipped
    pub fn load_from(config_path: &str) -> Result<Self, ::config::ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix("WWW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Apply the command line port, if one was given
    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let host = self.server.host.trim_start_matches('[').trim_end_matches(']');
        host.parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.server.port))
            .map_err(|_| ServerError::InvalidAddress(self.server.host.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.root, "www");
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.http.directory_listing);
        assert_eq!(cfg.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_port_override() {
        assert_eq!(Config::default().with_port(None).server.port, 8000);
        assert_eq!(Config::default().with_port(Some(9090)).server.port, 9090);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default().with_port(Some(9090));
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "0.0.0.0:9090");

        cfg.server.host = "[::1]".to_string();
        assert_eq!(cfg.get_socket_addr().unwrap().to_string(), "[::1]:9090");

        cfg.server.host = "not-an-ip".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(ServerError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            r#"
[server]
root = "public"

[http]
directory_listing = false
index_files = ["home.html"]

[logging]
level = "warn"
access_log_format = "json"
"#,
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.root, "public");
        assert!(!cfg.http.directory_listing);
        assert_eq!(cfg.http.index_files, vec!["home.html"]);
        assert_eq!(cfg.logging.level, LogLevel::Warn);
        assert_eq!(cfg.logging.access_log_format, "json");
        // Untouched sections keep their defaults
        assert_eq!(cfg.performance.read_timeout, 30);
    }

    #[test]
    fn test_load_missing_file_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
    }
}
