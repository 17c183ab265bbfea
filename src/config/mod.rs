// Configuration module entry point
// Loads layered configuration and exposes the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::time::Duration;

pub use state::AppState;
pub use types::{Config, ProxyConfig};

/// Default config file, looked up without extension so any format `config` knows works
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the optional file,
    /// then `ASSETGATE_*` environment variables (`__` separates sections).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.backlog", 1024)?
            .set_default("static_files.root", ".")?
            .set_default("static_files.default_document", "/play-doom.html")?
            .set_default("proxy.prefix", "/api/")?
            .set_default("proxy.upstream_host", "localhost")?
            .set_default("proxy.upstream_port", 8000)?
            .set_default("proxy.timeout_secs", 0)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("ASSETGATE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

impl ProxyConfig {
    /// `host:port` of the upstream service
    pub fn authority(&self) -> String {
        format!("{}:{}", self.upstream_host, self.upstream_port)
    }

    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("/nonexistent/assetgate-config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.static_files.default_document, "/play-doom.html");
        assert_eq!(cfg.proxy.prefix, "/api/");
        assert_eq!(cfg.proxy.authority(), "localhost:8000");
        assert_eq!(cfg.proxy.timeout(), None);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .prefix("assetgate-")
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[proxy]\nupstream_port = 9000\ntimeout_secs = 5\n\n[static_files]\nroot = \"public\""
        )
        .unwrap();

        let path = file.path().with_extension("");
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.proxy.upstream_port, 9000);
        assert_eq!(cfg.proxy.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.static_files.root, "public");
        // Untouched keys keep their defaults
        assert_eq!(cfg.proxy.upstream_host, "localhost");
    }

    #[test]
    fn test_invalid_socket_addr() {
        let mut cfg = Config::load_from("/nonexistent/assetgate-config").unwrap();
        cfg.server.host = "not an address".to_string();
        assert!(cfg.socket_addr().is_err());

        cfg.server.host = "127.0.0.1".to_string();
        assert_eq!(cfg.socket_addr().unwrap().port(), 8080);
    }
}
