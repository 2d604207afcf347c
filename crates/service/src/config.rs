use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "media-gate.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port for the HTTP server
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    #[serde(default)]
    pub sqlite_path: Option<PathBuf>,
    /// Origin of the site; stripped from storage URLs to get the paths
    ///  the rewrite rules match on
    #[serde(default = "default_site_url")]
    pub site_url: Url,
    /// Filesystem directory asset storage paths are relative to
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    /// Public URL of `uploads_dir`. Defaults to
    ///  `<site_url>/wp-content/uploads/`
    #[serde(default)]
    pub uploads_url: Option<Url>,
    /// Path of the gated endpoint rewrite rules point at
    #[serde(default = "default_gated_endpoint")]
    pub gated_endpoint: String,
    /// Web server config file the rewrite block is spliced into. When
    ///  unset, regenerated rules are only logged.
    #[serde(default)]
    pub htaccess_path: Option<PathBuf>,
    /// robots.txt content emitted before the generated `Disallow` lines
    #[serde(default = "default_robots_base")]
    pub robots_base: String,
    /// Bearer tokens that grant the read-private capability
    #[serde(default)]
    pub editor_tokens: Vec<String>,
    // log level for http tracing
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}

fn default_site_url() -> Url {
    Url::parse("http://localhost:8080").expect("hardcoded URL must parse")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_gated_endpoint() -> String {
    common::gate::DEFAULT_ENDPOINT.to_string()
}

fn default_robots_base() -> String {
    "User-agent: *".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            sqlite_path: None,
            site_url: default_site_url(),
            uploads_dir: default_uploads_dir(),
            uploads_url: None,
            gated_endpoint: default_gated_endpoint(),
            htaccess_path: None,
            robots_base: default_robots_base(),
            editor_tokens: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        if !config.gated_endpoint.starts_with('/') {
            return Err(ConfigError::InvalidEndpoint(config.gated_endpoint));
        }
        Ok(config)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), self.listen_port)
    }

    /// Public URL of the uploads directory
    pub fn uploads_url(&self) -> Result<Url, ConfigError> {
        match &self.uploads_url {
            Some(url) => Ok(url.clone()),
            None => Ok(self.site_url.join("wp-content/uploads/")?),
        }
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("gated endpoint must be an absolute path: {0}")]
    InvalidEndpoint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.gated_endpoint, "/index.php");
        assert_eq!(config.robots_base, "User-agent: *");
        assert!(config.editor_tokens.is_empty());
        assert_eq!(
            config.uploads_url().unwrap().as_str(),
            "http://localhost:8080/wp-content/uploads/"
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml(
            r#"
            listen_port = 9000
            site_url = "https://example.com"
            uploads_url = "https://example.com/media/"
            editor_tokens = ["s3cret"]
            htaccess_path = "/var/www/.htaccess"
            "#,
        )
        .unwrap();
        assert_eq!(config.listen_port, 9000);
        assert_eq!(config.uploads_url().unwrap().as_str(), "https://example.com/media/");
        assert_eq!(config.editor_tokens, vec!["s3cret".to_string()]);
        assert_eq!(
            config.htaccess_path.as_deref(),
            Some(Path::new("/var/www/.htaccess"))
        );
    }

    #[test]
    fn test_rejects_relative_endpoint() {
        let result = Config::from_toml(r#"gated_endpoint = "index.php""#);
        assert!(matches!(result, Err(ConfigError::InvalidEndpoint(_))));
    }
}
