//! Configuration management
//!
//! This module handles loading and validation of the service configuration
//! from a static TOML file, with command-line overrides applied on top.

mod toml_parser;
mod validation;

pub use toml_parser::TomlConfig;

use crate::error::{BeefdeetsError, Result};
use crate::player::DEFAULT_COVER_FILE_NAMES;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/beefdeets/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Player process settings
    pub player: PlayerConfig,
    /// HTTP listener settings
    pub http: HttpConfig,
    /// Album art settings
    pub album_cover: AlbumCoverConfig,
}

/// How to reach the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Path to the DeaDBeeF binary
    pub path: PathBuf,
    /// Time allowed for a single player call, in milliseconds
    pub timeout_ms: u64,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address for HTTP server
    pub bind_address: String,
    /// Bind port for HTTP server
    pub bind_port: u16,
}

/// Album art configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumCoverConfig {
    /// Image served when the current track has no art
    pub fallback_path: Option<PathBuf>,
    /// Sidecar image names tried next to the track file
    pub file_names: Vec<String>,
}

impl Config {
    /// Configuration with every default applied
    pub fn new() -> Self {
        Self {
            player: PlayerConfig::default(),
            http: HttpConfig::default(),
            album_cover: AlbumCoverConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let toml_config = TomlConfig::from_file(path)?;
        Ok(toml_config.into())
    }

    /// Parse configuration from a TOML string
    pub fn parse(toml: &str) -> Result<Self> {
        Ok(TomlConfig::parse(toml)?.into())
    }

    /// Load `path`, falling back to defaults when it is the default path and
    /// does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
            info!("No configuration at {:?}, using defaults", path);
            return Ok(Self::new());
        }
        Self::from_file(path)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.player
            .validate()
            .map_err(|e| BeefdeetsError::Config(format!("[player] {}", e)))?;
        self.http
            .validate()
            .map_err(|e| BeefdeetsError::Config(format!("[http] {}", e)))?;
        self.album_cover
            .validate()
            .map_err(|e| BeefdeetsError::Config(format!("[album_cover] {}", e)))?;
        Ok(())
    }
}

impl PlayerConfig {
    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate player configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_player_path(&self.path)?;
        validation::validate_timeout_ms(self.timeout_ms)?;
        Ok(())
    }
}

impl HttpConfig {
    /// Socket address to listen on
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.bind_address.parse().map_err(|_| {
            BeefdeetsError::Validation(format!("Invalid bind address: {}", self.bind_address))
        })?;
        Ok(SocketAddr::new(ip, self.bind_port))
    }

    /// Validate HTTP configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_ip_address(&self.bind_address)?;
        validation::validate_port(self.bind_port)?;
        Ok(())
    }
}

impl AlbumCoverConfig {
    /// Validate album art configuration
    pub fn validate(&self) -> Result<()> {
        for name in &self.file_names {
            validation::validate_file_name(name)?;
        }
        if let Some(path) = &self.fallback_path {
            validation::validate_file_path(path)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            path: default_player_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
        }
    }
}

impl Default for AlbumCoverConfig {
    fn default() -> Self {
        Self {
            fallback_path: None,
            file_names: default_cover_file_names(),
        }
    }
}

// Default value functions, shared with the TOML layer
pub(crate) fn default_player_path() -> PathBuf {
    PathBuf::from("/opt/deadbeef/bin/deadbeef")
}

pub(crate) fn default_timeout_ms() -> u64 {
    5000
}

pub(crate) fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

pub(crate) fn default_bind_port() -> u16 {
    5000
}

pub(crate) fn default_cover_file_names() -> Vec<String> {
    DEFAULT_COVER_FILE_NAMES.iter().map(|s| s.to_string()).collect()
}
