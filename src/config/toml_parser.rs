//! TOML configuration file parser
//!
//! This module handles parsing of the TOML configuration file. Every section
//! and key is optional; missing values take the service defaults.

use crate::config::{
    default_bind_address, default_bind_port, default_cover_file_names, default_player_path,
    default_timeout_ms, AlbumCoverConfig, Config, HttpConfig, PlayerConfig,
};
use crate::error::{BeefdeetsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// TOML configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Player section
    #[serde(default)]
    pub player: TomlPlayerConfig,

    /// HTTP section
    #[serde(default)]
    pub http: TomlHttpConfig,

    /// Album art section
    #[serde(default)]
    pub album_cover: TomlAlbumCoverConfig,
}

/// TOML player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlPlayerConfig {
    /// Path to the DeaDBeeF binary
    #[serde(default = "default_player_path")]
    pub path: PathBuf,

    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// TOML HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlHttpConfig {
    /// Bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
}

/// TOML album art configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlAlbumCoverConfig {
    /// Image served when there is no art
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<PathBuf>,

    /// Sidecar image names
    #[serde(default = "default_cover_file_names")]
    pub file_names: Vec<String>,
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            BeefdeetsError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml)
            .map_err(|e| BeefdeetsError::Config(format!("Failed to parse TOML config: {}", e)))
    }
}

impl Default for TomlPlayerConfig {
    fn default() -> Self {
        Self {
            path: default_player_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for TomlHttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
        }
    }
}

impl Default for TomlAlbumCoverConfig {
    fn default() -> Self {
        Self {
            fallback_path: None,
            file_names: default_cover_file_names(),
        }
    }
}

// Convert TOML config to internal Config
impl From<TomlConfig> for Config {
    fn from(toml: TomlConfig) -> Self {
        Config {
            player: toml.player.into(),
            http: toml.http.into(),
            album_cover: toml.album_cover.into(),
        }
    }
}

impl From<TomlPlayerConfig> for PlayerConfig {
    fn from(toml: TomlPlayerConfig) -> Self {
        PlayerConfig {
            path: toml.path,
            timeout_ms: toml.timeout_ms,
        }
    }
}

impl From<TomlHttpConfig> for HttpConfig {
    fn from(toml: TomlHttpConfig) -> Self {
        HttpConfig {
            bind_address: toml.bind_address,
            bind_port: toml.bind_port,
        }
    }
}

impl From<TomlAlbumCoverConfig> for AlbumCoverConfig {
    fn from(toml: TomlAlbumCoverConfig) -> Self {
        AlbumCoverConfig {
            fallback_path: toml.fallback_path,
            file_names: toml.file_names,
        }
    }
}
