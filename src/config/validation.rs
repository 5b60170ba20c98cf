//! Configuration validation functions
//!
//! This module provides validation for configuration fields: the player
//! binary path, timeouts, listener address and port, and album art file names.

use crate::error::{BeefdeetsError, Result};
use std::net::IpAddr;
use std::path::Path;

/// Smallest accepted player call timeout
const MIN_TIMEOUT_MS: u64 = 100;

/// Largest accepted player call timeout
const MAX_TIMEOUT_MS: u64 = 60_000;

/// Validate the player binary path (non-empty, UTF-8)
///
/// Existence is not checked: a missing binary is reported per call as an
/// unavailable player, and the service keeps running.
pub fn validate_player_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(BeefdeetsError::Config(
            "Player path cannot be empty".to_string(),
        ));
    }

    if path.to_str().is_none() {
        return Err(BeefdeetsError::Config(format!(
            "Invalid player path: {:?}",
            path
        )));
    }

    Ok(())
}

/// Validate the player call timeout (100-60000 ms)
pub fn validate_timeout_ms(timeout_ms: u64) -> Result<()> {
    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&timeout_ms) {
        return Err(BeefdeetsError::Config(format!(
            "Timeout {} ms is out of valid range ({}-{})",
            timeout_ms, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS
        )));
    }
    Ok(())
}

/// Validate IP address
pub fn validate_ip_address(ip: &str) -> Result<()> {
    ip.parse::<IpAddr>()
        .map_err(|_| BeefdeetsError::Config(format!("Invalid IP address: {}", ip)))?;
    Ok(())
}

/// Validate listener port
pub fn validate_port(port: u16) -> Result<()> {
    if port == 0 {
        return Err(BeefdeetsError::Config(
            "Port number cannot be 0".to_string(),
        ));
    }
    Ok(())
}

/// Validate a sidecar image name (a bare file name, no directories)
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BeefdeetsError::Config(
            "Cover file name cannot be empty".to_string(),
        ));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(BeefdeetsError::Config(format!(
            "Cover file name '{}' must not contain a directory",
            name
        )));
    }

    Ok(())
}

/// Validate file path is syntactically usable
pub fn validate_file_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(BeefdeetsError::Config(
            "File path cannot be empty".to_string(),
        ));
    }

    // The fallback image may be installed after the service starts
    if path.to_str().is_none() {
        return Err(BeefdeetsError::Config(format!(
            "Invalid file path: {:?}",
            path
        )));
    }

    Ok(())
}
