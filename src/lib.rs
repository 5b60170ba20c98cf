//! beefdeets: remote control surface for a local DeaDBeeF player
//!
//! This library exposes a running DeaDBeeF instance over HTTP: what is
//! playing, its album art, the player version, and a fixed menu of transport
//! actions.
//!
//! # Architecture
//!
//! The player adapter is the only component that talks to the player process.
//! The action registry enumerates the transport actions and drives route
//! generation. The control layer forwards HTTP requests to the adapter and
//! translates adapter failures into uniform responses.
//!
//! # Modules
//!
//! - `player`: player control adapter and its transport
//! - `actions`: static registry of transport actions
//! - `control`: HTTP control API and error translation
//! - `config`: configuration parsing and validation
//! - `error`: error types and handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actions;
pub mod config;
pub mod control;
pub mod error;
pub mod player;

// Re-export commonly used types
pub use actions::{registry, Action, ActionRegistry};
pub use error::{BeefdeetsError, Result};
pub use player::{AdapterError, PlayerAdapter};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
