//! Control API for remote clients
//!
//! This module exposes the player over HTTP. Requests are forwarded to the
//! player adapter through the command handler, and every adapter failure is
//! translated into the API response types before it reaches a client.

mod api;
mod handler;
mod server;

pub use api::{ActionList, ActionOutcome, ApiError, OutcomeStatus, VersionResponse};
pub use handler::CommandHandler;
pub use server::{create_router, shutdown_signal, ControlServer, NowPlayingQuery};
