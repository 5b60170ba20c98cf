//! Player control adapter
//!
//! This module is the sole point of contact with the external DeaDBeeF
//! process. Everything else in the service addresses the player through
//! [`PlayerAdapter`].
//!
//! - `channel`: transport to the player ([`PlayerChannel`], [`CommandChannel`])
//! - `fields`: metadata keys, values and snapshot parsing
//! - `cover`: album art lookup
//! - `adapter`: typed query and transport operations

mod adapter;
mod channel;
mod cover;
mod error;
mod fields;

pub use adapter::PlayerAdapter;
pub use channel::{ChannelOutput, CommandChannel, PlayerChannel, PlayerCommand, DEFAULT_TIMEOUT};
pub use cover::{AlbumCover, DEFAULT_COVER_FILE_NAMES};
pub use error::AdapterError;
pub use fields::{FieldKind, FieldValue, NowPlaying, TrackField, DEFAULT_FIELDS};
