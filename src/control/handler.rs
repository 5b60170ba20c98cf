//! Command handler for the control API
//!
//! This module executes control requests against the player adapter and
//! translates every result through the API types.

use crate::actions::{registry, Action};
use crate::control::{ActionList, ActionOutcome, ApiError, VersionResponse};
use crate::player::{AlbumCover, NowPlaying, PlayerAdapter, TrackField, DEFAULT_FIELDS};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Handles control requests on behalf of the HTTP layer
pub struct CommandHandler {
    /// Player adapter
    adapter: Arc<PlayerAdapter>,
    /// Image served when the current track has no art
    fallback_cover: Option<PathBuf>,
}

impl CommandHandler {
    /// Create a new command handler
    pub fn new(adapter: Arc<PlayerAdapter>) -> Self {
        Self {
            adapter,
            fallback_cover: None,
        }
    }

    /// Serve `path` when there is no album art
    pub fn with_fallback_cover(mut self, path: Option<PathBuf>) -> Self {
        self.fallback_cover = path;
        self
    }

    /// The adapter requests are forwarded to
    pub fn adapter(&self) -> &Arc<PlayerAdapter> {
        &self.adapter
    }

    /// Snapshot of the requested fields
    ///
    /// `fields` is a comma-separated list of field names; when empty or
    /// missing the default field set is used.
    pub async fn now_playing(&self, fields: Option<&str>) -> Result<NowPlaying, ApiError> {
        let fields = match fields.map(str::trim).filter(|f| !f.is_empty()) {
            Some(list) => {
                let names: Vec<&str> = list.split(',').collect();
                PlayerAdapter::parse_fields(&names).map_err(|e| {
                    warn!("Rejected now-playing request: {}", e);
                    ApiError::from(e)
                })?
            }
            None => DEFAULT_FIELDS.to_vec(),
        };

        debug!("Querying now playing: {:?}", fields);
        self.adapter.now_playing(&fields).await.map_err(|e| {
            error!("Now-playing query failed: {}", e);
            ApiError::from(e)
        })
    }

    /// Page title for the current track: `{album} - "{title}" by {artist}`
    pub async fn page_title(&self) -> Result<String, ApiError> {
        let fields = [TrackField::Artist, TrackField::Title, TrackField::Album];
        let values = self.adapter.now_playing_values(&fields).await.map_err(|e| {
            error!("Title query failed: {}", e);
            ApiError::from(e)
        })?;

        match values.as_slice() {
            [artist, title, album] => Ok(format!("{} - \"{}\" by {}", album, title, artist)),
            _ => Err(ApiError::InternalError(
                "player returned an incomplete snapshot".to_string(),
            )),
        }
    }

    /// Player version
    pub async fn version(&self) -> Result<VersionResponse, ApiError> {
        match self.adapter.version().await {
            Ok(version) => Ok(VersionResponse { version }),
            Err(e) => {
                error!("Version query failed: {}", e);
                Err(e.into())
            }
        }
    }

    /// Album art of the current track, or the fallback image
    pub async fn album_cover(&self) -> Result<AlbumCover, ApiError> {
        match self.adapter.album_cover().await {
            Ok(Some(cover)) => return Ok(cover),
            Ok(None) => debug!("No album cover for the current track"),
            Err(e) => {
                error!("Album cover query failed: {}", e);
                return Err(e.into());
            }
        }

        let Some(path) = &self.fallback_cover else {
            return Err(ApiError::NotFound("no album cover".to_string()));
        };

        match tokio::fs::read(path).await {
            Ok(data) => Ok(AlbumCover::from_bytes(data)),
            Err(e) => {
                warn!("Failed to read fallback cover {:?}: {}", path, e);
                Err(ApiError::NotFound("no album cover".to_string()))
            }
        }
    }

    /// Perform a transport action
    pub async fn perform(&self, action: Action) -> ActionOutcome {
        let outcome = ActionOutcome::from_result(action, action.invoke(&self.adapter).await);
        if outcome.is_ok() {
            info!("Action '{}' completed", action);
        } else {
            error!("Action '{}' failed: {}", action, outcome.message);
        }
        outcome
    }

    /// Perform a transport action by name
    pub async fn perform_named(&self, name: &str) -> ActionOutcome {
        match registry().get(name) {
            Some(action) => self.perform(action).await,
            None => {
                warn!("Unknown action requested: {}", name);
                ActionOutcome::error(format!("unknown action '{}'", name))
            }
        }
    }

    /// Registered action names
    pub fn actions(&self) -> ActionList {
        ActionList {
            actions: registry().names().into_iter().map(String::from).collect(),
        }
    }
}
