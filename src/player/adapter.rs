//! Player control adapter
//!
//! [`PlayerAdapter`] is the only component that talks to the player. It owns
//! the channel, serializes transport commands, and turns raw replies into
//! typed values.

use super::channel::{ChannelOutput, CommandChannel, PlayerChannel, PlayerCommand};
use super::cover::{find_cover, AlbumCover, DEFAULT_COVER_FILE_NAMES};
use super::fields::{parse_snapshot, snapshot_format, FieldValue, NowPlaying, TrackField};
use super::AdapterError;
use crate::actions::Action;
use crate::config::Config;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Typed access to the external player
///
/// Queries share the channel and may run concurrently. Transport actions take
/// the channel exclusively, so two actions never overlap and no query observes
/// a half-applied action.
pub struct PlayerAdapter {
    channel: Box<dyn PlayerChannel>,
    gate: RwLock<()>,
    cover_file_names: Vec<String>,
}

impl PlayerAdapter {
    /// Create an adapter that owns `channel`
    pub fn new(channel: impl PlayerChannel + 'static) -> Self {
        Self {
            channel: Box::new(channel),
            gate: RwLock::new(()),
            cover_file_names: DEFAULT_COVER_FILE_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    /// Create an adapter driving the player binary named in `config`
    pub fn from_config(config: &Config) -> Self {
        let channel = CommandChannel::new(&config.player.path, config.player.timeout());
        Self::new(channel).with_cover_file_names(config.album_cover.file_names.clone())
    }

    /// Replace the sidecar image names tried for album art
    pub fn with_cover_file_names(mut self, names: Vec<String>) -> Self {
        self.cover_file_names = names;
        self
    }

    /// Description of the underlying channel
    pub fn describe(&self) -> String {
        self.channel.describe()
    }

    /// Parse field names, failing on the first unknown one
    pub fn parse_fields<S: AsRef<str>>(names: &[S]) -> Result<Vec<TrackField>, AdapterError> {
        names.iter().map(|name| name.as_ref().parse()).collect()
    }

    /// Current values of `fields`, positionally aligned with the request
    ///
    /// When no track is active numeric fields are `0` and text fields are empty.
    pub async fn now_playing_values(
        &self,
        fields: &[TrackField],
    ) -> Result<Vec<FieldValue>, AdapterError> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }

        let output = self
            .query(PlayerCommand::NowPlaying {
                format: snapshot_format(fields),
            })
            .await?;

        parse_snapshot(fields, &output.stdout)
    }

    /// Current values of `fields`, keyed by field
    pub async fn now_playing(&self, fields: &[TrackField]) -> Result<NowPlaying, AdapterError> {
        let values = self.now_playing_values(fields).await?;
        Ok(NowPlaying::from_values(fields, values))
    }

    /// Version string reported by the player
    pub async fn version(&self) -> Result<String, AdapterError> {
        let output = self.query(PlayerCommand::Version).await?;
        parse_version(&output.stdout).ok_or_else(|| {
            AdapterError::Unavailable("player did not report a version".to_string())
        })
    }

    /// Album art of the current track, or `None` when there is none
    pub async fn album_cover(&self) -> Result<Option<AlbumCover>, AdapterError> {
        let values = self.now_playing_values(&[TrackField::Path]).await?;
        let path = values
            .first()
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
            .to_string();

        if path.is_empty() {
            debug!("No active track, no album cover");
            return Ok(None);
        }

        let track = PathBuf::from(path);
        let names = self.cover_file_names.clone();
        tokio::task::spawn_blocking(move || find_cover(&track, &names))
            .await
            .map_err(|e| AdapterError::Io(std::io::Error::other(e)))
    }

    /// Start playback
    pub async fn play(&self) -> Result<bool, AdapterError> {
        self.transport(Action::Play).await
    }

    /// Pause playback
    pub async fn pause(&self) -> Result<bool, AdapterError> {
        self.transport(Action::Pause).await
    }

    /// Toggle between playing and paused
    pub async fn toggle_pause(&self) -> Result<bool, AdapterError> {
        self.transport(Action::TogglePause).await
    }

    /// Stop playback
    pub async fn stop(&self) -> Result<bool, AdapterError> {
        self.transport(Action::Stop).await
    }

    /// Skip to the next track
    pub async fn next(&self) -> Result<bool, AdapterError> {
        self.transport(Action::Next).await
    }

    /// Go back to the previous track
    pub async fn previous(&self) -> Result<bool, AdapterError> {
        self.transport(Action::Previous).await
    }

    /// Jump to a random track
    pub async fn random(&self) -> Result<bool, AdapterError> {
        self.transport(Action::Random).await
    }

    /// Run the operation bound to `action`
    pub async fn perform(&self, action: Action) -> Result<bool, AdapterError> {
        match action {
            Action::Play => self.play().await,
            Action::Pause => self.pause().await,
            Action::TogglePause => self.toggle_pause().await,
            Action::Stop => self.stop().await,
            Action::Next => self.next().await,
            Action::Previous => self.previous().await,
            Action::Random => self.random().await,
        }
    }

    async fn query(&self, command: PlayerCommand) -> Result<ChannelOutput, AdapterError> {
        let _shared = self.gate.read().await;
        let output = self.channel.send(command.clone()).await?;

        if !output.success {
            warn!("Player refused query {:?}: {}", command, output.stderr);
            let detail = if output.stderr.is_empty() {
                "player refused the query".to_string()
            } else {
                output.stderr
            };
            return Err(AdapterError::Unavailable(detail));
        }

        Ok(output)
    }

    async fn transport(&self, action: Action) -> Result<bool, AdapterError> {
        let _exclusive = self.gate.write().await;
        let output = self
            .channel
            .send(PlayerCommand::Transport(action))
            .await?;

        if output.success {
            info!("Player accepted '{}'", action);
        } else {
            info!("Player did not accept '{}': {}", action, output.stderr);
        }
        Ok(output.success)
    }
}

impl std::fmt::Debug for PlayerAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerAdapter")
            .field("channel", &self.channel.describe())
            .field("cover_file_names", &self.cover_file_names)
            .finish()
    }
}

/// Extract the version from `--version` output
///
/// DeaDBeeF prints `DeaDBeeF 1.9.5 Copyright ...`; other output is returned
/// as its first non-empty line.
fn parse_version(output: &str) -> Option<String> {
    let line = output.lines().map(str::trim).find(|line| !line.is_empty())?;
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (Some(name), Some(version)) if name.eq_ignore_ascii_case("deadbeef") => {
            Some(version.to_string())
        }
        _ => Some(line.to_string()),
    }
}
