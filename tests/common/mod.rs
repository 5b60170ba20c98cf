//! Shared test doubles for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use beefdeets::player::{ChannelOutput, PlayerChannel, PlayerCommand};
use beefdeets::{Action, AdapterError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

/// Track loaded in the fake player
#[derive(Debug, Clone)]
pub struct FakeTrack {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub path: PathBuf,
    pub position: f64,
    pub length: f64,
}

impl FakeTrack {
    pub fn new(artist: &str, title: &str, album: &str) -> Self {
        Self {
            artist: artist.to_string(),
            title: title.to_string(),
            album: album.to_string(),
            path: PathBuf::from("/music/track.flac"),
            position: 42.5,
            length: 215.0,
        }
    }
}

#[derive(Debug, Default)]
struct PlayerState {
    playlist: Vec<FakeTrack>,
    current: Option<usize>,
    playing: bool,
}

/// In-memory stand-in for a running DeaDBeeF instance
#[derive(Clone)]
pub struct FakePlayer {
    state: Arc<Mutex<PlayerState>>,
    link: Arc<watch::Sender<bool>>,
    hang: bool,
    delay: Duration,
    active_actions: Arc<AtomicUsize>,
    max_actions: Arc<AtomicUsize>,
    active_queries: Arc<AtomicUsize>,
    max_queries: Arc<AtomicUsize>,
}

impl FakePlayer {
    /// Running player with an empty playlist
    pub fn new() -> Self {
        let (link, _) = watch::channel(true);
        Self {
            state: Arc::new(Mutex::new(PlayerState::default())),
            link: Arc::new(link),
            hang: false,
            delay: Duration::ZERO,
            active_actions: Arc::new(AtomicUsize::new(0)),
            max_actions: Arc::new(AtomicUsize::new(0)),
            active_queries: Arc::new(AtomicUsize::new(0)),
            max_queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Running player with `tracks` queued and the first one playing
    pub fn playing(tracks: Vec<FakeTrack>) -> Self {
        let player = Self::new();
        {
            let mut state = player.state.lock().unwrap();
            state.current = if tracks.is_empty() { None } else { Some(0) };
            state.playing = !tracks.is_empty();
            state.playlist = tracks;
        }
        player
    }

    /// Every call waits until the link is cut
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Every call takes `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Cut the connection; pending and future calls fail
    pub fn disconnect(&self) {
        self.link.send_replace(false);
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    pub fn current_title(&self) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.current.map(|i| state.playlist[i].title.clone())
    }

    pub fn max_concurrent_actions(&self) -> usize {
        self.max_actions.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_queries(&self) -> usize {
        self.max_queries.load(Ordering::SeqCst)
    }

    fn evaluate(&self, format: &str) -> String {
        let state = self.state.lock().unwrap();
        let Some(track) = state.current.map(|i| &state.playlist[i]) else {
            return "nothing\n".to_string();
        };

        let body = format
            .trim_start_matches('\u{1e}')
            .replace(",\u{1f},)", ")");
        let values: Vec<String> = body
            .split('\u{1f}')
            .map(|expr| {
                match expr
                    .strip_prefix("$replace(")
                    .and_then(|inner| inner.strip_suffix(')'))
                {
                    Some(inner) => Self::expand(track, inner).replace('\u{1f}', ""),
                    None => Self::expand(track, expr),
                }
            })
            .collect();
        format!("\u{1e}{}\n", values.join("\u{1f}"))
    }

    fn expand(track: &FakeTrack, expr: &str) -> String {
        match expr {
            "%artist%" => track.artist.clone(),
            "%title%" => track.title.clone(),
            "%album%" => track.album.clone(),
            "%path%" => track.path.display().to_string(),
            "%playback_time_seconds%" => format!("{:.3}", track.position),
            "%length_seconds%" => format!("{:.3}", track.length),
            "%codec%" => "FLAC".to_string(),
            "%samplerate%" => "44100".to_string(),
            "%bitrate%" => "1011".to_string(),
            _ => String::new(),
        }
    }

    fn apply(&self, action: Action) -> bool {
        let mut state = self.state.lock().unwrap();
        let len = state.playlist.len();
        let current = state.current;
        if len == 0 {
            return false;
        }
        match action {
            Action::Play => {
                state.current.get_or_insert(0);
                state.playing = true;
            }
            Action::Pause => {
                if !state.playing {
                    return false;
                }
                state.playing = false;
            }
            Action::TogglePause => {
                if current.is_none() {
                    return false;
                }
                state.playing = !state.playing;
            }
            Action::Stop => {
                state.playing = false;
                state.current = None;
            }
            Action::Next => {
                let next = current.map_or(0, |i| i + 1);
                if next >= len {
                    return false;
                }
                state.current = Some(next);
                state.playing = true;
            }
            Action::Previous => match current {
                Some(i) if i > 0 => {
                    state.current = Some(i - 1);
                    state.playing = true;
                }
                _ => return false,
            },
            Action::Random => {
                state.current = Some(len - 1);
                state.playing = true;
            }
        }
        true
    }

    async fn wait_or_disconnect(&self) -> Result<(), AdapterError> {
        let mut link = self.link.subscribe();
        if !*link.borrow() {
            return Err(AdapterError::Unavailable("connection refused".to_string()));
        }
        if self.hang {
            let _ = link.wait_for(|connected| !*connected).await;
            return Err(AdapterError::Unavailable("connection reset".to_string()));
        }
        if !self.delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(self.delay) => {}
                _ = link.wait_for(|connected| !*connected) => {
                    return Err(AdapterError::Unavailable("connection reset".to_string()));
                }
            }
        }
        Ok(())
    }
}

fn track_concurrency(active: &AtomicUsize, max: &AtomicUsize) {
    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
    max.fetch_max(now, Ordering::SeqCst);
}

#[async_trait]
impl PlayerChannel for FakePlayer {
    async fn send(&self, command: PlayerCommand) -> Result<ChannelOutput, AdapterError> {
        let (active, max) = match command {
            PlayerCommand::Transport(_) => (&self.active_actions, &self.max_actions),
            _ => (&self.active_queries, &self.max_queries),
        };
        track_concurrency(active, max);
        let waited = self.wait_or_disconnect().await;
        active.fetch_sub(1, Ordering::SeqCst);
        waited?;

        Ok(match command {
            PlayerCommand::Version => ChannelOutput::accepted(
                "DeaDBeeF 1.9.6 Copyright (C) 2009-2023 Oleksiy Yakovenko\n",
            ),
            PlayerCommand::NowPlaying { format } => ChannelOutput::accepted(self.evaluate(&format)),
            PlayerCommand::Transport(action) => {
                if self.apply(action) {
                    ChannelOutput::accepted("")
                } else {
                    ChannelOutput::rejected("")
                }
            }
        })
    }

    fn describe(&self) -> String {
        "fake player".to_string()
    }
}

/// Player whose process is not running at all
pub struct StoppedPlayer;

#[async_trait]
impl PlayerChannel for StoppedPlayer {
    async fn send(&self, _command: PlayerCommand) -> Result<ChannelOutput, AdapterError> {
        Err(AdapterError::Unavailable(
            "failed to launch /opt/deadbeef/bin/deadbeef: No such file or directory".to_string(),
        ))
    }

    fn describe(&self) -> String {
        "stopped player".to_string()
    }
}

/// The three tracks used by most scenarios
pub fn sample_tracks() -> Vec<FakeTrack> {
    vec![
        FakeTrack::new("Artist Y", "Title X", "Album Z"),
        FakeTrack::new("Artist Y", "Second", "Album Z"),
        FakeTrack::new("Artist Y", "Third", "Album Z"),
    ]
}
