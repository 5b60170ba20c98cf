//! Control channel to the external player
//!
//! The adapter talks to the player only through [`PlayerChannel`]. The
//! production implementation, [`CommandChannel`], runs the DeaDBeeF binary
//! with a command-line flag for every call; the running player instance picks
//! the command up and the spawned process exits with its reply on stdout.

use super::AdapterError;
use crate::actions::Action;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, warn};

/// Default time allowed for a single player call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Semantic request sent over a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Evaluate a title-format expression against the current track
    NowPlaying {
        /// Title-format expression
        format: String,
    },
    /// Report the player version
    Version,
    /// Issue a transport command
    Transport(Action),
}

/// Raw reply from the player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelOutput {
    /// Whether the player accepted the request
    pub success: bool,
    /// Reply text
    pub stdout: String,
    /// Diagnostic text
    pub stderr: String,
}

impl ChannelOutput {
    /// Accepted reply with the given text
    pub fn accepted(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Rejected reply with the given diagnostic
    pub fn rejected(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Connection to the external player
///
/// Implementations report an unreachable player as
/// [`AdapterError::Unavailable`] and a reachable player that refused the
/// request as `Ok` with `success == false`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerChannel: Send + Sync {
    /// Send a command and wait for the reply
    async fn send(&self, command: PlayerCommand) -> Result<ChannelOutput, AdapterError>;

    /// Human-readable description used in logs
    fn describe(&self) -> String;
}

/// Channel that runs the player binary once per command
#[derive(Debug, Clone)]
pub struct CommandChannel {
    program: PathBuf,
    timeout: Duration,
}

impl CommandChannel {
    /// Create a channel for the player binary at `program`
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Path of the player binary
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Command-line arguments for a command
    pub fn args_for(command: &PlayerCommand) -> Vec<String> {
        match command {
            PlayerCommand::NowPlaying { format } => {
                vec!["--nowplaying-tf".to_string(), format.clone()]
            }
            PlayerCommand::Version => vec!["--version".to_string()],
            PlayerCommand::Transport(action) => vec![transport_flag(*action).to_string()],
        }
    }
}

/// Command-line flag for a transport action
fn transport_flag(action: Action) -> &'static str {
    match action {
        Action::Play => "--play",
        Action::Pause => "--pause",
        Action::TogglePause => "--toggle-pause",
        Action::Stop => "--stop",
        Action::Next => "--next",
        Action::Previous => "--prev",
        Action::Random => "--random",
    }
}

#[async_trait]
impl PlayerChannel for CommandChannel {
    async fn send(&self, command: PlayerCommand) -> Result<ChannelOutput, AdapterError> {
        let args = Self::args_for(&command);
        debug!("Running {:?} {:?}", self.program, args);

        let child = tokio::process::Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AdapterError::Unavailable(format!(
                    "failed to launch {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(AdapterError::Unavailable(format!(
                    "failed to read player reply: {}",
                    e
                )));
            }
            Err(_) => {
                warn!(
                    "Player did not answer {:?} within {} ms",
                    args,
                    self.timeout.as_millis()
                );
                return Err(AdapterError::Unavailable(format!(
                    "player did not respond within {} ms",
                    self.timeout.as_millis()
                )));
            }
        };

        if output.status.code().is_none() {
            return Err(AdapterError::Unavailable(
                "player process was terminated by a signal".to_string(),
            ));
        }

        // Tags are not guaranteed to be valid UTF-8; bad sequences become U+FFFD
        Ok(ChannelOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    fn describe(&self) -> String {
        format!("command channel ({})", self.program.display())
    }
}
