//! Action registry
//!
//! The fixed set of transport actions the service exposes. Each [`Action`] is
//! bound to a zero-argument [`PlayerAdapter`] operation by an exhaustive
//! `match`, so an action without a backing operation does not compile. The
//! registry itself is built once per process and validated at startup before
//! any route is generated from it.

use crate::error::{BeefdeetsError, Result};
use crate::player::{AdapterError, PlayerAdapter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

/// Route names the HTTP surface already uses for queries
const RESERVED_NAMES: [&str; 4] = ["now_playing", "version", "album_cover", "actions"];

/// Transport action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle between playing and paused
    TogglePause,
    /// Stop playback
    Stop,
    /// Next track
    Next,
    /// Previous track
    Previous,
    /// Random track
    Random,
}

impl Action {
    /// Every action, in registry order
    pub const ALL: [Action; 7] = [
        Action::Play,
        Action::Pause,
        Action::TogglePause,
        Action::Stop,
        Action::Next,
        Action::Previous,
        Action::Random,
    ];

    /// Stable, URL-safe name
    pub fn name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::TogglePause => "toggle_pause",
            Self::Stop => "stop",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Random => "random",
        }
    }

    /// Run this action against the player
    pub async fn invoke(self, adapter: &PlayerAdapter) -> std::result::Result<bool, AdapterError> {
        adapter.perform(self).await
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = BeefdeetsError;

    fn from_str(s: &str) -> Result<Self> {
        registry()
            .get(s)
            .ok_or_else(|| BeefdeetsError::Validation(format!("Unknown action '{}'", s)))
    }
}

/// Name-to-action table
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    entries: Vec<(&'static str, Action)>,
}

static REGISTRY: OnceLock<ActionRegistry> = OnceLock::new();

/// The process-wide registry
pub fn registry() -> &'static ActionRegistry {
    REGISTRY.get_or_init(ActionRegistry::builtin)
}

impl ActionRegistry {
    /// Registry containing every [`Action`] under its own name
    pub fn builtin() -> Self {
        Self::from_entries(Action::ALL.iter().map(|a| (a.name(), *a)).collect())
    }

    /// Registry from explicit entries, validated separately
    pub fn from_entries(entries: Vec<(&'static str, Action)>) -> Self {
        Self { entries }
    }

    /// Entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Action)> + '_ {
        self.entries.iter().copied()
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    /// Look up an action by name
    pub fn get(&self, name: &str) -> Option<Action> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, action)| *action)
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the registry before the service accepts calls
    ///
    /// Names must be unique, URL-safe, and must not collide with query routes;
    /// every action must be reachable.
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(BeefdeetsError::Registry("no actions registered".to_string()));
        }

        let mut seen = HashSet::new();
        for (name, action) in &self.entries {
            validate_action_name(name)?;
            if !seen.insert(*name) {
                return Err(BeefdeetsError::Registry(format!(
                    "action name '{}' registered twice",
                    name
                )));
            }
            debug!("Registered action '{}' -> {:?}", name, action);
        }

        for action in Action::ALL {
            if !self.entries.iter().any(|(_, bound)| *bound == action) {
                return Err(BeefdeetsError::Registry(format!(
                    "action '{}' has no registry entry",
                    action
                )));
            }
        }

        Ok(())
    }
}

/// Validate an action name (lowercase ASCII, digits and '_', starts with a letter)
fn validate_action_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BeefdeetsError::Registry("action name cannot be empty".to_string()));
    }

    if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(BeefdeetsError::Registry(format!(
            "action name '{}' must start with a lowercase letter",
            name
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(BeefdeetsError::Registry(format!(
            "action name '{}' is not URL-safe",
            name
        )));
    }

    if RESERVED_NAMES.contains(&name) {
        return Err(BeefdeetsError::Registry(format!(
            "action name '{}' collides with a query route",
            name
        )));
    }

    Ok(())
}
