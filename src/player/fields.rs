//! Track metadata fields and now-playing snapshots
//!
//! Each [`TrackField`] maps to a DeaDBeeF title-format expression. A snapshot
//! query asks the player for all requested fields in one round-trip; the
//! expressions are joined with the ASCII unit separator and prefixed with the
//! record separator so that "no track" output can be told apart from a track
//! whose only requested value happens to look like the player's idle reply.

use super::AdapterError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Prefix written before the first value of a snapshot.
pub(crate) const RECORD_MARKER: char = '\u{1e}';

/// Separator written between snapshot values.
pub(crate) const FIELD_SEPARATOR: char = '\u{1f}';

/// Fields returned by the service when the caller does not ask for any.
pub const DEFAULT_FIELDS: [TrackField; 5] = [
    TrackField::Artist,
    TrackField::Title,
    TrackField::Album,
    TrackField::PlaybackPos,
    TrackField::Length,
];

/// Metadata key describing the current track
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackField {
    /// Track artist
    Artist,
    /// Track title
    Title,
    /// Album name
    Album,
    /// Album artist
    AlbumArtist,
    /// Genre
    Genre,
    /// Release year or date, as tagged
    Year,
    /// Track number, as tagged (may be "3/12")
    TrackNumber,
    /// Location of the track file
    Path,
    /// Playback position in seconds
    PlaybackPos,
    /// Track length in seconds
    Length,
    /// Bitrate in kbps
    Bitrate,
    /// Sample rate in Hz
    Samplerate,
    /// Codec name
    Codec,
}

/// Whether a field carries text or a number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form string
    Text,
    /// Floating point number
    Numeric,
}

impl TrackField {
    /// Every supported field, in declaration order
    pub const ALL: [TrackField; 13] = [
        TrackField::Artist,
        TrackField::Title,
        TrackField::Album,
        TrackField::AlbumArtist,
        TrackField::Genre,
        TrackField::Year,
        TrackField::TrackNumber,
        TrackField::Path,
        TrackField::PlaybackPos,
        TrackField::Length,
        TrackField::Bitrate,
        TrackField::Samplerate,
        TrackField::Codec,
    ];

    /// Stable external name of the field
    pub fn name(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Title => "title",
            Self::Album => "album",
            Self::AlbumArtist => "album_artist",
            Self::Genre => "genre",
            Self::Year => "year",
            Self::TrackNumber => "track_number",
            Self::Path => "path",
            Self::PlaybackPos => "playback_pos",
            Self::Length => "length",
            Self::Bitrate => "bitrate",
            Self::Samplerate => "samplerate",
            Self::Codec => "codec",
        }
    }

    /// Title-format expression understood by the player
    pub fn title_format(self) -> &'static str {
        match self {
            Self::Artist => "%artist%",
            Self::Title => "%title%",
            Self::Album => "%album%",
            Self::AlbumArtist => "%album artist%",
            Self::Genre => "%genre%",
            Self::Year => "%year%",
            Self::TrackNumber => "%tracknumber%",
            Self::Path => "%path%",
            Self::PlaybackPos => "%playback_time_seconds%",
            Self::Length => "%length_seconds%",
            Self::Bitrate => "%bitrate%",
            Self::Samplerate => "%samplerate%",
            Self::Codec => "%codec%",
        }
    }

    /// Value kind of the field
    pub fn kind(self) -> FieldKind {
        match self {
            Self::PlaybackPos | Self::Length | Self::Bitrate | Self::Samplerate => {
                FieldKind::Numeric
            }
            _ => FieldKind::Text,
        }
    }

    /// Value reported when no track is active: `0` for numbers, `""` for text
    pub fn no_track_value(self) -> FieldValue {
        match self.kind() {
            FieldKind::Numeric => FieldValue::Number(0.0),
            FieldKind::Text => FieldValue::Text(String::new()),
        }
    }

    /// Convert a raw value reported by the player
    ///
    /// Numeric fields that do not parse fall back to the no-track value.
    pub fn parse_value(self, raw: &str) -> FieldValue {
        match self.kind() {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Numeric => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number)
                .unwrap_or_else(|| self.no_track_value()),
        }
    }
}

impl fmt::Display for TrackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrackField {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| AdapterError::FieldUnsupported(wanted.to_string()))
    }
}

/// Value of a single metadata field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl FieldValue {
    /// Text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Numeric content, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Keyed now-playing snapshot
///
/// The key set is exactly the set of requested fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NowPlaying {
    values: BTreeMap<TrackField, FieldValue>,
}

impl NowPlaying {
    /// Build a snapshot from fields and positionally aligned values
    pub fn from_values(fields: &[TrackField], values: Vec<FieldValue>) -> Self {
        Self {
            values: fields.iter().copied().zip(values).collect(),
        }
    }

    /// Value for a field, if it was requested
    pub fn get(&self, field: TrackField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Text for a field, or `""` when absent or numeric
    pub fn text(&self, field: TrackField) -> &str {
        self.get(field).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Number of fields in the snapshot
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no fields were requested
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over fields and their values
    pub fn iter(&self) -> impl Iterator<Item = (TrackField, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }
}

/// Build the title-format query for a list of fields
///
/// Text fields are wrapped in `$replace` so a tag value can never contain
/// the separator and shift the values that follow it.
pub(crate) fn snapshot_format(fields: &[TrackField]) -> String {
    let mut format = String::new();
    format.push(RECORD_MARKER);
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            format.push(FIELD_SEPARATOR);
        }
        match field.kind() {
            FieldKind::Text => {
                format.push_str("$replace(");
                format.push_str(field.title_format());
                format.push(',');
                format.push(FIELD_SEPARATOR);
                format.push_str(",)");
            }
            FieldKind::Numeric => format.push_str(field.title_format()),
        }
    }
    format
}

/// Parse the player's reply to a snapshot query
///
/// Output without the record marker (the player prints `nothing` when idle)
/// means no track is active and yields the no-track values.
pub(crate) fn parse_snapshot(
    fields: &[TrackField],
    output: &str,
) -> Result<Vec<FieldValue>, AdapterError> {
    let output = output.trim_end_matches(['\r', '\n']);

    let Some(start) = output.find(RECORD_MARKER) else {
        return Ok(fields.iter().map(|f| f.no_track_value()).collect());
    };
    let record = &output[start + RECORD_MARKER.len_utf8()..];

    let raw: Vec<&str> = if fields.is_empty() {
        Vec::new()
    } else {
        record.split(FIELD_SEPARATOR).collect()
    };

    if raw.len() != fields.len() {
        return Err(AdapterError::Unavailable(format!(
            "malformed now-playing reply: expected {} values, got {}",
            fields.len(),
            raw.len()
        )));
    }

    Ok(fields
        .iter()
        .zip(raw)
        .map(|(field, value)| field.parse_value(value))
        .collect())
}
