//! Album art lookup
//!
//! Art embedded in the track's tags wins; otherwise a sidecar image next to
//! the track file is used.

use lofty::file::TaggedFileExt;
use lofty::picture::PictureType;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Sidecar image names tried, in order, when no art is embedded
pub const DEFAULT_COVER_FILE_NAMES: [&str; 5] = [
    "cover.jpg",
    "folder.jpg",
    "front.jpg",
    "cover.png",
    "folder.png",
];

/// Album art for the current track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumCover {
    /// Raw image bytes
    pub data: Vec<u8>,
    /// MIME type sniffed from the image header
    pub mime_type: &'static str,
}

impl AlbumCover {
    /// Wrap raw image bytes, sniffing their MIME type
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mime_type = sniff_mime_type(&data);
        Self { data, mime_type }
    }
}

/// Find album art for the track at `track`
///
/// Returns `None` when the track file does not exist locally (streams) or
/// carries no readable art. Unreadable tags and sidecar files are skipped.
pub fn find_cover(track: &Path, file_names: &[String]) -> Option<AlbumCover> {
    if !track.is_file() {
        debug!("Track {:?} is not a local file, no cover", track);
        return None;
    }

    embedded_cover(track).or_else(|| sidecar_cover(track.parent()?, file_names))
}

fn embedded_cover(track: &Path) -> Option<AlbumCover> {
    let tagged_file = match lofty::read_from_path(track) {
        Ok(file) => file,
        Err(e) => {
            debug!("Could not read tags from {:?}: {}", track, e);
            return None;
        }
    };

    let pictures: Vec<_> = tagged_file
        .tags()
        .iter()
        .flat_map(|tag| tag.pictures())
        .collect();

    pictures
        .iter()
        .find(|picture| picture.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .filter(|picture| !picture.data().is_empty())
        .map(|picture| AlbumCover::from_bytes(picture.data().to_vec()))
}

fn sidecar_cover(dir: &Path, file_names: &[String]) -> Option<AlbumCover> {
    for name in file_names {
        let candidate = dir.join(name);
        match std::fs::read(&candidate) {
            Ok(data) if !data.is_empty() => {
                debug!("Using sidecar cover {:?}", candidate);
                return Some(AlbumCover::from_bytes(data));
            }
            Ok(_) => continue,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                warn!("Skipping unreadable cover {:?}: {}", candidate, e);
                continue;
            }
        }
    }
    None
}

fn sniff_mime_type(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if data.starts_with(b"GIF8") {
        "image/gif"
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}
