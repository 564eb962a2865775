//! Deciding what kind of animation a selected file belongs to.

use std::fs;
use std::path::{Path, PathBuf};

use glimpse_index::{is_audio_file, is_image_file};
use tracing::{debug, warn};

use crate::frame::FrameSet;
use crate::sequence::{find_sequence, parse_base_name, ParsedName};
use crate::sheet::{is_sprite_sheet_name, SheetGrid};
use crate::Result;

/// How a selected file should be previewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The name marks a sprite sheet; it is sliced once its size is known.
    SpriteSheet,
    /// A numbered image that may have sibling frames.
    SequenceCandidate(ParsedName),
    Audio,
    /// A plain image, or anything else that is not animated.
    Still,
}

/// Classify a file by name alone. Sprite-sheet names win over numbering.
pub fn classify(name: &str) -> Selection {
    if is_audio_file(name) {
        return Selection::Audio;
    }
    if !is_image_file(name) {
        return Selection::Still;
    }
    if is_sprite_sheet_name(name) {
        return Selection::SpriteSheet;
    }

    let parsed = parse_base_name(name);
    if parsed.number.is_some() {
        Selection::SequenceCandidate(parsed)
    } else {
        Selection::Still
    }
}

/// Produce the frames to animate for the file at `path`.
///
/// Sprite sheets need `image_size` (width, height) and are sliced with
/// `grid`; without a size they resolve to `None` until the caller knows it.
/// Numbered images are matched against the files in their directory.
/// Only an invalid grid is an error.
pub fn resolve_animation(
    path: &Path,
    image_size: Option<(u32, u32)>,
    grid: SheetGrid,
) -> Result<Option<FrameSet>> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };

    match classify(name) {
        Selection::SpriteSheet => match image_size {
            Some((width, height)) => {
                let frames = grid.frames(width, height)?;
                debug!(%name, %grid, frames = frames.len(), "sprite sheet");
                Ok(Some(FrameSet::Sheet(frames)))
            }
            None => {
                debug!(%name, "sprite sheet waiting for image size");
                Ok(None)
            }
        },
        Selection::SequenceCandidate(parsed) => {
            let frames = find_sequence(siblings(path), &parsed.base, &parsed.extension);
            if frames.is_empty() {
                debug!(%name, "no sequence");
                Ok(None)
            } else {
                debug!(%name, base = %parsed.base, frames = frames.len(), "sequence");
                Ok(Some(FrameSet::Files(frames)))
            }
        }
        Selection::Audio | Selection::Still => Ok(None),
    }
}

/// Non-directory entries next to `path`. An unreadable directory yields none.
fn siblings(path: &Path) -> Vec<PathBuf> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list sequence siblings");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect()
}
