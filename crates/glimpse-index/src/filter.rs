//! Asset recognition by file extension.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Image extensions recognized as previewable assets (lowercase, no dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Audio extensions recognized as playable assets (lowercase, no dot).
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "flac"];

/// Broad category of a recognized asset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AssetKind {
    Image,
    Audio,
}

impl AssetKind {
    /// Whether files of this kind can take part in frame animations.
    pub fn is_animatable(self) -> bool {
        matches!(self, AssetKind::Image)
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Audio => write!(f, "audio"),
        }
    }
}

fn lowercase_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

/// Classify a file name by its extension, case-insensitively.
pub fn asset_kind(name: &str) -> Option<AssetKind> {
    let ext = lowercase_extension(name)?;
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Image)
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(AssetKind::Audio)
    } else {
        None
    }
}

/// Returns `true` if `name` has a recognized image extension.
pub fn is_image_file(name: &str) -> bool {
    asset_kind(name) == Some(AssetKind::Image)
}

/// Returns `true` if `name` has a recognized audio extension.
pub fn is_audio_file(name: &str) -> bool {
    asset_kind(name) == Some(AssetKind::Audio)
}

/// Returns `true` if `name` is an image or audio asset.
pub fn is_asset_file(name: &str) -> bool {
    asset_kind(name).is_some()
}

type FolderPredicate = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Decides which directory entries belong in a scanned tree.
///
/// The folder predicate only sets [`FolderNode::is_asset_folder`]; folders
/// are always descended into regardless of its answer.
///
/// [`FolderNode::is_asset_folder`]: crate::FolderNode::is_asset_folder
#[derive(Clone)]
pub struct AssetFilter {
    include_audio: bool,
    folder_predicate: FolderPredicate,
}

impl AssetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Images only; audio files are dropped from the tree.
    pub fn images_only() -> Self {
        Self::default().with_audio(false)
    }

    pub fn with_audio(mut self, include_audio: bool) -> Self {
        self.include_audio = include_audio;
        self
    }

    /// Replace the asset-folder predicate.
    pub fn with_folder_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.folder_predicate = Arc::new(predicate);
        self
    }

    pub fn includes_audio(&self) -> bool {
        self.include_audio
    }

    /// Kind of `name` if this filter admits it.
    pub fn classify(&self, name: &str) -> Option<AssetKind> {
        match asset_kind(name)? {
            AssetKind::Audio if !self.include_audio => None,
            kind => Some(kind),
        }
    }

    pub fn is_asset_file(&self, name: &str) -> bool {
        self.classify(name).is_some()
    }

    pub fn is_asset_folder(&self, path: &Path) -> bool {
        (self.folder_predicate)(path)
    }
}

impl Default for AssetFilter {
    fn default() -> Self {
        Self {
            include_audio: true,
            folder_predicate: Arc::new(|_| true),
        }
    }
}

impl fmt::Debug for AssetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetFilter")
            .field("include_audio", &self.include_audio)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions_case_insensitive() {
        assert!(is_image_file("hero.png"));
        assert!(is_image_file("HERO.PNG"));
        assert!(is_image_file("photo.JpEg"));
        assert!(is_image_file("icon.svg"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("png"));
    }

    #[test]
    fn test_audio_is_asset_but_not_image() {
        assert!(is_audio_file("theme.OGG"));
        assert!(is_asset_file("theme.flac"));
        assert!(!is_image_file("theme.mp3"));
        assert!(!AssetKind::Audio.is_animatable());
        assert!(AssetKind::Image.is_animatable());
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(asset_kind("Makefile"), None);
        assert_eq!(asset_kind(".png"), None);
    }

    #[test]
    fn test_images_only_filter_drops_audio() {
        let filter = AssetFilter::images_only();
        assert!(filter.is_asset_file("a.webp"));
        assert!(!filter.is_asset_file("a.wav"));
        assert!(AssetFilter::default().is_asset_file("a.wav"));
    }

    #[test]
    fn test_folder_predicate() {
        let filter = AssetFilter::default();
        assert!(filter.is_asset_folder(Path::new("/anything")));

        let filter = filter.with_folder_predicate(|p| p.ends_with("sprites"));
        assert!(filter.is_asset_folder(Path::new("/game/sprites")));
        assert!(!filter.is_asset_folder(Path::new("/game/docs")));
    }
}
