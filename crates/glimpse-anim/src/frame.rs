//! Frame types shared by sequences and sprite sheets.

use std::path::PathBuf;

/// One file of a numbered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileFrame {
    pub path: PathBuf,
    pub name: String,
}

/// A cell of a sprite sheet, in source-pixel coordinates.
///
/// Coordinates are not rounded; cells of sheets whose size is not a
/// multiple of the grid start at fractional offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Borrowed view of a single frame of either kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameDescriptor<'a> {
    File(&'a FileFrame),
    Sheet(&'a SheetFrame),
}

/// The frames of one animation. A set never mixes files and sheet cells.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "frames", rename_all = "lowercase"))]
pub enum FrameSet {
    Files(Vec<FileFrame>),
    Sheet(Vec<SheetFrame>),
}

impl FrameSet {
    pub fn len(&self) -> usize {
        match self {
            FrameSet::Files(frames) => frames.len(),
            FrameSet::Sheet(frames) => frames.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<FrameDescriptor<'_>> {
        match self {
            FrameSet::Files(frames) => frames.get(index).map(FrameDescriptor::File),
            FrameSet::Sheet(frames) => frames.get(index).map(FrameDescriptor::Sheet),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = FrameDescriptor<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

/// Frames plus the playback position. The rate belongs to the controller.
///
/// The current index is always valid for a non-empty set and absent for
/// an empty one.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSet {
    frames: FrameSet,
    current: usize,
    playing: bool,
}

impl AnimationSet {
    pub fn new(frames: FrameSet) -> Self {
        Self {
            frames,
            current: 0,
            playing: false,
        }
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.current)
    }

    pub fn current_frame(&self) -> Option<FrameDescriptor<'_>> {
        self.frames.get(self.current)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub(crate) fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Step forward with wrap-around. Returns `false` for an empty set.
    pub fn advance(&mut self) -> bool {
        let len = self.len();
        if len == 0 {
            return false;
        }
        self.current = (self.current + 1) % len;
        true
    }

    /// Step backward with wrap-around. Returns `false` for an empty set.
    pub fn retreat(&mut self) -> bool {
        let len = self.len();
        if len == 0 {
            return false;
        }
        self.current = (self.current + len - 1) % len;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(n: usize) -> FrameSet {
        FrameSet::Files(
            (0..n)
                .map(|i| FileFrame {
                    path: PathBuf::from(format!("f{i}.png")),
                    name: format!("f{i}.png"),
                })
                .collect(),
        )
    }

    #[test]
    fn test_advance_and_retreat_wrap() {
        let mut set = AnimationSet::new(files(3));
        assert_eq!(set.current_index(), Some(0));
        assert!(set.retreat());
        assert_eq!(set.current_index(), Some(2));
        assert!(set.advance());
        assert!(set.advance());
        assert_eq!(set.current_index(), Some(1));
    }

    #[test]
    fn test_empty_set_has_no_index() {
        let mut set = AnimationSet::new(FrameSet::Sheet(Vec::new()));
        assert_eq!(set.current_index(), None);
        assert!(set.current_frame().is_none());
        assert!(!set.advance());
        assert!(!set.retreat());
    }

    #[test]
    fn test_descriptor_variant_matches_set() {
        let set = files(2);
        assert!(set.iter().all(|f| matches!(f, FrameDescriptor::File(_))));
        assert_eq!(set.iter().count(), 2);
    }
}
