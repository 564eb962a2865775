//! Frame animation resolution for Glimpse.
//!
//! Given a selected image, this crate decides whether it is part of an
//! animation and produces the frames to play:
//!
//! - [`parse_base_name`] / [`find_sequence`] - Numbered file sequences (`walk_01.png`, `walk_02.png`, ...)
//! - [`detect_frames`] - Uniform sprite-sheet slicing into [`SheetFrame`] rectangles
//! - [`resolve_animation`] - Classifies a selection, sprite sheets first
//! - [`FrameController`] - Playback state machine driven by a cancellable [`Ticker`]
//!
//! # Example
//!
//! ```
//! use glimpse_anim::{find_sequence, parse_base_name};
//!
//! let parsed = parse_base_name("walk_01.png");
//! assert_eq!(parsed.number, Some(1));
//!
//! let frames = find_sequence(["walk_2.png", "walk_10.png", "walk_1.png"], &parsed.base, &parsed.extension);
//! let names: Vec<_> = frames.iter().map(|f| f.name.as_str()).collect();
//! assert_eq!(names, ["walk_1.png", "walk_2.png", "walk_10.png"]);
//! ```

mod controller;
mod error;
mod frame;
mod resolve;
mod sequence;
mod sheet;
mod ticker;

pub use controller::{FrameController, PlaybackConfig, PlaybackState, DEFAULT_FPS, MAX_FPS, MIN_FPS};
pub use error::{Error, Result};
pub use frame::{AnimationSet, FileFrame, FrameDescriptor, FrameSet, SheetFrame};
pub use resolve::{classify, resolve_animation, Selection};
pub use sequence::{find_sequence, parse_base_name, ParsedName, SequenceMatcher};
pub use sheet::{detect_frames, is_sprite_sheet_name, SheetGrid, SHEET_NAME_HINTS};
pub use ticker::{Tick, Ticker};
