//! Glimpse - asset folder browsing and frame animation preview.
//!
//! This crate provides a unified interface to the Glimpse library crates.
//!
//! # Crates
//!
//! - [`glimpse_index`] - Asset filtering and bounded folder scanning
//! - [`glimpse_anim`] - Sequence detection, sprite-sheet slicing and playback
//!
//! On top of those, [`Session`] ties one folder selection and one preview
//! selection together the way a browser window uses them.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use glimpse::prelude::*;
//!
//! let mut session = Session::new(SessionOptions::default());
//! session.request_scan("assets");
//!
//! if let Some(SessionUpdate::Scanned { assets, .. }) = session.wait_scan(Duration::from_secs(10)) {
//!     println!("{assets} assets");
//! }
//!
//! if session.select("assets/walk_01.png", None)? {
//!     session.controller_mut().play();
//! }
//! # Ok::<(), glimpse::Error>(())
//! ```

mod error;
mod session;

pub use glimpse_anim as anim;
pub use glimpse_index as index;

pub use error::{Error, Result};
pub use session::{RequestToken, Session, SessionOptions, SessionUpdate};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use glimpse_anim::{
        detect_frames, find_sequence, parse_base_name, resolve_animation, FrameController,
        FrameDescriptor, FrameSet, PlaybackConfig, PlaybackState, SheetGrid,
    };
    pub use glimpse_index::{
        flatten_assets, scan, AssetEntry, AssetFilter, AssetKind, FolderListing, ScanOptions,
        Scanner, TreeNode,
    };

    pub use crate::{RequestToken, Session, SessionOptions, SessionUpdate};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
