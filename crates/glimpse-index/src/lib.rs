//! Asset folder indexing for Glimpse.
//!
//! This crate turns a directory on disk into a typed tree of folders and asset
//! files that a browser can display:
//!
//! - [`AssetFilter`] - Decides which files are assets and which folders are asset folders
//! - [`Scanner`] - Bounded recursive directory scanning into [`TreeNode`]s
//! - [`flatten_assets`] / [`sort_assets`] / [`AssetCursor`] - Flat asset lists for grid views
//!
//! # Example
//!
//! ```no_run
//! use glimpse_index::{flatten_assets, Scanner, ScanOptions};
//!
//! let listing = Scanner::new(ScanOptions::default()).scan_folder("assets")?;
//! println!("{}: {} top-level entries", listing.name, listing.children.len());
//!
//! for asset in flatten_assets(&listing.children) {
//!     println!("{}", asset.path.display());
//! }
//! # Ok::<(), glimpse_index::ScanError>(())
//! ```

mod assets;
mod error;
mod filter;
mod node;
mod scanner;

pub use assets::{flatten_assets, sort_assets, AssetCursor, AssetEntry, SortDirection, SortKey};
pub use error::{Result, ScanError};
pub use filter::{
    asset_kind, is_asset_file, is_audio_file, is_image_file, AssetFilter, AssetKind,
    AUDIO_EXTENSIONS, IMAGE_EXTENSIONS,
};
pub use node::{FileNode, FolderNode, NodeId, NodeKind, TreeNode, Walk};
pub use scanner::{scan, FolderListing, ScanOptions, Scanner, DEFAULT_MAX_DEPTH};
