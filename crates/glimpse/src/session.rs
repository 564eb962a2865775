//! One browsing session: the scanned folder and the previewed file.
//!
//! Scans run on background threads and report back over a channel. Every
//! scan request gets a fresh [`RequestToken`]; results for anything but the
//! most recent request are dropped, so a slow scan of a folder the user has
//! already left can never overwrite a newer one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use glimpse_anim::{resolve_animation, FrameController, PlaybackConfig, SheetGrid};
use glimpse_index::{
    flatten_assets, sort_assets, AssetEntry, FolderListing, ScanError, ScanOptions, Scanner,
    SortDirection, SortKey,
};

use crate::Result;

/// Identifies one scan request. Later requests have larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scan#{}", self.0)
    }
}

/// Session settings.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub scan: ScanOptions,
    pub grid: SheetGrid,
    pub playback: PlaybackConfig,
    pub sort: SortDirection,
}

/// A scan result that was accepted by the session.
#[derive(Debug)]
pub enum SessionUpdate {
    Scanned { token: RequestToken, assets: usize },
    ScanFailed { token: RequestToken, error: ScanError },
}

impl SessionUpdate {
    pub fn token(&self) -> RequestToken {
        match self {
            SessionUpdate::Scanned { token, .. } | SessionUpdate::ScanFailed { token, .. } => *token,
        }
    }
}

/// Messages from scan workers.
#[derive(Debug)]
struct ScanFinished {
    token: RequestToken,
    result: std::result::Result<FolderListing, ScanError>,
}

#[derive(Debug, Clone)]
struct PreviewSelection {
    path: PathBuf,
    image_size: Option<(u32, u32)>,
}

/// Folder and preview state for one browser window.
pub struct Session {
    scanner: Scanner,
    grid: SheetGrid,
    sort: SortDirection,
    latest: u64,
    pending: bool,
    worker_tx: Sender<ScanFinished>,
    worker_rx: Receiver<ScanFinished>,
    listing: Option<FolderListing>,
    assets: Vec<AssetEntry>,
    selection: Option<PreviewSelection>,
    controller: FrameController,
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        let (worker_tx, worker_rx) = crossbeam_channel::unbounded();
        Self {
            scanner: Scanner::new(options.scan),
            grid: options.grid,
            sort: options.sort,
            latest: 0,
            pending: false,
            worker_tx,
            worker_rx,
            listing: None,
            assets: Vec::new(),
            selection: None,
            controller: FrameController::new(options.playback),
        }
    }

    /// Start scanning `root` in the background.
    ///
    /// Any scan still running for an earlier request is left to finish; its
    /// result will be discarded.
    pub fn request_scan<P: AsRef<Path>>(&mut self, root: P) -> RequestToken {
        self.latest += 1;
        self.pending = true;
        let token = RequestToken(self.latest);

        let root = root.as_ref().to_path_buf();
        let job_root = root.clone();
        let scanner = self.scanner.clone();
        let sender = self.worker_tx.clone();
        debug!(%token, root = %root.display(), "scan requested");

        let spawned = thread::Builder::new()
            .name(format!("glimpse-{token}"))
            .spawn(move || {
                let result = scanner.scan_folder(&job_root);
                sender.send(ScanFinished { token, result }).ok();
            });

        if let Err(e) = spawned {
            warn!(%token, error = %e, "failed to start scan thread, scanning inline");
            let result = self.scanner.scan_folder(&root);
            self.worker_tx.send(ScanFinished { token, result }).ok();
        }

        token
    }

    /// The most recently issued token, if any scan was requested.
    pub fn latest_token(&self) -> Option<RequestToken> {
        (self.latest > 0).then_some(RequestToken(self.latest))
    }

    /// Whether the latest request has not reported back yet.
    pub fn is_scanning(&self) -> bool {
        self.pending
    }

    /// Apply finished scans without blocking.
    pub fn poll(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(message) = self.worker_rx.try_recv() {
            updates.extend(self.apply(message));
        }
        updates
    }

    /// Block until the latest request finishes or `timeout` passes.
    pub fn wait_scan(&mut self, timeout: Duration) -> Option<SessionUpdate> {
        let deadline = Instant::now() + timeout;
        while self.pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.worker_rx.recv_timeout(remaining) {
                Ok(message) => {
                    if let Some(update) = self.apply(message) {
                        return Some(update);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
        None
    }

    fn apply(&mut self, message: ScanFinished) -> Option<SessionUpdate> {
        let ScanFinished { token, result } = message;
        if token.0 != self.latest {
            debug!(%token, latest = self.latest, "discarding stale scan");
            return None;
        }

        self.pending = false;
        self.deselect();

        match result {
            Ok(listing) => {
                let mut assets = flatten_assets(&listing.children);
                sort_assets(&mut assets, SortKey::Name, self.sort);
                info!(%token, root = %listing.path.display(), assets = assets.len(), "folder loaded");

                let count = assets.len();
                self.assets = assets;
                self.listing = Some(listing);
                Some(SessionUpdate::Scanned { token, assets: count })
            }
            Err(error) => {
                warn!(%token, %error, "scan failed");
                self.assets.clear();
                self.listing = None;
                Some(SessionUpdate::ScanFailed { token, error })
            }
        }
    }

    pub fn listing(&self) -> Option<&FolderListing> {
        self.listing.as_ref()
    }

    /// Files of the current folder, flattened and sorted by name.
    pub fn assets(&self) -> &[AssetEntry] {
        &self.assets
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.sort = direction;
        sort_assets(&mut self.assets, SortKey::Name, direction);
    }

    pub fn grid(&self) -> SheetGrid {
        self.grid
    }

    /// Preview `path`, loading its animation if it has one.
    ///
    /// `image_size` is the decoded pixel size, needed to slice sprite
    /// sheets. Returns whether an animation was loaded.
    pub fn select<P: Into<PathBuf>>(&mut self, path: P, image_size: Option<(u32, u32)>) -> Result<bool> {
        let path = path.into();
        let frames = resolve_animation(&path, image_size, self.grid)?;
        self.selection = Some(PreviewSelection { path, image_size });

        match frames {
            Some(frames) => {
                self.controller.load(frames);
                Ok(true)
            }
            None => {
                self.controller.unload();
                Ok(false)
            }
        }
    }

    /// Supply the image size of the current selection once it is known.
    pub fn set_image_size(&mut self, width: u32, height: u32) -> Result<bool> {
        let Some(path) = self.selected_path().map(Path::to_path_buf) else {
            return Ok(false);
        };
        self.select(path, Some((width, height)))
    }

    /// Change the sprite-sheet grid, re-slicing the current selection.
    pub fn set_grid(&mut self, grid: SheetGrid) -> Result<()> {
        let frames = match &self.selection {
            Some(selection) => resolve_animation(&selection.path, selection.image_size, grid)?,
            None => None,
        };

        self.grid = grid;
        if let Some(frames) = frames {
            self.controller.reload(frames);
        }
        Ok(())
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selection.as_ref().map(|s| s.path.as_path())
    }

    pub fn deselect(&mut self) {
        self.selection = None;
        self.controller.unload();
    }

    pub fn controller(&self) -> &FrameController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FrameController {
        &mut self.controller
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("latest", &self.latest)
            .field("pending", &self.pending)
            .field("root", &self.listing.as_ref().map(|l| &l.path))
            .field("assets", &self.assets.len())
            .field("selection", &self.selected_path())
            .field("controller", &self.controller)
            .finish()
    }
}
