//! Bounded recursive directory scanning.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::filter::AssetFilter;
use crate::node::{FileNode, FolderNode, NodeId, TreeNode};
use crate::{Result, ScanError};

/// Default limit on how many folder levels below the root are listed.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Display name used when the root path has no final component.
const FALLBACK_FOLDER_NAME: &str = "Selected Folder";

/// Scan options.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Folders deeper than this are emitted without children.
    pub max_depth: usize,
    pub filter: AssetFilter,
}

impl ScanOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_filter(mut self, filter: AssetFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            filter: AssetFilter::default(),
        }
    }
}

/// A scanned folder: its normalized path, display name and contents.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FolderListing {
    pub path: PathBuf,
    pub name: String,
    pub children: Vec<TreeNode>,
}

/// Builds [`TreeNode`] trees from directories on disk.
///
/// A scanner holds no mutable state; concurrent scans of different roots
/// from several threads are fine.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan `root` and return its children.
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> Result<Vec<TreeNode>> {
        self.scan_folder(root).map(|listing| listing.children)
    }

    /// Scan `root` and return it together with its normalized path and name.
    ///
    /// Only problems with `root` itself are errors. Subdirectories that
    /// cannot be read are kept as folders with no children.
    pub fn scan_folder<P: AsRef<Path>>(&self, root: P) -> Result<FolderListing> {
        let root = root.as_ref();
        let path = fs::canonicalize(root).map_err(|e| ScanError::from_io(root, e))?;

        let metadata = fs::metadata(&path).map_err(|e| ScanError::from_io(&path, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(path));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_FOLDER_NAME.to_string());

        let mut ctx = ScanContext {
            options: &self.options,
            next_id: 0,
        };
        let entries = read_sorted(&path).map_err(|e| ScanError::from_io(&path, e))?;
        let children = ctx.collect(entries, 0);

        info!(
            root = %path.display(),
            entries = children.len(),
            nodes = ctx.next_id,
            "scan complete"
        );

        Ok(FolderListing {
            path,
            name,
            children,
        })
    }
}

/// Scan `root` with the default filter and the given depth limit.
pub fn scan<P: AsRef<Path>>(root: P, max_depth: usize) -> Result<Vec<TreeNode>> {
    Scanner::new(ScanOptions::default().with_max_depth(max_depth)).scan(root)
}

/// Per-invocation scan state.
struct ScanContext<'a> {
    options: &'a ScanOptions,
    next_id: u64,
}

impl ScanContext<'_> {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Turn the entries of a directory at `depth` into nodes.
    fn collect(&mut self, entries: Vec<Entry>, depth: usize) -> Vec<TreeNode> {
        let mut nodes = Vec::with_capacity(entries.len());

        for entry in entries {
            if entry.is_dir {
                nodes.push(TreeNode::Folder(self.folder(entry, depth + 1)));
            } else if let Some(asset) = self.options.filter.classify(&entry.name) {
                nodes.push(TreeNode::File(FileNode {
                    id: self.next_id(),
                    name: entry.name,
                    path: entry.path,
                    asset,
                }));
            }
        }

        nodes
    }

    /// Build the node for a folder sitting at `depth` below the root.
    fn folder(&mut self, entry: Entry, depth: usize) -> FolderNode {
        let id = self.next_id();
        let is_asset_folder = self.options.filter.is_asset_folder(&entry.path);

        let (children, truncated) = if depth > self.options.max_depth {
            debug!(path = %entry.path.display(), depth, "depth limit reached");
            (Vec::new(), true)
        } else {
            match read_sorted(&entry.path) {
                Ok(entries) => {
                    debug!(path = %entry.path.display(), depth, entries = entries.len(), "scanning");
                    (self.collect(entries, depth), false)
                }
                Err(e) => {
                    warn!(path = %entry.path.display(), error = %e, "skipping unreadable folder");
                    (Vec::new(), false)
                }
            }
        };

        FolderNode {
            id,
            name: entry.name,
            path: entry.path,
            is_asset_folder,
            truncated,
            children,
        }
    }
}

struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// List a directory, sorted by name.
fn read_sorted(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            is_dir,
        });
    }

    entries.sort_by(|a, b| compare_names(&a.name, &b.name));
    Ok(entries)
}

/// Case-insensitive name order with an exact tiebreak.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::AssetKind;
    use crate::node::NodeKind;
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, b"x").expect("write");
    }

    fn names(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(TreeNode::name).collect()
    }

    #[test]
    fn test_filters_and_sorts_entries() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("walk_2.png"));
        touch(&dir.path().join("Idle.PNG"));
        touch(&dir.path().join("readme.txt"));
        touch(&dir.path().join("theme.ogg"));
        fs::create_dir(dir.path().join("bg")).expect("mkdir");

        let nodes = scan(dir.path(), DEFAULT_MAX_DEPTH).expect("scan");
        assert_eq!(names(&nodes), ["bg", "Idle.PNG", "theme.ogg", "walk_2.png"]);

        let theme = &nodes[2];
        assert!(matches!(theme, TreeNode::File(f) if f.asset == AssetKind::Audio));
    }

    #[test]
    fn test_images_only_filter() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("b.mp3"));

        let options = ScanOptions::default().with_filter(AssetFilter::images_only());
        let nodes = Scanner::new(options).scan(dir.path()).expect("scan");
        assert_eq!(names(&nodes), ["a.png"]);
    }

    #[test]
    fn test_non_image_folder_has_empty_children() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("docs/notes.txt"));
        touch(&dir.path().join("docs/deeper/data.bin"));

        let nodes = scan(dir.path(), DEFAULT_MAX_DEPTH).expect("scan");
        assert_eq!(nodes.len(), 1);
        let TreeNode::Folder(docs) = &nodes[0] else {
            panic!("expected folder");
        };
        assert!(docs.is_asset_folder);
        assert_eq!(names(&docs.children), ["deeper"]);
        assert!(docs.children[0].children().is_empty());
    }

    #[test]
    fn test_files_are_direct_children_with_asset_extensions() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("a/b/c/hero_01.png"));
        touch(&dir.path().join("a/b/skip.doc"));
        touch(&dir.path().join("a/tile.jpg"));
        touch(&dir.path().join("top.gif"));

        let listing = Scanner::default().scan_folder(dir.path()).expect("scan");

        fn check(parent: &Path, nodes: &[TreeNode]) {
            for node in nodes {
                assert_eq!(node.path().parent(), Some(parent));
                match node {
                    TreeNode::File(file) => assert!(crate::is_asset_file(&file.name)),
                    TreeNode::Folder(folder) => check(&folder.path, &folder.children),
                }
            }
        }
        check(&listing.path, &listing.children);
    }

    #[test]
    fn test_depth_limit_truncates_without_failing() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("l1/l2/l3/deep.png"));
        touch(&dir.path().join("l1/shallow.png"));

        let nodes = scan(dir.path(), 1).expect("scan");
        let TreeNode::Folder(l1) = &nodes[0] else {
            panic!("expected folder");
        };
        assert!(!l1.truncated);
        assert_eq!(names(&l1.children), ["l2", "shallow.png"]);

        let TreeNode::Folder(l2) = &l1.children[0] else {
            panic!("expected folder");
        };
        assert!(l2.truncated);
        assert!(l2.children.is_empty());
    }

    #[test]
    fn test_default_depth_lists_five_levels() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("1/2/3/4/5/five.png"));
        touch(&dir.path().join("1/2/3/4/5/6/six.png"));

        let nodes = scan(dir.path(), DEFAULT_MAX_DEPTH).expect("scan");
        let mut node = &nodes[0];
        for _ in 0..4 {
            node = &node.children()[0];
        }
        assert_eq!(node.name(), "5");
        assert_eq!(names(node.children()), ["6", "five.png"]);

        let TreeNode::Folder(six) = &node.children()[0] else {
            panic!("expected folder");
        };
        assert!(six.truncated);
        assert!(six.children.is_empty());
    }

    #[test]
    fn test_ids_unique_within_scan() {
        let dir = tempdir().expect("tempdir");
        touch(&dir.path().join("a/1.png"));
        touch(&dir.path().join("a/2.png"));
        touch(&dir.path().join("b/3.png"));

        let nodes = scan(dir.path(), DEFAULT_MAX_DEPTH).expect("scan");
        let ids: Vec<_> = nodes.iter().flat_map(TreeNode::walk).map(TreeNode::id).collect();
        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(ids.len(), 5);
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_root_errors() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("missing");
        assert!(matches!(scan(&missing, 5), Err(ScanError::NotFound(_))));

        let file = dir.path().join("file.png");
        touch(&file);
        assert!(matches!(scan(&file, 5), Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn test_listing_name_and_path() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("sprites")).expect("mkdir");

        let listing = Scanner::default()
            .scan_folder(dir.path().join("sprites").join("..").join("sprites"))
            .expect("scan");
        assert_eq!(listing.name, "sprites");
        assert!(listing.path.is_absolute());
        assert!(!listing.path.components().any(|c| c == std::path::Component::ParentDir));
    }

    #[test]
    fn test_folder_predicate_marks_folders() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("sprites")).expect("mkdir");
        fs::create_dir(dir.path().join("docs")).expect("mkdir");

        let filter = AssetFilter::default().with_folder_predicate(|p| p.ends_with("sprites"));
        let nodes = Scanner::new(ScanOptions::default().with_filter(filter))
            .scan(dir.path())
            .expect("scan");

        let flags: Vec<_> = nodes
            .iter()
            .map(|n| match n {
                TreeNode::Folder(f) => (f.name.as_str(), f.is_asset_folder),
                TreeNode::File(_) => unreachable!(),
            })
            .collect();
        assert_eq!(flags, [("docs", false), ("sprites", true)]);
        assert!(nodes.iter().all(|n| n.kind() == NodeKind::Folder));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_root_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let locked = dir.path().join("locked");
        touch(&locked.join("hidden.png"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

        let readable = fs::read_dir(&locked).is_ok();
        let result = scan(&locked, DEFAULT_MAX_DEPTH);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

        // Privileged users can read the folder anyway.
        if readable {
            assert!(result.is_ok());
        } else {
            assert!(matches!(result, Err(ScanError::PermissionDenied(_))));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subfolder_is_tolerated() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let locked = dir.path().join("locked");
        touch(&locked.join("hidden.png"));
        touch(&dir.path().join("open/visible.png"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

        // Privileged users can read the folder anyway.
        let readable = fs::read_dir(&locked).is_ok();
        let result = scan(dir.path(), DEFAULT_MAX_DEPTH);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

        let nodes = result.expect("scan");
        assert_eq!(names(&nodes), ["locked", "open"]);
        assert_eq!(names(nodes[1].children()), ["visible.png"]);
        if !readable {
            assert!(nodes[0].children().is_empty());
        }
    }
}
