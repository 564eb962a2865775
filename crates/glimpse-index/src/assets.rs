//! Flat asset lists for grid views.

use std::path::PathBuf;

use crate::filter::AssetKind;
use crate::node::{NodeId, TreeNode};

/// A file asset lifted out of the tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetEntry {
    pub id: NodeId,
    pub name: String,
    pub path: PathBuf,
    pub kind: AssetKind,
}

/// Collect every file in `nodes`, depth-first, in tree order.
pub fn flatten_assets(nodes: &[TreeNode]) -> Vec<AssetEntry> {
    nodes
        .iter()
        .flat_map(TreeNode::walk)
        .filter_map(|node| match node {
            TreeNode::File(file) => Some(AssetEntry {
                id: file.id,
                name: file.name.clone(),
                path: file.path.clone(),
                kind: file.asset,
            }),
            TreeNode::Folder(_) => None,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Stable sort of `assets` by `key`.
pub fn sort_assets(assets: &mut [AssetEntry], key: SortKey, direction: SortDirection) {
    match key {
        SortKey::Name => assets.sort_by(|a, b| {
            let order = a.name.to_lowercase().cmp(&b.name.to_lowercase());
            match direction {
                SortDirection::Ascending => order,
                SortDirection::Descending => order.reverse(),
            }
        }),
    }
}

/// Keyboard-style selection over a grid of `len` items.
///
/// Moves clamp at the first and last item instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetCursor {
    len: usize,
    index: Option<usize>,
}

impl AssetCursor {
    pub fn new(len: usize) -> Self {
        Self { len, index: None }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Select `index` directly; out-of-range indices clear the selection.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        self.index = (index < self.len).then_some(index);
        self.index
    }

    pub fn next(&mut self) -> Option<usize> {
        self.step(|i, last| (i + 1).min(last))
    }

    pub fn previous(&mut self) -> Option<usize> {
        self.step(|i, _| i.saturating_sub(1))
    }

    /// Move one row down in a grid with `per_row` items per row.
    pub fn down(&mut self, per_row: usize) -> Option<usize> {
        self.step(|i, last| (i + per_row.max(1)).min(last))
    }

    pub fn up(&mut self, per_row: usize) -> Option<usize> {
        self.step(|i, _| i.saturating_sub(per_row.max(1)))
    }

    fn step(&mut self, f: impl FnOnce(usize, usize) -> usize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let current = self.index.unwrap_or(0);
        self.index = Some(f(current, self.len - 1));
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{FileNode, FolderNode};

    fn file(id: u64, name: &str) -> TreeNode {
        TreeNode::File(FileNode {
            id: NodeId(id),
            name: name.to_string(),
            path: PathBuf::from(name),
            asset: AssetKind::Image,
        })
    }

    fn tree() -> Vec<TreeNode> {
        vec![
            TreeNode::Folder(FolderNode {
                id: NodeId(0),
                name: "chars".into(),
                path: PathBuf::from("chars"),
                is_asset_folder: true,
                truncated: false,
                children: vec![file(1, "b.png"), file(2, "Z.png")],
            }),
            file(3, "a.png"),
        ]
    }

    #[test]
    fn test_flatten_skips_folders() {
        let assets = flatten_assets(&tree());
        let names: Vec<_> = assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["b.png", "Z.png", "a.png"]);
    }

    #[test]
    fn test_sort_by_name() {
        let mut assets = flatten_assets(&tree());
        sort_assets(&mut assets, SortKey::Name, SortDirection::Ascending);
        let names: Vec<_> = assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png", "Z.png"]);

        sort_assets(&mut assets, SortKey::Name, SortDirection::Ascending.toggled());
        let names: Vec<_> = assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Z.png", "b.png", "a.png"]);
    }

    #[test]
    fn test_cursor_clamps() {
        let mut cursor = AssetCursor::new(5);
        assert_eq!(cursor.index(), None);
        assert_eq!(cursor.previous(), Some(0));
        assert_eq!(cursor.select(4), Some(4));
        assert_eq!(cursor.next(), Some(4));
        assert_eq!(cursor.up(3), Some(1));
        assert_eq!(cursor.up(3), Some(0));
        assert_eq!(cursor.down(3), Some(3));
        assert_eq!(cursor.down(3), Some(4));
        assert_eq!(cursor.select(9), None);
    }

    #[test]
    fn test_cursor_empty() {
        let mut cursor = AssetCursor::new(0);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.down(4), None);
    }
}
