//! Scanned tree model.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::filter::AssetKind;

/// Identifier of a node, unique within the scan that produced it.
///
/// Ids restart with every scan and must not be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminant of a [`TreeNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File,
}

/// A directory inside the scanned subtree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FolderNode {
    pub id: NodeId,
    pub name: String,
    pub path: PathBuf,
    pub is_asset_folder: bool,
    /// Set when the depth limit stopped the scan at this folder.
    pub truncated: bool,
    pub children: Vec<TreeNode>,
}

/// An asset file inside the scanned subtree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileNode {
    pub id: NodeId,
    pub name: String,
    pub path: PathBuf,
    pub asset: AssetKind,
}

/// One entry of a scanned tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum TreeNode {
    Folder(FolderNode),
    File(FileNode),
}

impl TreeNode {
    pub fn id(&self) -> NodeId {
        match self {
            TreeNode::Folder(folder) => folder.id,
            TreeNode::File(file) => file.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder(folder) => &folder.name,
            TreeNode::File(file) => &file.name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TreeNode::Folder(folder) => &folder.path,
            TreeNode::File(file) => &file.path,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            TreeNode::Folder(_) => NodeKind::Folder,
            TreeNode::File(_) => NodeKind::File,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder(_))
    }

    /// Children of a folder; always empty for files.
    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Folder(folder) => &folder.children,
            TreeNode::File(_) => &[],
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(TreeNode::count).sum::<usize>()
    }

    /// Depth of this subtree; a file or empty folder has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Pre-order traversal of this subtree.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// Pre-order iterator returned by [`TreeNode::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: u64, name: &str) -> TreeNode {
        TreeNode::File(FileNode {
            id: NodeId(id),
            name: name.to_string(),
            path: PathBuf::from("/root").join(name),
            asset: AssetKind::Image,
        })
    }

    fn folder(id: u64, name: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode::Folder(FolderNode {
            id: NodeId(id),
            name: name.to_string(),
            path: PathBuf::from("/root").join(name),
            is_asset_folder: true,
            truncated: false,
            children,
        })
    }

    #[test]
    fn test_file_has_no_children() {
        let node = file(0, "a.png");
        assert!(node.children().is_empty());
        assert_eq!(node.kind(), NodeKind::File);
        assert_eq!(node.count(), 1);
        assert_eq!(node.depth(), 1);
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = folder(
            0,
            "root",
            vec![folder(1, "a", vec![file(2, "a1.png")]), file(3, "b.png")],
        );

        let names: Vec<_> = tree.walk().map(TreeNode::name).collect();
        assert_eq!(names, ["root", "a", "a1.png", "b.png"]);
        assert_eq!(tree.count(), 4);
        assert_eq!(tree.depth(), 3);
    }
}
