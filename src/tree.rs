//! The aggregated size tree
//!
//! A [`Node`] is the only entity in the system: one file or directory with
//! its subtree totals. Both the serial walker and the parallel scanner
//! construct directory nodes through [`Node::directory`], which applies the
//! [`aggregate`] fold, so totals cannot diverge between the two paths.

use std::collections::HashMap;
use std::path::PathBuf;

/// One file or directory with its aggregated subtree totals.
///
/// Constructed exactly once by the walker that owns its subtree, never
/// mutated afterwards, and owned outright by its parent (or, for the root,
/// by the caller of the scan).
#[derive(Debug, Clone)]
pub struct Node {
    /// Filesystem path identifying this entry
    pub path: PathBuf,

    /// Own byte size for a file; sum of all descendant file sizes for a
    /// directory (never includes metadata overhead)
    pub size: u64,

    /// 1 for a file; sum of children's counts for a directory
    pub file_count: u64,

    /// File/Directory tag
    pub is_file: bool,

    /// Children keyed by base name. Key order is meaningless; sorting is a
    /// render-time concern.
    pub children: HashMap<String, Node>,
}

impl Node {
    /// Leaf node for a regular file (or anything that is not a directory,
    /// symlinks included).
    pub fn file(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            file_count: 1,
            is_file: true,
            children: HashMap::new(),
        }
    }

    /// Zero-valued directory node for a root that could not be read.
    pub fn empty_dir(path: PathBuf) -> Self {
        Self {
            path,
            size: 0,
            file_count: 0,
            is_file: false,
            children: HashMap::new(),
        }
    }

    /// Directory node with totals folded from `children`.
    pub fn directory(path: PathBuf, children: HashMap<String, Node>) -> Self {
        let (size, file_count) = aggregate(&children);
        Self {
            path,
            size,
            file_count,
            is_file: false,
            children,
        }
    }

    /// Base name, used as the key in the parent's children map. Falls back
    /// to the full path when there is no final component (e.g. `/`).
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Depth-first iteration over this node and all descendants.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }
}

/// Sum child sizes and file counts. An empty map yields zeros.
pub fn aggregate(children: &HashMap<String, Node>) -> (u64, u64) {
    children.values().fold((0, 0), |(size, files), child| {
        (size + child.size, files + child.file_count)
    })
}

/// Explicit-stack DFS iterator, safe for very deep trees.
pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.values());
        Some(node)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Random trees of known shape: leaves are files with arbitrary sizes,
    /// inner nodes are built through `Node::directory`.
    fn arb_tree() -> impl Strategy<Value = Node> {
        let leaf = (0u64..1_000_000).prop_map(|size| Node::file(PathBuf::from("leaf"), size));
        leaf.prop_recursive(4, 64, 6, |inner| {
            prop::collection::vec(inner, 0..6).prop_map(|nodes| {
                let children = nodes
                    .into_iter()
                    .enumerate()
                    .map(|(i, mut node)| {
                        let name = format!("c{}", i);
                        node.path = PathBuf::from(&name);
                        (name, node)
                    })
                    .collect();
                Node::directory(PathBuf::from("dir"), children)
            })
        })
    }

    fn assert_aggregated(node: &Node) {
        if node.is_file {
            assert_eq!(node.file_count, 1);
            assert!(node.children.is_empty());
            return;
        }
        let (size, files) = aggregate(&node.children);
        assert_eq!(node.size, size);
        assert_eq!(node.file_count, files);
        for child in node.children.values() {
            assert_aggregated(child);
        }
    }

    fn count_nodes(node: &Node) -> usize {
        1 + node.children.values().map(count_nodes).sum::<usize>()
    }

    proptest! {
        #[test]
        fn directory_totals_equal_child_sums(tree in arb_tree()) {
            assert_aggregated(&tree);
        }

        #[test]
        fn iter_visits_every_node_once(tree in arb_tree()) {
            prop_assert_eq!(tree.iter().count(), count_nodes(&tree));
        }
    }
}
