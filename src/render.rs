//! Sorted, threshold-filtered rendering of a built tree
//!
//! Presentation only: consumes a finished [`Node`] tree and produces the
//! flat depth-first listing the CLI prints. Filtering is per-node, not
//! subtree-pruning: a child below the threshold is still recursed into.

use crate::tree::Node;
use std::cmp::Ordering;

/// Sibling sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Flatten a tree depth-first into `(depth, node)` pairs.
///
/// At every level siblings are ordered by `(size, name)`; descending
/// reverses the whole comparator, so the two directions are exact mirrors
/// even when sizes tie. A node is emitted only if `size >= threshold`.
pub fn flatten(root: &Node, threshold: u64, order: SortOrder) -> Vec<(usize, &Node)> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &Node)> = vec![(0, root)];

    while let Some((depth, node)) = stack.pop() {
        if node.size >= threshold {
            out.push((depth, node));
        }

        let mut siblings: Vec<&Node> = node.children.values().collect();
        siblings.sort_by(|a, b| compare(a, b, order));

        // Reversed push so the stack pops children in sorted order
        for child in siblings.into_iter().rev() {
            stack.push((depth + 1, child));
        }
    }

    out
}

fn compare(a: &Node, b: &Node, order: SortOrder) -> Ordering {
    let forward = a.size.cmp(&b.size).then_with(|| a.name().cmp(&b.name()));
    match order {
        SortOrder::Ascending => forward,
        SortOrder::Descending => forward.reverse(),
    }
}

/// Human-readable size with fixed-width columns: value to one decimal place
/// left-aligned in five columns, unit right-aligned in three among
/// B, KiB, MiB, GiB, TiB.
pub fn format_size(num_bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut size = num_bytes as f64;
    for (i, unit) in UNITS.iter().enumerate() {
        if size < 1024.0 || i == UNITS.len() - 1 {
            return format!("{:<5.1} {:>3}", size, unit);
        }
        size /= 1024.0;
    }
    unreachable!("unit loop always returns")
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// One output line: `[count][F|D] size path`. The comma-grouped count is
/// right-aligned in its brackets.
pub fn render_line(node: &Node) -> String {
    let tag = if node.is_file { "F" } else { "D" };
    format!(
        "[{:>7}][{}] {} {}",
        format_number(node.file_count),
        tag,
        format_size(node.size),
        node.path.display()
    )
}

/// Print the sorted, threshold-filtered tree to stdout.
pub fn print_tree(root: &Node, threshold: u64, order: SortOrder) {
    for (_depth, node) in flatten(root, threshold, order) {
        println!("{}", render_line(node));
    }
}
