//! Snapshot construction
//!
//! Walks a rendered document, decides what is visible, collapses wrapper structure,
//! assigns pre-order references and projects the result into plain data.

pub mod builder;
pub mod inline;
pub mod item;
pub mod lookup;
pub mod options;
pub mod text;
pub mod visibility;

pub use builder::{SnapshotBuilder, SnapshotNode};
pub use item::{NodeType, SnapshotItem};
pub use lookup::{LookupTable, RefAllocator};
pub use options::{SnapshotOptions, VisibilityOptions};
pub use text::{SelectionScope, normalize_text, visible_text};
pub use visibility::{deep_is_hidden, has_visible_area, is_hidden};

use crate::dom::RenderedDocument;
use crate::error::Result;

/// Result of one snapshot invocation
#[derive(Debug, Clone)]
pub struct SnapshotOutput<N> {
    /// Reference to effective document node, one entry per snapshot node
    pub lookup_table: LookupTable<N>,

    /// Structured projection of the tree
    pub snapshot: SnapshotItem,

    /// Last reference issued; pass it as the next `start_id` to keep numbering unique
    pub max_id: u32,
}

/// Build a snapshot of the subtree rooted at `root`
pub fn create_snapshot<D: RenderedDocument>(
    doc: &D,
    root: D::Node,
    options: &SnapshotOptions,
) -> Result<SnapshotOutput<D::Node>> {
    let (tree, max_id) = SnapshotBuilder::new(doc, options).build(root)?;

    let mut lookup_table = LookupTable::new();
    tree.fill_lookup(&mut lookup_table);

    let snapshot = SnapshotItem::project(doc, &tree)?;

    log::debug!(
        "Snapshot built: {} nodes, refs {}..={}",
        lookup_table.len(),
        options.start_id + 1,
        max_id
    );

    Ok(SnapshotOutput {
        lookup_table,
        snapshot,
        max_id,
    })
}
