use crate::dom::{NodeKind, RenderedDocument};
use crate::error::Result;
use crate::snapshot::inline::{contains_tag, is_recursive_inline};
use crate::snapshot::lookup::{LookupTable, RefAllocator};
use crate::snapshot::options::SnapshotOptions;
use crate::snapshot::text::normalize_text;
use crate::snapshot::visibility::deep_is_hidden;

/// One node of a built snapshot tree
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotNode<N> {
    /// Reference assigned in pre-order
    pub node_ref: u32,

    /// Effective document node after collapsing wrappers
    pub node: N,

    /// Document node this snapshot node was created for; leaf text is read from it
    pub origin: N,

    /// Own class names followed by those absorbed from collapsed wrappers
    pub class_list: Vec<String>,

    pub children: Vec<SnapshotNode<N>>,

    /// Set when the depth ceiling stopped the descent at this node
    pub truncated: bool,
}

impl<N: Copy> SnapshotNode<N> {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SnapshotNode::count).sum::<usize>()
    }

    /// Register this subtree in pre-order
    pub fn fill_lookup(&self, table: &mut LookupTable<N>) {
        table.insert(self.node_ref, self.node);
        for child in &self.children {
            child.fill_lookup(table);
        }
    }
}

/// Builds a snapshot tree from a rendered document
///
/// References are taken from one allocator shared by the whole build, so a node
/// and all of its descendants are numbered before its next sibling.
pub struct SnapshotBuilder<'a, D: RenderedDocument> {
    doc: &'a D,
    options: &'a SnapshotOptions,
    keep_tags: Vec<&'a str>,
    allocator: RefAllocator,
}

impl<'a, D: RenderedDocument> SnapshotBuilder<'a, D> {
    pub fn new(doc: &'a D, options: &'a SnapshotOptions) -> Self {
        Self {
            doc,
            options,
            keep_tags: options.always_keep_tags(),
            allocator: RefAllocator::new(options.start_id),
        }
    }

    /// Build the tree rooted at `root`; returns it with the last reference issued
    pub fn build(mut self, root: D::Node) -> Result<(SnapshotNode<D::Node>, u32)> {
        let tree = self.build_node(root, 0)?;
        Ok((tree, self.allocator.current()))
    }

    fn build_node(&mut self, origin: D::Node, depth: usize) -> Result<SnapshotNode<D::Node>> {
        let node_ref = self.allocator.next_ref()?;
        let mut snapshot = SnapshotNode {
            node_ref,
            node: origin,
            origin,
            class_list: Vec::new(),
            children: Vec::new(),
            truncated: false,
        };
        if !self.doc.is_element(origin) {
            return Ok(snapshot);
        }
        snapshot.class_list = self.doc.class_list(origin);
        if depth >= self.options.max_depth {
            log::warn!("Snapshot depth ceiling {} reached at ref {}", self.options.max_depth, node_ref);
            snapshot.truncated = true;
            return Ok(snapshot);
        }

        let mut accepted = self.accepted_children(origin)?;
        loop {
            match accepted.as_slice() {
                [] => break,
                [only] => {
                    let only = *only;
                    if !self.doc.is_element(only) {
                        break;
                    }
                    snapshot.class_list.extend(self.doc.class_list(only));
                    if !self.prefer_wrapper(snapshot.node, only) {
                        snapshot.node = only;
                    }
                    log::trace!(
                        "Collapsed wrapper at ref {} into <{}>",
                        node_ref,
                        self.doc.tag_name(snapshot.node).unwrap_or_default()
                    );
                    accepted = self.accepted_children(only)?;
                }
                many => {
                    if self.options.collapse_inline
                        && is_recursive_inline(self.doc, snapshot.node, &self.options.tag_preference)?
                    {
                        log::trace!("Folded inline run at ref {}", node_ref);
                        break;
                    }
                    let many = many.to_vec();
                    for child in many {
                        let child = self.build_node(child, depth + 1)?;
                        snapshot.children.push(child);
                    }
                    break;
                }
            }
        }

        Ok(snapshot)
    }

    /// Whether the wrapper outranks its single element child
    fn prefer_wrapper(&self, wrapper: D::Node, child: D::Node) -> bool {
        let rank = |node: D::Node| {
            self.doc
                .tag_name(node)
                .and_then(|tag| self.options.tag_rank(tag))
        };
        match (rank(wrapper), rank(child)) {
            (Some(_), None) => true,
            (Some(wrapper_rank), Some(child_rank)) => wrapper_rank < child_rank,
            (None, _) => false,
        }
    }

    /// Child nodes that make it into the snapshot
    fn accepted_children(&self, el: D::Node) -> Result<Vec<D::Node>> {
        let mut accepted = Vec::new();
        for &child in self.doc.child_nodes(el) {
            match self.doc.node_kind(child) {
                NodeKind::Other => continue,
                NodeKind::Element => {
                    if contains_tag(self.doc, child, &self.keep_tags) {
                        accepted.push(child);
                        continue;
                    }
                    if self.options.skip_hidden && deep_is_hidden(self.doc, child, &self.options.visibility)? {
                        continue;
                    }
                    let tag = self.doc.tag_name(child).unwrap_or_default();
                    if self.options.is_skipped_tag(tag) {
                        continue;
                    }
                }
                NodeKind::Text => {}
            }
            if self.options.skip_empty_text && normalize_text(&self.doc.text_content(child)).is_empty() {
                continue;
            }
            accepted.push(child);
        }
        Ok(accepted)
    }
}
