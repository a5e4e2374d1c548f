use crate::dom::element::{BoundingBox, ComputedStyle};
use crate::error::Result;
use std::fmt::Debug;
use std::hash::Hash;

/// The kind of a rendered node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    /// Comments, processing instructions, doctype...
    Other,
}

/// Read access to a rendered document
///
/// The snapshot never mutates the document. Style, layout and selection reads are
/// fallible: a host may fail to compute layout for a detached node, and such failures
/// must reach the caller instead of producing a partial tree.
pub trait RenderedDocument {
    /// Copyable handle identifying a node of this document
    type Node: Copy + Eq + Hash + Debug;

    fn node_kind(&self, node: Self::Node) -> NodeKind;

    /// Ordered child nodes, including text and comment nodes
    fn child_nodes(&self, node: Self::Node) -> &[Self::Node];

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Lower-case tag name for elements, `None` otherwise
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Attributes in document order (empty for non-elements)
    fn attributes(&self, node: Self::Node) -> Vec<(&str, &str)>;

    /// Class names of an element, in order
    fn class_list(&self, node: Self::Node) -> Vec<String> {
        self.attributes(node)
            .into_iter()
            .find(|(name, _)| *name == "class")
            .map(|(_, value)| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Raw concatenated text of the node and all its descendants
    fn text_content(&self, node: Self::Node) -> String;

    /// Link target, only for nodes that carry one (anchors)
    fn href(&self, node: Self::Node) -> Option<String>;

    /// Source URL, only for nodes that carry one (images, iframes, media)
    fn src(&self, node: Self::Node) -> Option<String>;

    fn computed_style(&self, node: Self::Node) -> Result<ComputedStyle>;

    /// On-screen rect; for text nodes, the rect of the content range
    fn bounding_rect(&self, node: Self::Node) -> Result<BoundingBox>;

    /// Platform visibility check covering content-visibility, display chain and detachment
    fn check_visibility(&self, node: Self::Node) -> Result<bool>;

    /// Drop every range from the document selection
    fn clear_selection(&self) -> Result<()>;

    /// Select the full range of `node`
    fn select_node(&self, node: Self::Node) -> Result<()>;

    /// Stringified current selection, as the user would perceive it
    fn selection_text(&self) -> Result<String>;

    fn is_element(&self, node: Self::Node) -> bool {
        self.node_kind(node) == NodeKind::Element
    }

    fn is_text(&self, node: Self::Node) -> bool {
        self.node_kind(node) == NodeKind::Text
    }

    /// Element children only
    fn element_children(&self, node: Self::Node) -> Vec<Self::Node> {
        self.child_nodes(node)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }
}
