//! Rendered document model
//!
//! This module describes the document the snapshot reads:
//! - RenderedDocument: read access to nodes, computed style, layout and selection
//! - CapturedDocument: in-memory arena implementation, built by hand or from a page capture
//! - ElementNode / TextNode: builder types for captured nodes

pub mod captured;
pub mod document;
pub mod element;

pub use captured::{CapturedDocument, CapturedEntry, CapturedPage, NodeId};
pub use document::{NodeKind, RenderedDocument};
pub use element::{BoundingBox, CapturedNode, ComputedStyle, ElementNode, TextNode};

/// Browser-side script that captures the current page as a flat JSON string
pub const CAPTURE_SCRIPT: &str = include_str!("capture_dom.js");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("div");
        assert_eq!(element.tag_name, "div");
    }

    #[test]
    fn test_captured_document_export() {
        let doc = CapturedDocument::from_tree(ElementNode::new("body"));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.tag_name(doc.root()), Some("body"));
    }

    #[test]
    fn test_capture_script_returns_flat_nodes() {
        assert!(CAPTURE_SCRIPT.contains("nodes"));
        assert!(CAPTURE_SCRIPT.contains("JSON.stringify"));
    }
}
