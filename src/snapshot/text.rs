use crate::dom::RenderedDocument;
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of whitespace and format-control (Unicode Cf) characters
static COLLAPSIBLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{Cf}\s]+").expect("valid whitespace pattern"));

/// Collapse whitespace and format-control characters into single spaces and trim
pub fn normalize_text(text: &str) -> String {
    COLLAPSIBLE.replace_all(text, " ").trim().to_string()
}

/// Scoped use of the document selection
///
/// Acquiring clears any existing selection; dropping the scope clears it again,
/// so the host page never sees a dangling selection, whichever way the scope exits.
pub struct SelectionScope<'d, D: RenderedDocument> {
    doc: &'d D,
}

impl<'d, D: RenderedDocument> SelectionScope<'d, D> {
    pub fn acquire(doc: &'d D) -> Result<Self> {
        doc.clear_selection()?;
        Ok(Self { doc })
    }

    /// Select the full range of `node`
    pub fn select(&self, node: D::Node) -> Result<()> {
        self.doc.select_node(node)
    }

    pub fn text(&self) -> Result<String> {
        self.doc.selection_text()
    }
}

impl<D: RenderedDocument> Drop for SelectionScope<'_, D> {
    fn drop(&mut self) {
        if let Err(e) = self.doc.clear_selection() {
            log::warn!("Failed to release selection: {}", e);
        }
    }
}

/// Text a user would perceive when selecting the whole node
///
/// Unlike `text_content`, this leaves out text hidden by styling.
pub fn visible_text<D: RenderedDocument>(doc: &D, node: D::Node) -> Result<String> {
    let scope = SelectionScope::acquire(doc)?;
    scope.select(node)?;
    let text = scope.text()?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{BoundingBox, CapturedDocument, ComputedStyle, ElementNode, NodeKind};
    use crate::error::SnapshotError;
    use std::cell::Cell;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello \n\t World  "), "Hello World");
        assert_eq!(normalize_text("a\u{200B}b"), "a b");
        assert_eq!(normalize_text("\u{FEFF}\u{00A0}x\u{2060}\u{2060}y\u{00AD}"), "x y");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \u{200E} \n"), "");
    }

    #[test]
    fn test_normalize_text_idempotent() {
        let samples = ["  a  b  ", "x\u{200D}\u{200D}y", "\n\n", "plain", " \u{202A}rtl\u{202C} "];
        for sample in samples {
            let once = normalize_text(sample);
            assert_eq!(normalize_text(&once), once);
            assert_eq!(once.trim(), once);
            assert!(!once.contains("  "));
        }
    }

    #[test]
    fn test_visible_text_clears_selection() {
        let doc = CapturedDocument::from_tree(
            ElementNode::new("p")
                .with_text(" Hello ")
                .with_child(ElementNode::new("b").with_display("inline").with_text("World"))
                .with_child(ElementNode::new("span").with_display("none").with_text("secret")),
        );
        doc.select_node(doc.root()).unwrap();

        let text = visible_text(&doc, doc.root()).unwrap();

        assert_eq!(text, "Hello World");
        assert_eq!(doc.selected_node(), None);
    }

    /// A document whose selection stringification always fails
    struct FailingSelection {
        selected: Cell<bool>,
    }

    impl RenderedDocument for FailingSelection {
        type Node = u8;

        fn node_kind(&self, _node: u8) -> NodeKind {
            NodeKind::Element
        }
        fn child_nodes(&self, _node: u8) -> &[u8] {
            &[]
        }
        fn parent(&self, _node: u8) -> Option<u8> {
            None
        }
        fn tag_name(&self, _node: u8) -> Option<&str> {
            Some("div")
        }
        fn attributes(&self, _node: u8) -> Vec<(&str, &str)> {
            Vec::new()
        }
        fn text_content(&self, _node: u8) -> String {
            String::new()
        }
        fn href(&self, _node: u8) -> Option<String> {
            None
        }
        fn src(&self, _node: u8) -> Option<String> {
            None
        }
        fn computed_style(&self, _node: u8) -> Result<ComputedStyle> {
            Ok(ComputedStyle::default())
        }
        fn bounding_rect(&self, _node: u8) -> Result<BoundingBox> {
            Ok(BoundingBox::default())
        }
        fn check_visibility(&self, _node: u8) -> Result<bool> {
            Ok(true)
        }
        fn clear_selection(&self) -> Result<()> {
            self.selected.set(false);
            Ok(())
        }
        fn select_node(&self, _node: u8) -> Result<()> {
            self.selected.set(true);
            Ok(())
        }
        fn selection_text(&self) -> Result<String> {
            Err(SnapshotError::SelectionFailed("boom".to_string()))
        }
    }

    #[test]
    fn test_selection_released_on_error() {
        let doc = FailingSelection {
            selected: Cell::new(false),
        };

        let result = visible_text(&doc, 0);

        assert!(matches!(result, Err(SnapshotError::SelectionFailed(_))));
        assert!(!doc.selected.get());
    }
}
