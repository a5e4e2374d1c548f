use crate::dom::document::{NodeKind, RenderedDocument};
use crate::dom::element::{BoundingBox, CapturedNode, ComputedStyle};
use crate::error::{Result, SnapshotError};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Handle of a node inside a [`CapturedDocument`] (its pre-order position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// The flat page capture returned by the capture script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedPage {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub title: String,

    /// Nodes in pre-order; each entry names its parent's position
    pub nodes: Vec<CapturedEntry>,
}

/// One node of a flat capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedEntry {
    pub parent: Option<usize>,

    #[serde(flatten)]
    pub node: CapturedNode,
}

#[derive(Debug, Clone)]
struct Slot {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Node data with its `children` moved into the arena
    node: CapturedNode,
}

/// A rendered document held in memory as a pre-order arena
///
/// The selection resource is emulated: selecting a node and stringifying the
/// selection yields the node's text with hidden subtrees removed and block
/// boundaries turned into line breaks.
#[derive(Debug)]
pub struct CapturedDocument {
    url: String,
    title: String,
    slots: Vec<Slot>,
    selection: RefCell<Option<NodeId>>,
}

enum Visit {
    Enter(NodeId),
    LineBreak,
}

impl CapturedDocument {
    /// Build a document from a nested node tree; the root gets `NodeId(0)`
    pub fn from_tree(root: impl Into<CapturedNode>) -> Self {
        let mut slots: Vec<Slot> = Vec::new();
        let mut stack: Vec<(CapturedNode, Option<NodeId>)> = vec![(root.into(), None)];

        while let Some((mut node, parent)) = stack.pop() {
            let id = NodeId(slots.len());
            let children = match &mut node {
                CapturedNode::Element(el) => std::mem::take(&mut el.children),
                _ => Vec::new(),
            };
            if let Some(parent) = parent {
                slots[parent.0].children.push(id);
            }
            slots.push(Slot {
                parent,
                children: Vec::new(),
                node,
            });
            for child in children.into_iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        Self {
            url: String::new(),
            title: String::new(),
            slots,
            selection: RefCell::new(None),
        }
    }

    /// Build a document from a flat capture
    pub fn from_capture(page: CapturedPage) -> Result<Self> {
        let mut slots: Vec<Slot> = Vec::with_capacity(page.nodes.len());

        for (index, entry) in page.nodes.into_iter().enumerate() {
            let parent = match (index, entry.parent) {
                (0, None) => None,
                (0, Some(_)) => {
                    return Err(SnapshotError::CaptureParseFailed(
                        "first node must be the root".to_string(),
                    ));
                }
                (_, Some(parent)) if parent < index => Some(NodeId(parent)),
                (_, parent) => {
                    return Err(SnapshotError::CaptureParseFailed(format!(
                        "node {} has invalid parent {:?}",
                        index, parent
                    )));
                }
            };
            if let CapturedNode::Element(el) = &entry.node {
                if !el.children.is_empty() {
                    return Err(SnapshotError::CaptureParseFailed(format!(
                        "node {} carries nested children in a flat capture",
                        index
                    )));
                }
            }
            if let Some(parent) = parent {
                slots[parent.0].children.push(NodeId(index));
            }
            slots.push(Slot {
                parent,
                children: Vec::new(),
                node: entry.node,
            });
        }

        if slots.is_empty() {
            return Err(SnapshotError::CaptureParseFailed("capture contains no nodes".to_string()));
        }

        Ok(Self {
            url: page.url,
            title: page.title,
            slots,
            selection: RefCell::new(None),
        })
    }

    /// Parse the JSON string produced by the capture script
    pub fn from_json(json: &str) -> Result<Self> {
        let page: CapturedPage = serde_json::from_str(json)
            .map_err(|e| SnapshotError::CaptureParseFailed(format!("invalid capture JSON: {}", e)))?;
        Self::from_capture(page)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of nodes of every kind
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Node data without its children
    pub fn get(&self, node: NodeId) -> Option<&CapturedNode> {
        self.slots.get(node.0).map(|slot| &slot.node)
    }

    /// First element with the given tag, in document order
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.slots
            .iter()
            .position(|slot| slot.node.as_element().is_some_and(|el| el.is_tag(tag)))
            .map(NodeId)
    }

    /// Find an element by its `id` attribute
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.slots
            .iter()
            .position(|slot| {
                slot.node
                    .as_element()
                    .and_then(|el| el.get_attribute("id"))
                    .is_some_and(|value| value == id)
            })
            .map(NodeId)
    }

    /// Current selection anchor, if any
    pub fn selected_node(&self) -> Option<NodeId> {
        *self.selection.borrow()
    }

    fn slot(&self, node: NodeId) -> Result<&Slot> {
        self.slots
            .get(node.0)
            .ok_or_else(|| SnapshotError::UnknownNode(format!("{:?}", node)))
    }

    fn parent_is_invisible(&self, node: NodeId) -> bool {
        self.slots
            .get(node.0)
            .and_then(|slot| slot.parent)
            .and_then(|parent| self.get(parent))
            .and_then(CapturedNode::as_element)
            .is_some_and(|el| el.style.visibility == "hidden")
    }

    fn perceived_text(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![Visit::Enter(node)];

        while let Some(visit) = stack.pop() {
            let id = match visit {
                Visit::LineBreak => {
                    out.push('\n');
                    continue;
                }
                Visit::Enter(id) => id,
            };
            let Some(slot) = self.slots.get(id.0) else {
                continue;
            };
            match &slot.node {
                CapturedNode::Text(text) => {
                    if !self.parent_is_invisible(id) {
                        out.push_str(&text.content);
                    }
                }
                CapturedNode::Element(el) => {
                    let style = &el.style;
                    // `visibility: hidden` only hides the element's own text; descendants may opt back in
                    if !el.visible || style.display == "none" {
                        continue;
                    }
                    if el.is_tag("br") {
                        out.push('\n');
                        continue;
                    }
                    let block = !style.is_inline() && style.display != "contents" && style.visibility != "hidden";
                    if block {
                        out.push('\n');
                        stack.push(Visit::LineBreak);
                    }
                    for child in slot.children.iter().rev() {
                        stack.push(Visit::Enter(*child));
                    }
                }
                CapturedNode::Other => {}
            }
        }

        out.trim().to_string()
    }
}

impl RenderedDocument for CapturedDocument {
    type Node = NodeId;

    fn node_kind(&self, node: NodeId) -> NodeKind {
        match self.slots.get(node.0).map(|slot| &slot.node) {
            Some(CapturedNode::Element(_)) => NodeKind::Element,
            Some(CapturedNode::Text(_)) => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn child_nodes(&self, node: NodeId) -> &[NodeId] {
        self.slots
            .get(node.0)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slots.get(node.0).and_then(|slot| slot.parent)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.get(node)
            .and_then(CapturedNode::as_element)
            .map(|el| el.tag_name.as_str())
    }

    fn attributes(&self, node: NodeId) -> Vec<(&str, &str)> {
        self.get(node)
            .and_then(CapturedNode::as_element)
            .map(|el| {
                el.attributes
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get(id.0) else {
                continue;
            };
            if let CapturedNode::Text(text) = &slot.node {
                out.push_str(&text.content);
            }
            stack.extend(slot.children.iter().rev().copied());
        }
        out
    }

    fn href(&self, node: NodeId) -> Option<String> {
        let el = self.get(node)?.as_element()?;
        if !el.is_tag("a") {
            return None;
        }
        el.href.clone().or_else(|| el.get_attribute("href").cloned())
    }

    fn src(&self, node: NodeId) -> Option<String> {
        let el = self.get(node)?.as_element()?;
        el.src.clone().or_else(|| el.get_attribute("src").cloned())
    }

    fn computed_style(&self, node: NodeId) -> Result<ComputedStyle> {
        match &self.slot(node)?.node {
            CapturedNode::Element(el) => Ok(el.style.clone()),
            _ => Err(SnapshotError::not_an_element(node, "computed style")),
        }
    }

    fn bounding_rect(&self, node: NodeId) -> Result<BoundingBox> {
        match &self.slot(node)?.node {
            CapturedNode::Element(el) => Ok(el.bounding_box),
            CapturedNode::Text(text) => Ok(text.bounding_box),
            CapturedNode::Other => Err(SnapshotError::layout_unavailable(node, "node is not rendered")),
        }
    }

    fn check_visibility(&self, node: NodeId) -> Result<bool> {
        match &self.slot(node)?.node {
            CapturedNode::Element(el) => Ok(el.visible),
            _ => Err(SnapshotError::not_an_element(node, "visibility check")),
        }
    }

    fn clear_selection(&self) -> Result<()> {
        self.selection.replace(None);
        Ok(())
    }

    fn select_node(&self, node: NodeId) -> Result<()> {
        self.slot(node)?;
        self.selection.replace(Some(node));
        Ok(())
    }

    fn selection_text(&self) -> Result<String> {
        Ok(self
            .selected_node()
            .map(|node| self.perceived_text(node))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::element::ElementNode;

    fn create_test_tree() -> ElementNode {
        ElementNode::new("body")
            .with_child(
                ElementNode::new("header").with_child(
                    ElementNode::new("button")
                        .with_attribute("id", "nav-btn")
                        .with_text("Menu"),
                ),
            )
            .with_child(CapturedNode::other())
            .with_child(
                ElementNode::new("main")
                    .with_child(ElementNode::new("a").with_href("/page").with_text("Click here"))
                    .with_text("tail"),
            )
    }

    #[test]
    fn test_from_tree_is_pre_order() {
        let doc = CapturedDocument::from_tree(create_test_tree());

        // body, header, button, "Menu", comment, main, a, "Click here", "tail"
        assert_eq!(doc.len(), 9);
        assert_eq!(doc.tag_name(doc.root()), Some("body"));
        assert_eq!(doc.child_nodes(doc.root()), &[NodeId(1), NodeId(4), NodeId(5)]);
        assert_eq!(doc.find_by_tag("button"), Some(NodeId(2)));
        assert_eq!(doc.find_by_id("nav-btn"), Some(NodeId(2)));
        assert_eq!(doc.parent(NodeId(7)), Some(NodeId(6)));
        assert_eq!(doc.node_kind(NodeId(4)), NodeKind::Other);
    }

    #[test]
    fn test_text_content_and_links() {
        let doc = CapturedDocument::from_tree(create_test_tree());
        let main = doc.find_by_tag("main").unwrap();
        let link = doc.find_by_tag("a").unwrap();

        assert_eq!(doc.text_content(main), "Click heretail");
        assert_eq!(doc.href(link).as_deref(), Some("/page"));
        assert_eq!(doc.href(main), None);
        assert_eq!(doc.element_children(doc.root()).len(), 2);
    }

    #[test]
    fn test_from_json_flat_capture() {
        let json = r#"{
            "url": "https://example.com/",
            "title": "Example",
            "nodes": [
                {"parent": null, "type": "element", "tagName": "body"},
                {"parent": 0, "type": "element", "tagName": "p", "attributes": {"class": "lead intro"}},
                {"parent": 1, "type": "text", "content": "Hello"},
                {"parent": 0, "type": "other"}
            ]
        }"#;
        let doc = CapturedDocument::from_json(json).unwrap();

        assert_eq!(doc.url(), "https://example.com/");
        assert_eq!(doc.title(), "Example");
        assert_eq!(doc.child_nodes(NodeId(0)), &[NodeId(1), NodeId(3)]);
        assert_eq!(doc.class_list(NodeId(1)), vec!["lead", "intro"]);
        assert_eq!(doc.text_content(NodeId(0)), "Hello");
    }

    #[test]
    fn test_from_json_rejects_forward_parent() {
        let json = r#"{"nodes": [
            {"parent": null, "type": "element", "tagName": "body"},
            {"parent": 2, "type": "text", "content": "x"}
        ]}"#;
        let result = CapturedDocument::from_json(json);
        assert!(matches!(result, Err(SnapshotError::CaptureParseFailed(_))));

        let empty = CapturedDocument::from_json(r#"{"nodes": []}"#);
        assert!(empty.is_err());
    }

    #[test]
    fn test_layout_reads_on_non_elements_fail() {
        let doc = CapturedDocument::from_tree(create_test_tree());

        assert!(doc.computed_style(NodeId(3)).is_err());
        assert!(doc.bounding_rect(NodeId(3)).is_ok());
        assert!(doc.bounding_rect(NodeId(4)).is_err());
        assert!(matches!(
            doc.check_visibility(NodeId(99)),
            Err(SnapshotError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_selection_skips_hidden_text() {
        let root = ElementNode::new("div")
            .with_child(ElementNode::new("span").with_display("inline").with_text("Shown"))
            .with_child(ElementNode::new("span").with_display("none").with_text("Gone"))
            .with_child(ElementNode::new("span").with_visibility("hidden").with_text("Invisible"))
            .with_child(ElementNode::new("p").with_text("Block"));
        let doc = CapturedDocument::from_tree(root);

        assert_eq!(doc.selection_text().unwrap(), "");
        doc.select_node(doc.root()).unwrap();
        assert_eq!(doc.selection_text().unwrap(), "Shown\nBlock");
        doc.clear_selection().unwrap();
        assert_eq!(doc.selected_node(), None);
    }

    #[test]
    fn test_selection_keeps_visible_descendants_of_invisible_elements() {
        let root = ElementNode::new("div")
            .with_child(
                ElementNode::new("div")
                    .with_visibility("hidden")
                    .with_text("Masked")
                    .with_child(ElementNode::new("span").with_display("inline").with_visibility("visible").with_text("Revealed"))
                    .with_child(ElementNode::new("span").with_display("inline").with_visibility("hidden").with_text("Inherited")),
            )
            .with_child(ElementNode::new("p").with_text("After"));
        let doc = CapturedDocument::from_tree(root);

        doc.select_node(doc.root()).unwrap();
        assert_eq!(doc.selection_text().unwrap(), "Revealed\nAfter");
    }
}
