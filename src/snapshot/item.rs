use crate::dom::{BoundingBox, RenderedDocument};
use crate::error::Result;
use crate::snapshot::builder::SnapshotNode;
use crate::snapshot::text::{normalize_text, visible_text};
use serde::{Deserialize, Serialize};

/// Kind of the node a snapshot item describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Element,
    Text,
}

/// Plain-data projection of a snapshot node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    /// Reference usable to address the node (e.g. "click ref 12")
    #[serde(rename = "ref")]
    pub node_ref: u32,

    pub node_type: NodeType,

    pub leaf: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,

    /// Layout rect captured at projection time
    pub rect: BoundingBox,

    /// Accumulated class names (elements only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_list: Option<Vec<String>>,

    /// Normalized visible text (leaves only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    /// The depth ceiling cut the subtree below this node
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,

    /// Child items (non-leaves only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotItem>,
}

impl SnapshotItem {
    /// Project a built snapshot node, reading layout and text from the document
    pub fn project<D: RenderedDocument>(doc: &D, node: &SnapshotNode<D::Node>) -> Result<Self> {
        let is_element = doc.is_element(node.node);
        let leaf = node.is_leaf();
        let text = if leaf {
            Some(normalize_text(&visible_text(doc, node.origin)?))
        } else {
            None
        };
        let children = node
            .children
            .iter()
            .map(|child| Self::project(doc, child))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            node_ref: node.node_ref,
            node_type: if is_element { NodeType::Element } else { NodeType::Text },
            leaf,
            tag_name: doc.tag_name(node.node).map(str::to_string),
            rect: doc.bounding_rect(node.node)?,
            class_list: is_element.then(|| node.class_list.clone()),
            text,
            href: doc.href(node.node),
            src: doc.src(node.node),
            truncated: node.truncated,
            children,
        })
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Count items in this subtree
    pub fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(SnapshotItem::count_nodes).sum::<usize>()
    }

    /// All references in pre-order
    pub fn refs(&self) -> Vec<u32> {
        let mut refs = Vec::with_capacity(self.count_nodes());
        let mut stack = vec![self];
        while let Some(item) = stack.pop() {
            refs.push(item.node_ref);
            stack.extend(item.children.iter().rev());
        }
        refs
    }

    /// Find item by reference
    pub fn find(&self, node_ref: u32) -> Option<&SnapshotItem> {
        if self.node_ref == node_ref {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(node_ref))
    }

    /// Convert the snapshot to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{CapturedDocument, ElementNode, TextNode};
    use crate::snapshot::builder::SnapshotBuilder;
    use crate::snapshot::options::SnapshotOptions;

    fn project(doc: &CapturedDocument) -> SnapshotItem {
        let options = SnapshotOptions::default();
        let (tree, _) = SnapshotBuilder::new(doc, &options).build(doc.root()).unwrap();
        SnapshotItem::project(doc, &tree).unwrap()
    }

    fn page() -> CapturedDocument {
        CapturedDocument::from_tree(
            ElementNode::new("body")
                .with_bounding_box(0.0, 0.0, 800.0, 600.0)
                .with_child(
                    ElementNode::new("p")
                        .with_class("intro")
                        .with_bounding_box(0.0, 10.0, 800.0, 20.0)
                        .with_text("Welcome\u{200B}  home"),
                )
                .with_child(
                    ElementNode::new("img")
                        .with_src("https://example.com/a.png")
                        .with_bounding_box(0.0, 40.0, 50.0, 50.0),
                )
                .with_child(TextNode::new("trailing").with_bounding_box(0.0, 95.0, 60.0, 16.0)),
        )
    }

    #[test]
    fn test_projection_fields() {
        let doc = page();
        let item = project(&doc);

        assert_eq!(item.node_ref, 1);
        assert!(!item.leaf);
        assert_eq!(item.text, None);
        assert_eq!(item.tag_name.as_deref(), Some("body"));
        assert_eq!(item.children.len(), 3);

        let p = &item.children[0];
        assert!(p.leaf);
        assert_eq!(p.text.as_deref(), Some("Welcome home"));
        assert_eq!(p.class_list, Some(vec!["intro".to_string()]));
        assert_eq!(p.rect, BoundingBox::new(0.0, 10.0, 800.0, 20.0));

        let img = &item.children[1];
        assert_eq!(img.src.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(img.text.as_deref(), Some(""));

        let text = &item.children[2];
        assert_eq!(text.node_type, NodeType::Text);
        assert_eq!(text.tag_name, None);
        assert_eq!(text.class_list, None);
        assert_eq!(text.text.as_deref(), Some("trailing"));
    }

    #[test]
    fn test_refs_and_find() {
        let item = project(&page());

        assert_eq!(item.refs(), vec![1, 2, 3, 4]);
        assert_eq!(item.count_nodes(), 4);
        assert_eq!(item.find(3).and_then(|i| i.tag_name.as_deref()), Some("img"));
        assert!(item.find(9).is_none());
    }

    #[test]
    fn test_json_shape() {
        let item = project(&page());
        let value: serde_json::Value = serde_json::from_str(&item.to_json().unwrap()).unwrap();

        assert_eq!(value["ref"], 1);
        assert_eq!(value["nodeType"], "element");
        assert_eq!(value["tagName"], "body");
        assert!(value.get("text").is_none());
        assert_eq!(value["children"][0]["text"], "Welcome home");
        assert_eq!(value["children"][0]["classList"][0], "intro");
        assert!(value["children"][0].get("children").is_none());
        assert!(value["children"][2].get("classList").is_none());
        assert!(value.get("truncated").is_none());

        let parsed: SnapshotItem = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, item);
    }
}
