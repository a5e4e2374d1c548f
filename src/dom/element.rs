use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node of a captured page, as delivered by the capture script or built by hand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CapturedNode {
    Element(ElementNode),
    Text(TextNode),
    /// Comments, processing instructions and other non-rendered nodes
    Other,
}

/// Represents a rendered element together with its resolved style and layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    /// Lower-case tag name (e.g., "div", "button", "input")
    pub tag_name: String,

    /// Element attributes in document order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Computed style subset used by the visibility heuristics
    #[serde(default)]
    pub style: ComputedStyle,

    /// Bounding client rect
    #[serde(default)]
    pub bounding_box: BoundingBox,

    /// Result of the platform visibility check (`checkVisibility()`)
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Resolved link target (anchors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    /// Resolved source URL (images, iframes, media)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    /// Child nodes; always empty in the flat capture format
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CapturedNode>,
}

/// A text node and the rect of its content range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub content: String,

    #[serde(default)]
    pub bounding_box: BoundingBox,
}

/// The computed style properties the snapshot reads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: f64,
    pub transform: String,
}

/// Bounding box coordinates for a node
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

fn default_visible() -> bool {
    true
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
            transform: "none".to_string(),
        }
    }
}

impl ComputedStyle {
    /// Whether the element participates in an inline formatting run
    pub fn is_inline(&self) -> bool {
        self.display == "inline" || self.display == "inline-block"
    }
}

impl CapturedNode {
    /// Create a text node
    pub fn text(content: impl Into<String>) -> Self {
        CapturedNode::Text(TextNode::new(content))
    }

    /// Create a comment-like node that never renders
    pub fn other() -> Self {
        CapturedNode::Other
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            CapturedNode::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl From<ElementNode> for CapturedNode {
    fn from(element: ElementNode) -> Self {
        CapturedNode::Element(element)
    }
}

impl From<TextNode> for CapturedNode {
    fn from(text: TextNode) -> Self {
        CapturedNode::Text(text)
    }
}

impl TextNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            bounding_box: BoundingBox::default(),
        }
    }

    /// Builder method: set bounding box
    pub fn with_bounding_box(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounding_box = BoundingBox::new(x, y, width, height);
        self
    }
}

impl ElementNode {
    /// Create a new ElementNode with default style and an empty rect
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: IndexMap::new(),
            style: ComputedStyle::default(),
            bounding_box: BoundingBox::default(),
            visible: true,
            href: None,
            src: None,
            children: Vec::new(),
        }
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder method: append a class name to the `class` attribute
    pub fn with_class(mut self, class_name: &str) -> Self {
        let classes = self.attributes.entry("class".to_string()).or_default();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class_name);
        self
    }

    /// Builder method: set computed style
    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder method: set computed `display`
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.style.display = display.into();
        self
    }

    /// Builder method: set computed `opacity`
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.style.opacity = opacity;
        self
    }

    /// Builder method: set computed `visibility`
    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.style.visibility = visibility.into();
        self
    }

    /// Builder method: set computed `transform`
    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.style.transform = transform.into();
        self
    }

    /// Builder method: mark the element as failing the platform visibility check
    pub fn hidden_by_platform(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Builder method: set bounding box
    pub fn with_bounding_box(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounding_box = BoundingBox::new(x, y, width, height);
        self
    }

    /// Builder method: set the resolved link target
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        let href = href.into();
        self.attributes.insert("href".to_string(), href.clone());
        self.href = Some(href);
        self
    }

    /// Builder method: set the resolved source URL
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        let src = src.into();
        self.attributes.insert("src".to_string(), src.clone());
        self.src = Some(src);
        self
    }

    /// Builder method: append a child node
    pub fn with_child(mut self, child: impl Into<CapturedNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder method: append a text child
    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        self.children.push(CapturedNode::text(content));
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<CapturedNode>) -> Self {
        self.children = children;
        self
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Class names from the `class` attribute, in order
    pub fn class_list(&self) -> Vec<String> {
        self.attributes
            .get("class")
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the bounding box is visible (has non-zero dimensions)
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Calculate the area of the bounding box
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}
