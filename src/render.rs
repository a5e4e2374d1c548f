//! Indented-text rendering of snapshots for agents and humans

use crate::snapshot::{NodeType, SnapshotItem};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Options for [`render_snapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Indentation depth of the root line
    pub depth: usize,

    /// Append `[ref=N]` to element lines
    #[serde(alias = "includeNodeId")]
    pub include_ref: bool,

    /// Append `.class` for each class name
    pub include_class_list: bool,

    /// Omit nodes (and their subtrees) whose top edge lies below this value
    pub max_height: Option<f64>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            depth: 0,
            include_ref: true,
            include_class_list: false,
            max_height: None,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_ref(mut self, include: bool) -> Self {
        self.include_ref = include;
        self
    }

    pub fn include_class_list(mut self, include: bool) -> Self {
        self.include_class_list = include;
        self
    }

    pub fn max_height(mut self, max_height: f64) -> Self {
        self.max_height = Some(max_height);
        self
    }
}

/// Render a snapshot as one line per node, two spaces of indentation per level
pub fn render_snapshot(item: &SnapshotItem, options: &RenderOptions) -> String {
    let mut lines = Vec::new();
    render_into(item, options, options.depth, &mut lines);
    lines.join("\n")
}

fn render_into(item: &SnapshotItem, options: &RenderOptions, depth: usize, lines: &mut Vec<String>) {
    if options.max_height.is_some_and(|max| item.rect.y > max) {
        return;
    }
    lines.push(render_line(item, options, depth));
    for child in &item.children {
        render_into(child, options, depth + 1, lines);
    }
}

/// Render a single node at the given depth
pub fn render_line(item: &SnapshotItem, options: &RenderOptions, depth: usize) -> String {
    let mut line = "  ".repeat(depth);
    let text = item.text.as_deref().unwrap_or_default();

    if item.node_type == NodeType::Text {
        line.push_str(text);
        return line;
    }

    line.push_str(item.tag_name.as_deref().unwrap_or_default());
    if options.include_ref {
        line.push_str(&format!("[ref={}]", item.node_ref));
    }
    if options.include_class_list {
        for class_name in item.class_list.iter().flatten() {
            line.push('.');
            line.push_str(class_name);
        }
    }
    if let Some(src) = item.src.as_deref().filter(|src| !src.is_empty()) {
        line.push_str(&format!("({})", src));
    }
    if let Some(href) = item.href.as_deref().filter(|href| !href.is_empty()) {
        line.push_str(&format!("({})", href));
    }
    if item.leaf && !text.is_empty() {
        line.push(' ');
        line.push_str(text);
    }
    line
}
