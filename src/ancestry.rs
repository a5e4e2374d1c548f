//! Debug capture of a node's ancestor chain

use crate::dom::RenderedDocument;
use crate::error::Result;
use crate::snapshot::{normalize_text, visible_text};

/// One opening tag with all attributes, e.g. `<a href="/x" class="btn">`
pub fn capture_html_line<D: RenderedDocument>(doc: &D, node: D::Node) -> Option<String> {
    let tag = doc.tag_name(node)?;
    let mut parts = vec![tag.to_string()];
    for (name, value) in doc.attributes(node) {
        parts.push(format!("{}=\"{}\"", name, value));
    }
    Some(format!("<{}>", parts.join(" ")))
}

/// Opening tags of `node` and every ancestor, outermost first
///
/// With `include_text`, the node's normalized visible text is emitted as the first line.
pub fn capture_ancestor_html<D: RenderedDocument>(doc: &D, node: D::Node, include_text: bool) -> Result<String> {
    let mut lines = Vec::new();
    let mut current = Some(node);
    while let Some(ancestor) = current {
        if let Some(line) = capture_html_line(doc, ancestor) {
            lines.push(line);
        }
        current = doc.parent(ancestor);
    }
    lines.reverse();

    if include_text {
        lines.insert(0, normalize_text(&visible_text(doc, node)?));
    }
    Ok(lines.join("\n"))
}
