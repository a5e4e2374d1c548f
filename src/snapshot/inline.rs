use crate::dom::RenderedDocument;
use crate::error::Result;

/// Whether the whole subtree below `node` renders as one inline run
///
/// Every descendant element must be `inline` or `inline-block`, and none may carry
/// a tag from `ignore_tags`. A node without element children is trivially inline.
pub fn is_recursive_inline<D: RenderedDocument>(doc: &D, node: D::Node, ignore_tags: &[String]) -> Result<bool> {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        for child in doc.element_children(current) {
            let tag = doc.tag_name(child).unwrap_or_default();
            if ignore_tags.iter().any(|ignored| ignored == tag) {
                return Ok(false);
            }
            if !doc.computed_style(child)?.is_inline() {
                return Ok(false);
            }
            stack.push(child);
        }
    }
    Ok(true)
}

/// Whether `node` or any of its descendants is an element with one of `tags`
pub fn contains_tag<D: RenderedDocument>(doc: &D, node: D::Node, tags: &[&str]) -> bool {
    if tags.is_empty() {
        return false;
    }
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if doc
            .tag_name(current)
            .is_some_and(|tag| tags.contains(&tag))
        {
            return true;
        }
        stack.extend(doc.element_children(current));
    }
    false
}
