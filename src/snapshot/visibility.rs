use crate::dom::RenderedDocument;
use crate::error::Result;
use crate::snapshot::options::VisibilityOptions;

/// Minimum on-screen area (in square layout units) for a box to occupy space
pub const MIN_VISIBLE_AREA: f64 = 100.0;

/// Whether an element is hidden together with all its descendants
///
/// Hidden means any of: `display: none`, opacity below the threshold,
/// `visibility: hidden`, a zero-scale transform, or a failed platform check.
pub fn is_hidden<D: RenderedDocument>(doc: &D, node: D::Node, options: &VisibilityOptions) -> Result<bool> {
    let style = doc.computed_style(node)?;
    if style.display == "none"
        || (options.check_opacity && style.opacity < options.opacity_threshold)
        || (options.check_visibility && style.visibility == "hidden")
        || (options.check_transform && is_zero_scale_transform(&style.transform))
    {
        return Ok(true);
    }
    Ok(!doc.check_visibility(node)?)
}

/// Whether the node's rect covers more than [`MIN_VISIBLE_AREA`]
pub fn has_visible_area<D: RenderedDocument>(doc: &D, node: D::Node) -> Result<bool> {
    Ok(doc.bounding_rect(node)?.area() > MIN_VISIBLE_AREA)
}

/// Recursive visibility
///
/// An element is deep-hidden if it is hidden itself, or if it has no visible area
/// and every element child is deep-hidden. A zero-area element with a visible
/// descendant (an overflowing scroll container, say) is not deep-hidden.
///
/// Equivalently, the element is shown iff some chain of non-hidden elements leads
/// from it down to one with visible area. The search keeps its own stack, so
/// arbitrarily deep documents are fine.
pub fn deep_is_hidden<D: RenderedDocument>(doc: &D, node: D::Node, options: &VisibilityOptions) -> Result<bool> {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if is_hidden(doc, current, options)? {
            continue;
        }
        if has_visible_area(doc, current)? {
            return Ok(false);
        }
        let mut children = doc.element_children(current);
        children.reverse();
        stack.extend(children);
    }
    Ok(true)
}

/// Detects transforms that collapse the element to nothing
///
/// Accepts the `scale(0)` shorthand as well as resolved `matrix()` /
/// `matrix3d()` values whose 2D linear part has a zero determinant.
pub fn is_zero_scale_transform(transform: &str) -> bool {
    let transform = transform.trim();
    if transform.contains("scale(0)") {
        return true;
    }
    let (values, a, b, c, d) = if let Some(args) = function_args(transform, "matrix3d") {
        (args, 0, 1, 4, 5)
    } else if let Some(args) = function_args(transform, "matrix") {
        (args, 0, 1, 2, 3)
    } else {
        return false;
    };
    let parsed: Vec<f64> = values
        .split(',')
        .filter_map(|value| value.trim().parse().ok())
        .collect();
    if parsed.len() <= d {
        return false;
    }
    parsed[a] * parsed[d] - parsed[b] * parsed[c] == 0.0
}

fn function_args<'a>(value: &'a str, name: &str) -> Option<&'a str> {
    value
        .strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
}
