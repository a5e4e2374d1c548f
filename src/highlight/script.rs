use crate::dom::NodeId;
use crate::error::{Result, SnapshotError};
use crate::highlight::{HighlightBox, OverlayLayer};
use headless_chrome::Tab;
use serde_json::json;
use std::sync::Arc;

/// Id of the overlay container injected into the page
pub const HIGHLIGHT_CONTAINER_ID: &str = "page-snapshot-highlight";

const DRAW_SCRIPT: &str = r#"
(function (containerId, boxes) {
    let container = document.getElementById(containerId);
    if (!container) {
        container = document.createElement('div');
        container.id = containerId;
        container.style.position = 'fixed';
        container.style.pointerEvents = 'none';
        container.style.top = '0';
        container.style.left = '0';
        container.style.width = '100%';
        container.style.height = '100%';
        container.style.zIndex = '2147483646';
        document.documentElement.appendChild(container);
    }
    container.innerHTML = '';
    const live = window.__pageSnapshotNodes || [];
    for (const box of boxes) {
        const node = live[box.node];
        const rect = node instanceof Element ? node.getBoundingClientRect() : {
            top: box.rect.y, left: box.rect.x, width: box.rect.width, height: box.rect.height,
        };
        const overlay = document.createElement('div');
        container.appendChild(overlay);
        overlay.style.position = 'absolute';
        overlay.style.top = `${rect.top}px`;
        overlay.style.left = `${rect.left}px`;
        overlay.style.width = `${rect.width}px`;
        overlay.style.height = `${rect.height}px`;
        overlay.style.border = `2px solid ${box.color}`;
        const label = document.createElement('div');
        overlay.appendChild(label);
        label.style.position = 'absolute';
        label.style.bottom = '100%';
        label.style.left = '0';
        label.style.backgroundColor = box.color;
        label.style.color = 'white';
        label.style.fontSize = '10px';
        label.style.fontFamily = 'monospace';
        label.style.fontWeight = 'normal';
        label.style.fontStyle = 'normal';
        label.style.opacity = '0.8';
        label.style.padding = '0 2px';
        label.style.transform = 'translateY(50%)';
        label.textContent = String(box.ref);
    }
    return boxes.length;
})"#;

const REMOVE_SCRIPT: &str = r#"
(function (containerId) {
    const container = document.getElementById(containerId);
    if (container) {
        container.remove();
    }
    return true;
})"#;

/// Overlay drawn into a live browser tab
///
/// Boxes are positioned with the live rects of the nodes registered by the capture
/// script, falling back to the captured rects when a node is gone.
pub struct TabOverlay {
    tab: Arc<Tab>,
}

impl TabOverlay {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    fn evaluate(&self, script: &str) -> Result<()> {
        self.tab
            .evaluate(script, false)
            .map_err(|e| SnapshotError::EvaluationFailed(format!("Failed to update highlight overlay: {}", e)))?;
        Ok(())
    }
}

/// Script that clears the overlay container and draws `boxes`
pub fn redraw_script(boxes: &[HighlightBox<NodeId>]) -> Result<String> {
    let payload: Vec<_> = boxes
        .iter()
        .map(|b| {
            json!({
                "ref": b.node_ref,
                "node": b.node.0,
                "rect": b.rect,
                "color": b.color.css(),
            })
        })
        .collect();
    Ok(format!(
        "{}({}, {})",
        DRAW_SCRIPT,
        serde_json::to_string(HIGHLIGHT_CONTAINER_ID)?,
        serde_json::to_string(&payload)?
    ))
}

/// Script that removes the overlay container
pub fn remove_script() -> Result<String> {
    Ok(format!(
        "{}({})",
        REMOVE_SCRIPT,
        serde_json::to_string(HIGHLIGHT_CONTAINER_ID)?
    ))
}

impl OverlayLayer<NodeId> for TabOverlay {
    fn redraw(&mut self, boxes: &[HighlightBox<NodeId>]) -> Result<()> {
        self.evaluate(&redraw_script(boxes)?)
    }

    fn remove(&mut self) -> Result<()> {
        self.evaluate(&remove_script()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::BoundingBox;
    use crate::highlight::HighlightColor;

    #[test]
    fn test_redraw_script_embeds_boxes() {
        let boxes = vec![HighlightBox {
            node_ref: 12,
            node: NodeId(40),
            rect: BoundingBox::new(1.0, 2.0, 3.0, 4.0),
            color: HighlightColor::for_ref(12),
        }];

        let script = redraw_script(&boxes).unwrap();

        assert!(script.contains("container.innerHTML = ''"));
        assert!(script.contains(r#""ref":12"#));
        assert!(script.contains(r#""node":40"#));
        assert!(script.contains(&HighlightColor::for_ref(12).css()));
        assert!(script.trim_end().ends_with(")"));
    }

    #[test]
    fn test_remove_script_targets_container() {
        let script = remove_script().unwrap();
        assert!(script.contains(r#"("page-snapshot-highlight")"#));
    }
}
