//! Visual grounding overlay
//!
//! Draws one bordered box and a reference label per content node of a snapshot.
//! Pure containers (non-leaves whose children are all elements) are not boxed.
//! Each layer is cleared and rebuilt on every redraw.

pub mod raster;
pub mod script;

pub use raster::ScreenshotOverlay;
pub use script::TabOverlay;

use crate::dom::{BoundingBox, NodeKind, RenderedDocument};
use crate::error::Result;
use crate::snapshot::{LookupTable, SnapshotItem};

/// Golden-angle hue step applied per reference
const HUE_STEP: f64 = 120.0 * 0.382;

/// Colour derived from a reference number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightColor {
    pub hue: f64,
}

/// One box of the overlay
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightBox<N> {
    pub node_ref: u32,
    pub node: N,
    pub rect: BoundingBox,
    pub color: HighlightColor,
}

/// A surface the overlay is drawn onto
pub trait OverlayLayer<N> {
    /// Clear the layer and draw exactly `boxes`
    fn redraw(&mut self, boxes: &[HighlightBox<N>]) -> Result<()>;

    /// Tear the layer down entirely
    fn remove(&mut self) -> Result<()>;
}

impl HighlightColor {
    pub fn for_ref(node_ref: u32) -> Self {
        Self {
            hue: (node_ref as f64 * HUE_STEP) % 360.0,
        }
    }

    /// CSS colour, `hsl(h, 85%, 50%)`
    pub fn css(&self) -> String {
        format!("hsl({}, 85%, 50%)", self.hue)
    }

    /// The same colour as 8-bit RGB
    pub fn to_rgb(&self) -> [u8; 3] {
        hsl_to_rgb(self.hue, 0.85, 0.5)
    }
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [u8; 3] {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |value: f64| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [channel(r), channel(g), channel(b)]
}

/// Whether a snapshot item gets its own box
pub fn is_content_node(item: &SnapshotItem) -> bool {
    item.leaf || !item.children.iter().all(SnapshotItem::is_element)
}

/// Collect the boxes for every content node, reading current rects from the document
pub fn highlight_boxes<D: RenderedDocument>(
    doc: &D,
    snapshot: &SnapshotItem,
    lookup: &LookupTable<D::Node>,
) -> Result<Vec<HighlightBox<D::Node>>> {
    let mut boxes = Vec::new();
    let mut stack = vec![snapshot];
    while let Some(item) = stack.pop() {
        stack.extend(item.children.iter().rev());
        if !is_content_node(item) {
            continue;
        }
        let Some(node) = lookup.get(item.node_ref) else {
            continue;
        };
        if doc.node_kind(node) != NodeKind::Element {
            continue;
        }
        boxes.push(HighlightBox {
            node_ref: item.node_ref,
            node,
            rect: doc.bounding_rect(node)?,
            color: HighlightColor::for_ref(item.node_ref),
        });
    }
    Ok(boxes)
}

/// Clear `layer` and draw the overlay for `snapshot`; returns the number of boxes
pub fn highlight_snapshot<D, L>(
    layer: &mut L,
    doc: &D,
    snapshot: &SnapshotItem,
    lookup: &LookupTable<D::Node>,
) -> Result<usize>
where
    D: RenderedDocument,
    L: OverlayLayer<D::Node>,
{
    let boxes = highlight_boxes(doc, snapshot, lookup)?;
    layer.redraw(&boxes)?;
    log::debug!("Highlighted {} snapshot nodes", boxes.len());
    Ok(boxes.len())
}

pub fn remove_highlight<N, L: OverlayLayer<N>>(layer: &mut L) -> Result<()> {
    layer.remove()
}
