use crate::error::{Result, SnapshotError};
use crate::highlight::{HighlightBox, OverlayLayer};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::io::Cursor;

const BORDER_WIDTH: u32 = 2;
const LABEL_HEIGHT: u32 = 12;
const LABEL_FONT_SIZE: f32 = 10.0;

/// Overlay painted onto a page screenshot
///
/// The untouched screenshot is kept so every redraw starts from a clean image.
/// Labels are drawn as coloured tabs; the reference number is written into them
/// when a font is supplied.
pub struct ScreenshotOverlay<'f> {
    base: RgbaImage,
    canvas: RgbaImage,
    font: Option<Font<'f>>,
    /// Device pixels per layout unit
    scale: f64,
}

impl<'f> ScreenshotOverlay<'f> {
    pub fn new(screenshot: RgbaImage) -> Self {
        Self {
            canvas: screenshot.clone(),
            base: screenshot,
            font: None,
            scale: 1.0,
        }
    }

    /// Decode an encoded screenshot (PNG, JPEG...)
    pub fn from_encoded(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(image::load_from_memory(bytes)?.to_rgba8()))
    }

    /// Builder method: set the label font
    pub fn with_font(mut self, font: Font<'f>) -> Self {
        self.font = Some(font);
        self
    }

    /// Builder method: set the label font from TrueType/OpenType bytes
    pub fn with_font_bytes(self, bytes: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(bytes).ok_or(SnapshotError::InvalidFont)?;
        Ok(self.with_font(font))
    }

    /// Builder method: set the device pixel ratio of the screenshot
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Current overlay image
    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(self.canvas.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
        Ok(bytes)
    }

    /// PNG encoded as base64, ready for an image content block
    pub fn to_base64_png(&self) -> Result<String> {
        Ok(STANDARD.encode(self.to_png()?))
    }

    fn scaled(&self, value: f64) -> i32 {
        (value * self.scale).round() as i32
    }

    fn draw_box<N>(&mut self, highlight: &HighlightBox<N>) {
        let [r, g, b] = highlight.color.to_rgb();
        let color = Rgba([r, g, b, 255]);
        let x = self.scaled(highlight.rect.x);
        let y = self.scaled(highlight.rect.y);
        let width = self.scaled(highlight.rect.width);
        let height = self.scaled(highlight.rect.height);
        if width < 1 || height < 1 {
            return;
        }

        for inset in 0..BORDER_WIDTH as i32 {
            let inner_width = width - 2 * inset;
            let inner_height = height - 2 * inset;
            if inner_width < 1 || inner_height < 1 {
                break;
            }
            let rect = Rect::at(x + inset, y + inset).of_size(inner_width as u32, inner_height as u32);
            draw_hollow_rect_mut(&mut self.canvas, rect, color);
        }

        let label = highlight.node_ref.to_string();
        let label_width = 6 * label.len() as u32 + 4;
        let label_y = y - LABEL_HEIGHT as i32 / 2;
        draw_filled_rect_mut(
            &mut self.canvas,
            Rect::at(x, label_y).of_size(label_width, LABEL_HEIGHT),
            color,
        );
        if let Some(font) = &self.font {
            draw_text_mut(
                &mut self.canvas,
                Rgba([255, 255, 255, 255]),
                x + 2,
                label_y + 1,
                Scale::uniform(LABEL_FONT_SIZE),
                font,
                &label,
            );
        }
    }
}

impl<N> OverlayLayer<N> for ScreenshotOverlay<'_> {
    fn redraw(&mut self, boxes: &[HighlightBox<N>]) -> Result<()> {
        self.canvas = self.base.clone();
        for highlight in boxes {
            self.draw_box(highlight);
        }
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        self.canvas = self.base.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::BoundingBox;
    use crate::highlight::HighlightColor;

    fn blank() -> RgbaImage {
        RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]))
    }

    fn highlight(node_ref: u32, x: f64, y: f64) -> HighlightBox<()> {
        HighlightBox {
            node_ref,
            node: (),
            rect: BoundingBox::new(x, y, 20.0, 20.0),
            color: HighlightColor::for_ref(node_ref),
        }
    }

    fn color_of(node_ref: u32) -> Rgba<u8> {
        let [r, g, b] = HighlightColor::for_ref(node_ref).to_rgb();
        Rgba([r, g, b, 255])
    }

    #[test]
    fn test_redraw_draws_border() {
        let mut overlay = ScreenshotOverlay::new(blank());
        overlay.redraw(&[highlight(1, 10.0, 20.0)]).unwrap();

        // bottom edge and inner border line
        assert_eq!(*overlay.image().get_pixel(20, 39), color_of(1));
        assert_eq!(*overlay.image().get_pixel(20, 38), color_of(1));
        assert_eq!(*overlay.image().get_pixel(20, 30), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_redraw_replaces_previous_boxes() {
        let mut overlay = ScreenshotOverlay::new(blank());
        overlay.redraw(&[highlight(1, 10.0, 20.0)]).unwrap();
        overlay.redraw(&[highlight(2, 60.0, 60.0)]).unwrap();

        assert_eq!(*overlay.image().get_pixel(20, 39), Rgba([255, 255, 255, 255]));
        assert_eq!(*overlay.image().get_pixel(70, 79), color_of(2));
    }

    #[test]
    fn test_remove_restores_screenshot() {
        let mut overlay = ScreenshotOverlay::new(blank()).with_scale(2.0);
        overlay.redraw(&[highlight(3, 5.0, 5.0)]).unwrap();
        assert_ne!(overlay.image(), &blank());

        OverlayLayer::<()>::remove(&mut overlay).unwrap();
        assert_eq!(overlay.image(), &blank());
    }

    #[test]
    fn test_png_round_trip() {
        let overlay = ScreenshotOverlay::new(blank());
        let png = overlay.to_png().unwrap();
        let decoded = ScreenshotOverlay::from_encoded(&png).unwrap();
        assert_eq!(decoded.image(), &blank());
        assert!(!overlay.to_base64_png().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_font_rejected() {
        let result = ScreenshotOverlay::new(blank()).with_font_bytes(vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(SnapshotError::InvalidFont)));
    }
}
