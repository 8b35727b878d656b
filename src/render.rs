use tiny_skia::{Pixmap, PixmapPaint, PixmapRef, Transform};

use crate::curve::Curve;
use crate::error::{RasterError, RasterResult};
use crate::style::{Argb, StrokeStyle};

/// Borrowed view of a raster buffer: premultiplied RGBA8, row-major, no padding.
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

/// What the engine needs from the display surface to paint one frame.
///
/// Per frame the engine issues a single `draw_pixel_buffer` followed by zero
/// or more `draw_path` calls. Paths are stroked with round caps and
/// anti-aliasing.
pub trait DrawContext {
    fn draw_pixel_buffer(&mut self, buffer: &RasterView<'_>, x: f32, y: f32);

    fn draw_path(&mut self, curve: &Curve, style: &StrokeStyle);
}

/// Software draw context compositing a frame into an owned pixmap.
pub struct PixmapCanvas {
    pixmap: Pixmap,
}

impl PixmapCanvas {
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::AllocationFailed { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    /// Fill the frame, mostly useful before compositing a partial buffer
    pub fn fill(&mut self, color: Argb) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Frame contents as an egui texture image
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_premultiplied(
            [self.pixmap.width() as usize, self.pixmap.height() as usize],
            self.pixmap.data(),
        )
    }
}

impl DrawContext for PixmapCanvas {
    fn draw_pixel_buffer(&mut self, buffer: &RasterView<'_>, x: f32, y: f32) {
        let Some(source) = PixmapRef::from_bytes(buffer.data, buffer.width, buffer.height) else {
            log::warn!("Skipping malformed {}x{} pixel buffer", buffer.width, buffer.height);
            return;
        };
        self.pixmap.draw_pixmap(
            x as i32,
            y as i32,
            source,
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn draw_path(&mut self, curve: &Curve, style: &StrokeStyle) {
        if let Some(path) = curve.to_path() {
            self.pixmap.stroke_path(&path, &style.paint(), &style.stroke(), Transform::identity(), None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_canvas_rejects_zero_size() {
        assert!(PixmapCanvas::new(0, 5).is_err());
    }

    #[test]
    fn test_draw_pixel_buffer_copies_pixels() {
        let mut source = Pixmap::new(4, 4).unwrap();
        source.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));
        let view = RasterView { width: 4, height: 4, data: source.data() };

        let mut canvas = PixmapCanvas::new(4, 4).unwrap();
        canvas.draw_pixel_buffer(&view, 0.0, 0.0);
        assert_eq!(canvas.pixel(2, 2), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_malformed_buffer_is_ignored() {
        let data = [0u8; 7];
        let view = RasterView { width: 4, height: 4, data: &data };
        let mut canvas = PixmapCanvas::new(4, 4).unwrap();
        canvas.fill(Argb::WHITE);
        canvas.draw_pixel_buffer(&view, 0.0, 0.0);
        assert_eq!(canvas.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_draw_path_strokes_curve() {
        let mut canvas = PixmapCanvas::new(40, 40).unwrap();
        canvas.fill(Argb::WHITE);
        let mut curve = Curve::new();
        curve.move_to(pos2(5.0, 20.0));
        curve.quad_to(pos2(5.0, 20.0), pos2(35.0, 20.0));
        canvas.draw_path(&curve, &StrokeStyle::new(Argb::BLACK, 6.0));

        assert_eq!(canvas.pixel(20, 20), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(20, 5), Some([255, 255, 255, 255]));
    }
}
