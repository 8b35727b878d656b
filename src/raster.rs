use image::RgbaImage;
use log::{debug, info};
use tiny_skia::{Pixmap, Transform};

use crate::curve::Curve;
use crate::error::{RasterError, RasterResult};
use crate::render::RasterView;
use crate::style::{Argb, StrokeStyle};

/// The persistent canvas that finished curves are flattened into.
///
/// The buffer is always fully opaque: it is created filled with the
/// background colour and strokes are only ever composited on top of it.
/// Until the owning display surface reports its first size the surface is
/// unallocated and drawing into it does nothing.
#[derive(Debug)]
pub struct RasterSurface {
    pixmap: Option<Pixmap>,
    background: Argb,
}

impl RasterSurface {
    pub fn new(background: Argb) -> Self {
        Self {
            pixmap: None,
            background: background.opaque(),
        }
    }

    pub fn with_size(width: u32, height: u32, background: Argb) -> RasterResult<Self> {
        let mut surface = Self::new(background);
        surface.resize(width, height)?;
        Ok(surface)
    }

    /// Reallocate the buffer at the new size, filled with the background.
    ///
    /// Prior content is discarded. On error the previous buffer is kept.
    pub fn resize(&mut self, width: u32, height: u32) -> RasterResult<()> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::AllocationFailed { width, height })?;
        pixmap.fill(self.background.to_skia());
        self.pixmap = Some(pixmap);
        info!("Raster surface resized to {}x{}", width, height);
        Ok(())
    }

    pub fn is_allocated(&self) -> bool {
        self.pixmap.is_some()
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.pixmap.as_ref().map(|pixmap| (pixmap.width(), pixmap.height()))
    }

    pub fn background(&self) -> Argb {
        self.background
    }

    /// Permanently draw `curve` with `style`.
    ///
    /// Returns whether anything was drawn: a curve without segments or an
    /// unallocated surface leaves the buffer untouched.
    pub fn flatten(&mut self, curve: &Curve, style: &StrokeStyle) -> bool {
        let Some(pixmap) = self.pixmap.as_mut() else {
            debug!("Dropping curve flattened before the surface was sized");
            return false;
        };
        let Some(path) = curve.to_path() else {
            return false;
        };
        pixmap.stroke_path(&path, &style.paint(), &style.stroke(), Transform::identity(), None);
        true
    }

    /// Refill the whole buffer with the background colour
    pub fn clear(&mut self) {
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill(self.background.to_skia());
        }
    }

    /// Borrow the current buffer for compositing
    pub fn view(&self) -> Option<RasterView<'_>> {
        self.pixmap.as_ref().map(|pixmap| RasterView {
            width: pixmap.width(),
            height: pixmap.height(),
            data: pixmap.data(),
        })
    }

    /// Straight-alpha RGBA8 value of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Copy the buffer out for an exporter.
    pub fn export(&self) -> RasterResult<RgbaImage> {
        let pixmap = self.pixmap.as_ref().ok_or(RasterError::Unallocated)?;
        let (width, height) = (pixmap.width(), pixmap.height());
        let mut data = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        RgbaImage::from_raw(width, height, data).ok_or(RasterError::AllocationFailed { width, height })
    }
}
