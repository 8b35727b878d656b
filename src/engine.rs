use image::RgbaImage;
use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{ExportResult, RasterResult};
use crate::export::ImageExporter;
use crate::input::{DispatchMode, TouchBatch, TouchPhase};
use crate::raster::RasterSurface;
use crate::render::DrawContext;
use crate::style::{Argb, StrokeStyle};
use crate::tracker::ContactTracker;

/// Composition root of the drawing surface.
///
/// Driven synchronously by the display surface: input batches go through
/// [`DrawingEngine::on_input_event`], frames through
/// [`DrawingEngine::on_frame`]. Whenever the visible state changes a redraw
/// request is raised, to be collected with
/// [`DrawingEngine::take_redraw_request`].
#[derive(Debug)]
pub struct DrawingEngine {
    raster: RasterSurface,
    tracker: ContactTracker,
    style: StrokeStyle,
    dispatch: DispatchMode,
    redraw_requested: bool,
}

impl Default for DrawingEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl DrawingEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            raster: RasterSurface::new(config.background),
            tracker: ContactTracker::with_tolerance(config.tolerance),
            style: config.stroke,
            dispatch: config.dispatch,
            redraw_requested: false,
        }
    }

    /// Current settings, in a form suitable for persisting
    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            background: self.raster.background(),
            stroke: self.style,
            tolerance: self.tracker.tolerance(),
            dispatch: self.dispatch,
        }
    }

    /// React to the display surface reporting its size.
    ///
    /// A report matching the current size is not a change and keeps the
    /// canvas; any other size reallocates it, losing its content.
    pub fn resize(&mut self, width: u32, height: u32) -> RasterResult<()> {
        if self.raster.size() == Some((width, height)) {
            return Ok(());
        }
        self.raster.resize(width, height)?;
        self.redraw_requested = true;
        Ok(())
    }

    /// Paint the committed raster, then every tracked curve on top of it
    pub fn on_frame<C: DrawContext + ?Sized>(&self, ctx: &mut C) {
        if let Some(view) = self.raster.view() {
            ctx.draw_pixel_buffer(&view, 0.0, 0.0);
        }
        for (_, curve) in self.tracker.curves() {
            if !curve.is_empty() {
                ctx.draw_path(curve, &self.style);
            }
        }
    }

    pub fn on_input_event(&mut self, batch: &TouchBatch) {
        match self.dispatch.classify(batch.action) {
            TouchPhase::Start => match batch.acting_sample() {
                Some(sample) => self.tracker.touch_start(sample.id, sample.pos),
                None => warn!(
                    "{:?} batch has no sample at index {}",
                    batch.action, batch.action_index
                ),
            },
            TouchPhase::End => match batch.acting_sample() {
                Some(sample) => {
                    self.tracker.touch_end(sample.id, &mut self.raster, &self.style);
                }
                None => warn!(
                    "{:?} batch has no sample at index {}",
                    batch.action, batch.action_index
                ),
            },
            TouchPhase::Move => {
                let grown = self.tracker.touch_move_all(&batch.samples);
                debug!("Move extended {} of {} contacts", grown, batch.samples.len());
            }
        }
        self.redraw_requested = true;
    }

    pub fn drawing_color(&self) -> Argb {
        self.style.color
    }

    pub fn set_drawing_color(&mut self, color: Argb) {
        self.style.color = color;
        self.redraw_requested = true;
    }

    pub fn stroke_width(&self) -> f32 {
        self.style.width
    }

    /// Expected to be positive; not validated.
    pub fn set_stroke_width(&mut self, width: f32) {
        self.style.width = width;
        self.redraw_requested = true;
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Drop every curve and wipe the canvas
    pub fn clear(&mut self) {
        self.tracker.clear(&mut self.raster);
        self.redraw_requested = true;
        info!("Canvas cleared");
    }

    /// Copy of the committed canvas (active curves are not included)
    pub fn export(&self) -> RasterResult<RgbaImage> {
        self.raster.export()
    }

    /// Export the canvas through `exporter`, leaving the engine untouched
    pub fn save_with<E: ImageExporter + ?Sized>(&self, exporter: &mut E) -> ExportResult<E::Output> {
        let snapshot = self.raster.export()?;
        exporter.export(&snapshot)
    }

    pub fn tracker(&self) -> &ContactTracker {
        &self.tracker
    }

    pub fn raster(&self) -> &RasterSurface {
        &self.raster
    }

    /// Whether a redraw was requested since the last call
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}
