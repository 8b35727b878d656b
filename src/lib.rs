#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod export;
pub mod input;
pub mod raster;
pub mod render;
pub mod style;
pub mod tracker;
pub mod util;

pub use app::FingerPaintApp;
pub use config::EngineConfig;
pub use curve::{Curve, PathCommand};
pub use engine::DrawingEngine;
pub use error::{ExportError, RasterError};
pub use export::{ExportFormat, FileExporter, ImageExporter};
pub use input::{ContactId, DispatchMode, TouchAction, TouchBatch, TouchSample};
pub use raster::RasterSurface;
pub use render::{DrawContext, PixmapCanvas, RasterView};
pub use style::{Argb, StrokeStyle};
pub use tracker::{ContactTracker, TOUCH_TOLERANCE};
