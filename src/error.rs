use thiserror::Error;

/// Errors raised by the persistent raster surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Could not allocate a {width}x{height} pixel buffer")]
    AllocationFailed { width: u32, height: u32 },

    #[error("Surface has not been sized yet")]
    Unallocated,
}

/// Errors that can occur while handing the raster to an exporter
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: {0}")]
    Raster(#[from] RasterError),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

pub type RasterResult<T> = Result<T, RasterError>;
pub type ExportResult<T> = Result<T, ExportError>;
