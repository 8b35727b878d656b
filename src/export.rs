use std::fs::OpenOptions;
use std::io::{Cursor, ErrorKind, Write};
use std::path::PathBuf;

use image::RgbaImage;
use image::codecs::jpeg::JpegEncoder;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ExportResult;
use crate::util::time;

/// Encoded representation handed to the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Png,
    /// Lossy, alpha is dropped. Quality is clamped to 1..=100.
    Jpeg { quality: u8 },
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

/// Encode a raster snapshot in memory
pub fn encode(snapshot: &RgbaImage, format: ExportFormat) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Png => {
            snapshot.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        }
        ExportFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(snapshot.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).encode_image(&rgb)?;
        }
    }
    Ok(bytes)
}

/// Destination for exported canvases (file system, gallery, clipboard...).
///
/// Exporters receive a copy of the raster and never touch the engine; retry
/// policy, if any, belongs to the implementation.
pub trait ImageExporter {
    type Output;

    fn export(&mut self, snapshot: &RgbaImage) -> ExportResult<Self::Output>;
}

/// How many `-N` suffixes are tried before a name clash is reported
const MAX_NAME_SUFFIX: u32 = 99;

/// Writes `<prefix><millis>.<ext>` files into a directory.
///
/// Existing files are never overwritten: a clash gets a `-1`, `-2`, ...
/// suffix instead.
#[derive(Debug, Clone)]
pub struct FileExporter {
    directory: PathBuf,
    prefix: String,
    format: ExportFormat,
}

impl FileExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: "FingerPaint".to_owned(),
            format: ExportFormat::default(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    fn candidate_path(&self, stem: &str, suffix: u32) -> PathBuf {
        let extension = self.format.extension();
        let name = if suffix == 0 {
            format!("{}.{}", stem, extension)
        } else {
            format!("{}-{}.{}", stem, suffix, extension)
        };
        self.directory.join(name)
    }
}

impl ImageExporter for FileExporter {
    type Output = PathBuf;

    fn export(&mut self, snapshot: &RgbaImage) -> ExportResult<PathBuf> {
        let bytes = encode(snapshot, self.format)?;
        let stem = format!("{}{}", self.prefix, time::timestamp_millis());
        let mut suffix = 0;
        loop {
            let path = self.candidate_path(&stem, suffix);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&bytes)?;
                    info!("Saved {}x{} image to {}", snapshot.width(), snapshot.height(), path.display());
                    return Ok(path);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists && suffix < MAX_NAME_SUFFIX => {
                    suffix += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Keeps encoded images in memory, e.g. for sharing through a clipboard
#[derive(Debug, Clone, Default)]
pub struct MemoryExporter {
    format: ExportFormat,
    images: Vec<Vec<u8>>,
}

impl MemoryExporter {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            images: Vec::new(),
        }
    }

    pub fn images(&self) -> &[Vec<u8>] {
        &self.images
    }
}

impl ImageExporter for MemoryExporter {
    type Output = usize;

    /// Returns the index of the stored image
    fn export(&mut self, snapshot: &RgbaImage) -> ExportResult<usize> {
        self.images.push(encode(snapshot, self.format)?);
        Ok(self.images.len() - 1)
    }
}
