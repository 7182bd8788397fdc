use crate::source::Source;
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A fetched image, ready to be handed to a [`crate::WallpaperManager`].
#[derive(Debug, Clone)]
pub struct ImageReference {
    pub path: PathBuf,
    pub url: Option<String>,
    pub source: Source,
    pub dimensions: Option<(u32, u32)>,
}

impl ImageReference {
    pub fn local(path: PathBuf, source: Source, dimensions: (u32, u32)) -> Self {
        Self {
            path,
            url: None,
            source,
            dimensions: Some(dimensions),
        }
    }

    pub fn remote(path: PathBuf, url: String, source: Source, dimensions: (u32, u32)) -> Self {
        Self {
            path,
            url: Some(url),
            source,
            dimensions: Some(dimensions),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinResolution {
    pub width: u32,
    pub height: u32,
}

impl MinResolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Compares long side with long side and short with short, so a
    /// 1920x1080 minimum also admits a 1080x1920 portrait image.
    pub fn allows(&self, (width, height): (u32, u32)) -> bool {
        width.max(height) >= self.width.max(self.height)
            && width.min(height) >= self.width.min(self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
    Any,
}

impl Orientation {
    /// Square images count as both.
    pub fn allows(&self, (width, height): (u32, u32)) -> bool {
        match self {
            Orientation::Landscape => width >= height,
            Orientation::Portrait => height >= width,
            Orientation::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub dimensions: (u32, u32),
}

impl ImageInfo {
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("jpg")
    }
}

/// Reads just enough of `path` to learn its format and size. Returns `None`
/// for anything that is not a JPEG or PNG image.
pub fn inspect_image(path: &Path) -> Option<ImageInfo> {
    let reader = ImageReader::open(path).ok()?.with_guessed_format().ok()?;
    let format = reader.format()?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return None;
    }
    let dimensions = reader.into_dimensions().ok()?;
    Some(ImageInfo { format, dimensions })
}
