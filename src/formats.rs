//! Media types for tracked images
//!
//! An image keeps the media type it was declared with when it was added; a resized
//! image is re-encoded to that same type.

use crate::error::{PackError, Result};
use image::ImageFormat;
use std::fmt;
use std::path::Path;

/// Media types the converter can decode and re-encode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
    Gif,
}

impl MediaType {
    pub fn mime_type(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::WebP => "image/webp",
            MediaType::Bmp => "image/bmp",
            MediaType::Tiff => "image/tiff",
            MediaType::Gif => "image/gif",
        }
    }

    /// Convert to the image crate's ImageFormat
    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            MediaType::Jpeg => ImageFormat::Jpeg,
            MediaType::Png => ImageFormat::Png,
            MediaType::WebP => ImageFormat::WebP,
            MediaType::Bmp => ImageFormat::Bmp,
            MediaType::Tiff => ImageFormat::Tiff,
            MediaType::Gif => ImageFormat::Gif,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(MediaType::Jpeg),
            ImageFormat::Png => Some(MediaType::Png),
            ImageFormat::WebP => Some(MediaType::WebP),
            ImageFormat::Bmp => Some(MediaType::Bmp),
            ImageFormat::Tiff => Some(MediaType::Tiff),
            ImageFormat::Gif => Some(MediaType::Gif),
            _ => None,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            "webp" => Some(MediaType::WebP),
            "bmp" => Some(MediaType::Bmp),
            "tif" | "tiff" => Some(MediaType::Tiff),
            "gif" => Some(MediaType::Gif),
            _ => None,
        }
    }

    /// Declared media type of a dropped file: extension first, then content sniffing.
    pub fn detect(path: &Path, bytes: &[u8]) -> Result<Self> {
        if let Some(media_type) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
        {
            return Ok(media_type);
        }

        image::guess_format(bytes)
            .ok()
            .and_then(MediaType::from_image_format)
            .ok_or_else(|| PackError::UnsupportedFormat(path.display().to_string()))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}
