use crate::constants::{
    DEFAULT_MAX_EXPONENT, DEFAULT_QUALITY, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL,
    MAX_EXPONENT, MAX_IMAGE_DIMENSION, MAX_QUALITY, MIN_QUALITY, OXIPNG_PRESET,
    ZOPFLI_ITERATIONS,
};
use crate::error::{PackError, Result};
use crate::formats::MediaType;
use crate::sizing::SizePlan;
use crate::store::TrackedImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, ImageReader};
use oxipng::{Deflaters, Options};
use std::io::Cursor;
use std::num::NonZeroU8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Ceiling exponent; the larger output side never exceeds `2^max_exponent`.
    pub max_exponent: u32,
    pub quality: u8,
}

impl ConvertOptions {
    pub fn new(max_exponent: Option<u32>, quality: Option<u8>) -> Result<Self> {
        let max_exponent = max_exponent.unwrap_or(DEFAULT_MAX_EXPONENT);
        if max_exponent > MAX_EXPONENT {
            return Err(PackError::InvalidExponent(max_exponent, MAX_EXPONENT));
        }

        let quality = quality.unwrap_or(DEFAULT_QUALITY);
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(PackError::InvalidQuality(quality));
        }

        Ok(Self {
            max_exponent,
            quality,
        })
    }

    /// Effective size ceiling in pixels.
    pub fn ceiling(&self) -> u32 {
        1 << self.max_exponent
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_exponent: DEFAULT_MAX_EXPONENT,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Decodes an image payload.
///
/// The format is sniffed from the content, falling back to the declared media
/// type when the bytes carry no recognizable signature.
///
/// # Errors
/// * `PackError::Decode` if the payload is not a decodable image or is larger than
///   `MAX_IMAGE_DIMENSION` on either side
pub fn decode_image(name: &str, bytes: &[u8], media_type: MediaType) -> Result<DynamicImage> {
    let decode_error = |reason: String| PackError::Decode(name.to_string(), reason);

    let mut reader = ImageReader::new(Cursor::new(bytes));
    reader.set_format(media_type.to_image_format());
    let img = reader
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?
        .decode()
        .map_err(|e| decode_error(e.to_string()))?;

    let (width, height) = img.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(decode_error(format!(
            "dimensions {}x{} exceed maximum {}x{}",
            width, height, MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION
        )));
    }

    Ok(img)
}

/// Renders `img` at the planned size with a Lanczos3 filter.
pub fn rasterize(img: &DynamicImage, plan: &SizePlan) -> DynamicImage {
    img.resize_exact(plan.width, plan.height, FilterType::Lanczos3)
}

/// Serializes a raster into a compressed payload of the given media type.
///
/// JPEG honours `quality` directly. PNG output goes through oxipng, with the
/// deflater picked from the quality tier. The remaining types use the `image`
/// crate's encoders on an 8-bit copy of the raster.
pub fn encode_blob(
    name: &str,
    raster: &DynamicImage,
    media_type: MediaType,
    quality: u8,
) -> Result<Vec<u8>> {
    let encode_error = |reason: String| PackError::Encode(name.to_string(), reason);

    match media_type {
        MediaType::Jpeg => {
            let rgb = raster.to_rgb8();
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut buf, quality)
                .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(|e| encode_error(e.to_string()))?;
            Ok(buf)
        }
        MediaType::Png => {
            let mut buf = Vec::new();
            raster
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| encode_error(e.to_string()))?;

            oxipng::optimize_from_memory(&buf, &png_options(quality))
                .map_err(|e| encode_error(e.to_string()))
        }
        MediaType::Tiff => {
            let mut buf = Vec::new();
            tiff_raster(raster)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Tiff)
                .map_err(|e| encode_error(e.to_string()))?;
            Ok(buf)
        }
        MediaType::WebP | MediaType::Bmp | MediaType::Gif => {
            let rgba = DynamicImage::ImageRgba8(raster.to_rgba8());
            let mut buf = Vec::new();
            rgba.write_to(&mut Cursor::new(&mut buf), media_type.to_image_format())
                .map_err(|e| encode_error(e.to_string()))?;
            Ok(buf)
        }
    }
}

/// The TIFF encoder has no grayscale+alpha layout, so those rasters are widened to RGBA.
fn tiff_raster(raster: &DynamicImage) -> DynamicImage {
    match raster {
        DynamicImage::ImageLumaA8(_) => DynamicImage::ImageRgba8(raster.to_rgba8()),
        DynamicImage::ImageLumaA16(_) => DynamicImage::ImageRgba16(raster.to_rgba16()),
        other => other.clone(),
    }
}

fn png_options(quality: u8) -> Options {
    let mut options = Options::from_preset(OXIPNG_PRESET);

    options.deflate = if quality >= 90 {
        Deflaters::Zopfli {
            iterations: NonZeroU8::new(ZOPFLI_ITERATIONS).unwrap_or(NonZeroU8::MIN),
        }
    } else if quality >= 70 {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    };

    options
}

/// Blocking conversion of one tracked image: decode -> rasterize -> encode.
///
/// The decoded image and the raster are dropped before returning, on the error
/// path as well.
pub fn convert_image(
    image: &TrackedImage,
    plan: &SizePlan,
    options: &ConvertOptions,
) -> Result<Vec<u8>> {
    let decoded = decode_image(&image.name, &image.bytes, image.media_type)?;
    let raster = rasterize(&decoded, plan);
    drop(decoded);

    encode_blob(&image.name, &raster, image.media_type, options.quality)
}
