pub const DEFAULT_QUALITY: u8 = 80;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Ceiling exponent used when none is given: 2^8 = 256 px.
pub const DEFAULT_MAX_EXPONENT: u32 = 8;
/// Largest accepted ceiling exponent: 2^14 = 16384 px.
pub const MAX_EXPONENT: u32 = 14;

/// Maximum input file size in bytes (100MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
/// Maximum natural width or height accepted when an image is added.
pub const MAX_IMAGE_DIMENSION: u32 = 16384;

pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;
pub const OXIPNG_PRESET: u8 = 4;

pub const ARCHIVE_PREFIX: &str = "pot-images-";
pub const ARCHIVE_EXTENSION: &str = "zip";

pub const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] =
    &["jpg", "jpeg", "png", "webp", "bmp", "tiff", "tif", "gif"];
