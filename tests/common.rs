#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    }))
}

pub fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = match format {
        ImageFormat::Gif => DynamicImage::ImageRgba8(gradient(width, height).to_rgba8()),
        _ => gradient(width, height),
    };
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

/// Write a real image of the given size; the format follows the file extension.
pub fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let format = ImageFormat::from_path(&path).unwrap();
    std::fs::write(&path, encode(width, height, format)).unwrap();
    path
}

pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    File::create(&path)
        .unwrap()
        .write_all(b"this is not an image")
        .unwrap();
    path
}

/// Entry names and payloads of a zip archive, in archive order.
pub fn read_zip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut payload = Vec::new();
            file.read_to_end(&mut payload).unwrap();
            (file.name().to_string(), payload)
        })
        .collect()
}

/// The single `pot-images-*.zip` written into `dir`.
pub fn find_archive(dir: &Path) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| {
            let name = path.file_name().unwrap().to_string_lossy();
            name.starts_with("pot-images-") && name.ends_with(".zip")
        })
}
