use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use crate::error::{PackError, Result};
use crate::formats::MediaType;
use crate::store::{AddOutcome, ImageStore};
use crate::validation::validate_input_path;
use crate::{verbose, warn};
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file dropped into the tool: its name, raw bytes and declared media type.
#[derive(Debug, Clone)]
pub struct DroppedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub media_type: MediaType,
}

/// How a set of dropped files landed in the store.
#[derive(Debug, Default)]
pub struct TrackSummary {
    pub added: usize,
    pub reactivated: usize,
    /// Files that never became tracked, with the reason.
    pub rejected: Vec<(PathBuf, PackError)>,
}

/// Resolve one input (file, directory or glob pattern) into image file paths.
pub fn collect_image_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        image_files.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        for entry in walker
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && is_image_file(path) {
                image_files.push(path.to_path_buf());
            }
        }
    } else if let Ok(pattern) = glob(input) {
        for entry in pattern.flatten() {
            if entry.is_file() && is_image_file(&entry) {
                image_files.push(entry);
            }
        }
    } else {
        return Err(PackError::NoImageFilesFound(input.to_string()));
    }

    Ok(image_files)
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read a dropped file. The entry name is the file name without its directory.
pub fn read_dropped_file(path: &Path) -> Result<DroppedFile> {
    validate_input_path(path)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PackError::UnsupportedFormat("Invalid file name".to_string()))?;
    let bytes = fs::read(path)?;
    let media_type = MediaType::detect(path, &bytes)?;

    Ok(DroppedFile {
        name,
        bytes,
        media_type,
    })
}

/// Add every file to `store`. Files that cannot be read or decoded are reported and
/// left out of the store.
pub fn track_files(store: &mut ImageStore, paths: &[PathBuf]) -> TrackSummary {
    let mut summary = TrackSummary::default();

    for path in paths {
        let added = read_dropped_file(path)
            .and_then(|file| store.add(file.name, file.bytes, file.media_type));

        match added {
            Ok(AddOutcome::Added) => {
                verbose!("Tracking {}", path.display());
                summary.added += 1;
            }
            Ok(AddOutcome::Reactivated) => {
                warn!(
                    "{} has the same name as an image already tracked, keeping the first one",
                    path.display()
                );
                summary.reactivated += 1;
            }
            Err(error) => {
                warn!("Dropping {}: {}", path.display(), error);
                summary.rejected.push((path.clone(), error));
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        DynamicImage::new_rgb8(width, height)
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("test.jpg")));
        assert!(is_image_file(Path::new("test.JPEG")));
        assert!(is_image_file(Path::new("test.png")));
        assert!(is_image_file(Path::new("test.webp")));
        assert!(is_image_file(Path::new("test.tif")));
        assert!(is_image_file(Path::new("test.gif")));

        assert!(!is_image_file(Path::new("test.txt")));
        assert!(!is_image_file(Path::new("test")));
        assert!(!is_image_file(Path::new("test.heic")));
    }

    #[test]
    fn test_collect_image_files_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("test.jpg");
        File::create(&test_file).unwrap().write_all(b"fake").unwrap();

        let files = collect_image_files(&test_file.to_string_lossy(), false).unwrap();
        assert_eq!(files, vec![test_file]);
    }

    #[test]
    fn test_collect_image_files_directory() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("b.png")).unwrap();
        File::create(temp_dir.path().join("a.jpg")).unwrap();
        File::create(temp_dir.path().join("notes.txt")).unwrap();
        File::create(temp_dir.path().join(".hidden.png")).unwrap();

        let files = collect_image_files(&temp_dir.path().to_string_lossy(), false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn test_collect_image_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        std::fs::create_dir(&subdir).unwrap();
        File::create(temp_dir.path().join("top.jpg")).unwrap();
        File::create(subdir.join("nested.png")).unwrap();

        let flat = collect_image_files(&temp_dir.path().to_string_lossy(), false).unwrap();
        assert_eq!(flat.len(), 1);

        let deep = collect_image_files(&temp_dir.path().to_string_lossy(), true).unwrap();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_collect_image_files_glob_pattern() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("test1.jpg")).unwrap();
        File::create(temp_dir.path().join("test2.png")).unwrap();
        File::create(temp_dir.path().join("other.txt")).unwrap();

        let pattern = format!("{}/*.jpg", temp_dir.path().to_string_lossy());
        let files = collect_image_files(&pattern, false).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_read_dropped_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("photo.png");
        write_png(&path, 10, 10);

        let file = read_dropped_file(&path).unwrap();
        assert_eq!(file.name, "photo.png");
        assert_eq!(file.media_type, MediaType::Png);
        assert_eq!(file.bytes, std::fs::read(&path).unwrap());
    }

    #[test]
    fn test_track_files_rejects_undecodable() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.png");
        let bad = temp_dir.path().join("bad.png");
        write_png(&good, 10, 10);
        File::create(&bad).unwrap().write_all(b"not a png").unwrap();

        let mut store = ImageStore::new();
        let summary = track_files(&mut store, &[good, bad.clone()]);

        assert_eq!(summary.added, 1);
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(summary.rejected[0].0, bad);
        assert!(matches!(summary.rejected[0].1, PackError::Decode(_, _)));
        assert!(store.get("good.png").is_some());
        assert!(store.get("bad.png").is_none());
    }

    #[test]
    fn test_track_files_same_name_twice() {
        let temp_dir = TempDir::new().unwrap();
        let first_dir = temp_dir.path().join("one");
        let second_dir = temp_dir.path().join("two");
        std::fs::create_dir(&first_dir).unwrap();
        std::fs::create_dir(&second_dir).unwrap();
        write_png(&first_dir.join("same.png"), 4, 4);
        write_png(&second_dir.join("same.png"), 8, 8);

        let mut store = ImageStore::new();
        let summary = track_files(
            &mut store,
            &[first_dir.join("same.png"), second_dir.join("same.png")],
        );

        assert_eq!(summary.added, 1);
        assert_eq!(summary.reactivated, 1);
        assert_eq!(store.get("same.png").unwrap().width, 4);
    }
}
