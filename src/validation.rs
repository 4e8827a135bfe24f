use crate::constants::MAX_FILE_SIZE;
use crate::error::{PackError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Validate an input file before its bytes are read
pub fn validate_input_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(PackError::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(PackError::UnsupportedFormat(format!(
            "{} is not a file",
            path.display()
        )));
    }

    let size = fs::metadata(path)?.len();
    if size > MAX_FILE_SIZE {
        return Err(PackError::FileTooLarge(size, MAX_FILE_SIZE));
    }

    Ok(())
}

/// Create the output directory if needed and return its canonical path
pub fn prepare_output_dir(path: &Path) -> Result<PathBuf> {
    fs::create_dir_all(path)
        .map_err(|_| PackError::DirectoryCreationFailed(path.to_path_buf()))?;
    path.canonicalize()
        .map_err(|_| PackError::DirectoryCreationFailed(path.to_path_buf()))
}
