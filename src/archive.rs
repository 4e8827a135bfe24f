//! Archive assembly for a finished batch.
//!
//! The converter only talks to the [`ArchiveBuilder`] two-step contract: add named
//! entries, then finalize into one binary. [`ZipArchiveBuilder`] is the zip-backed
//! implementation used by the CLI.

use crate::batch::ConversionResult;
use crate::constants::{ARCHIVE_EXTENSION, ARCHIVE_PREFIX};
use crate::error::{PackError, Result};
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub trait ArchiveBuilder {
    /// Store `payload` byte-for-byte under `name`.
    fn add_entry(&mut self, name: &str, payload: &[u8]) -> Result<()>;

    /// Close the archive and return its bytes.
    fn finalize(self) -> Result<Vec<u8>>;
}

pub struct ZipArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
    options: SimpleFileOptions,
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        // Fixed entry timestamps keep archives byte-identical across runs.
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
            options,
        }
    }
}

impl Default for ZipArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn add_entry(&mut self, name: &str, payload: &[u8]) -> Result<()> {
        if !self.names.insert(name.to_string()) {
            return Err(PackError::DuplicateEntry(name.to_string()));
        }
        self.writer.start_file(name, self.options)?;
        self.writer.write_all(payload)?;
        Ok(())
    }

    fn finalize(self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Feeds every result into `builder` once and finalizes it.
pub fn pack_archive<B: ArchiveBuilder>(
    results: &[ConversionResult],
    mut builder: B,
) -> Result<Vec<u8>> {
    for result in results {
        builder.add_entry(&result.name, &result.payload)?;
    }
    builder.finalize()
}

/// The downloadable output of a batch run.
#[derive(Debug, Clone)]
pub struct ArchiveArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ArchiveArtifact {
    pub fn new(bytes: Vec<u8>, created: SystemTime) -> Self {
        Self {
            file_name: archive_file_name(created),
            bytes,
        }
    }

    pub fn size_label(&self) -> String {
        size_label(self.bytes.len() as u64)
    }

    /// Writes the archive into the existing directory `dir` and returns the full path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `pot-images-<unix millis>.zip`
pub fn archive_file_name(created: SystemTime) -> String {
    let millis = created
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    format!("{}{}.{}", ARCHIVE_PREFIX, millis, ARCHIVE_EXTENSION)
}

/// Size in whole kilobytes, rounded to nearest: `1536` -> `"2kB"`.
pub fn size_label(bytes: u64) -> String {
    format!("{}kB", (bytes as f64 / 1024.0).round() as u64)
}
