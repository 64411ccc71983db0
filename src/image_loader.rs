//! Image loading and input enumeration
//!
//! Decoding goes through the `image` crate, which detects the format from
//! the file contents. Enumeration filters directory entries by extension.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};

use crate::error::{Result, SweepError};

/// Load and decode an image from disk
///
/// The decoder is chosen from the file contents, falling back to the
/// extension, so any format the `image` crate supports is accepted.
///
/// # Errors
///
/// Returns `SweepError::ImageLoadError` if:
/// - File cannot be opened
/// - Format cannot be determined or is not supported
/// - Decoding fails
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| {
            SweepError::image_load(format!("Failed to open image file: {}", path.display()), e)
        })?;

    reader.decode().map_err(|e| {
        SweepError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })
}

/// Find input images
///
/// A file path is returned as-is. For a directory, every regular file whose
/// extension matches one of `extensions` (case-insensitive) is returned,
/// sorted by path.
///
/// # Errors
///
/// Returns `SweepError::IoError` if the directory cannot be read
pub fn find_image_files(input: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let entries = fs::read_dir(input)
        .map_err(|e| SweepError::io(format!("Failed to read directory {}", input.display()), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| SweepError::io(format!("Failed to read entry in {}", input.display()), e))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
}
