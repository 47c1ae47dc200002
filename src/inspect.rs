//! Directory inspection for generated icons.
//!
//! Reports the dimensions and color mode of every image in a directory, one
//! line per file. A file that fails to decode is reported inline and does not
//! stop the listing.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{IconError, Result};
use crate::icon::{ColorMode, SizePx, SourceImage};

/// Dimensions and color mode of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub size: SizePx,
    pub mode: ColorMode,
}

/// One inspected file.
#[derive(Debug)]
pub struct InspectEntry {
    pub file_name: String,
    pub result: std::result::Result<ImageInfo, IconError>,
}

impl InspectEntry {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for InspectEntry {
    /// `<file>: <w>x<h> (<mode>)` or `<file>: Error - <message>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(info) => write!(f, "{}: {} ({})", self.file_name, info.size, info.mode),
            Err(e) => write!(f, "{}: Error - {}", self.file_name, e),
        }
    }
}

/// Decodes `path` and returns its dimensions and color mode.
pub fn inspect_file(path: &Path) -> Result<ImageInfo> {
    let image = image::open(path)
        .map(SourceImage::new)
        .map_err(|source| IconError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(ImageInfo {
        size: image.dimensions(),
        mode: image.color_mode(),
    })
}

/// Inspects every file in `dir` whose extension matches `extension`
/// (case-insensitive, without the dot), sorted by file name.
///
/// Only a failure to list `dir` itself is returned as an error.
pub fn inspect_directory(dir: &Path, extension: &str) -> Result<Vec<InspectEntry>> {
    let io_err = |source| IconError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let extension = extension.trim_start_matches('.');

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if !path.is_file() || !has_extension(&path, extension) {
            continue;
        }
        files.push((entry.file_name().to_string_lossy().into_owned(), path));
    }
    files.sort();

    let entries = files
        .into_iter()
        .map(|(file_name, path)| {
            let result = inspect_file(&path);
            if let Err(e) = &result {
                log::debug!("failed to decode {}: {}", path.display(), e);
            }
            InspectEntry { file_name, result }
        })
        .collect();

    Ok(entries)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
