//! Error type shared by every stage of icon generation.

use std::path::PathBuf;

/// Errors produced while loading, compositing, or writing icons.
///
/// Once settings are validated, [`IconError::SourceLoad`] is the only error
/// that aborts a generation run. Write failures are collected per size in a
/// [`GenerationReport`](crate::GenerationReport), and decode failures are
/// reported inline by [`inspect_directory`](crate::inspect_directory). The
/// `Invalid*` variants are raised before any file is read.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    /// The source logo is missing, unreadable, or undecodable. Unparseable
    /// SVG sources are reported here too.
    #[error("failed to load source image {}: {source}", path.display())]
    SourceLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An output icon could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A file found during inspection could not be decoded.
    #[error("{source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem access outside of image decoding/encoding failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("safe-zone ratio must be in (0, 1], got {0}")]
    InvalidRatio(f64),

    #[error("target size must be positive, got {0}")]
    InvalidSize(u32),

    #[error("output template {0:?} has no {{size}} placeholder")]
    InvalidTemplate(String),

    #[error("invalid background color {0:?}")]
    InvalidColor(String),

    #[error("invalid profile: {0}")]
    Profile(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IconError>;
