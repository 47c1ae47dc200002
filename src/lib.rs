//! maskable-icons: maskable web-app icons from a single logo
//!
//! This crate turns one source logo of any aspect ratio into a set of square,
//! opaque icons suitable for a web-app manifest's `"purpose": "maskable"`
//! entries.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use maskable_icons::{
//!     generate_icon_set, Background, OutputTemplate, SafeRatio, SquareMode,
//! };
//!
//! let report = generate_icon_set(
//!     Path::new("public/logo.png"),
//!     &[192, 512],
//!     SquareMode::Crop,
//!     SafeRatio::SAFE_ZONE,
//!     Background::WHITE,
//!     &OutputTemplate::in_dir("public"),
//! )?;
//!
//! for failure in &report.failed {
//!     eprintln!("{}px: {}", failure.size, failure.error);
//! }
//! # Ok::<(), maskable_icons::IconError>(())
//! ```
//!
//! Alongside the maskable set, [`generate_any_icon_set`] writes the plain
//! "any"-purpose icons: the whole logo fit inside a transparent square.
//!
//! # Profiles
//!
//! The same settings can be carried as a serializable [`IconProfile`], with
//! presets for the two common layouts:
//!
//! ```no_run
//! use std::path::Path;
//! use maskable_icons::{GenerationMode, OutputTemplate};
//!
//! let profile = GenerationMode::FullCoverage.profile();
//! let report = profile.generate(Path::new("logo.png"), &OutputTemplate::in_dir("out"))?;
//! assert!(report.is_complete());
//! # Ok::<(), maskable_icons::IconError>(())
//! ```

mod backend;
mod compositor;
mod error;
mod generate;
mod icon;
mod inspect;
mod profile;

pub use backend::{render_svg, ImageBackend, RasterBackend, SvgFit, DEFAULT_SVG_SIZE};
pub use compositor::{
    composite, composite_with, contain, contain_with, squareify, Background, ContainedIcon,
    OutputIcon, SafeRatio, SquareCanvas, SquareMode, LOGO_FILTER,
};
pub use error::{IconError, Result};
pub use generate::{
    generate_any_icon_set, generate_any_icon_set_with, generate_icon_set, generate_icon_set_with,
    FailedIcon, GenerationReport, IconTarget, OutputTemplate, WrittenIcon, ANY_ICON_FILES,
    DEFAULT_FILE_NAME, SIZE_PLACEHOLDER,
};
pub use icon::{ColorMode, RectPx, SizePx, SourceImage};
pub use inspect::{inspect_directory, inspect_file, ImageInfo, InspectEntry};
pub use profile::{GenerationMode, IconProfile, DEFAULT_SIZES};
