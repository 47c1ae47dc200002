//! Icon set generation: one source, many target sizes.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::backend::{ImageBackend, RasterBackend, SvgFit};
use crate::compositor::{
    composite_with, contain_with, squareify, Background, SafeRatio, SquareMode,
};
use crate::error::{IconError, Result};
use crate::icon::SourceImage;

/// Placeholder substituted with the target size in an [`OutputTemplate`].
pub const SIZE_PLACEHOLDER: &str = "{size}";

/// Conventional file name for generated maskable icons.
pub const DEFAULT_FILE_NAME: &str = "icon-maskable-{size}.png";

/// Sizes and file names of the conventional "any"-purpose icons: the two
/// manifest icons plus the apple-touch icon.
pub const ANY_ICON_FILES: [(u32, &str); 3] = [
    (192, "icon-{size}.png"),
    (512, "icon-{size}.png"),
    (180, "apple-icon-{size}.png"),
];

// ============================================================================
// OutputTemplate
// ============================================================================

/// A path pattern containing at least one `{size}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate(String);

impl OutputTemplate {
    /// Creates a template, rejecting patterns without a `{size}` placeholder
    /// since every size would then overwrite the same file.
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(SIZE_PLACEHOLDER) {
            return Err(IconError::InvalidTemplate(template));
        }
        Ok(Self(template))
    }

    /// `dir/icon-maskable-{size}.png`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self(dir.as_ref().join(DEFAULT_FILE_NAME).to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the output path for `size`.
    pub fn path_for(&self, size: u32) -> PathBuf {
        PathBuf::from(self.0.replace(SIZE_PLACEHOLDER, &size.to_string()))
    }
}

impl fmt::Display for OutputTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// IconTarget
// ============================================================================

/// One output of an "any"-purpose icon set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTarget {
    pub size: u32,
    pub path: PathBuf,
}

impl IconTarget {
    pub fn new(size: u32, path: impl Into<PathBuf>) -> Self {
        Self {
            size,
            path: path.into(),
        }
    }

    /// The [`ANY_ICON_FILES`] set inside `dir`.
    pub fn standard_any(dir: impl AsRef<Path>) -> Vec<Self> {
        ANY_ICON_FILES
            .iter()
            .map(|&(size, name)| {
                let template = OutputTemplate(name.to_string());
                Self::new(size, dir.as_ref().join(template.path_for(size)))
            })
            .collect()
    }
}

// ============================================================================
// GenerationReport
// ============================================================================

/// An icon that was written successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenIcon {
    pub size: u32,
    pub path: PathBuf,
}

/// An icon whose output could not be written.
#[derive(Debug)]
pub struct FailedIcon {
    pub size: u32,
    pub path: PathBuf,
    pub error: IconError,
}

/// Outcome of a generation run that got past loading the source.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Written icons, in request order.
    pub written: Vec<WrittenIcon>,

    /// Sizes that failed, in request order.
    pub failed: Vec<FailedIcon>,
}

impl GenerationReport {
    /// Returns true if every requested size was written.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn written_sizes(&self) -> Vec<u32> {
        self.written.iter().map(|icon| icon.size).collect()
    }

    pub fn failed_sizes(&self) -> Vec<u32> {
        self.failed.iter().map(|icon| icon.size).collect()
    }

    fn record(&mut self, size: u32, path: PathBuf, outcome: Result<()>) {
        match outcome {
            Ok(()) => {
                log::info!("wrote {}x{} icon to {}", size, size, path.display());
                self.written.push(WrittenIcon { size, path });
            }
            Err(error) => {
                log::warn!("skipping {}px icon: {}", size, error);
                self.failed.push(FailedIcon { size, path, error });
            }
        }
    }
}

// ============================================================================
// Generation
// ============================================================================

/// Generates one maskable icon per size in `target_sizes`.
///
/// The source is loaded and squared once. Each size is then composited and
/// saved to `template.path_for(size)`. A source that cannot be loaded aborts
/// the run; a size whose output cannot be written is recorded in the report
/// and the remaining sizes are still generated.
pub fn generate_icon_set(
    source_path: &Path,
    target_sizes: &[u32],
    mode: SquareMode,
    safe_ratio: SafeRatio,
    background: Background,
    template: &OutputTemplate,
) -> Result<GenerationReport> {
    generate_icon_set_with(
        &backend_for(target_sizes, mode),
        source_path,
        target_sizes,
        mode,
        safe_ratio,
        background,
        template,
    )
}

/// [`generate_icon_set`] with an explicit raster backend.
pub fn generate_icon_set_with<B: RasterBackend + ?Sized>(
    backend: &B,
    source_path: &Path,
    target_sizes: &[u32],
    mode: SquareMode,
    safe_ratio: SafeRatio,
    background: Background,
    template: &OutputTemplate,
) -> Result<GenerationReport> {
    if let Some(&zero) = target_sizes.iter().find(|&&size| size == 0) {
        return Err(IconError::InvalidSize(zero));
    }

    let source = load_source(backend, source_path)?;
    let square = squareify(&source, mode);
    drop(source);

    let mut report = GenerationReport::default();
    let mut seen = Vec::with_capacity(target_sizes.len());

    for &size in target_sizes {
        if seen.contains(&size) {
            continue;
        }
        seen.push(size);

        let path = template.path_for(size);
        let icon = composite_with(backend, &square, size, safe_ratio, background)?;
        let outcome = ensure_parent(&path).and_then(|()| backend.save(&icon.pixels, &path));
        report.record(size, path, outcome);
    }

    Ok(report)
}

/// Generates transparent "any"-purpose icons, one per target.
///
/// Each icon fits the whole source inside its square (see
/// [`contain`](crate::contain)) and is written as an RGBA PNG. Failure
/// handling matches [`generate_icon_set`]: an unloadable source aborts, a
/// failed write is recorded and the other targets are still written.
pub fn generate_any_icon_set(
    source_path: &Path,
    targets: &[IconTarget],
) -> Result<GenerationReport> {
    let sizes: Vec<u32> = targets.iter().map(|target| target.size).collect();
    generate_any_icon_set_with(&backend_for(&sizes, SquareMode::Pad), source_path, targets)
}

/// [`generate_any_icon_set`] with an explicit raster backend.
pub fn generate_any_icon_set_with<B: RasterBackend + ?Sized>(
    backend: &B,
    source_path: &Path,
    targets: &[IconTarget],
) -> Result<GenerationReport> {
    if let Some(target) = targets.iter().find(|target| target.size == 0) {
        return Err(IconError::InvalidSize(target.size));
    }

    let source = load_source(backend, source_path)?;

    let mut report = GenerationReport::default();
    let mut seen: Vec<&Path> = Vec::with_capacity(targets.len());

    for target in targets {
        if seen.contains(&target.path.as_path()) {
            continue;
        }
        seen.push(&target.path);

        let icon = contain_with(backend, &source, target.size)?;
        let outcome =
            ensure_parent(&target.path).and_then(|()| backend.save_rgba(&icon.pixels, &target.path));
        report.record(target.size, target.path.clone(), outcome);
    }

    Ok(report)
}

/// An [`ImageBackend`] that rasterizes SVG sources so the part kept by
/// `mode` is at least as large as the biggest requested size.
fn backend_for(target_sizes: &[u32], mode: SquareMode) -> ImageBackend {
    let largest = target_sizes.iter().copied().max().unwrap_or(0);
    let fit = match mode {
        SquareMode::Crop => SvgFit::Cover,
        SquareMode::Pad => SvgFit::Contain,
    };
    ImageBackend::new().with_svg_size(largest).with_svg_fit(fit)
}

fn load_source<B: RasterBackend + ?Sized>(backend: &B, path: &Path) -> Result<SourceImage> {
    let source = backend.load(path)?;
    log::info!(
        "loaded {} ({}, {})",
        path.display(),
        source.dimensions(),
        source.color_mode()
    );
    Ok(source)
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            std::fs::create_dir_all(dir).map_err(|e| IconError::Write {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(e),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::imageops::FilterType;
    use image::{RgbImage, Rgba, RgbaImage};
    use std::cell::RefCell;

    /// Serves a fixed source and records saves in memory, failing any path
    /// listed in `fail`.
    struct MemoryBackend {
        source: RgbaImage,
        fail: Vec<PathBuf>,
        saved: RefCell<Vec<(PathBuf, (u32, u32))>>,
    }

    impl MemoryBackend {
        fn new(width: u32, height: u32) -> Self {
            Self {
                source: RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255])),
                fail: Vec::new(),
                saved: RefCell::new(Vec::new()),
            }
        }
    }

    impl RasterBackend for MemoryBackend {
        fn load(&self, _path: &Path) -> Result<SourceImage> {
            Ok(SourceImage::from_rgba(self.source.clone()))
        }

        fn resize(&self, src: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage {
            ImageBackend::new().resize(src, width, height, filter)
        }

        fn paste(&self, dst: &mut RgbImage, src: &RgbaImage, at: (u32, u32), masked: bool) {
            ImageBackend::new().paste(dst, src, at, masked)
        }

        fn save(&self, icon: &RgbImage, path: &Path) -> Result<()> {
            self.store(path, icon.dimensions())
        }

        fn save_rgba(&self, icon: &RgbaImage, path: &Path) -> Result<()> {
            self.store(path, icon.dimensions())
        }
    }

    impl MemoryBackend {
        fn store(&self, path: &Path, dimensions: (u32, u32)) -> Result<()> {
            if self.fail.iter().any(|p| p == path) {
                return Err(IconError::Write {
                    path: path.to_path_buf(),
                    source: image::ImageError::IoError(std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "read-only",
                    )),
                });
            }
            self.saved
                .borrow_mut()
                .push((path.to_path_buf(), dimensions));
            Ok(())
        }
    }

    #[test]
    fn template_requires_placeholder() {
        assert!(OutputTemplate::new("icon.png").is_err());
        let template = OutputTemplate::new("out/{size}/icon-{size}.png").unwrap();
        assert_eq!(template.path_for(48), PathBuf::from("out/48/icon-48.png"));
    }

    #[test]
    fn template_in_dir_uses_default_name() {
        let template = OutputTemplate::in_dir("public");
        assert_eq!(
            template.path_for(192),
            Path::new("public").join("icon-maskable-192.png")
        );
    }

    #[test]
    fn generates_each_size_once() {
        let backend = MemoryBackend::new(80, 60);
        let template = OutputTemplate::new("icon-{size}.png").unwrap();

        let report = generate_icon_set_with(
            &backend,
            Path::new("logo.png"),
            &[192, 48, 192],
            SquareMode::Crop,
            SafeRatio::SAFE_ZONE,
            Background::WHITE,
            &template,
        )
        .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.written_sizes(), vec![192, 48]);
        assert_eq!(
            *backend.saved.borrow(),
            vec![
                (PathBuf::from("icon-192.png"), (192, 192)),
                (PathBuf::from("icon-48.png"), (48, 48)),
            ]
        );
    }

    #[test]
    fn write_failure_does_not_abort_other_sizes() {
        let mut backend = MemoryBackend::new(80, 60);
        backend.fail.push(PathBuf::from("icon-192.png"));
        let template = OutputTemplate::new("icon-{size}.png").unwrap();

        let report = generate_icon_set_with(
            &backend,
            Path::new("logo.png"),
            &[192, 512],
            SquareMode::Pad,
            SafeRatio::FULL,
            Background::WHITE,
            &template,
        )
        .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.failed_sizes(), vec![192]);
        assert_eq!(report.written_sizes(), vec![512]);
        assert!(matches!(report.failed[0].error, IconError::Write { .. }));
    }

    #[test]
    fn zero_size_is_rejected_before_loading() {
        let backend = MemoryBackend::new(4, 4);
        let result = generate_icon_set_with(
            &backend,
            Path::new("logo.png"),
            &[192, 0],
            SquareMode::Crop,
            SafeRatio::SAFE_ZONE,
            Background::WHITE,
            &OutputTemplate::in_dir("."),
        );
        assert!(matches!(result, Err(IconError::InvalidSize(0))));
        assert!(backend.saved.borrow().is_empty());
    }

    #[test]
    fn missing_source_fails_fast() {
        let result = generate_icon_set(
            Path::new("does/not/exist.png"),
            &[192],
            SquareMode::Crop,
            SafeRatio::SAFE_ZONE,
            Background::WHITE,
            &OutputTemplate::in_dir("unused"),
        );
        assert!(matches!(result, Err(IconError::SourceLoad { .. })));
    }

    #[test]
    fn svg_rasterization_follows_square_mode() {
        let crop = backend_for(&[192, 512], SquareMode::Crop);
        assert_eq!(crop.svg_size(), 512);
        assert_eq!(crop.svg_fit(), SvgFit::Cover);

        let pad = backend_for(&[48], SquareMode::Pad);
        assert_eq!(pad.svg_size(), 48);
        assert_eq!(pad.svg_fit(), SvgFit::Contain);
    }

    #[test]
    fn crop_mode_svg_square_covers_largest_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.svg");
        std::fs::write(
            &path,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="#00ff00"/></svg>"##,
        )
        .unwrap();

        let source = backend_for(&[512], SquareMode::Crop).load(&path).unwrap();
        assert!(squareify(&source, SquareMode::Crop).side() >= 512);

        let source = backend_for(&[512], SquareMode::Pad).load(&path).unwrap();
        assert_eq!(squareify(&source, SquareMode::Pad).side(), 512);
    }

    #[test]
    fn standard_any_targets() {
        let targets = IconTarget::standard_any("public");
        assert_eq!(
            targets,
            vec![
                IconTarget::new(192, Path::new("public").join("icon-192.png")),
                IconTarget::new(512, Path::new("public").join("icon-512.png")),
                IconTarget::new(180, Path::new("public").join("apple-icon-180.png")),
            ]
        );
    }

    #[test]
    fn any_icons_are_written_per_target() {
        let mut backend = MemoryBackend::new(80, 60);
        backend.fail.push(PathBuf::from("icon-512.png"));
        let targets = vec![
            IconTarget::new(192, "icon-192.png"),
            IconTarget::new(512, "icon-512.png"),
            IconTarget::new(180, "apple-icon-180.png"),
            IconTarget::new(192, "icon-192.png"),
        ];

        let report =
            generate_any_icon_set_with(&backend, Path::new("logo.png"), &targets).unwrap();

        assert_eq!(report.written_sizes(), vec![192, 180]);
        assert_eq!(report.failed_sizes(), vec![512]);
        assert_eq!(
            *backend.saved.borrow(),
            vec![
                (PathBuf::from("icon-192.png"), (192, 192)),
                (PathBuf::from("apple-icon-180.png"), (180, 180)),
            ]
        );
    }

    #[test]
    fn any_icons_reject_zero_size() {
        let backend = MemoryBackend::new(4, 4);
        let result = generate_any_icon_set_with(
            &backend,
            Path::new("logo.png"),
            &[IconTarget::new(0, "icon-0.png")],
        );
        assert!(matches!(result, Err(IconError::InvalidSize(0))));
    }
}
