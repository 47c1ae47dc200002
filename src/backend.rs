//! Raster capability interface and its `image`/`resvg` implementation.
//!
//! The compositor and generator only need four operations from an imaging
//! library: load a source, resize a raster, paste one raster onto another,
//! and save the result. [`RasterBackend`] names those operations so the
//! pipeline can be driven by something other than the `image` crate, e.g. a
//! recording backend in tests.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::error::{DecodingError, ImageFormatHint};
use image::{ImageError, RgbImage, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{IconError, Result};
use crate::icon::SourceImage;

/// Side used to rasterize SVG sources when the caller doesn't ask for one.
pub const DEFAULT_SVG_SIZE: u32 = 1024;

// ============================================================================
// RasterBackend
// ============================================================================

/// The imaging operations icon generation depends on.
pub trait RasterBackend {
    /// Loads and decodes a source logo.
    fn load(&self, path: &Path) -> Result<SourceImage>;

    /// Resizes `src` to exactly `width x height`.
    fn resize(&self, src: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage;

    /// Pastes `src` onto `dst` with its top-left corner at `at`.
    ///
    /// When `masked` is set, the alpha channel of `src` blends it over `dst`;
    /// otherwise the color channels overwrite `dst` directly.
    fn paste(&self, dst: &mut RgbImage, src: &RgbaImage, at: (u32, u32), masked: bool);

    /// Encodes the opaque `icon` as an RGB PNG at `path`.
    fn save(&self, icon: &RgbImage, path: &Path) -> Result<()>;

    /// Encodes `icon` as an RGBA PNG at `path`, keeping its transparency.
    fn save_rgba(&self, icon: &RgbaImage, path: &Path) -> Result<()>;
}

// ============================================================================
// SvgFit
// ============================================================================

/// How an SVG source is scaled into the backend's SVG size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SvgFit {
    /// The longer side equals the SVG size. Matches pad-to-square, where the
    /// longer side becomes the square.
    #[default]
    Contain,
    /// The shorter side equals the SVG size. Matches crop-to-square, where
    /// only the shorter side survives.
    Cover,
}

// ============================================================================
// ImageBackend
// ============================================================================

/// [`RasterBackend`] built on the `image` crate, with SVG sources rendered by
/// resvg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBackend {
    svg_size: u32,
    svg_fit: SvgFit,
}

impl ImageBackend {
    pub fn new() -> Self {
        Self {
            svg_size: DEFAULT_SVG_SIZE,
            svg_fit: SvgFit::Contain,
        }
    }

    /// Sets the side SVG sources are scaled to when rasterized.
    ///
    /// Rendering at the largest requested icon size keeps vector logos sharp
    /// without rasterizing more pixels than will be used, provided the fit
    /// matches how the source will be squared (see [`SvgFit`]).
    pub fn with_svg_size(mut self, size: u32) -> Self {
        self.svg_size = size.max(1);
        self
    }

    pub fn with_svg_fit(mut self, fit: SvgFit) -> Self {
        self.svg_fit = fit;
        self
    }

    pub fn svg_size(&self) -> u32 {
        self.svg_size
    }

    pub fn svg_fit(&self) -> SvgFit {
        self.svg_fit
    }
}

impl Default for ImageBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend for ImageBackend {
    fn load(&self, path: &Path) -> Result<SourceImage> {
        if is_svg(path) {
            let data = std::fs::read(path).map_err(|e| IconError::SourceLoad {
                path: path.to_path_buf(),
                source: ImageError::IoError(e),
            })?;
            let pixels = render_svg(&data, self.svg_size, self.svg_fit).map_err(|reason| {
                IconError::SourceLoad {
                    path: path.to_path_buf(),
                    source: ImageError::Decoding(DecodingError::new(
                        ImageFormatHint::Name("SVG".into()),
                        reason,
                    )),
                }
            })?;
            return Ok(SourceImage::from_rgba(pixels));
        }

        image::open(path)
            .map(SourceImage::new)
            .map_err(|source| IconError::SourceLoad {
                path: path.to_path_buf(),
                source,
            })
    }

    fn resize(&self, src: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage {
        if src.pixels().all(|p| p[3] == u8::MAX) {
            return imageops::resize(src, width, height, filter);
        }

        // Filter in premultiplied space so transparent pixels don't bleed
        // their (meaningless) color into the logo edges.
        let mut premultiplied = src.clone();
        premultiplied.pixels_mut().for_each(premultiply);
        let mut resized = imageops::resize(&premultiplied, width, height, filter);
        resized.pixels_mut().for_each(unpremultiply);
        resized
    }

    fn paste(&self, dst: &mut RgbImage, src: &RgbaImage, at: (u32, u32), masked: bool) {
        let (x0, y0) = at;

        for (sx, sy, pixel) in src.enumerate_pixels() {
            let (dx, dy) = (x0 + sx, y0 + sy);

            // Skip if outside destination bounds
            if dx >= dst.width() || dy >= dst.height() {
                continue;
            }

            let out = dst.get_pixel_mut(dx, dy);
            if masked {
                let alpha = u32::from(pixel[3]);
                for c in 0..3 {
                    out[c] = blend_channel(pixel[c], out[c], alpha);
                }
            } else {
                out.0 = [pixel[0], pixel[1], pixel[2]];
            }
        }
    }

    fn save(&self, icon: &RgbImage, path: &Path) -> Result<()> {
        icon.save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| IconError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    fn save_rgba(&self, icon: &RgbaImage, path: &Path) -> Result<()> {
        icon.save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| IconError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
}

/// `src * a + dst * (1 - a)` with `a = alpha / 255`, rounded.
fn blend_channel(src: u8, dst: u8, alpha: u32) -> u8 {
    let mixed = u32::from(src) * alpha + u32::from(dst) * (255 - alpha);
    ((mixed + 127) / 255) as u8
}

fn premultiply(pixel: &mut Rgba<u8>) {
    let a = u32::from(pixel[3]);
    for c in 0..3 {
        pixel[c] = ((u32::from(pixel[c]) * a + 127) / 255) as u8;
    }
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(pixel: &mut Rgba<u8>) {
    let a = pixel[3];
    if a == 0 {
        pixel.0 = [0, 0, 0, 0];
        return;
    }
    let a_f = a as f32 / 255.0;
    for c in 0..3 {
        pixel[c] = (pixel[c] as f32 / a_f).round().min(255.0) as u8;
    }
}

// ============================================================================
// SVG Rendering
// ============================================================================

/// Renders SVG data to an RGBA image scaled by `fit` to `size`.
///
/// With [`SvgFit::Contain`] the larger SVG dimension becomes `size`; with
/// [`SvgFit::Cover`] the smaller one does. Aspect ratio is preserved.
pub fn render_svg(
    svg_data: &[u8],
    size: u32,
    fit: SvgFit,
) -> std::result::Result<RgbaImage, String> {
    let opts = Options::default();
    let tree = Tree::from_data(svg_data, &opts).map_err(|e| e.to_string())?;

    let svg_size = tree.size();
    let reference = match fit {
        SvgFit::Contain => svg_size.width().max(svg_size.height()),
        SvgFit::Cover => svg_size.width().min(svg_size.height()),
    };
    let scale = (size as f32) / reference;
    let width = ((svg_size.width() * scale).ceil() as u32).max(1);
    let height = ((svg_size.height() * scale).ceil() as u32).max(1);

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| format!("cannot allocate {}x{} pixmap", width, height))?;
    let transform = Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    // tiny_skia uses premultiplied alpha
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        *dst = Rgba([src.red(), src.green(), src.blue(), src.alpha()]);
        unpremultiply(dst);
    }

    img
}
