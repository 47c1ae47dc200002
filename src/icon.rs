//! Raster data model for icon generation.
//!
//! This module provides the geometry helpers and the loaded source image
//! type that the compositor works from.

use std::fmt;

use image::{ColorType, DynamicImage, RgbaImage};

/// A rectangle defined in pixel coordinates.
///
/// Used for the crop window in crop-to-square mode and for the placement of
/// a pasted raster on a larger canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    /// X offset from the left edge of the image
    pub x: u32,
    /// Y offset from the top edge of the image
    pub y: u32,
    /// Width of the rectangle
    pub width: u32,
    /// Height of the rectangle
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle starting at origin (0, 0) with the given dimensions.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    /// Centers a `width x height` rectangle inside a square of side `side`.
    ///
    /// Offsets use integer division, so an odd remainder biases the
    /// rectangle toward the top-left.
    pub fn centered_in(side: u32, width: u32, height: u32) -> Self {
        Self {
            x: side.saturating_sub(width) / 2,
            y: side.saturating_sub(height) / 2,
            width,
            height,
        }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns true if `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }

    pub fn max_side(&self) -> u32 {
        self.width.max(self.height)
    }
}

impl fmt::Display for SizePx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel layout of a decoded image.
///
/// Displays with the short mode names image tooling conventionally prints
/// (`RGB`, `RGBA`, `L`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    L,
    La,
    Rgb,
    Rgba,
    L16,
    La16,
    Rgb16,
    Rgba16,
    Rgb32F,
    Rgba32F,
    /// A layout the decoder produced that has no short name here.
    Other,
}

impl ColorMode {
    /// Returns true if pixels in this mode carry an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(
            self,
            Self::La | Self::Rgba | Self::La16 | Self::Rgba16 | Self::Rgba32F
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L => "L",
            Self::La => "LA",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
            Self::L16 => "L16",
            Self::La16 => "LA16",
            Self::Rgb16 => "RGB16",
            Self::Rgba16 => "RGBA16",
            Self::Rgb32F => "RGB32F",
            Self::Rgba32F => "RGBA32F",
            Self::Other => "unknown",
        }
    }
}

impl From<ColorType> for ColorMode {
    fn from(color: ColorType) -> Self {
        match color {
            ColorType::L8 => Self::L,
            ColorType::La8 => Self::La,
            ColorType::Rgb8 => Self::Rgb,
            ColorType::Rgba8 => Self::Rgba,
            ColorType::L16 => Self::L16,
            ColorType::La16 => Self::La16,
            ColorType::Rgb16 => Self::Rgb16,
            ColorType::Rgba16 => Self::Rgba16,
            ColorType::Rgb32F => Self::Rgb32F,
            ColorType::Rgba32F => Self::Rgba32F,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded source logo.
///
/// The image is never modified after loading; the compositor reads from it
/// to build the intermediate square canvas.
#[derive(Debug, Clone)]
pub struct SourceImage {
    data: DynamicImage,
}

impl SourceImage {
    pub fn new(data: DynamicImage) -> Self {
        Self { data }
    }

    /// Wraps an RGBA buffer, e.g. a rasterized SVG or a test fixture.
    pub fn from_rgba(data: RgbaImage) -> Self {
        Self::new(DynamicImage::ImageRgba8(data))
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    pub fn color_mode(&self) -> ColorMode {
        self.data.color().into()
    }

    pub fn has_alpha(&self) -> bool {
        self.color_mode().has_alpha()
    }

    /// Returns the underlying decoded image.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.data
    }

    /// Converts the pixels to 8-bit RGBA. Opaque sources get alpha 255.
    pub fn to_rgba8(&self) -> RgbaImage {
        self.data.to_rgba8()
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(data: DynamicImage) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn rect_px_new() {
        let rect = RectPx::new(10, 20, 100, 200);
        assert_eq!(rect.x, 10);
        assert_eq!(rect.y, 20);
        assert_eq!(rect.width, 100);
        assert_eq!(rect.height, 200);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
    }

    #[test]
    fn centered_rect_biases_top_left() {
        // 7px of slack on each axis splits 3 before, 4 after.
        let rect = RectPx::centered_in(10, 3, 3);
        assert_eq!((rect.x, rect.y), (3, 3));
        assert_eq!(10 - rect.right(), 4);

        assert!(rect.contains(3, 3));
        assert!(!rect.contains(6, 3));
    }

    #[test]
    fn size_px_sides() {
        let size = SizePx::new(800, 600);
        assert!(!size.is_square());
        assert_eq!(size.min_side(), 600);
        assert_eq!(size.max_side(), 800);
        assert_eq!(size.to_string(), "800x600");
        assert!(SizePx::new(100, 100).is_square());
    }

    #[test]
    fn color_mode_names() {
        assert_eq!(ColorMode::from(ColorType::Rgb8).to_string(), "RGB");
        assert_eq!(ColorMode::from(ColorType::Rgba8).to_string(), "RGBA");
        assert_eq!(ColorMode::from(ColorType::La8).to_string(), "LA");
        assert!(ColorMode::Rgba.has_alpha());
        assert!(!ColorMode::Rgb.has_alpha());
        assert!(!ColorMode::L.has_alpha());
    }

    #[test]
    fn source_image_reports_mode() {
        let rgb = SourceImage::new(DynamicImage::ImageRgb8(RgbImage::new(4, 2)));
        assert_eq!(rgb.color_mode(), ColorMode::Rgb);
        assert!(!rgb.has_alpha());
        assert_eq!(rgb.dimensions(), SizePx::new(4, 2));

        let rgba = SourceImage::from_rgba(RgbaImage::new(3, 5));
        assert!(rgba.has_alpha());
        assert_eq!(rgba.to_rgba8().dimensions(), (3, 5));
    }
}
