//! The maskable icon compositor.
//!
//! Generation is two steps. [`squareify`] turns an arbitrary-aspect source
//! into a square RGBA canvas, either by cropping to the shorter side or by
//! padding to the longer one. [`composite`] then scales that canvas into the
//! safe zone of an opaque `target_size x target_size` icon.
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use maskable_icons::{composite, squareify, Background, SafeRatio, SourceImage, SquareMode};
//!
//! let logo = SourceImage::from_rgba(RgbaImage::from_pixel(80, 60, Rgba([200, 0, 0, 255])));
//! let square = squareify(&logo, SquareMode::Crop);
//! let icon = composite(&square, 192, SafeRatio::SAFE_ZONE, Background::WHITE).unwrap();
//!
//! assert_eq!(icon.pixels.dimensions(), (192, 192));
//! assert_eq!(icon.logo.width, 153);
//! ```

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, RgbaImage};
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::backend::{ImageBackend, RasterBackend};
use crate::error::{IconError, Result};
use crate::icon::{RectPx, SourceImage};

/// Resampling filter used to scale the square canvas into the safe zone.
///
/// Lanczos3 favours downscale quality over speed.
pub const LOGO_FILTER: FilterType = FilterType::Lanczos3;

// ============================================================================
// SquareMode
// ============================================================================

/// How a non-square source is made square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SquareMode {
    /// Keep the centered `min(w, h)` square and discard the rest.
    Crop,
    /// Center the source on a transparent `max(w, h)` square.
    Pad,
}

impl fmt::Display for SquareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crop => f.write_str("crop"),
            Self::Pad => f.write_str("pad"),
        }
    }
}

// ============================================================================
// SafeRatio
// ============================================================================

/// Fraction of the icon side occupied by the logo, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SafeRatio(f64);

impl SafeRatio {
    /// Edge-to-edge logo with no intentional padding.
    pub const FULL: Self = Self(1.0);

    /// The 80% safe zone recommended for maskable icons.
    pub const SAFE_ZONE: Self = Self(0.8);

    /// Validates a ratio. NaN, zero, negatives and values above one fail.
    pub fn new(ratio: f64) -> Result<Self> {
        if ratio > 0.0 && ratio <= 1.0 {
            Ok(Self(ratio))
        } else {
            Err(IconError::InvalidRatio(ratio))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Side of the scaled logo: `floor(target_size * ratio)`, at least 1.
    pub fn logo_size(self, target_size: u32) -> u32 {
        let size = (f64::from(target_size) * self.0).floor() as u32;
        size.clamp(1, target_size.max(1))
    }
}

impl Default for SafeRatio {
    fn default() -> Self {
        Self::SAFE_ZONE
    }
}

impl TryFrom<f64> for SafeRatio {
    type Error = IconError;

    fn try_from(ratio: f64) -> Result<Self> {
        Self::new(ratio)
    }
}

impl fmt::Display for SafeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Background
// ============================================================================

/// Opaque fill color behind the logo.
///
/// Serializes as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Background(Srgb<u8>);

impl Background {
    pub const WHITE: Self = Self(Srgb::new(255, 255, 255));

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn color(&self) -> Srgb<u8> {
        self.0
    }

    /// The fill as an `image` pixel.
    pub fn to_pixel(&self) -> Rgb<u8> {
        Rgb([self.0.red, self.0.green, self.0.blue])
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Background {
    type Err = IconError;

    /// Parses `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
    fn from_str(s: &str) -> Result<Self> {
        Srgb::<u8>::from_str(s.trim())
            .map(Self)
            .map_err(|_| IconError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Background {
    type Error = IconError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Background> for String {
    fn from(background: Background) -> Self {
        background.to_string()
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Srgb { red, green, blue, .. } = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", red, green, blue)
    }
}

// ============================================================================
// SquareCanvas / OutputIcon
// ============================================================================

/// A source logo made square, ready to be scaled into a safe zone.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareCanvas {
    pub pixels: RgbaImage,

    /// Whether any pixel may be non-opaque, either from the source's own
    /// alpha channel or from pad-mode borders.
    pub has_alpha: bool,
}

impl SquareCanvas {
    pub fn side(&self) -> u32 {
        self.pixels.width()
    }
}

/// A finished "any"-purpose icon: the whole logo fit inside a transparent
/// square.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainedIcon {
    pub pixels: RgbaImage,

    /// Where the scaled logo was placed.
    pub logo: RectPx,
}

/// A finished, fully opaque maskable icon.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputIcon {
    pub pixels: RgbImage,

    /// Where the scaled logo was pasted.
    pub logo: RectPx,
}

impl OutputIcon {
    pub fn size(&self) -> u32 {
        self.pixels.width()
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Makes `source` square according to `mode`.
///
/// Crop keeps the centered `min(w, h)` square. Pad pastes the unscaled source
/// at the center of a fully transparent `max(w, h)` square.
pub fn squareify(source: &SourceImage, mode: SquareMode) -> SquareCanvas {
    let dims = source.dimensions();
    let rgba = source.to_rgba8();

    match mode {
        SquareMode::Crop => {
            let side = dims.min_side();
            let window = RectPx::new(
                (dims.width - side) / 2,
                (dims.height - side) / 2,
                side,
                side,
            );
            log::debug!("cropping {} source to {:?}", dims, window);

            let pixels =
                imageops::crop_imm(&rgba, window.x, window.y, window.width, window.height)
                    .to_image();
            SquareCanvas {
                pixels,
                has_alpha: source.has_alpha(),
            }
        }
        SquareMode::Pad => {
            let side = dims.max_side();
            let placement = RectPx::centered_in(side, dims.width, dims.height);
            log::debug!("padding {} source to {}px square at {:?}", dims, side, placement);

            let mut pixels = RgbaImage::new(side, side);
            imageops::replace(&mut pixels, &rgba, placement.x.into(), placement.y.into());
            SquareCanvas {
                has_alpha: source.has_alpha() || !dims.is_square(),
                pixels,
            }
        }
    }
}

/// Scales `square` into the safe zone of a `target_size` icon over `background`.
///
/// Uses the `image`-crate [`ImageBackend`]; see [`composite_with`] to plug in
/// another raster implementation.
pub fn composite(
    square: &SquareCanvas,
    target_size: u32,
    safe_ratio: SafeRatio,
    background: Background,
) -> Result<OutputIcon> {
    composite_with(&ImageBackend::default(), square, target_size, safe_ratio, background)
}

/// [`composite`] with an explicit raster backend.
pub fn composite_with<B: RasterBackend + ?Sized>(
    backend: &B,
    square: &SquareCanvas,
    target_size: u32,
    safe_ratio: SafeRatio,
    background: Background,
) -> Result<OutputIcon> {
    if target_size == 0 {
        return Err(IconError::InvalidSize(target_size));
    }

    let logo_size = safe_ratio.logo_size(target_size);
    let logo = backend.resize(&square.pixels, logo_size, logo_size, LOGO_FILTER);
    let placement = RectPx::centered_in(target_size, logo_size, logo_size);
    log::debug!(
        "compositing {}px logo into {}px icon at ({}, {})",
        logo_size,
        target_size,
        placement.x,
        placement.y
    );

    let mut pixels = RgbImage::from_pixel(target_size, target_size, background.to_pixel());
    backend.paste(&mut pixels, &logo, (placement.x, placement.y), square.has_alpha);

    Ok(OutputIcon {
        pixels,
        logo: placement,
    })
}

/// Fits the whole of `source` inside a transparent `target_size` square.
///
/// The longer side is scaled to `target_size` and the shorter side keeps the
/// aspect ratio, rounded to the nearest pixel. The logo is centered and the
/// letterbox stays fully transparent. These are the "any"-purpose manifest
/// icons that accompany a maskable set.
pub fn contain(source: &SourceImage, target_size: u32) -> Result<ContainedIcon> {
    contain_with(&ImageBackend::default(), source, target_size)
}

/// [`contain`] with an explicit raster backend.
pub fn contain_with<B: RasterBackend + ?Sized>(
    backend: &B,
    source: &SourceImage,
    target_size: u32,
) -> Result<ContainedIcon> {
    if target_size == 0 {
        return Err(IconError::InvalidSize(target_size));
    }

    let dims = source.dimensions();
    let scale = f64::from(target_size) / f64::from(dims.max_side());
    let fit = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, target_size);
    let (width, height) = (fit(dims.width), fit(dims.height));

    let logo = backend.resize(&source.to_rgba8(), width, height, LOGO_FILTER);
    let placement = RectPx::centered_in(target_size, width, height);
    log::debug!(
        "containing {} source as {}x{} in {}px icon at ({}, {})",
        dims,
        width,
        height,
        target_size,
        placement.x,
        placement.y
    );

    let mut pixels = RgbaImage::new(target_size, target_size);
    imageops::replace(&mut pixels, &logo, placement.x.into(), placement.y.into());

    Ok(ContainedIcon {
        pixels,
        logo: placement,
    })
}

// ============================================================================
// Tests
// ============================================================================
