//! Serializable generation settings.
//!
//! An [`IconProfile`] captures everything [`generate_icon_set`] needs besides
//! the source and output paths, in a JSON-friendly form. Two named presets
//! cover the common maskable layouts:
//!
//! - [`GenerationMode::SafeZone`]: crop to square, logo in the central 80%.
//! - [`GenerationMode::FullCoverage`]: pad to square, logo edge to edge.
//!
//! # Example
//!
//! ```
//! use maskable_icons::{Background, GenerationMode, IconProfile};
//!
//! let profile = GenerationMode::FullCoverage
//!     .profile()
//!     .with_sizes(vec![48, 192])
//!     .with_background("#4338ca".parse().unwrap());
//!
//! let json = profile.to_json().unwrap();
//! let restored = IconProfile::from_json(&json).unwrap();
//! assert_eq!(restored.background, Background::new(0x43, 0x38, 0xca));
//! ```
//!
//! [`generate_icon_set`]: crate::generate_icon_set

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compositor::{Background, SafeRatio, SquareMode};
use crate::error::{IconError, Result};
use crate::generate::{generate_icon_set, GenerationReport, OutputTemplate};

/// Sizes emitted when a profile doesn't list any.
pub const DEFAULT_SIZES: [u32; 2] = [192, 512];

// ============================================================================
// GenerationMode
// ============================================================================

/// The two named maskable layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum GenerationMode {
    /// Crop to a square and keep the logo inside an 80% safe zone.
    SafeZone,
    /// Pad to a square and scale the logo edge to edge.
    FullCoverage,
}

impl GenerationMode {
    pub fn square_mode(self) -> SquareMode {
        match self {
            Self::SafeZone => SquareMode::Crop,
            Self::FullCoverage => SquareMode::Pad,
        }
    }

    pub fn safe_ratio(self) -> SafeRatio {
        match self {
            Self::SafeZone => SafeRatio::SAFE_ZONE,
            Self::FullCoverage => SafeRatio::FULL,
        }
    }

    /// A profile with this mode's settings, the default sizes and a white
    /// background.
    pub fn profile(self) -> IconProfile {
        IconProfile {
            sizes: DEFAULT_SIZES.to_vec(),
            square_mode: self.square_mode(),
            safe_ratio: self.safe_ratio().get(),
            background: Background::WHITE,
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SafeZone => f.write_str("safe-zone"),
            Self::FullCoverage => f.write_str("full-coverage"),
        }
    }
}

// ============================================================================
// IconProfile
// ============================================================================

/// Settings for one icon set.
///
/// # JSON Format
///
/// ```json
/// {
///   "sizes": [192, 512],
///   "squareMode": "crop",
///   "safeRatio": 0.8,
///   "background": "#ffffff"
/// }
/// ```
///
/// Missing fields fall back to the [`GenerationMode::SafeZone`] preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconProfile {
    /// Target icon sides in pixels.
    pub sizes: Vec<u32>,

    pub square_mode: SquareMode,

    /// Fraction of the icon side covered by the logo, in (0, 1].
    pub safe_ratio: f64,

    /// Opaque fill as `#rrggbb`.
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub background: Background,
}

impl Default for IconProfile {
    fn default() -> Self {
        GenerationMode::SafeZone.profile()
    }
}

impl IconProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target sizes.
    pub fn with_sizes(mut self, sizes: Vec<u32>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn with_square_mode(mut self, mode: SquareMode) -> Self {
        self.square_mode = mode;
        self
    }

    pub fn with_safe_ratio(mut self, ratio: f64) -> Self {
        self.safe_ratio = ratio;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Returns the validated safe ratio.
    pub fn safe_ratio(&self) -> Result<SafeRatio> {
        SafeRatio::new(self.safe_ratio)
    }

    /// Checks the ratio and sizes without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        self.safe_ratio()?;
        match self.sizes.iter().find(|&&size| size == 0) {
            Some(&size) => Err(IconError::InvalidSize(size)),
            None => Ok(()),
        }
    }

    /// Generates this profile's icon set from `source`.
    pub fn generate(&self, source: &Path, template: &OutputTemplate) -> Result<GenerationReport> {
        self.validate()?;
        generate_icon_set(
            source,
            &self.sizes,
            self.square_mode,
            self.safe_ratio()?,
            self.background,
            template,
        )
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_generation_modes() {
        let safe = GenerationMode::SafeZone.profile();
        assert_eq!(safe.square_mode, SquareMode::Crop);
        assert_eq!(safe.safe_ratio, 0.8);
        assert_eq!(safe.sizes, vec![192, 512]);

        let full = GenerationMode::FullCoverage.profile();
        assert_eq!(full.square_mode, SquareMode::Pad);
        assert_eq!(full.safe_ratio, 1.0);
        assert_eq!(full.background, Background::WHITE);
    }

    #[test]
    fn profile_json_format() {
        let json = IconProfile::new().to_json_pretty().unwrap();

        // Verify camelCase serialization
        assert!(json.contains("\"squareMode\": \"crop\""));
        assert!(json.contains("\"safeRatio\": 0.8"));
        assert!(json.contains("\"background\": \"#ffffff\""));
    }

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = GenerationMode::FullCoverage
            .profile()
            .with_sizes(vec![48, 96])
            .with_background(Background::new(1, 2, 3));

        let restored = IconProfile::from_json(&profile.to_json().unwrap()).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn empty_profile_deserializes_to_safe_zone() {
        let profile = IconProfile::from_json("{}").unwrap();
        assert_eq!(profile, GenerationMode::SafeZone.profile());
    }

    #[test]
    fn bad_background_is_a_profile_error() {
        let err = IconProfile::from_json(r##"{"background": "#zzzzzz"}"##).unwrap_err();
        assert!(matches!(err, IconError::Profile(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(matches!(
            IconProfile::new().with_safe_ratio(1.5).validate(),
            Err(IconError::InvalidRatio(_))
        ));
        assert!(matches!(
            IconProfile::new().with_sizes(vec![16, 0]).validate(),
            Err(IconError::InvalidSize(0))
        ));
        assert!(IconProfile::new().validate().is_ok());
    }
}
