//! Colors, color schemes and palettes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Two-valued color scheme of the hosting page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// Switch to the other scheme.
    pub fn toggle(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    /// Display name of the scheme.
    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("unrecognized color format: {0:?}")]
    Format(String),
    #[error("invalid color component {component:?} in {input:?}")]
    Component { input: String, component: String },
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha channel, clamped to `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Accepts `#rrggbb` and `rgb(r, g, b)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        if let Some(hex) = input.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(ColorParseError::Format(s.to_string()));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range.clone()], 16).map_err(|_| {
                    ColorParseError::Component {
                        input: s.to_string(),
                        component: hex[range].to_string(),
                    }
                })
            };
            return Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let inner = input
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ColorParseError::Format(s.to_string()))?;

        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ColorParseError::Format(s.to_string()));
        }

        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| ColorParseError::Component {
                input: s.to_string(),
                component: part.to_string(),
            })?;
        }

        Ok(Rgb::new(channels[0], channels[1], channels[2]))
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// An RGB color with alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    /// Source-over composite this color onto an opaque destination.
    pub fn over(self, dst: Rgb) -> Rgb {
        let blend = |src: u8, dst: u8| {
            (src as f64 * self.alpha + dst as f64 * (1.0 - self.alpha)).round() as u8
        };
        Rgb::new(
            blend(self.rgb.r, dst.r),
            blend(self.rgb.g, dst.g),
            blend(self.rgb.b, dst.b),
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        rgb.with_alpha(1.0)
    }
}

/// Style accepted by [`DrawingContext::set_fill_style`](crate::DrawingContext::set_fill_style).
pub type FillStyle = Rgba;

/// Resolved colors for one scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemePalette {
    /// Page background behind the surface.
    pub page: Rgb,
    /// Fill of cells at rest.
    pub idle: Rgb,
    /// Pointer-proximity highlight.
    pub hover: Rgb,
    /// Color fading cells are painted in.
    pub pulse: Rgb,
}

/// Pre-resolved colors for both schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub light: SchemePalette,
    pub dark: SchemePalette,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            light: SchemePalette {
                page: Rgb::new(252, 251, 248),
                idle: Rgb::new(240, 237, 231),
                hover: Rgb::new(203, 193, 174),
                pulse: Rgb::new(222, 214, 198),
            },
            dark: SchemePalette {
                page: Rgb::new(12, 12, 14),
                idle: Rgb::new(26, 27, 30),
                hover: Rgb::new(44, 46, 51),
                pulse: Rgb::new(58, 60, 66),
            },
        }
    }
}

impl Palette {
    /// Colors for the given scheme.
    pub fn for_scheme(&self, scheme: ColorScheme) -> SchemePalette {
        match scheme {
            ColorScheme::Light => self.light,
            ColorScheme::Dark => self.dark,
        }
    }
}
