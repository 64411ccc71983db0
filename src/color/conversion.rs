//! Color space conversion utilities
//!
//! Provides the conversions the matcher and extractor rely on:
//! - 8-bit sRGB(A) to CIE Lab (D65)
//! - Hex color representation
//! - CIE76 and CIEDE2000 color differences

use palette::color_difference::Ciede2000;
use palette::{FromColor, Lab, Srgb, Srgba};
use crate::{Result, SweepError};

/// Stateless color converter shared by the matcher and the extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    /// Create a new color converter
    pub fn new() -> Self {
        Self
    }

    /// Convert RGB (0-255) to Lab color space
    ///
    /// # Arguments
    ///
    /// * `r`, `g`, `b` - RGB values in range [0, 255]
    ///
    /// # Returns
    ///
    /// Lab color in D65 illuminant
    pub fn rgb_to_lab(&self, r: u8, g: u8, b: u8) -> Lab {
        let srgb = Srgb::new(r, g, b).into_format::<f32>();
        Lab::from_color(srgb)
    }

    /// Convert an 8-bit RGBA color to its perceptual (Lab) representation
    ///
    /// The alpha channel only decides whether the color is defined: a fully
    /// transparent color has no visible value and is rejected. Any other
    /// alpha is treated as opaque.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::ColorConversionError` for a fully transparent color
    pub fn to_perceptual(&self, color: Srgba<u8>) -> Result<Lab> {
        if color.alpha == 0 {
            return Err(SweepError::ColorConversionError {
                message: format!(
                    "color {} is fully transparent",
                    self.rgb_to_hex(color.color)
                ),
            });
        }
        Ok(self.rgb_to_lab(color.red, color.green, color.blue))
    }

    /// Convert 8-bit sRGB to a hexadecimal color string (e.g. "#FF0000")
    pub fn rgb_to_hex(&self, rgb: Srgb<u8>) -> String {
        format!("#{:02X}{:02X}{:02X}", rgb.red, rgb.green, rgb.blue)
    }

    /// Parse hexadecimal color string to 8-bit sRGB
    ///
    /// # Arguments
    ///
    /// * `hex` - Hex color string (e.g., "#FF0000" or "FF0000")
    ///
    /// # Errors
    ///
    /// Returns error if hex string is invalid
    pub fn hex_to_rgb(&self, hex: &str) -> Result<Srgb<u8>> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(SweepError::invalid_parameter("hex color", hex));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| SweepError::invalid_parameter("hex color", hex))
        };

        Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Euclidean color difference in Lab (ΔE76)
    pub fn delta_e(&self, lab1: Lab, lab2: Lab) -> f32 {
        let dl = lab1.l - lab2.l;
        let da = lab1.a - lab2.a;
        let db = lab1.b - lab2.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// CIEDE2000 color difference (ΔE00)
    pub fn delta_e_2000(&self, lab1: Lab, lab2: Lab) -> f32 {
        lab1.difference(lab2)
    }
}
