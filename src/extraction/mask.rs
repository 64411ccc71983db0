//! Background exclusion masks
//!
//! Product shots and scans often sit on a flat white, black or green-screen
//! background that would otherwise dominate the clusters. A mask describes
//! such a background as per-channel ranges; it only becomes active for an
//! image whose border mostly matches it.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::constants::extraction::MASK_BORDER_RATIO;

/// Inclusive 8-bit channel range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRange {
    pub min: u8,
    pub max: u8,
}

impl ChannelRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    fn contains(&self, value: u8) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Background color described by per-channel ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundMask {
    pub name: String,
    pub red: ChannelRange,
    pub green: ChannelRange,
    pub blue: ChannelRange,
}

impl BackgroundMask {
    /// Near-white backgrounds
    pub fn white() -> Self {
        Self {
            name: "white".into(),
            red: ChannelRange::new(0xEE, 0xFF),
            green: ChannelRange::new(0xEE, 0xFF),
            blue: ChannelRange::new(0xEE, 0xFF),
        }
    }

    /// Near-black backgrounds
    pub fn black() -> Self {
        Self {
            name: "black".into(),
            red: ChannelRange::new(0x00, 0x11),
            green: ChannelRange::new(0x00, 0x11),
            blue: ChannelRange::new(0x00, 0x11),
        }
    }

    /// Green-screen backgrounds
    pub fn green() -> Self {
        Self {
            name: "green".into(),
            red: ChannelRange::new(0x00, 0x44),
            green: ChannelRange::new(0xBB, 0xFF),
            blue: ChannelRange::new(0x00, 0x44),
        }
    }

    /// White, black and green-screen masks
    pub fn default_masks() -> Vec<BackgroundMask> {
        vec![Self::white(), Self::black(), Self::green()]
    }

    /// Check whether a pixel belongs to this background
    pub fn matches(&self, pixel: &Rgba<u8>) -> bool {
        let [r, g, b, _] = pixel.0;
        self.red.contains(r) && self.green.contains(g) && self.blue.contains(b)
    }

    /// A mask applies to an image when enough of its border pixels match
    pub fn is_active_for(&self, image: &RgbaImage) -> bool {
        let border = border_pixels(image);
        if border.is_empty() {
            return false;
        }
        let matching = border.iter().filter(|pixel| self.matches(pixel)).count();
        matching as f32 >= border.len() as f32 * MASK_BORDER_RATIO
    }
}

/// Masks that are active for `image`
pub fn active_masks<'a>(masks: &'a [BackgroundMask], image: &RgbaImage) -> Vec<&'a BackgroundMask> {
    masks.iter().filter(|mask| mask.is_active_for(image)).collect()
}

/// Pixels on the outermost rows and columns, each counted once
fn border_pixels(image: &RgbaImage) -> Vec<Rgba<u8>> {
    let (width, height) = image.dimensions();
    image
        .enumerate_pixels()
        .filter(|(x, y, _)| *x == 0 || *y == 0 || *x + 1 == width || *y + 1 == height)
        .map(|(_, _, pixel)| *pixel)
        .collect()
}
