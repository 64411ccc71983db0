//! Color conversion and reference palette module
//!
//! This module handles conversions between sRGB and the perceptual Lab
//! space, and maps arbitrary colors onto the fixed reference palette.

pub mod conversion;
pub mod reference;

pub use conversion::ColorConverter;
pub use reference::{NearestColor, PaletteEntry, ReferencePalette};
