//! Reference palette and nearest-color matching
//!
//! The reference palette is a coarse grid over the RGB cube (step 32 on each
//! axis, 512 entries) converted once to Lab. Every extracted color is mapped
//! to its closest grid entry by CIEDE2000, which gives reports a stable,
//! comparable vocabulary of colors across images and configurations.
//!
//! The palette lives in a [`ReferencePalette`] service. It is built lazily on
//! first use behind a [`OnceLock`], so concurrent first callers still build it
//! exactly once, and is read-only afterwards.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use palette::{Lab, Srgb, Srgba};
use serde::{Deserialize, Serialize};

use crate::color::ColorConverter;
use crate::constants::grid::{CHANNEL_BOUND, GRID_STEP, PALETTE_SIZE};
use crate::Result;

/// One sample of the reference grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Generating 8-bit sRGB triple
    pub rgb: Srgb<u8>,
    /// Perceptual representation used for distance computation
    pub lab: Lab,
    /// Display label (`#RRGGBB`)
    pub hex: String,
}

/// Closest palette entry for a queried color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestColor {
    /// Display label of the winning palette entry
    pub hex: String,
    /// Generating sRGB triple of the winning palette entry
    pub rgb: Srgb<u8>,
    /// CIEDE2000 distance between the query and the entry
    pub distance: f32,
}

/// Lazily-built reference palette shared by every consumer of a run
#[derive(Debug, Default)]
pub struct ReferencePalette {
    entries: OnceLock<Vec<PaletteEntry>>,
    converter: ColorConverter,
    builds: AtomicUsize,
}

impl ReferencePalette {
    /// Create an empty palette service; the grid is built on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure the palette is populated and return its entries
    ///
    /// Idempotent and safe to call from several threads; the grid is
    /// generated at most once per service.
    pub fn ensure(&self) -> &[PaletteEntry] {
        self.entries.get_or_init(|| {
            self.builds.fetch_add(1, Ordering::Relaxed);
            let entries = build_grid(&self.converter);
            tracing::debug!(entries = entries.len(), "Reference palette built");
            entries
        })
    }

    /// Whether the grid has been generated yet
    pub fn is_built(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Number of times the grid has been generated (0 or 1)
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Find the palette entry perceptually closest to `color`
    ///
    /// Scans the whole palette by CIEDE2000. On equal distances the entry
    /// generated first wins.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::ColorConversionError` if `color` has no
    /// perceptual representation (fully transparent)
    pub fn find_nearest(&self, color: Srgba<u8>) -> Result<NearestColor> {
        let entries = self.ensure();
        let target = self.converter.to_perceptual(color)?;

        // The grid is never empty, so a winner always exists.
        let (entry, distance) = nearest_entry(&self.converter, entries, target).ok_or_else(|| {
            crate::SweepError::ColorConversionError {
                message: "reference palette is empty".into(),
            }
        })?;

        Ok(NearestColor {
            hex: entry.hex.clone(),
            rgb: entry.rgb,
            distance,
        })
    }
}

/// Generate the grid in R, G, B order (B varies fastest)
///
/// The loop domain is fixed and always in range, so a failed conversion is
/// skipped rather than reported.
fn build_grid(converter: &ColorConverter) -> Vec<PaletteEntry> {
    let mut entries = Vec::with_capacity(PALETTE_SIZE);
    for r in (0..CHANNEL_BOUND).step_by(GRID_STEP) {
        for g in (0..CHANNEL_BOUND).step_by(GRID_STEP) {
            for b in (0..CHANNEL_BOUND).step_by(GRID_STEP) {
                let rgb = Srgb::new(r as u8, g as u8, b as u8);
                if let Ok(lab) = converter.to_perceptual(Srgba::new(rgb.red, rgb.green, rgb.blue, 255)) {
                    entries.push(PaletteEntry {
                        rgb,
                        lab,
                        hex: converter.rgb_to_hex(rgb),
                    });
                }
            }
        }
    }
    entries
}

/// Linear scan for the minimum CIEDE2000 distance; strict `<` keeps the first of equals
fn nearest_entry<'a>(
    converter: &ColorConverter,
    entries: &'a [PaletteEntry],
    target: Lab,
) -> Option<(&'a PaletteEntry, f32)> {
    let mut best: Option<(&PaletteEntry, f32)> = None;
    for entry in entries {
        let distance = converter.delta_e_2000(entry.lab, target);
        match best {
            Some((_, min)) if distance >= min => {}
            _ => best = Some((entry, distance)),
        }
    }
    best
}
