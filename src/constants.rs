//! Fixed parameters for palette generation, extraction and reporting
//!
//! Values mirror the behavior of the prominent-color extraction library the
//! report format was designed around, so sweeps stay comparable across runs.

/// Reference palette grid
pub mod grid {
    /// Distance between neighbouring samples on each RGB axis
    pub const GRID_STEP: usize = 32;

    /// Exclusive upper bound of each channel loop
    pub const CHANNEL_BOUND: usize = 255;

    /// Samples per channel: 0, 32, ..., 224
    pub const SAMPLES_PER_CHANNEL: usize = CHANNEL_BOUND.div_ceil(GRID_STEP);

    /// Total number of palette entries (8 x 8 x 8)
    pub const PALETTE_SIZE: usize =
        SAMPLES_PER_CHANNEL * SAMPLES_PER_CHANNEL * SAMPLES_PER_CHANNEL;
}

/// Dominant color extraction defaults
pub mod extraction {
    /// Default number of clusters per configuration
    pub const DEFAULT_CLUSTER_COUNT: usize = 3;

    /// Default resize target: larger image dimension in pixels (0 disables resizing)
    pub const DEFAULT_RESIZE_SIZE: u32 = 80;

    /// Upper bound on k-means assignment/update rounds
    pub const MAX_ITERATIONS: usize = 20;

    /// Fraction of width/height trimmed from each side when cropping to the center
    pub const CROP_MARGIN: f32 = 0.1;

    /// Share of border pixels that must match a background mask to activate it
    pub const MASK_BORDER_RATIO: f32 = 0.5;

    /// Default seed for the k-means random number generator
    pub const DEFAULT_SEED: u64 = 0x5EED;
}

/// Report output
pub mod report {
    /// Separator between the four descriptor tokens
    pub const LABEL_SEPARATOR: &str = ", ";

    /// Report file written when no output path is configured
    pub const DEFAULT_OUTPUT_FILE: &str = "output.html";

    /// Image extensions processed by default
    pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg"];

    /// Width of the thumbnail column in the HTML report
    pub const THUMBNAIL_WIDTH: u32 = 200;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_grid_dimensions() {
        assert_eq!(grid::SAMPLES_PER_CHANNEL, 8);
        assert_eq!(grid::PALETTE_SIZE, 512);
        // Last sample on each axis stays below the bound
        assert_eq!((grid::SAMPLES_PER_CHANNEL - 1) * grid::GRID_STEP, 224);
    }

    #[test]
    fn test_extraction_ranges() {
        assert!(extraction::CROP_MARGIN > 0.0 && extraction::CROP_MARGIN < 0.5);
        assert!(extraction::MASK_BORDER_RATIO > 0.0 && extraction::MASK_BORDER_RATIO <= 1.0);
        assert!(extraction::MAX_ITERATIONS > 0);
    }
}
