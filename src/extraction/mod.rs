//! Dominant color extraction module
//!
//! Defines the extraction capability consumed by the sweep driver, the
//! bit-flag configurations that select its behavior, background masks, and
//! the default k-means implementation.

pub mod flags;
pub mod kmeans;
pub mod mask;

pub use flags::{describe, Averaging, ClusterConfig, ClusterSettings, Cropping, DistanceSpace, SeedStrategy};
pub use kmeans::KmeansExtractor;
pub use mask::{BackgroundMask, ChannelRange};

use image::DynamicImage;
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::color::ColorConverter;
use crate::Result;

/// One dominant color with the number of pixels assigned to it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedCluster {
    pub color: Srgb<u8>,
    pub weight: u32,
}

impl ExtractedCluster {
    pub fn new(red: u8, green: u8, blue: u8, weight: u32) -> Self {
        Self {
            color: Srgb::new(red, green, blue),
            weight,
        }
    }

    /// Hex representation of the cluster color
    pub fn hex(&self) -> String {
        ColorConverter::new().rgb_to_hex(self.color)
    }
}

/// Dominant color extraction capability
///
/// Implementations return clusters in dominance order; callers never
/// re-sort them.
pub trait Extractor {
    /// Extract up to `cluster_count` dominant colors from `image`
    ///
    /// # Arguments
    ///
    /// * `cluster_count` - Number of clusters (k)
    /// * `config` - Bit-flag configuration selecting the algorithm variant
    /// * `resize_size` - Larger image dimension to downscale to (0 = keep size)
    /// * `masks` - Background masks to exclude
    /// * `image` - Decoded image
    ///
    /// # Errors
    ///
    /// Any error only invalidates this configuration for this image.
    fn extract(
        &self,
        cluster_count: usize,
        config: ClusterConfig,
        resize_size: u32,
        masks: &[BackgroundMask],
        image: &DynamicImage,
    ) -> Result<Vec<ExtractedCluster>>;
}

impl<E: Extractor + ?Sized> Extractor for &E {
    fn extract(
        &self,
        cluster_count: usize,
        config: ClusterConfig,
        resize_size: u32,
        masks: &[BackgroundMask],
        image: &DynamicImage,
    ) -> Result<Vec<ExtractedCluster>> {
        (**self).extract(cluster_count, config, resize_size, masks, image)
    }
}

impl<E: Extractor + ?Sized> Extractor for Box<E> {
    fn extract(
        &self,
        cluster_count: usize,
        config: ClusterConfig,
        resize_size: u32,
        masks: &[BackgroundMask],
        image: &DynamicImage,
    ) -> Result<Vec<ExtractedCluster>> {
        (**self).extract(cluster_count, config, resize_size, masks, image)
    }
}
