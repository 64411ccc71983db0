//! Configuration sweep over a single image
//!
//! Runs the extraction capability once per configuration at a fixed cluster
//! count and maps every extracted color onto the reference palette. A failing
//! configuration is logged and left out of the report; it never aborts the
//! rest of the sweep.

use std::sync::Arc;

use image::DynamicImage;
use palette::Srgba;
use serde::{Deserialize, Serialize};

use crate::color::{NearestColor, ReferencePalette};
use crate::constants::extraction::DEFAULT_RESIZE_SIZE;
use crate::extraction::{BackgroundMask, ClusterConfig, ExtractedCluster, Extractor};
use crate::Result;

/// An extracted cluster with its closest reference palette color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub cluster: ExtractedCluster,
    pub nearest: NearestColor,
}

impl MatchResult {
    /// CIEDE2000 distance between the cluster and its palette match
    pub fn distance(&self) -> f32 {
        self.nearest.distance
    }
}

/// Matches for one successful configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationReport {
    pub config: ClusterConfig,
    pub label: String,
    pub matches: Vec<MatchResult>,
}

/// All successful configurations for one image, in sweep order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    /// Identifier of the image (usually its file name)
    pub image: String,
    /// Thumbnail location relative to the HTML report, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub cluster_count: usize,
    pub entries: Vec<ConfigurationReport>,
}

impl ImageReport {
    /// Section title for a configuration, e.g. "K=3, Kmeans++, Median, RGB, No cropping"
    pub fn title(&self, entry: &ConfigurationReport) -> String {
        format!("K={}, {}", self.cluster_count, entry.label)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Image reference used for the report thumbnail
    pub fn thumbnail(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.image)
    }
}

/// Drives extraction sweeps and palette matching
pub struct SweepDriver<E> {
    extractor: E,
    palette: Arc<ReferencePalette>,
    resize_size: u32,
    masks: Vec<BackgroundMask>,
}

impl<E: Extractor> SweepDriver<E> {
    /// Create a driver with the default resize size and background masks
    pub fn new(extractor: E, palette: Arc<ReferencePalette>) -> Self {
        Self::with_params(
            extractor,
            palette,
            DEFAULT_RESIZE_SIZE,
            BackgroundMask::default_masks(),
        )
    }

    /// Create a driver with a custom resize size and masks
    pub fn with_params(
        extractor: E,
        palette: Arc<ReferencePalette>,
        resize_size: u32,
        masks: Vec<BackgroundMask>,
    ) -> Self {
        Self {
            extractor,
            palette,
            resize_size,
            masks,
        }
    }

    /// Shared reference palette
    pub fn palette(&self) -> &Arc<ReferencePalette> {
        &self.palette
    }

    /// Sweep every configuration over one image
    ///
    /// # Arguments
    ///
    /// * `image_name` - Identifier recorded in the report
    /// * `cluster_count` - Number of clusters for every configuration
    /// * `configs` - Configurations, in report order
    /// * `image` - Decoded image
    ///
    /// # Returns
    ///
    /// An `ImageReport` with one entry per successful configuration. When
    /// every configuration fails, the report has no entries.
    pub fn sweep(
        &self,
        image_name: &str,
        cluster_count: usize,
        configs: &[ClusterConfig],
        image: &DynamicImage,
    ) -> ImageReport {
        let mut report = ImageReport {
            image: image_name.to_string(),
            source: None,
            cluster_count,
            entries: Vec::with_capacity(configs.len()),
        };

        for &config in configs {
            match self.run_configuration(cluster_count, config, image) {
                Ok(entry) => report.entries.push(entry),
                Err(e) => {
                    tracing::warn!(
                        image = image_name,
                        config = config.bits(),
                        label = %config.label(),
                        error = %e,
                        "Skipping configuration"
                    );
                }
            }
        }

        tracing::debug!(
            image = image_name,
            succeeded = report.entries.len(),
            requested = configs.len(),
            "Sweep finished"
        );
        report
    }

    fn run_configuration(
        &self,
        cluster_count: usize,
        config: ClusterConfig,
        image: &DynamicImage,
    ) -> Result<ConfigurationReport> {
        let clusters = self
            .extractor
            .extract(cluster_count, config, self.resize_size, &self.masks, image)?;

        let matches = clusters
            .into_iter()
            .map(|cluster| {
                let color = cluster.color;
                let nearest = self
                    .palette
                    .find_nearest(Srgba::new(color.red, color.green, color.blue, 255))?;
                Ok(MatchResult { cluster, nearest })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigurationReport {
            config,
            label: config.label(),
            matches,
        })
    }
}
