//! Run configuration for batch sweeps
//!
//! A run is fully described by a [`RunConfig`]: where images come from,
//! where the report goes, the cluster count and the configurations to sweep.
//! It can be loaded from JSON or constructed programmatically:
//!
//! ```no_run
//! use colorsweep::RunConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = RunConfig::from_json_file(Path::new("sweep.json"))?;
//!
//! // Or use the defaults
//! let config = RunConfig::default_sweep();
//! # Ok::<(), colorsweep::SweepError>(())
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::extraction::{DEFAULT_CLUSTER_COUNT, DEFAULT_RESIZE_SIZE, DEFAULT_SEED};
use crate::constants::report::{DEFAULT_EXTENSIONS, DEFAULT_OUTPUT_FILE};
use crate::extraction::{BackgroundMask, ClusterConfig};
use crate::{Result, SweepError};

/// Complete configuration of a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Input directory or single image file
    pub input_path: PathBuf,

    /// HTML report destination
    pub output_path: PathBuf,

    /// Also write the report data as JSON next to the HTML file
    #[serde(default)]
    pub write_json: bool,

    /// Number of clusters (k) for every configuration
    pub cluster_count: usize,

    /// Configurations to sweep, in report order
    pub configurations: Vec<ClusterConfig>,

    /// Larger image dimension before clustering (0 disables resizing)
    #[serde(default = "default_resize_size")]
    pub resize_size: u32,

    /// File extensions to process
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Background masks applied by the extractor
    #[serde(default = "BackgroundMask::default_masks")]
    pub masks: Vec<BackgroundMask>,

    /// Seed for the k-means random number generator
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_resize_size() -> u32 {
    DEFAULT_RESIZE_SIZE
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::default_sweep()
    }
}

impl RunConfig {
    /// Three-configuration sweep over the JPEG files of the working directory
    pub fn default_sweep() -> Self {
        Self {
            input_path: PathBuf::from("."),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            write_json: false,
            cluster_count: DEFAULT_CLUSTER_COUNT,
            configurations: vec![
                ClusterConfig::AVERAGE_MEAN | ClusterConfig::NO_CROPPING | ClusterConfig::CIEDE2000,
                ClusterConfig::NO_CROPPING,
                ClusterConfig::DEFAULT,
            ],
            resize_size: DEFAULT_RESIZE_SIZE,
            extensions: default_extensions(),
            masks: BackgroundMask::default_masks(),
            seed: DEFAULT_SEED,
        }
    }

    /// Check parameters that would make every configuration fail
    pub fn validate(&self) -> Result<()> {
        if self.cluster_count == 0 {
            return Err(SweepError::invalid_parameter("cluster_count", self.cluster_count));
        }
        if self.configurations.is_empty() {
            return Err(SweepError::invalid_parameter("configurations", "[]"));
        }
        if self.extensions.is_empty() {
            return Err(SweepError::invalid_parameter("extensions", "[]"));
        }
        Ok(())
    }

    /// Path of the JSON data written alongside the HTML report
    pub fn json_output_path(&self) -> PathBuf {
        self.output_path.with_extension("json")
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SweepError::config(format!("Failed to read {}", path.display()), e))?;
        serde_json::from_str(&content)
            .map_err(|e| SweepError::config(format!("Failed to parse {}", path.display()), e))
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SweepError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json)
            .map_err(|e| SweepError::io(format!("Failed to write {}", path.display()), e))
    }
}
