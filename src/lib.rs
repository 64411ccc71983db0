//! # colorsweep
//!
//! Compare dominant-color extraction settings across a batch of images.
//!
//! For every image the library:
//! - Runs k-means dominant color extraction under several bit-flag
//!   configurations (seeding, averaging, distance metric, cropping)
//! - Maps each extracted color to the perceptually closest entry of a fixed
//!   512-color reference palette using CIEDE2000
//! - Aggregates the results, in order, into a report rendered as HTML/JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use colorsweep::{ClusterConfig, KmeansExtractor, ReferencePalette, SweepDriver};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let palette = Arc::new(ReferencePalette::new());
//! let driver = SweepDriver::new(KmeansExtractor::new(), palette);
//! let image = colorsweep::image_loader::load_image(Path::new("photo.jpg"))?;
//!
//! let report = driver.sweep("photo.jpg", 3, &[ClusterConfig::DEFAULT], &image);
//! for entry in &report.entries {
//!     for m in &entry.matches {
//!         println!("{} -> {} ({:.2})", m.cluster.hex(), m.nearest.hex, m.distance());
//!     }
//! }
//! # Ok::<(), colorsweep::SweepError>(())
//! ```

pub mod batch;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod image_loader;
pub mod report;
pub mod sweep;

pub use batch::BatchRunner;
pub use color::{ColorConverter, NearestColor, PaletteEntry, ReferencePalette};
pub use config::RunConfig;
pub use error::{Result, SweepError};
pub use extraction::{describe, BackgroundMask, ClusterConfig, ExtractedCluster, Extractor, KmeansExtractor};
pub use report::BatchReport;
pub use sweep::{ConfigurationReport, ImageReport, MatchResult, SweepDriver};
