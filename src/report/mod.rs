//! Report aggregation
//!
//! Collects image reports in processing order. Ordering is part of the
//! output contract: images as processed, configurations as swept, clusters
//! as returned by the extractor. Nothing here re-sorts.

pub mod html;

use serde::{Deserialize, Serialize};

use crate::sweep::ImageReport;
use crate::{Result, SweepError};

/// Aggregate report of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    images: Vec<ImageReport>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the report of the next processed image
    pub fn push(&mut self, report: ImageReport) {
        self.images.push(report);
    }

    /// Image reports in processing order
    pub fn images(&self) -> &[ImageReport] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Total number of configuration entries across all images
    pub fn entry_count(&self) -> usize {
        self.images.iter().map(|image| image.entries.len()).sum()
    }

    /// Serialize the whole report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SweepError::config("Failed to serialize report", e))
    }

    /// Render the report as a standalone HTML page
    pub fn to_html(&self) -> String {
        html::render(self)
    }
}

impl FromIterator<ImageReport> for BatchReport {
    fn from_iter<I: IntoIterator<Item = ImageReport>>(iter: I) -> Self {
        Self {
            images: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BatchReport {
    type Item = &'a ImageReport;
    type IntoIter = std::slice::Iter<'a, ImageReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
