//! Batch driver: enumerate, load, sweep, aggregate, write

use std::path::{Component, Path};
use std::sync::Arc;

use crate::color::ReferencePalette;
use crate::config::RunConfig;
use crate::extraction::Extractor;
use crate::image_loader::{find_image_files, load_image};
use crate::report::BatchReport;
use crate::sweep::SweepDriver;
use crate::{Result, SweepError};

/// Runs a configured sweep over every input image
pub struct BatchRunner<E> {
    driver: SweepDriver<E>,
    config: RunConfig,
}

impl<E: Extractor> BatchRunner<E> {
    /// Create a runner sharing `palette` with any other consumer
    ///
    /// # Errors
    ///
    /// Returns `SweepError::InvalidParameter` if the configuration cannot
    /// produce any report entry
    pub fn new(config: RunConfig, extractor: E, palette: Arc<ReferencePalette>) -> Result<Self> {
        config.validate()?;
        let driver = SweepDriver::with_params(extractor, palette, config.resize_size, config.masks.clone());
        Ok(Self { driver, config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Process every image found under the configured input path
    ///
    /// Images that fail to load are logged and skipped; they do not
    /// appear in the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be enumerated, or if loading an
    /// image fails for a reason that is not specific to that image
    pub fn run(&self) -> Result<BatchReport> {
        let files = find_image_files(&self.config.input_path, &self.config.extensions)?;
        tracing::info!(
            input = %self.config.input_path.display(),
            images = files.len(),
            configurations = self.config.configurations.len(),
            "Starting sweep"
        );

        let mut report = BatchReport::new();
        for (index, path) in files.iter().enumerate() {
            let name = display_name(path);
            let image = match load_image(path) {
                Ok(image) => image,
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(image = %name, error = %e, "Skipping image");
                    continue;
                }
                Err(e) => return Err(e),
            };

            tracing::info!(image = %name, "[{}/{}] Sweeping", index + 1, files.len());
            let mut image_report = self.driver.sweep(
                &name,
                self.config.cluster_count,
                &self.config.configurations,
                &image,
            );
            image_report.source = Some(thumbnail_src(path, &self.config.output_path));
            report.push(image_report);
        }

        tracing::info!(
            images = report.len(),
            entries = report.entry_count(),
            "Sweep complete"
        );
        Ok(report)
    }

    /// Write the HTML report, plus its JSON data when enabled
    pub fn write_outputs(&self, report: &BatchReport) -> Result<()> {
        write_file(&self.config.output_path, &report.to_html())?;
        if self.config.write_json {
            write_file(&self.config.json_output_path(), &report.to_json()?)?;
        }
        Ok(())
    }
}

/// File name used as the image identifier in reports
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Path of `image` as seen from the directory holding the report at `output`
///
/// Falls back to the absolute image path when the two share no root.
fn thumbnail_src(image: &Path, output: &Path) -> String {
    let base = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let (Ok(image), Ok(base)) = (std::path::absolute(image), std::path::absolute(base)) else {
        return image.display().to_string();
    };

    let image: Vec<Component> = image.components().collect();
    let base: Vec<Component> = base.components().collect();
    let common = image.iter().zip(&base).take_while(|(a, b)| a == b).count();
    if common == 0 {
        return image.iter().collect::<std::path::PathBuf>().display().to_string();
    }

    let mut parts: Vec<String> = vec!["..".to_string(); base.len() - common];
    parts.extend(
        image[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| SweepError::io(format!("Failed to create {}", parent.display()), e))?;
    }
    std::fs::write(path, contents)
        .map_err(|e| SweepError::io(format!("Failed to write {}", path.display()), e))?;
    tracing::info!(path = %path.display(), "Report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("photos/cat.jpg")), "cat.jpg");
        assert_eq!(display_name(Path::new("dog.jpg")), "dog.jpg");
    }

    #[test]
    fn test_thumbnail_src_relative_to_report() {
        assert_eq!(thumbnail_src(Path::new("cat.jpg"), Path::new("output.html")), "cat.jpg");
        assert_eq!(
            thumbnail_src(Path::new("photos/cat.jpg"), Path::new("photos/report.html")),
            "cat.jpg"
        );
        assert_eq!(
            thumbnail_src(Path::new("photos/cat.jpg"), Path::new("out/report.html")),
            "../photos/cat.jpg"
        );
        assert_eq!(
            thumbnail_src(Path::new("cat.jpg"), Path::new("out/html/report.html")),
            "../../cat.jpg"
        );
    }

    #[test]
    fn test_runner_validates_config() {
        let mut config = RunConfig::default_sweep();
        config.cluster_count = 0;
        let runner = BatchRunner::new(config, crate::KmeansExtractor::new(), Arc::new(ReferencePalette::new()));
        assert!(runner.is_err());
    }

    #[test]
    fn test_missing_input_directory() {
        let mut config = RunConfig::default_sweep();
        config.input_path = PathBuf::from("no/such/dir");
        let runner = BatchRunner::new(config, crate::KmeansExtractor::new(), Arc::new(ReferencePalette::new())).unwrap();
        assert!(matches!(runner.run(), Err(SweepError::IoError { .. })));
    }
}
