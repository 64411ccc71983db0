//! Integration tests for the sweep pipeline
//!
//! These tests validate the end-to-end workflow including:
//! - Reference palette construction and nearest-color matching
//! - Configuration sweeps with partial failures
//! - Batch runs over a directory of generated images
//! - HTML and JSON report output

use std::path::Path;
use std::sync::Arc;

use colorsweep::{
    BackgroundMask, BatchRunner, ClusterConfig, ExtractedCluster, Extractor, KmeansExtractor,
    ReferencePalette, RunConfig, SweepDriver, SweepError,
};
use image::{DynamicImage, Rgba, RgbaImage};
use palette::Srgba;

/// Extractor returning the same clusters for every configuration except `failing`
struct FixedExtractor {
    clusters: Vec<ExtractedCluster>,
    failing: Option<ClusterConfig>,
}

impl Extractor for FixedExtractor {
    fn extract(
        &self,
        _cluster_count: usize,
        config: ClusterConfig,
        _resize_size: u32,
        _masks: &[BackgroundMask],
        _image: &DynamicImage,
    ) -> colorsweep::Result<Vec<ExtractedCluster>> {
        if self.failing == Some(config) {
            return Err(SweepError::ExtractionError {
                reason: "scripted".into(),
            });
        }
        Ok(self.clusters.clone())
    }
}

fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
}

fn save_png(dir: &Path, name: &str, color: [u8; 4]) {
    RgbaImage::from_pixel(4, 4, Rgba(color))
        .save(dir.join(name))
        .unwrap();
}

// ============================================================================
// Palette and Matching
// ============================================================================

#[test]
fn test_solid_red_example() {
    let extractor = FixedExtractor {
        clusters: vec![ExtractedCluster::new(255, 0, 0, 4)],
        failing: None,
    };
    let driver = SweepDriver::new(extractor, Arc::new(ReferencePalette::new()));

    let report = driver.sweep("red.jpg", 1, &[ClusterConfig::DEFAULT], &solid(2, 2, [255, 0, 0, 255]));

    assert_eq!(report.entries.len(), 1);
    let matches = &report.entries[0].matches;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].cluster.weight, 4);
    assert_eq!(matches[0].nearest.rgb.red, 224);

    // Same distance on an independent palette
    let again = ReferencePalette::new()
        .find_nearest(Srgba::new(255, 0, 0, 255))
        .unwrap();
    assert_eq!(again.distance, matches[0].distance());
    assert_eq!(again.hex, matches[0].nearest.hex);
}

#[test]
fn test_every_grid_color_matches_itself() {
    let palette = ReferencePalette::new();
    let entries = palette.ensure().to_vec();
    assert_eq!(entries.len(), 512);

    for entry in &entries {
        let rgb = entry.rgb;
        let nearest = palette
            .find_nearest(Srgba::new(rgb.red, rgb.green, rgb.blue, 255))
            .unwrap();
        assert_eq!(nearest.hex, entry.hex);
        assert!(nearest.distance < 1e-3);
    }
    assert_eq!(palette.build_count(), 1);
}

#[test]
fn test_shared_palette_across_threads() {
    let palette = Arc::new(ReferencePalette::new());
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let palette = Arc::clone(&palette);
            std::thread::spawn(move || {
                palette
                    .find_nearest(Srgba::new(60 * i, 100, 200 - 40 * i, 255))
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(palette.build_count(), 1);
}

// ============================================================================
// Sweeps
// ============================================================================

#[test]
fn test_failure_in_middle_keeps_neighbours() {
    let configs = [
        ClusterConfig::AVERAGE_MEAN | ClusterConfig::NO_CROPPING | ClusterConfig::CIEDE2000,
        ClusterConfig::NO_CROPPING,
        ClusterConfig::DEFAULT,
    ];
    let extractor = FixedExtractor {
        clusters: vec![ExtractedCluster::new(40, 90, 200, 10)],
        failing: Some(configs[1]),
    };
    let driver = SweepDriver::new(extractor, Arc::new(ReferencePalette::new()));

    let report = driver.sweep("img.jpg", 3, &configs, &solid(2, 2, [0, 0, 0, 255]));
    let swept: Vec<ClusterConfig> = report.entries.iter().map(|e| e.config).collect();
    assert_eq!(swept, [configs[0], configs[2]]);
}

#[test]
fn test_kmeans_sweep_on_solid_image() {
    let driver = SweepDriver::new(KmeansExtractor::new(), Arc::new(ReferencePalette::new()));
    let configs = RunConfig::default_sweep().configurations;

    let report = driver.sweep("green.png", 1, &configs, &solid(6, 6, [32, 160, 64, 255]));
    assert_eq!(report.entries.len(), 3);
    for entry in &report.entries {
        assert_eq!(entry.matches.len(), 1);
        assert_eq!(entry.matches[0].nearest.hex, "#20A040");
        assert!(entry.matches[0].distance() < 1e-3);
    }
}

#[test]
fn test_kmeans_failures_produce_empty_report() {
    let driver = SweepDriver::new(KmeansExtractor::new(), Arc::new(ReferencePalette::new()));
    let configs = RunConfig::default_sweep().configurations;

    // White everywhere: the background mask removes every pixel
    let report = driver.sweep("white.png", 2, &configs, &solid(5, 5, [255, 255, 255, 255]));
    assert!(report.is_empty());
}

// ============================================================================
// Batch Runs
// ============================================================================

#[test]
fn test_batch_run_over_directory() {
    let dir = tempfile::tempdir().unwrap();
    save_png(dir.path(), "b_red.png", [224, 0, 0, 255]);
    save_png(dir.path(), "a_blue.png", [0, 0, 224, 255]);
    std::fs::write(dir.path().join("c_broken.png"), b"not an image").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let mut config = RunConfig::default_sweep();
    config.input_path = dir.path().to_path_buf();
    config.output_path = dir.path().join("out").join("report.html");
    config.extensions = vec!["png".into()];
    config.cluster_count = 1;
    config.write_json = true;

    let runner = BatchRunner::new(config.clone(), KmeansExtractor::new(), Arc::new(ReferencePalette::new())).unwrap();
    let report = runner.run().unwrap();

    let names: Vec<&str> = report.images().iter().map(|i| i.image.as_str()).collect();
    assert_eq!(names, ["a_blue.png", "b_red.png"]);
    assert_eq!(report.entry_count(), 6);
    assert_eq!(report.images()[1].entries[0].matches[0].nearest.hex, "#E00000");

    runner.write_outputs(&report).unwrap();
    let html = std::fs::read_to_string(&config.output_path).unwrap();
    assert!(html.contains("<h3>K=1, Kmeans++, Mean, ciede, No cropping</h3>"));
    assert!(html.find("a_blue.png").unwrap() < html.find("b_red.png").unwrap());
    // Thumbnails point back to the input directory from out/
    assert!(html.contains("<img src=\"../a_blue.png\""));
    assert_eq!(report.images()[0].source.as_deref(), Some("../a_blue.png"));

    let json = std::fs::read_to_string(config.json_output_path()).unwrap();
    let parsed: colorsweep::BatchReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_batch_run_single_file() {
    let dir = tempfile::tempdir().unwrap();
    save_png(dir.path(), "only.png", [96, 64, 32, 255]);

    let mut config = RunConfig::default_sweep();
    config.input_path = dir.path().join("only.png");
    config.cluster_count = 1;
    config.configurations = vec![ClusterConfig::NO_CROPPING];

    let runner = BatchRunner::new(config, KmeansExtractor::new(), Arc::new(ReferencePalette::new())).unwrap();
    let report = runner.run().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.images()[0].entries[0].matches[0].nearest.hex, "#604020");
}

#[test]
fn test_batch_run_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = RunConfig::default_sweep();
    config.input_path = dir.path().to_path_buf();

    let runner = BatchRunner::new(config, KmeansExtractor::new(), Arc::new(ReferencePalette::new())).unwrap();
    let report = runner.run().unwrap();
    assert!(report.is_empty());
    assert!(report.to_html().contains("<table border=\"1\"></table>"));
}
