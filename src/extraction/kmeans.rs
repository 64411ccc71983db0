//! K-means dominant color extraction
//!
//! Default implementation of [`Extractor`]:
//! 1. Optionally crop to the image center
//! 2. Downscale so the larger side is at most `resize_size`
//! 3. Drop transparent pixels and pixels of active background masks
//! 4. Seed centroids (Kmeans++ or random pixels)
//! 5. Alternate assignment and update (mean or median) until stable
//! 6. Report non-empty clusters by descending pixel count
//!
//! Centroids are kept in sRGB; only the distance metric changes with the
//! configured color space.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};
use palette::{FromColor, Lab, Srgb};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::ColorConverter;
use crate::constants::extraction::{CROP_MARGIN, DEFAULT_SEED, MAX_ITERATIONS};
use crate::extraction::flags::{Averaging, ClusterSettings, Cropping, DistanceSpace, SeedStrategy};
use crate::extraction::mask::active_masks;
use crate::extraction::{BackgroundMask, ClusterConfig, ExtractedCluster, Extractor};
use crate::{Result, SweepError};

/// A pixel or centroid with its cached perceptual value
#[derive(Debug, Clone, Copy)]
struct Point {
    rgb: [f32; 3],
    lab: Lab,
}

impl Point {
    fn from_rgb(rgb: [f32; 3]) -> Self {
        let srgb = Srgb::new(rgb[0] / 255.0, rgb[1] / 255.0, rgb[2] / 255.0);
        Self {
            rgb,
            lab: Lab::from_color(srgb),
        }
    }
}

/// K-means extractor with a deterministic random number generator
#[derive(Debug, Clone)]
pub struct KmeansExtractor {
    seed: u64,
    max_iterations: usize,
    converter: ColorConverter,
}

impl Default for KmeansExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KmeansExtractor {
    /// Create an extractor with the default seed and iteration bound
    pub fn new() -> Self {
        Self::with_params(DEFAULT_SEED, MAX_ITERATIONS)
    }

    /// Create an extractor with a custom seed and iteration bound
    pub fn with_params(seed: u64, max_iterations: usize) -> Self {
        Self {
            seed,
            max_iterations: max_iterations.max(1),
            converter: ColorConverter::new(),
        }
    }

    /// Crop and downscale, then convert to RGBA
    fn prepare(&self, image: &DynamicImage, cropping: Cropping, resize_size: u32) -> RgbaImage {
        let cropped = match cropping {
            Cropping::Center => crop_center(image),
            Cropping::None => image.clone(),
        };

        let (width, height) = cropped.dimensions();
        if resize_size > 0 && width.max(height) > resize_size {
            cropped.resize(resize_size, resize_size, FilterType::Triangle).to_rgba8()
        } else {
            cropped.to_rgba8()
        }
    }

    /// Opaque pixels outside every active background mask
    fn collect_points(&self, image: &RgbaImage, masks: &[BackgroundMask]) -> Vec<Point> {
        let active = active_masks(masks, image);
        if !active.is_empty() {
            let names: Vec<&str> = active.iter().map(|mask| mask.name.as_str()).collect();
            tracing::debug!(masks = ?names, "Background masks active");
        }

        image
            .pixels()
            .filter(|pixel| pixel.0[3] > 0 && !active.iter().any(|mask| mask.matches(pixel)))
            .map(|pixel| Point::from_rgb([pixel.0[0] as f32, pixel.0[1] as f32, pixel.0[2] as f32]))
            .collect()
    }

    fn distance(&self, space: DistanceSpace, a: &Point, b: &Point) -> f32 {
        match space {
            DistanceSpace::Rgb => {
                let dr = a.rgb[0] - b.rgb[0];
                let dg = a.rgb[1] - b.rgb[1];
                let db = a.rgb[2] - b.rgb[2];
                (dr * dr + dg * dg + db * db).sqrt()
            }
            DistanceSpace::Lab => self.converter.delta_e(a.lab, b.lab),
            DistanceSpace::Ciede2000 => self.converter.delta_e_2000(a.lab, b.lab),
        }
    }

    /// Index of the closest centroid; ties go to the lower index
    fn closest(&self, space: DistanceSpace, point: &Point, centroids: &[Point]) -> usize {
        let mut best = 0;
        let mut min = f32::INFINITY;
        for (index, centroid) in centroids.iter().enumerate() {
            let distance = self.distance(space, point, centroid);
            if distance < min {
                min = distance;
                best = index;
            }
        }
        best
    }

    fn seed_centroids(&self, settings: &ClusterSettings, points: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
        match settings.seed {
            SeedStrategy::Random => rand::seq::index::sample(rng, points.len(), k)
                .into_iter()
                .map(|index| points[index])
                .collect(),
            SeedStrategy::KmeansPlusPlus => {
                let mut centroids = Vec::with_capacity(k);
                centroids.push(points[rng.gen_range(0..points.len())]);

                while centroids.len() < k {
                    let weights: Vec<f32> = points
                        .iter()
                        .map(|point| {
                            let nearest = centroids
                                .iter()
                                .map(|centroid| self.distance(settings.distance, point, centroid))
                                .fold(f32::INFINITY, f32::min);
                            nearest * nearest
                        })
                        .collect();

                    // All remaining weights are zero when every pixel already
                    // sits on a centroid; any pick is as good as another.
                    let next = match WeightedIndex::new(&weights) {
                        Ok(distribution) => distribution.sample(rng),
                        Err(_) => rng.gen_range(0..points.len()),
                    };
                    centroids.push(points[next]);
                }
                centroids
            }
        }
    }

    fn update_centroid(&self, averaging: Averaging, members: &[&Point]) -> Point {
        let channel = |c: usize| -> f32 {
            match averaging {
                Averaging::Mean => members.iter().map(|p| p.rgb[c]).sum::<f32>() / members.len() as f32,
                Averaging::Median => {
                    let mut values: Vec<f32> = members.iter().map(|p| p.rgb[c]).collect();
                    values.sort_by(|a, b| a.total_cmp(b));
                    values[values.len() / 2]
                }
            }
        };
        Point::from_rgb([channel(0), channel(1), channel(2)])
    }

    /// Run Lloyd iterations; returns final centroids and per-point assignments
    fn cluster(&self, settings: &ClusterSettings, points: &[Point], k: usize) -> (Vec<Point>, Vec<usize>) {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = self.seed_centroids(settings, points, k, &mut rng);
        let mut assignments = vec![usize::MAX; points.len()];

        for iteration in 0..self.max_iterations {
            let mut changed = false;
            for (point, assigned) in points.iter().zip(assignments.iter_mut()) {
                let closest = self.closest(settings.distance, point, &centroids);
                if *assigned != closest {
                    *assigned = closest;
                    changed = true;
                }
            }
            if !changed {
                tracing::trace!(iteration, "K-means converged");
                break;
            }

            for (index, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&Point> = points
                    .iter()
                    .zip(&assignments)
                    .filter(|(_, assigned)| **assigned == index)
                    .map(|(point, _)| point)
                    .collect();
                // Empty clusters keep their previous position
                if !members.is_empty() {
                    *centroid = self.update_centroid(settings.averaging, &members);
                }
            }
        }

        for (point, assigned) in points.iter().zip(assignments.iter_mut()) {
            *assigned = self.closest(settings.distance, point, &centroids);
        }
        (centroids, assignments)
    }
}

impl Extractor for KmeansExtractor {
    fn extract(
        &self,
        cluster_count: usize,
        config: ClusterConfig,
        resize_size: u32,
        masks: &[BackgroundMask],
        image: &DynamicImage,
    ) -> Result<Vec<ExtractedCluster>> {
        if cluster_count == 0 {
            return Err(SweepError::invalid_parameter("cluster_count", cluster_count));
        }

        let settings = config.settings();
        let prepared = self.prepare(image, settings.cropping, resize_size);
        let points = self.collect_points(&prepared, masks);
        if points.len() < cluster_count {
            return Err(SweepError::InsufficientPixels {
                available: points.len(),
                requested: cluster_count,
            });
        }

        let (centroids, assignments) = self.cluster(&settings, &points, cluster_count);

        let mut weights = vec![0u32; centroids.len()];
        for assigned in assignments {
            weights[assigned] += 1;
        }

        let mut clusters: Vec<ExtractedCluster> = centroids
            .iter()
            .zip(weights)
            .filter(|(_, weight)| *weight > 0)
            .map(|(centroid, weight)| {
                let [r, g, b] = centroid.rgb.map(|v| v.round().clamp(0.0, 255.0) as u8);
                ExtractedCluster::new(r, g, b, weight)
            })
            .collect();
        clusters.sort_by(|a, b| b.weight.cmp(&a.weight));

        Ok(clusters)
    }
}

/// Keep the central region, trimming `CROP_MARGIN` of each dimension per side
fn crop_center(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let margin_x = (width as f32 * CROP_MARGIN) as u32;
    let margin_y = (height as f32 * CROP_MARGIN) as u32;
    let inner_width = width.saturating_sub(2 * margin_x);
    let inner_height = height.saturating_sub(2 * margin_y);

    if inner_width == 0 || inner_height == 0 {
        return image.clone();
    }
    image.crop_imm(margin_x, margin_y, inner_width, inner_height)
}
