//! Bit-flag extraction configurations
//!
//! The extractor is driven by a single integer whose bits toggle independent
//! behaviors. The integer is kept as the wire format ([`ClusterConfig`]) and
//! decoded into [`ClusterSettings`] at the boundary; labeling and the k-means
//! implementation only reason about the decoded record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::report::LABEL_SEPARATOR;
use crate::SweepError;

/// Opaque bit-flag configuration passed to the extraction capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterConfig(u32);

impl ClusterConfig {
    /// Kmeans++ seeding, median averaging, RGB distance, center cropping
    pub const DEFAULT: Self = Self(0);
    /// Pick initial centroids at random instead of Kmeans++
    pub const SEED_RANDOM: Self = Self(1 << 1);
    /// Use the mean instead of the median when updating centroids
    pub const AVERAGE_MEAN: Self = Self(1 << 2);
    /// Process the whole image instead of its center
    pub const NO_CROPPING: Self = Self(1 << 3);
    /// Measure distances in Lab (CIE76)
    pub const LAB: Self = Self(1 << 4);
    /// Reserved for debug image output; has no effect here
    pub const DEBUG_IMAGE: Self = Self(1 << 5);
    /// Measure distances with CIEDE2000
    pub const CIEDE2000: Self = Self(1 << 6);

    /// Named flags accepted by [`FromStr`]
    const NAMES: [(&'static str, ClusterConfig); 7] = [
        ("default", Self::DEFAULT),
        ("random-seed", Self::SEED_RANDOM),
        ("mean", Self::AVERAGE_MEAN),
        ("no-crop", Self::NO_CROPPING),
        ("lab", Self::LAB),
        ("debug-image", Self::DEBUG_IMAGE),
        ("ciede2000", Self::CIEDE2000),
    ];

    /// Wrap raw flag bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw flag bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check whether every bit of `flag` is set
    pub const fn is_set(self, flag: ClusterConfig) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Decode the four behavior facets
    pub fn settings(self) -> ClusterSettings {
        ClusterSettings {
            seed: if self.is_set(Self::SEED_RANDOM) {
                SeedStrategy::Random
            } else {
                SeedStrategy::KmeansPlusPlus
            },
            averaging: if self.is_set(Self::AVERAGE_MEAN) {
                Averaging::Mean
            } else {
                Averaging::Median
            },
            distance: if self.is_set(Self::LAB) {
                DistanceSpace::Lab
            } else if self.is_set(Self::CIEDE2000) {
                DistanceSpace::Ciede2000
            } else {
                DistanceSpace::Rgb
            },
            cropping: if self.is_set(Self::NO_CROPPING) {
                Cropping::None
            } else {
                Cropping::Center
            },
        }
    }

    /// Human-readable label, e.g. "Kmeans++, Median, RGB, Cropping center"
    pub fn label(self) -> String {
        self.settings().label()
    }
}

impl std::ops::BitOr for ClusterConfig {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<u32> for ClusterConfig {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.0)
    }
}

impl FromStr for ClusterConfig {
    type Err = SweepError;

    /// Parse either raw bits ("76") or '+'-joined flag names ("mean+no-crop+ciede2000")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(bits) = s.parse::<u32>() {
            return Ok(Self(bits));
        }

        s.split('+').try_fold(Self::DEFAULT, |config, name| {
            let name = name.trim().to_ascii_lowercase();
            Self::NAMES
                .iter()
                .find(|(known, _)| *known == name)
                .map(|&(_, flag)| config | flag)
                .ok_or_else(|| SweepError::invalid_parameter("cluster config", s))
        })
    }
}

/// Describe raw configuration bits as four comma-separated tokens
pub fn describe(bits: u32) -> String {
    ClusterConfig::from_bits(bits).label()
}

/// Decoded form of a [`ClusterConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterSettings {
    pub seed: SeedStrategy,
    pub averaging: Averaging,
    pub distance: DistanceSpace,
    pub cropping: Cropping,
}

impl ClusterSettings {
    /// Join the facet tokens in fixed order
    pub fn label(&self) -> String {
        [
            self.seed.token(),
            self.averaging.token(),
            self.distance.token(),
            self.cropping.token(),
        ]
        .join(LABEL_SEPARATOR)
    }
}

/// Initial centroid selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStrategy {
    KmeansPlusPlus,
    Random,
}

impl SeedStrategy {
    pub fn token(self) -> &'static str {
        match self {
            SeedStrategy::KmeansPlusPlus => "Kmeans++",
            SeedStrategy::Random => "Random seed",
        }
    }
}

/// Centroid update rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Averaging {
    Median,
    Mean,
}

impl Averaging {
    pub fn token(self) -> &'static str {
        match self {
            Averaging::Median => "Median",
            Averaging::Mean => "Mean",
        }
    }
}

/// Pixel-to-centroid distance metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceSpace {
    Rgb,
    Lab,
    Ciede2000,
}

impl DistanceSpace {
    pub fn token(self) -> &'static str {
        match self {
            DistanceSpace::Rgb => "RGB",
            DistanceSpace::Lab => "LAB",
            DistanceSpace::Ciede2000 => "ciede",
        }
    }
}

/// Region of the image fed to clustering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cropping {
    Center,
    None,
}

impl Cropping {
    pub fn token(self) -> &'static str {
        match self {
            Cropping::Center => "Cropping center",
            Cropping::None => "No cropping",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_default() {
        assert_eq!(describe(0), "Kmeans++, Median, RGB, Cropping center");
    }

    #[test]
    fn test_describe_sweep_configurations() {
        let first = ClusterConfig::AVERAGE_MEAN | ClusterConfig::NO_CROPPING | ClusterConfig::CIEDE2000;
        assert_eq!(first.label(), "Kmeans++, Mean, ciede, No cropping");
        assert_eq!(ClusterConfig::NO_CROPPING.label(), "Kmeans++, Median, RGB, No cropping");

        let random = ClusterConfig::SEED_RANDOM | ClusterConfig::LAB;
        assert_eq!(random.label(), "Random seed, Median, LAB, Cropping center");
    }

    #[test]
    fn test_lab_takes_priority_over_ciede() {
        let both = ClusterConfig::LAB | ClusterConfig::CIEDE2000;
        assert_eq!(both.settings().distance, DistanceSpace::Lab);
        assert!(both.label().contains("LAB"));
        assert!(!both.label().contains("ciede"));

        // Dropping the LAB bit falls back to CIEDE2000
        assert_eq!(describe(ClusterConfig::CIEDE2000.bits()), "Kmeans++, Median, ciede, Cropping center");
    }

    #[test]
    fn test_describe_is_pure_and_total() {
        for bits in [0, 1, 0x7F, 0xFFFF_FFFF, 1 << 20, 37] {
            let label = describe(bits);
            assert_eq!(label, describe(bits));
            assert_eq!(label.split(LABEL_SEPARATOR).count(), 4);
        }
        assert_eq!(describe(u32::MAX), "Random seed, Mean, LAB, No cropping");
    }

    #[test]
    fn test_unrelated_bits_do_not_change_label() {
        assert_eq!(describe(ClusterConfig::DEBUG_IMAGE.bits()), describe(0));
        assert_eq!(describe(1), describe(0));
    }

    #[test]
    fn test_parse_bits_and_names() {
        assert_eq!("0".parse::<ClusterConfig>().unwrap(), ClusterConfig::DEFAULT);
        assert_eq!("76".parse::<ClusterConfig>().unwrap().bits(), 76);

        let parsed: ClusterConfig = "mean+no-crop+ciede2000".parse().unwrap();
        assert_eq!(
            parsed,
            ClusterConfig::AVERAGE_MEAN | ClusterConfig::NO_CROPPING | ClusterConfig::CIEDE2000
        );
        assert_eq!(parsed.bits(), 76);

        let parsed: ClusterConfig = " Random-Seed + LAB ".parse().unwrap();
        assert_eq!(parsed, ClusterConfig::SEED_RANDOM | ClusterConfig::LAB);

        assert!("mean+sparkle".parse::<ClusterConfig>().is_err());
        assert!("".parse::<ClusterConfig>().is_err());
    }

    #[test]
    fn test_serde_keeps_wire_integer() {
        let config = ClusterConfig::NO_CROPPING | ClusterConfig::LAB;
        assert_eq!(serde_json::to_string(&config).unwrap(), "24");
        let back: ClusterConfig = serde_json::from_str("24").unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_display_includes_bits() {
        assert_eq!(
            ClusterConfig::NO_CROPPING.to_string(),
            "Kmeans++, Median, RGB, No cropping (8)"
        );
    }
}
