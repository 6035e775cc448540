#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! Theme color and palette extraction from color histograms.
//!
//! Build a [`ColorHistogram`] from decoded pixels, then ask for a single
//! [`ThemeColorResult`] or an N-entry [`PaletteResult`]. Two strategies are available:
//! weighted k-means (RGB or CIE Lab, uniform or k-means++ seeding) and octree
//! quantization. Both first compute the theme color, classify it as light or dark,
//! and build the palette only from colors of the same darkness.
//!
//! ```
//! use zentheme::{ColorHistogram, PaletteConfig, Strategy};
//!
//! let mut hist = ColorHistogram::new();
//! hist.add([20, 24, 40], 900);
//! hist.add([30, 60, 120], 300);
//! hist.add([240, 240, 240], 50);
//!
//! let config = PaletteConfig::new().strategy(Strategy::Octree).colors(4);
//! let result = zentheme::palette(&hist, &config).unwrap();
//! assert_eq!(result.colors.len(), 4);
//! assert!(result.is_dark);
//! ```
//!
//! The `std` feature (on by default) adds the entropy-seeded [`theme_color`] and
//! [`palette`] entry points. Without it the crate builds on `alloc` alone and every
//! call takes an explicit RNG.

extern crate alloc;

pub mod colorspace;
pub mod darkness;
pub mod error;
pub mod generator;
pub mod histogram;
pub mod kmeans;
pub mod octree;

pub use colorspace::{HsvColor, LabColor, RgbColor, XyzColor};
pub use darkness::TransferFunction;
pub use error::PaletteError;
pub use generator::{PaletteGenerator, PaletteResult, ThemeColorResult};
pub use histogram::ColorHistogram;
pub use kmeans::{KMeansGenerator, Seeding};
pub use octree::{Octree, OctreeGenerator};

use rand::Rng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use rand::rngs::StdRng;

/// Palette extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Weighted k-means clustering. Honors `to_lab` and `kmeans_plus_plus`.
    KMeans,
    /// Octree quantization in RGB byte space.
    Octree,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::KMeans
    }
}

/// Configuration for theme color and palette extraction.
#[derive(Debug, Clone)]
pub struct PaletteConfig {
    /// Palette extraction strategy.
    pub strategy: Strategy,
    /// Number of palette entries to return (>= 1).
    pub colors: usize,
    /// Leave out colors whose channels are all above 250.
    pub ignore_white: bool,
    /// Cluster in CIE Lab instead of RGB (k-means only).
    pub to_lab: bool,
    /// Seed palette clusters with k-means++ instead of uniform sampling (k-means only).
    pub kmeans_plus_plus: bool,
    /// Curve used to decide whether a color is dark.
    pub darkness: TransferFunction,
    /// Cap on k-means assignment/update rounds (>= 1).
    pub max_iterations: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::KMeans,
            colors: 5,
            ignore_white: true,
            to_lab: false,
            kmeans_plus_plus: true,
            darkness: TransferFunction::Srgb,
            max_iterations: kmeans::DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl PaletteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn colors(mut self, n: usize) -> Self {
        self.colors = n;
        self
    }

    pub fn ignore_white(mut self, ignore: bool) -> Self {
        self.ignore_white = ignore;
        self
    }

    pub fn to_lab(mut self, to_lab: bool) -> Self {
        self.to_lab = to_lab;
        self
    }

    pub fn kmeans_plus_plus(mut self, enabled: bool) -> Self {
        self.kmeans_plus_plus = enabled;
        self
    }

    pub fn darkness(mut self, tf: TransferFunction) -> Self {
        self.darkness = tf;
        self
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }
}

/// Compute the theme color of `histogram`.
///
/// K-means seeding draws from a fresh entropy-seeded RNG; use
/// [`theme_color_with_rng`] for reproducible results.
#[cfg(feature = "std")]
pub fn theme_color(
    histogram: &ColorHistogram,
    config: &PaletteConfig,
) -> Result<ThemeColorResult, PaletteError> {
    theme_color_with_rng(histogram, config, &mut StdRng::from_entropy())
}

/// Compute the theme color of `histogram`, seeding k-means from `rng`.
pub fn theme_color_with_rng<R: Rng + ?Sized>(
    histogram: &ColorHistogram,
    config: &PaletteConfig,
    rng: &mut R,
) -> Result<ThemeColorResult, PaletteError> {
    match config.strategy {
        Strategy::KMeans => KMeansGenerator::new(rng).theme_color(histogram, config),
        Strategy::Octree => OctreeGenerator.theme_color(histogram, config),
    }
}

/// Compute a `config.colors`-entry palette of `histogram`.
///
/// K-means seeding draws from a fresh entropy-seeded RNG; use [`palette_with_rng`]
/// for reproducible results.
#[cfg(feature = "std")]
pub fn palette(
    histogram: &ColorHistogram,
    config: &PaletteConfig,
) -> Result<PaletteResult, PaletteError> {
    palette_with_rng(histogram, config, &mut StdRng::from_entropy())
}

/// Compute a `config.colors`-entry palette of `histogram`, seeding k-means from `rng`.
pub fn palette_with_rng<R: Rng + ?Sized>(
    histogram: &ColorHistogram,
    config: &PaletteConfig,
    rng: &mut R,
) -> Result<PaletteResult, PaletteError> {
    match config.strategy {
        Strategy::KMeans => KMeansGenerator::new(rng).palette(histogram, config),
        Strategy::Octree => OctreeGenerator.palette(histogram, config),
    }
}

/// Checks shared by theme color and palette extraction.
pub(crate) fn validate_theme_inputs(
    histogram: &ColorHistogram,
    config: &PaletteConfig,
) -> Result<(), PaletteError> {
    if histogram.is_empty() {
        return Err(PaletteError::EmptyHistogram);
    }
    if config.max_iterations == 0 {
        return Err(PaletteError::InvalidMaxIterations(config.max_iterations));
    }
    Ok(())
}

pub(crate) fn validate_inputs(
    histogram: &ColorHistogram,
    config: &PaletteConfig,
) -> Result<(), PaletteError> {
    validate_theme_inputs(histogram, config)?;
    if config.colors == 0 {
        return Err(PaletteError::InvalidColorCount(config.colors));
    }
    Ok(())
}
