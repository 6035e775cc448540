//! Weighted k-means over histogram colors, in RGB or CIE Lab.

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::PaletteConfig;
use crate::colorspace::{LabColor, RgbColor};
use crate::error::PaletteError;
use crate::generator::{
    PaletteGenerator, PaletteResult, ThemeColorResult, matching_darkness, pad_cyclic,
    without_white,
};
use crate::histogram::ColorHistogram;

/// Default cap on assignment/update rounds.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// A center that moves less than this (Euclidean, in the clustering space) counts
/// as settled.
pub const CONVERGENCE_EPSILON: f32 = 1e-3;

/// How initial centers are picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seeding {
    /// Uniform sampling of distinct colors without replacement.
    #[default]
    Random,
    /// D²-weighted roulette sampling (k-means++).
    PlusPlus,
}

#[inline]
fn distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

/// Index of the nearest center; the first one wins on ties.
fn nearest(centers: &[[f32; 3]], p: [f32; 3]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = f32::MAX;
    for (i, &c) in centers.iter().enumerate() {
        let d = distance_sq(p, c);
        if d < best_dist {
            best_dist = d;
            best_idx = i;
        }
    }
    best_idx
}

fn seed_random<R: Rng + ?Sized>(
    points: &[([f32; 3], u64)],
    k: usize,
    rng: &mut R,
) -> Vec<[f32; 3]> {
    rand::seq::index::sample(rng, points.len(), k)
        .into_iter()
        .map(|i| points[i].0)
        .collect()
}

fn seed_plus_plus<R: Rng + ?Sized>(
    points: &[([f32; 3], u64)],
    k: usize,
    rng: &mut R,
) -> Vec<[f32; 3]> {
    let first = rng.gen_range(0..points.len());
    let mut centers = Vec::with_capacity(k);
    centers.push(points[first].0);

    // Squared distance from each point to its nearest chosen center. Chosen points
    // sit at zero and so can never be drawn again.
    let mut nearest_sq: Vec<f32> = points
        .iter()
        .map(|(p, _)| distance_sq(*p, points[first].0))
        .collect();

    while centers.len() < k {
        let sum: f64 = nearest_sq.iter().map(|&d| d as f64).sum();
        if sum <= 0.0 {
            debug!(
                seeded = centers.len(),
                requested = k,
                "k-means++ ran out of distinct colors"
            );
            break;
        }

        let target = rng.gen_range(0.0..sum);
        let mut running = 0.0f64;
        let mut picked = None;
        for (i, &d) in nearest_sq.iter().enumerate() {
            if d <= 0.0 {
                continue;
            }
            running += d as f64;
            picked = Some(i);
            if running >= target {
                break;
            }
        }
        let Some(idx) = picked else {
            break;
        };

        let center = points[idx].0;
        centers.push(center);
        for (d, (p, _)) in nearest_sq.iter_mut().zip(points) {
            *d = d.min(distance_sq(*p, center));
        }
    }

    centers
}

/// One assignment/update round. Each center moves to the weighted mean of the
/// points nearest to it; a center with no points stays where it is. Returns whether
/// any center moved by more than [`CONVERGENCE_EPSILON`].
fn update_centers(points: &[([f32; 3], u64)], centers: &mut [[f32; 3]]) -> bool {
    let n = centers.len();
    let mut sums = vec![[0.0f64; 3]; n];
    let mut weights = vec![0.0f64; n];

    for &(p, w) in points {
        let i = nearest(centers, p);
        let w = w as f64;
        sums[i][0] += p[0] as f64 * w;
        sums[i][1] += p[1] as f64 * w;
        sums[i][2] += p[2] as f64 * w;
        weights[i] += w;
    }

    let epsilon_sq = CONVERGENCE_EPSILON * CONVERGENCE_EPSILON;
    let mut moved = false;
    for (i, center) in centers.iter_mut().enumerate() {
        if weights[i] <= 0.0 {
            continue;
        }
        let next = [
            (sums[i][0] / weights[i]) as f32,
            (sums[i][1] / weights[i]) as f32,
            (sums[i][2] / weights[i]) as f32,
        ];
        if distance_sq(*center, next) > epsilon_sq {
            moved = true;
        }
        *center = next;
    }
    moved
}

/// Weighted k-means.
///
/// Returns at most `min(k, points.len())` centers. Iterates until no center moves
/// by more than [`CONVERGENCE_EPSILON`] or `max_iterations` rounds have run; hitting
/// the cap returns the centers as they are. A center that ends up with no points
/// keeps its previous position.
pub fn kmeans<R: Rng + ?Sized>(
    points: &[([f32; 3], u64)],
    k: usize,
    seeding: Seeding,
    max_iterations: usize,
    rng: &mut R,
) -> Vec<[f32; 3]> {
    let k = k.min(points.len());
    if k == 0 {
        return Vec::new();
    }

    let mut centers = match seeding {
        Seeding::Random => seed_random(points, k, rng),
        Seeding::PlusPlus => seed_plus_plus(points, k, rng),
    };

    for iteration in 0..max_iterations {
        if !update_centers(points, &mut centers) {
            trace!(iterations = iteration + 1, k = centers.len(), "k-means converged");
            return centers;
        }
    }

    debug!(max_iterations, k = centers.len(), "k-means stopped at the iteration cap");
    centers
}

/// Histogram entries as clustering points, optionally remapped to Lab.
fn histogram_points(histogram: &ColorHistogram, to_lab: bool) -> Vec<([f32; 3], u64)> {
    histogram
        .iter()
        .map(|(c, count)| {
            let rgb = RgbColor::from_rgb8(c);
            let v = if to_lab {
                rgb.to_lab().to_array()
            } else {
                rgb.to_array()
            };
            (v, count)
        })
        .collect()
}

fn center_to_rgb(v: [f32; 3], to_lab: bool) -> RgbColor {
    if to_lab {
        LabColor::from_array(v).to_rgb()
    } else {
        RgbColor::from_array(v)
    }
}

/// K-means palette strategy. Owns the random source used for seeding.
#[derive(Debug, Clone)]
pub struct KMeansGenerator<R> {
    rng: R,
}

impl<R: Rng> KMeansGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_rng(self) -> R {
        self.rng
    }

    fn theme_with(
        &mut self,
        histogram: &ColorHistogram,
        ignore_white: bool,
        to_lab: bool,
        config: &PaletteConfig,
    ) -> ThemeColorResult {
        let filtered = if ignore_white {
            without_white(histogram)
        } else {
            Cow::Borrowed(histogram)
        };
        let points = histogram_points(&filtered, to_lab);
        let centers = kmeans(
            &points,
            1,
            Seeding::Random,
            config.max_iterations,
            &mut self.rng,
        );
        // `points` is non-empty, so there is exactly one center
        let color = center_to_rgb(centers[0], to_lab);
        ThemeColorResult {
            color,
            is_dark: config.darkness.is_dark_rgb(color),
        }
    }
}

impl KMeansGenerator<StdRng> {
    /// Generator seeded from operating-system entropy.
    #[cfg(feature = "std")]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Generator with a fixed seed, for reproducible palettes.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PaletteGenerator for KMeansGenerator<R> {
    fn theme_color(
        &mut self,
        histogram: &ColorHistogram,
        config: &PaletteConfig,
    ) -> Result<ThemeColorResult, PaletteError> {
        crate::validate_theme_inputs(histogram, config)?;
        let single = histogram.len() == 1;
        Ok(self.theme_with(
            histogram,
            config.ignore_white && !single,
            config.to_lab && !single,
            config,
        ))
    }

    fn palette(
        &mut self,
        histogram: &ColorHistogram,
        config: &PaletteConfig,
    ) -> Result<PaletteResult, PaletteError> {
        crate::validate_inputs(histogram, config)?;

        let single = histogram.len() == 1;
        let ignore_white = config.ignore_white && !single;
        let to_lab = config.to_lab && !single;
        let seeding = if config.kmeans_plus_plus && !single {
            Seeding::PlusPlus
        } else {
            Seeding::Random
        };

        let theme = self.theme_with(histogram, ignore_white, to_lab, config);
        let filtered = matching_darkness(histogram, theme.is_dark, ignore_white, config.darkness);

        let points = histogram_points(&filtered, to_lab);
        let centers = kmeans(
            &points,
            config.colors,
            seeding,
            config.max_iterations,
            &mut self.rng,
        );
        let computed: Vec<RgbColor> = centers.iter().map(|&v| center_to_rgb(v, to_lab)).collect();
        trace!(
            requested = config.colors,
            computed = computed.len(),
            is_dark = theme.is_dark,
            "k-means palette"
        );

        Ok(PaletteResult {
            colors: pad_cyclic(&computed, config.colors),
            is_dark: theme.is_dark,
            theme_color: theme,
        })
    }
}
