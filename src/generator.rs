//! Result types and the steps both palette strategies share.

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;

use tracing::debug;

use crate::PaletteConfig;
use crate::colorspace::RgbColor;
use crate::darkness::TransferFunction;
use crate::error::PaletteError;
use crate::histogram::ColorHistogram;

/// A color is near-white when every channel is above this value.
pub const WHITE_THRESHOLD: u8 = 250;

/// Single representative color of a histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColorResult {
    pub color: RgbColor,
    pub is_dark: bool,
}

/// Fixed-length palette plus the theme color that decided its light/dark pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteResult {
    /// Exactly `config.colors` entries.
    pub colors: Vec<RgbColor>,
    pub is_dark: bool,
    pub theme_color: ThemeColorResult,
}

impl PaletteResult {
    /// Palette entries rounded to 8-bit channels.
    pub fn colors_rgb8(&self) -> Vec<[u8; 3]> {
        self.colors.iter().map(|c| c.to_rgb8()).collect()
    }
}

/// Theme color and palette extraction from a [`ColorHistogram`].
///
/// Implemented by [`KMeansGenerator`](crate::kmeans::KMeansGenerator) and
/// [`OctreeGenerator`](crate::octree::OctreeGenerator). Options a strategy has no use
/// for are ignored.
pub trait PaletteGenerator {
    fn theme_color(
        &mut self,
        histogram: &ColorHistogram,
        config: &PaletteConfig,
    ) -> Result<ThemeColorResult, PaletteError>;

    fn palette(
        &mut self,
        histogram: &ColorHistogram,
        config: &PaletteConfig,
    ) -> Result<PaletteResult, PaletteError>;
}

pub(crate) fn is_near_white(c: [u8; 3]) -> bool {
    c.iter().all(|&v| v > WHITE_THRESHOLD)
}

/// Drop near-white colors. Histograms with a single color are returned as-is, and
/// so is any histogram that would be left empty.
pub(crate) fn without_white(histogram: &ColorHistogram) -> Cow<'_, ColorHistogram> {
    if histogram.len() <= 1 {
        return Cow::Borrowed(histogram);
    }
    let kept = histogram.filtered(|c| !is_near_white(c));
    if kept.is_empty() {
        debug!(
            colors = histogram.len(),
            "every color is near-white, keeping the unfiltered histogram"
        );
        return Cow::Borrowed(histogram);
    }
    Cow::Owned(kept)
}

/// Keep the colors whose darkness matches the theme's. Light themes additionally drop
/// near-white colors when `ignore_white` is set. Falls back to the unfiltered
/// histogram when nothing matches.
pub(crate) fn matching_darkness(
    histogram: &ColorHistogram,
    is_dark: bool,
    ignore_white: bool,
    darkness: TransferFunction,
) -> Cow<'_, ColorHistogram> {
    let kept = histogram.filtered(|c| {
        darkness.is_dark_rgb(RgbColor::from_rgb8(c)) == is_dark
            && (is_dark || !ignore_white || !is_near_white(c))
    });
    if kept.is_empty() {
        debug!(
            is_dark,
            colors = histogram.len(),
            "no color matches the theme darkness, keeping the unfiltered histogram"
        );
        return Cow::Borrowed(histogram);
    }
    Cow::Owned(kept)
}

/// Repeat `colors` cyclically until there are exactly `count` entries.
pub(crate) fn pad_cyclic(colors: &[RgbColor], count: usize) -> Vec<RgbColor> {
    if colors.is_empty() {
        debug_assert!(false, "padding an empty color list");
        return vec![RgbColor::default(); count];
    }
    (0..count).map(|i| colors[i % colors.len()]).collect()
}
