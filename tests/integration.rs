//! End-to-end scenarios: synthetic histograms through both palette strategies.

use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use zentheme::kmeans::{Seeding, kmeans};
use zentheme::{ColorHistogram, Octree, PaletteConfig, RgbColor, Strategy};

fn hist(entries: &[([u8; 3], u64)]) -> ColorHistogram {
    entries.iter().copied().collect()
}

fn sorted_rgb8(colors: &[RgbColor]) -> Vec<[u8; 3]> {
    let mut out: Vec<[u8; 3]> = colors.iter().map(|c| c.to_rgb8()).collect();
    out.sort();
    out
}

/// Ten near-black and ten near-white grays, 100 pixels each.
fn black_and_white() -> ColorHistogram {
    let mut h = ColorHistogram::new();
    for i in 0..10u8 {
        h.add([i, i, i], 100);
        h.add([245 + i, 245 + i, 245 + i], 100);
    }
    h
}

#[test]
fn flat_image_repeats_its_color() {
    let h = hist(&[([128, 128, 128], 100)]);
    for strategy in [Strategy::KMeans, Strategy::Octree] {
        // Lab and white filtering are skipped for single-color input
        let config = PaletteConfig::new()
            .strategy(strategy)
            .colors(5)
            .to_lab(true);
        let result =
            zentheme::palette_with_rng(&h, &config, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(result.colors_rgb8(), vec![[128, 128, 128]; 5], "{strategy:?}");
        assert_eq!(result.theme_color.color.to_rgb8(), [128, 128, 128]);
        assert!(result.is_dark);
    }
}

#[test]
fn kmeans_separates_black_from_white() {
    let h = black_and_white();
    let points: Vec<([f32; 3], u64)> = h
        .iter()
        .map(|(c, n)| (RgbColor::from_rgb8(c).to_array(), n))
        .collect();

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut centers = kmeans(&points, 2, Seeding::PlusPlus, 100, &mut rng);
        centers.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(centers.len(), 2);
        for channel in 0..3 {
            assert!((centers[0][channel] - 4.5).abs() < 1e-3, "seed {seed}: {centers:?}");
            assert!((centers[1][channel] - 249.5).abs() < 1e-3, "seed {seed}: {centers:?}");
        }
    }
}

#[test]
fn palette_follows_theme_darkness() {
    // The blended theme is a mid gray, which classifies as dark, so only the
    // black half of the image reaches the palette.
    let h = black_and_white();
    for ignore_white in [true, false] {
        let config = PaletteConfig::new()
            .colors(2)
            .ignore_white(ignore_white)
            .kmeans_plus_plus(true);
        let result =
            zentheme::palette_with_rng(&h, &config, &mut StdRng::seed_from_u64(5)).unwrap();
        assert!(result.is_dark);
        for c in result.colors_rgb8() {
            assert!(c.iter().all(|&v| v < 10), "ignore_white={ignore_white}: {c:?}");
        }
    }
}

#[test]
fn octree_reduces_many_colors() {
    let mut h = ColorHistogram::new();
    for i in 0..300u32 {
        let c = [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8];
        h.add(c, 1);
    }
    let distinct = h.len();

    let mut tree = Octree::from_histogram(&h);
    assert_eq!(tree.leaf_count(), distinct);

    tree.quantize(10);
    let leaves = tree.palette_result();
    assert!(leaves.len() >= 10, "{}", leaves.len());
    assert!(leaves.len() <= distinct);
    assert_eq!(leaves.len(), tree.leaf_count());
    assert_eq!(tree.total_weight(), 300);
}

#[test]
fn octree_palette_has_requested_length() {
    let mut h = ColorHistogram::new();
    for r in (0..=120u8).step_by(8) {
        for b in (0..=120u8).step_by(8) {
            h.add([r, 30, b], 2);
        }
    }
    for colors in [1, 4, 10, 32] {
        let config = PaletteConfig::new().strategy(Strategy::Octree).colors(colors);
        let result = zentheme::palette(&h, &config).unwrap();
        assert_eq!(result.colors.len(), colors);
        assert!(result.is_dark);
    }
}

#[test]
fn short_palettes_are_padded_cyclically() {
    let input = [[10, 20, 30], [60, 10, 10], [20, 80, 20]];
    let h = hist(&[(input[0], 4), (input[1], 2), (input[2], 1)]);

    for strategy in [Strategy::KMeans, Strategy::Octree] {
        let config = PaletteConfig::new().strategy(strategy).colors(8);
        let result =
            zentheme::palette_with_rng(&h, &config, &mut StdRng::seed_from_u64(2)).unwrap();
        assert!(result.is_dark);
        assert_eq!(result.colors.len(), 8);
        for i in 3..8 {
            assert_eq!(result.colors[i], result.colors[i % 3], "{strategy:?} entry {i}");
        }

        let mut want = input.to_vec();
        want.sort();
        assert_eq!(sorted_rgb8(&result.colors[..3]), want, "{strategy:?}");
    }
}

#[test]
fn octree_orders_dark_palettes_ascending() {
    let h = hist(&[([30, 30, 90], 5), ([10, 10, 10], 5), ([60, 20, 20], 5)]);
    let config = PaletteConfig::new().strategy(Strategy::Octree).colors(3);
    let result = zentheme::palette(&h, &config).unwrap();
    assert!(result.is_dark);
    assert_eq!(
        result.colors_rgb8(),
        vec![[10, 10, 10], [60, 20, 20], [30, 30, 90]]
    );
}

#[test]
fn octree_orders_light_palettes_descending() {
    let h = hist(&[
        ([200, 200, 200], 10),
        ([180, 220, 240], 10),
        ([230, 230, 200], 10),
    ]);
    let config = PaletteConfig::new().strategy(Strategy::Octree).colors(3);
    let result = zentheme::palette(&h, &config).unwrap();
    assert!(!result.is_dark);
    assert_eq!(
        result.colors_rgb8(),
        vec![[230, 230, 200], [180, 220, 240], [200, 200, 200]]
    );
}

#[test]
fn lab_palette_stays_in_gamut() {
    let mut h = ColorHistogram::new();
    for i in 0..40u8 {
        h.add([i * 3, 20, 120 - i * 2], 1 + u64::from(i % 4));
    }
    let config = PaletteConfig::new().to_lab(true).colors(4);
    let result = zentheme::palette_with_rng(&h, &config, &mut StdRng::seed_from_u64(8)).unwrap();
    assert_eq!(result.colors.len(), 4);
    for c in &result.colors {
        for v in c.to_array() {
            assert!((0.0..=255.0).contains(&v), "{c:?}");
            assert_eq!(v, v.round(), "{c:?}");
        }
    }
}
