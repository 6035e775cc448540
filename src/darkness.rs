//! Perceptual "is this color dark" heuristics.
//!
//! Each classifier treats the HSV saturation as a signal level, runs it through a
//! transfer-function curve and compares the HSV value against the result. These are
//! heuristics borrowed from the curve shapes of the named standards, not
//! conversions defined by them.

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::colorspace::{HsvColor, RgbColor};

/// Colors with an HSV value (0..=100) below this are always dark.
pub const DARK_VALUE_THRESHOLD: f32 = 65.0;

// HLG OETF constants (ITU-R BT.2100)
const HLG_A: f32 = 0.17883277;
const HLG_B: f32 = 0.28466892;
const HLG_C: f32 = 0.55991073;

/// Transfer-function family used to classify darkness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferFunction {
    /// IEC 61966-2-1 sRGB curve.
    #[default]
    Srgb,
    /// ITU-R BT.709 camera curve.
    Bt709,
    /// ITU-R BT.2100 hybrid log-gamma curve.
    Hlg,
}

impl TransferFunction {
    /// Saturation level below which the linear segment applies.
    pub fn gap(self) -> f32 {
        match self {
            Self::Srgb => 0.0031308,
            Self::Bt709 => 0.018,
            Self::Hlg => 1.0 / 12.0,
        }
    }

    /// Normalized value a color with saturation `s` (0..=1) must reach to count as light.
    pub fn target_value(self, s: f32) -> f32 {
        let linear = s <= self.gap();
        match self {
            Self::Srgb if linear => 12.92 * s,
            Self::Srgb => 1.055 * s.powf(1.0 / 2.4) - 0.055,
            Self::Bt709 if linear => 4.5 * s,
            Self::Bt709 => 1.099 * s.powf(0.45) - 0.099,
            Self::Hlg if linear => 0.5 * (12.0 * s).sqrt(),
            Self::Hlg => HLG_A * (12.0 * s - HLG_B).ln() + HLG_C,
        }
    }

    pub fn is_dark(self, hsv: HsvColor) -> bool {
        if hsv.v < DARK_VALUE_THRESHOLD {
            return true;
        }
        hsv.v / 100.0 < self.target_value(hsv.s / 100.0)
    }

    pub fn is_dark_rgb(self, rgb: RgbColor) -> bool {
        self.is_dark(rgb.to_hsv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TransferFunction; 3] = [
        TransferFunction::Srgb,
        TransferFunction::Bt709,
        TransferFunction::Hlg,
    ];

    #[test]
    fn low_value_always_dark() {
        for tf in ALL {
            assert!(tf.is_dark(HsvColor::new(0.0, 0.0, 64.9)));
            assert!(tf.is_dark(HsvColor::new(200.0, 100.0, 10.0)));
        }
    }

    #[test]
    fn bright_gray_is_light() {
        for tf in ALL {
            assert!(!tf.is_dark(HsvColor::new(0.0, 0.0, 65.0)), "{tf:?}");
            assert!(!tf.is_dark_rgb(RgbColor::new(255.0, 255.0, 255.0)), "{tf:?}");
        }
    }

    #[test]
    fn saturated_colors_need_high_value() {
        // Full saturation maps to a target of ~1.0 for all three curves
        for tf in ALL {
            let target = tf.target_value(1.0);
            assert!((target - 1.0).abs() < 1e-3, "{tf:?}: {target}");
            assert!(tf.is_dark(HsvColor::new(0.0, 100.0, 90.0)), "{tf:?}");
        }
    }

    #[test]
    fn curves_are_continuous_at_gap() {
        for tf in ALL {
            let gap = tf.gap();
            let below = tf.target_value(gap);
            let above = tf.target_value(gap + 1e-6);
            assert!((below - above).abs() < 1e-3, "{tf:?}: {below} vs {above}");
        }
    }

    #[test]
    fn darkness_is_monotonic_in_value() {
        for tf in ALL {
            for s in [0.0, 10.0, 35.0, 60.0, 85.0, 100.0] {
                let mut seen_light = false;
                for v in 0..=1000 {
                    let dark = tf.is_dark(HsvColor::new(40.0, s, v as f32 / 10.0));
                    if !dark {
                        seen_light = true;
                    }
                    assert!(!(seen_light && dark), "{tf:?} flipped back at s={s}, v={v}");
                }
            }
        }
    }

    #[test]
    fn standards_disagree_on_midtones() {
        let srgb = TransferFunction::Srgb.target_value(0.3);
        let bt709 = TransferFunction::Bt709.target_value(0.3);
        let hlg = TransferFunction::Hlg.target_value(0.3);
        assert!(bt709 < srgb && srgb < hlg, "{bt709} {srgb} {hlg}");

        // V = 70, S = 30: light under BT.709 and sRGB, dark under HLG
        let hsv = HsvColor::new(30.0, 30.0, 70.0);
        assert!(!TransferFunction::Bt709.is_dark(hsv));
        assert!(!TransferFunction::Srgb.is_dark(hsv));
        assert!(TransferFunction::Hlg.is_dark(hsv));
    }
}
