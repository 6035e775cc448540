//! RGB, HSV, CIE XYZ and CIE Lab color types and the conversions between them.
//!
//! RGB channels are 8-bit intensities (0..=255) carried as `f32` so that
//! cluster centroids keep their fractional part between iterations. XYZ and Lab
//! use the D65 white point.

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// D65 reference white, X component.
pub const WHITE_X: f32 = 0.9505;
/// D65 reference white, Y component.
pub const WHITE_Y: f32 = 1.0;
/// D65 reference white, Z component.
pub const WHITE_Z: f32 = 1.089;

/// An RGB color with channels on the 0..=255 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0] as f32,
            g: rgb[1] as f32,
            b: rgb[2] as f32,
        }
    }

    /// Round each channel to the nearest integer and clamp it to 0..=255.
    pub fn to_rgb8(self) -> [u8; 3] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
        ]
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub const fn from_array(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Squared length of the color viewed as a vector from black.
    pub fn length_squared(self) -> f32 {
        self.r * self.r + self.g * self.g + self.b * self.b
    }

    /// Squared Euclidean distance in RGB space.
    pub fn distance_sq(self, other: Self) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db
    }

    pub fn to_hsv(self) -> HsvColor {
        rgb_to_hsv(self)
    }

    pub fn to_xyz(self) -> XyzColor {
        rgb_to_xyz(self)
    }

    pub fn to_lab(self) -> LabColor {
        rgb_to_lab(self)
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from(rgb: [u8; 3]) -> Self {
        Self::from_rgb8(rgb)
    }
}

impl From<rgb::RGB<u8>> for RgbColor {
    fn from(p: rgb::RGB<u8>) -> Self {
        Self::from_rgb8([p.r, p.g, p.b])
    }
}

/// HSV color. `h` in [0, 360), `s` and `v` in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HsvColor {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl HsvColor {
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    pub fn to_rgb(self) -> RgbColor {
        hsv_to_rgb(self)
    }
}

/// CIE 1931 XYZ, scaled so that the reference white has Y = 1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XyzColor {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl XyzColor {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_rgb(self) -> RgbColor {
        xyz_to_rgb(self)
    }

    pub fn to_lab(self) -> LabColor {
        xyz_to_lab(self)
    }
}

/// CIE L*a*b* relative to D65. L in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabColor {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl LabColor {
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.l, self.a, self.b]
    }

    pub const fn from_array(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn to_xyz(self) -> XyzColor {
        lab_to_xyz(self)
    }

    pub fn to_rgb(self) -> RgbColor {
        lab_to_rgb(self)
    }
}

#[inline]
fn channel_to_u8(c: f32) -> u8 {
    c.round().clamp(0.0, 255.0) as u8
}

// --- HSV ---

/// Convert RGB to HSV. Achromatic colors (max == min) get `h = 0, s = 0`.
pub fn rgb_to_hsv(rgb: RgbColor) -> HsvColor {
    let max = rgb.r.max(rgb.g).max(rgb.b);
    let min = rgb.r.min(rgb.g).min(rgb.b);
    let v = max * 100.0 / 255.0;

    if max == min {
        return HsvColor::new(0.0, 0.0, v);
    }

    let delta = max - min;
    let s = delta / max * 100.0;

    let mut h = if max == rgb.r {
        60.0 * (rgb.g - rgb.b) / delta
    } else if max == rgb.g {
        60.0 * (rgb.b - rgb.r) / delta + 120.0
    } else {
        60.0 * (rgb.r - rgb.g) / delta + 240.0
    };
    if h < 0.0 {
        h += 360.0;
    }

    HsvColor::new(h, s, v)
}

/// Convert HSV to RGB (six-sector decomposition). `h = 360` is treated as 0.
pub fn hsv_to_rgb(hsv: HsvColor) -> RgbColor {
    let h = if hsv.h >= 360.0 { 0.0 } else { hsv.h };
    let s = hsv.s / 100.0;
    let v = hsv.v / 100.0 * 255.0;

    let sector = h / 60.0;
    let hi = (sector.floor() as i32).rem_euclid(6);
    let f = sector - sector.floor();

    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match hi {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    RgbColor::new(r, g, b)
}

// --- sRGB transfer function ---

/// sRGB-encoded channel (0..=255) → linear light (0.0..=1.0).
#[inline]
fn decode_channel(c: f32) -> f32 {
    linear_srgb::default::srgb_to_linear(c / 255.0)
}

/// Linear light → sRGB-encoded channel, rounded and clamped to 0..=255.
#[inline]
fn encode_channel(c: f32) -> f32 {
    (linear_srgb::default::linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0)
        .round()
        .clamp(0.0, 255.0)
}

// --- XYZ ---

/// Convert RGB to XYZ using the sRGB primaries.
pub fn rgb_to_xyz(rgb: RgbColor) -> XyzColor {
    let r = decode_channel(rgb.r);
    let g = decode_channel(rgb.g);
    let b = decode_channel(rgb.b);

    XyzColor::new(
        0.4124 * r + 0.3576 * g + 0.1805 * b,
        0.2126 * r + 0.7152 * g + 0.0722 * b,
        0.0193 * r + 0.1192 * g + 0.9505 * b,
    )
}

/// Convert XYZ to RGB. Out-of-gamut results are clamped to 0..=255.
pub fn xyz_to_rgb(xyz: XyzColor) -> RgbColor {
    let r = 3.2406 * xyz.x - 1.5372 * xyz.y - 0.4986 * xyz.z;
    let g = -0.9689 * xyz.x + 1.8758 * xyz.y + 0.0415 * xyz.z;
    let b = 0.0557 * xyz.x - 0.2040 * xyz.y + 1.0570 * xyz.z;

    RgbColor::new(encode_channel(r), encode_channel(g), encode_channel(b))
}

// --- Lab ---

// (6/29)^3
const LAB_EPSILON: f32 = 0.008856;
// (29/6)^2 / 3
const LAB_KAPPA: f32 = 7.787;
const LAB_OFFSET: f32 = 16.0 / 116.0;

fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_KAPPA * t + LAB_OFFSET
    }
}

fn lab_f_inv(f: f32) -> f32 {
    let cube = f * f * f;
    if cube > LAB_EPSILON {
        cube
    } else {
        (f - LAB_OFFSET) / LAB_KAPPA
    }
}

pub fn xyz_to_lab(xyz: XyzColor) -> LabColor {
    let fx = lab_f(xyz.x / WHITE_X);
    let fy = lab_f(xyz.y / WHITE_Y);
    let fz = lab_f(xyz.z / WHITE_Z);

    LabColor::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

pub fn lab_to_xyz(lab: LabColor) -> XyzColor {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    XyzColor::new(
        WHITE_X * lab_f_inv(fx),
        WHITE_Y * lab_f_inv(fy),
        WHITE_Z * lab_f_inv(fz),
    )
}

pub fn rgb_to_lab(rgb: RgbColor) -> LabColor {
    xyz_to_lab(rgb_to_xyz(rgb))
}

pub fn lab_to_rgb(lab: LabColor) -> RgbColor {
    xyz_to_rgb(lab_to_xyz(lab))
}
