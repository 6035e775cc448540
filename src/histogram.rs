use alloc::collections::BTreeMap;

/// Distinct 8-bit RGB colors and their pixel counts.
///
/// Keys are packed as `0x00RRGGBB`, so iteration order is deterministic (ascending by
/// red, then green, then blue). Every stored count is positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorHistogram {
    buckets: BTreeMap<u32, u64>,
}

#[inline]
fn pack(c: [u8; 3]) -> u32 {
    (c[0] as u32) << 16 | (c[1] as u32) << 8 | c[2] as u32
}

#[inline]
fn unpack(k: u32) -> [u8; 3] {
    [(k >> 16) as u8, (k >> 8) as u8, k as u8]
}

impl ColorHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every pixel of an RGB image.
    pub fn from_pixels(pixels: &[rgb::RGB<u8>]) -> Self {
        let mut hist = Self::new();
        for p in pixels {
            hist.add([p.r, p.g, p.b], 1);
        }
        hist
    }

    /// Count every pixel of an RGBA image, skipping fully transparent ones.
    /// Also reports whether any transparent pixel was seen.
    pub fn from_pixels_rgba(pixels: &[rgb::RGBA<u8>]) -> (Self, bool) {
        let mut hist = Self::new();
        let mut has_transparent = false;
        for p in pixels {
            if p.a == 0 {
                has_transparent = true;
                continue;
            }
            hist.add([p.r, p.g, p.b], 1);
        }
        (hist, has_transparent)
    }

    /// Add `count` pixels of `color`. Zero counts are ignored.
    pub fn add(&mut self, color: [u8; 3], count: u64) {
        if count == 0 {
            return;
        }
        *self.buckets.entry(pack(color)).or_insert(0) += count;
    }

    /// Pixel count recorded for `color`, 0 if absent.
    pub fn count(&self, color: [u8; 3]) -> u64 {
        self.buckets.get(&pack(color)).copied().unwrap_or(0)
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all pixel counts.
    pub fn total_weight(&self) -> u64 {
        self.buckets.values().sum()
    }

    pub fn distinct_colors(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.buckets.keys().map(|&k| unpack(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = ([u8; 3], u64)> + '_ {
        self.buckets.iter().map(|(&k, &count)| (unpack(k), count))
    }

    /// Copy of this histogram keeping only the colors accepted by `keep`.
    pub(crate) fn filtered(&self, mut keep: impl FnMut([u8; 3]) -> bool) -> Self {
        Self {
            buckets: self
                .buckets
                .iter()
                .filter(|&(&k, _)| keep(unpack(k)))
                .map(|(&k, &count)| (k, count))
                .collect(),
        }
    }
}

impl Extend<([u8; 3], u64)> for ColorHistogram {
    fn extend<I: IntoIterator<Item = ([u8; 3], u64)>>(&mut self, iter: I) {
        for (color, count) in iter {
            self.add(color, count);
        }
    }
}

impl FromIterator<([u8; 3], u64)> for ColorHistogram {
    fn from_iter<I: IntoIterator<Item = ([u8; 3], u64)>>(iter: I) -> Self {
        let mut hist = Self::new();
        hist.extend(iter);
        hist
    }
}
