//! Octree color quantization over 8-bit RGB.
//!
//! Nodes live in an arena and refer to their children by index. Each level of the
//! tree consumes one bit of every channel, most significant first, so full-depth
//! leaves sit at depth [`MAX_DEPTH`] and hold exactly one input color.

use alloc::vec;
use alloc::vec::Vec;

use tracing::{debug, trace};

use crate::PaletteConfig;
use crate::colorspace::RgbColor;
use crate::error::PaletteError;
use crate::generator::{
    PaletteGenerator, PaletteResult, ThemeColorResult, matching_darkness, pad_cyclic,
    without_white,
};
use crate::histogram::ColorHistogram;

/// Depth of full-resolution leaves (one level per channel bit).
pub const MAX_DEPTH: usize = 8;

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct Node {
    children: [Option<NodeId>; 8],
    /// Leaf color; unused while the node has children.
    color: [u8; 3],
    /// Leaf pixel count; unused while the node has children.
    count: u64,
    /// Cleared when an ancestor absorbs this node in a merge.
    alive: bool,
}

impl Node {
    fn new() -> Self {
        Self {
            children: [None; 8],
            color: [0; 3],
            count: 0,
            alive: true,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Child slot for `color` below a node at `depth`.
#[inline]
fn child_index(color: [u8; 3], depth: usize) -> usize {
    let shift = 7 - depth;
    let r = (color[0] >> shift) & 1;
    let g = (color[1] >> shift) & 1;
    let b = (color[2] >> shift) & 1;
    ((r << 2) | (g << 1) | b) as usize
}

/// Weighted mean of `(color, count)` pairs, truncated per channel.
fn weighted_average(leaves: impl IntoIterator<Item = ([u8; 3], u64)>) -> ([u8; 3], u64) {
    let mut sums = [0u64; 3];
    let mut total = 0u64;
    for (color, count) in leaves {
        for (sum, c) in sums.iter_mut().zip(color) {
            *sum += c as u64 * count;
        }
        total += count;
    }
    if total == 0 {
        return ([0; 3], 0);
    }
    (
        [
            (sums[0] / total) as u8,
            (sums[1] / total) as u8,
            (sums[2] / total) as u8,
        ],
        total,
    )
}

#[derive(Debug, Clone)]
pub struct Octree {
    nodes: Vec<Node>,
    /// Node ids created at each depth, in creation order.
    levels: Vec<Vec<NodeId>>,
}

impl Default for Octree {
    fn default() -> Self {
        Self::new()
    }
}

impl Octree {
    pub fn new() -> Self {
        let mut levels = vec![Vec::new(); MAX_DEPTH + 1];
        levels[0].push(ROOT);
        Self {
            nodes: vec![Node::new()],
            levels,
        }
    }

    pub fn from_histogram(histogram: &ColorHistogram) -> Self {
        let mut tree = Self::new();
        for (color, count) in histogram.iter() {
            tree.add_color(color, count);
        }
        tree
    }

    /// Insert `weight` pixels of `color`.
    ///
    /// Descends one bit-plane per level, creating nodes as needed. A merged leaf met
    /// on the way absorbs the color into its weighted average instead.
    pub fn add_color(&mut self, color: [u8; 3], weight: u64) {
        if weight == 0 {
            return;
        }

        let mut id = ROOT;
        for depth in 0..MAX_DEPTH {
            let node = &self.nodes[id];
            if node.count > 0 && node.is_leaf() {
                let (avg, total) =
                    weighted_average([(node.color, node.count), (color, weight)]);
                let node = &mut self.nodes[id];
                node.color = avg;
                node.count = total;
                return;
            }

            let slot = child_index(color, depth);
            let existing = node.children[slot];
            id = match existing {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.levels[depth + 1].push(child);
                    self.nodes[id].children[slot] = Some(child);
                    child
                }
            };
        }

        let leaf = &mut self.nodes[id];
        leaf.color = color;
        leaf.count += weight;
    }

    /// Depth-first `(color, count)` pairs of the subtree under `id`.
    fn collect_leaves(&self, id: NodeId, out: &mut Vec<([u8; 3], u64)>) {
        let node = &self.nodes[id];
        if node.is_leaf() {
            if node.count > 0 {
                out.push((node.color, node.count));
            }
            return;
        }
        for child in node.children.iter().flatten() {
            self.collect_leaves(*child, out);
        }
    }

    fn subtree_leaf_count(&self, id: NodeId) -> usize {
        let node = &self.nodes[id];
        if node.is_leaf() {
            return usize::from(node.count > 0);
        }
        node.children
            .iter()
            .flatten()
            .map(|&child| self.subtree_leaf_count(child))
            .sum()
    }

    fn kill_subtree(&mut self, id: NodeId) {
        let children = self.nodes[id].children;
        for child in children.into_iter().flatten() {
            self.nodes[child].alive = false;
            self.kill_subtree(child);
        }
    }

    /// Fold the whole subtree under `id` into `id` as one weighted-average leaf.
    fn merge(&mut self, id: NodeId) {
        let mut leaves = Vec::new();
        self.collect_leaves(id, &mut leaves);
        let (color, count) = weighted_average(leaves);

        self.kill_subtree(id);
        let node = &mut self.nodes[id];
        node.children = [None; 8];
        node.color = color;
        node.count = count;
    }

    /// Number of non-empty leaves, i.e. colors currently in the tree.
    pub fn leaf_count(&self) -> usize {
        self.subtree_leaf_count(ROOT)
    }

    /// Total pixel count across all leaves.
    pub fn total_weight(&self) -> u64 {
        self.palette_result().iter().map(|(_, count)| count).sum()
    }

    /// Merge subtrees until at most `target` leaves remain, or as close as the level
    /// walk allows.
    ///
    /// Walks from the parents of full-depth leaves up to the children of the root.
    /// On each level, candidate nodes are merged smallest subtree first while the
    /// leaves they remove fit in the remaining budget; the first candidate that does
    /// not fit ends that level and the walk moves one level up. The root is never
    /// merged, so up to eight leaves can survive.
    pub fn quantize(&mut self, target: usize) {
        let target = target.max(1);
        let leaves = self.leaf_count();
        if leaves <= target {
            return;
        }

        let mut remaining = leaves - target;
        for depth in (1..MAX_DEPTH).rev() {
            let mut candidates: Vec<(usize, NodeId)> = self.levels[depth]
                .iter()
                .filter(|&&id| self.nodes[id].alive && !self.nodes[id].is_leaf())
                .map(|&id| (self.subtree_leaf_count(id), id))
                .collect();
            candidates.sort_by_key(|&(leaves, _)| leaves);

            for (leaves, id) in candidates {
                let cost = leaves.saturating_sub(1);
                if cost > remaining {
                    break;
                }
                self.merge(id);
                remaining -= cost;
            }

            if remaining == 0 {
                break;
            }
        }

        if remaining > 0 {
            debug!(
                target,
                leaves = self.leaf_count(),
                "octree stopped above the requested color count"
            );
        }
        trace!(target, leaves = self.leaf_count(), "octree quantized");
    }

    /// Every leaf as `(color, count)`, depth-first in child-slot order.
    pub fn palette_result(&self) -> Vec<(RgbColor, u64)> {
        let mut leaves = Vec::new();
        self.collect_leaves(ROOT, &mut leaves);
        leaves
            .into_iter()
            .map(|(c, count)| (RgbColor::from_rgb8(c), count))
            .collect()
    }

    /// Weighted average of all leaves, as if the root were merged. Black for an
    /// empty tree.
    pub fn theme_result(&self) -> RgbColor {
        let mut leaves = Vec::new();
        self.collect_leaves(ROOT, &mut leaves);
        RgbColor::from_rgb8(weighted_average(leaves).0)
    }
}

/// Octree palette strategy. Stateless; every call builds its own trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct OctreeGenerator;

impl OctreeGenerator {
    pub fn new() -> Self {
        Self
    }

    fn theme_with(
        &self,
        histogram: &ColorHistogram,
        ignore_white: bool,
        config: &PaletteConfig,
    ) -> ThemeColorResult {
        let tree = if ignore_white {
            Octree::from_histogram(&without_white(histogram))
        } else {
            Octree::from_histogram(histogram)
        };
        let color = tree.theme_result();
        ThemeColorResult {
            color,
            is_dark: config.darkness.is_dark_rgb(color),
        }
    }
}

impl PaletteGenerator for OctreeGenerator {
    fn theme_color(
        &mut self,
        histogram: &ColorHistogram,
        config: &PaletteConfig,
    ) -> Result<ThemeColorResult, PaletteError> {
        crate::validate_theme_inputs(histogram, config)?;
        let ignore_white = config.ignore_white && histogram.len() > 1;
        Ok(self.theme_with(histogram, ignore_white, config))
    }

    fn palette(
        &mut self,
        histogram: &ColorHistogram,
        config: &PaletteConfig,
    ) -> Result<PaletteResult, PaletteError> {
        crate::validate_inputs(histogram, config)?;

        let ignore_white = config.ignore_white && histogram.len() > 1;
        let theme = self.theme_with(histogram, ignore_white, config);
        let filtered = matching_darkness(histogram, theme.is_dark, ignore_white, config.darkness);

        let mut tree = Octree::from_histogram(&filtered);
        tree.quantize(config.colors);

        let mut colors: Vec<RgbColor> = tree
            .palette_result()
            .into_iter()
            .map(|(c, _)| c)
            .collect();
        // Dark themes lead with the darkest entries, light themes with the brightest.
        if theme.is_dark {
            colors.sort_by(|a, b| a.length_squared().total_cmp(&b.length_squared()));
        } else {
            colors.sort_by(|a, b| b.length_squared().total_cmp(&a.length_squared()));
        }
        colors.truncate(config.colors);

        Ok(PaletteResult {
            colors: pad_cyclic(&colors, config.colors),
            is_dark: theme.is_dark,
            theme_color: theme,
        })
    }
}
