//! Block-wise histogram pooling of encoded maps.

use crate::config::{NetworkConfig, Shape};
use crate::extraction::{steps, Patches};
use ndarray::{s, Array2, ArrayView3};

/// Equal-width histogram bin edges.
///
/// Bins are half-open `[e_i, e_{i+1})` except the last, which also
/// includes its right edge. Values outside `[e_0, e_last]` are not counted.
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// `n_edges` evenly spaced edges from `low` to `high` inclusive.
    pub fn linspace(low: f64, high: f64, n_edges: usize) -> Self {
        let edges = match n_edges {
            0 => Vec::new(),
            1 => vec![low],
            _ => {
                let step = (high - low) / (n_edges - 1) as f64;
                let mut edges: Vec<f64> = (0..n_edges).map(|i| low + i as f64 * step).collect();
                edges[n_edges - 1] = high;
                edges
            }
        };
        Self { edges }
    }

    /// Edges spanning `[-0.5, n_codes - 0.5]`, the range of codes `0..n_codes`.
    ///
    /// With `n_edges = n_codes + 1` every code gets its own bin.
    pub fn for_codes(n_codes: usize, n_edges: usize) -> Self {
        Self::linspace(-0.5, n_codes as f64 - 0.5, n_edges)
    }

    /// The edge positions.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins (one fewer than edges).
    pub fn n_bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Index of the bin containing `value`, if any.
    pub fn bin_of(&self, value: f64) -> Option<usize> {
        let n_bins = self.n_bins();
        let (&first, &last) = (self.edges.first()?, self.edges.last()?);
        if n_bins == 0 || !(value >= first && value <= last) {
            return None;
        }
        let index = self.edges.partition_point(|&edge| edge <= value);
        Some(index.saturating_sub(1).min(n_bins - 1))
    }
}

/// Splits encoded maps into non-overlapping blocks and histograms each one.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockHistogram {
    block: Shape,
    edges: BinEdges,
}

impl BlockHistogram {
    /// Pools with `block`-sized tiles, stepping by the block size.
    pub fn new(block: Shape, edges: BinEdges) -> Self {
        Self { block, edges }
    }

    /// Pooling layer described by a network configuration.
    pub fn for_config(config: &NetworkConfig) -> Self {
        Self::new(
            config.block_shape,
            BinEdges::for_codes(config.n_codes(), config.n_bins()),
        )
    }

    /// Block shape.
    pub fn block(&self) -> Shape {
        self.block
    }

    /// Bin edges shared by every block.
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    /// Length of the vector produced for a single map of `map_shape`.
    pub fn feature_len(&self, map_shape: Shape) -> usize {
        steps(map_shape, self.block, self.block).len() * self.edges.n_bins()
    }

    /// Histograms every map of a `(n_images, h, w)` batch.
    ///
    /// Row `i` of the result concatenates the block histograms of map `i`
    /// in y-major block order.
    pub fn histogram(&self, maps: ArrayView3<'_, u32>) -> Array2<f64> {
        let (n_images, height, width) = maps.dim();
        let n_bins = self.edges.n_bins();
        let mut features = Array2::zeros((n_images, self.feature_len(Shape::new(height, width))));

        for (mut feature, map) in features.outer_iter_mut().zip(maps.outer_iter()) {
            let blocks = Patches::new(map, self.block, self.block);
            for (index, block) in blocks.iter().enumerate() {
                let mut counts = feature.slice_mut(s![index * n_bins..(index + 1) * n_bins]);
                for &code in block.iter() {
                    if let Some(bin) = self.edges.bin_of(f64::from(code)) {
                        counts[bin] += 1.0;
                    }
                }
            }
        }
        features
    }
}
