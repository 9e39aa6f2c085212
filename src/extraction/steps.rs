//! Sliding-window grid computation.

use crate::config::Shape;

/// Start offsets of a sliding window over an image.
///
/// `ys` and `xs` are every offset reachable by stepping from 0 while the
/// full window still fits. Trailing pixels the grid cannot reach are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Row offsets, ascending.
    pub ys: Vec<usize>,
    /// Column offsets, ascending.
    pub xs: Vec<usize>,
}

impl Grid {
    /// Shape of the map produced by sampling the grid, `(len(ys), len(xs))`.
    #[inline]
    pub fn output_shape(&self) -> Shape {
        Shape::new(self.ys.len(), self.xs.len())
    }

    /// Number of window positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.ys.len() * self.xs.len()
    }

    /// Returns true if the window does not fit anywhere.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extent covered by the last window on each axis (`last + filter`).
    ///
    /// Returns `None` for an empty grid.
    pub fn covered(&self, filter: Shape) -> Option<Shape> {
        let y = self.ys.last()?;
        let x = self.xs.last()?;
        Some(Shape::new(y + filter.height, x + filter.width))
    }

    /// Iterates over `(row, col, y, x)`: output coordinates with their offsets,
    /// y-major.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize, usize, usize)> + '_ {
        self.ys.iter().enumerate().flat_map(move |(row, &y)| {
            self.xs
                .iter()
                .enumerate()
                .map(move |(col, &x)| (row, col, y, x))
        })
    }
}

/// Computes the window offsets for `filter` stepping by `step` over `image`.
///
/// A zero step is treated as 1.
pub fn steps(image: Shape, filter: Shape, step: Shape) -> Grid {
    Grid {
        ys: offsets(image.height, filter.height, step.height),
        xs: offsets(image.width, filter.width, step.width),
    }
}

fn offsets(extent: usize, window: usize, step: usize) -> Vec<usize> {
    match extent.checked_sub(window) {
        Some(last) => (0..=last).step_by(step.max(1)).collect(),
        None => Vec::new(),
    }
}
