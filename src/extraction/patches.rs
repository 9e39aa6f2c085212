//! Patch extraction over a sliding-window grid.

use super::normalize::remove_patch_mean;
use super::steps::{steps, Grid};
use crate::config::Shape;
use ndarray::{s, Array2, ArrayView2};

/// All windows of `filter` shape visited by a step grid over one image.
///
/// Patches are produced y-major: `for y in ys { for x in xs { .. } }`.
/// The same extractor tiles encoded maps into histogram blocks, so the
/// element type is generic.
#[derive(Debug, Clone)]
pub struct Patches<'a, A = f64> {
    image: ArrayView2<'a, A>,
    filter: Shape,
    grid: Grid,
}

impl<'a, A> Patches<'a, A> {
    /// Lays a `filter`-sized window grid with the given `step` over `image`.
    pub fn new(image: ArrayView2<'a, A>, filter: Shape, step: Shape) -> Self {
        let (height, width) = image.dim();
        let grid = steps(Shape::new(height, width), filter, step);
        Self {
            image,
            filter,
            grid,
        }
    }

    /// The offsets the patches were taken from.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Spatial shape of a map with one value per patch.
    #[inline]
    pub fn output_shape(&self) -> Shape {
        self.grid.output_shape()
    }

    /// Number of patches.
    #[inline]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Returns true if the filter does not fit the image.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Iterates over the patches as views into the image.
    pub fn iter(&self) -> impl Iterator<Item = ArrayView2<'a, A>> + '_ {
        self.indexed().map(|(_, _, patch)| patch)
    }

    /// Iterates over `(row, col, patch)` where `(row, col)` is the patch's
    /// cell in the output map.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, usize, ArrayView2<'a, A>)> + '_ {
        let image = self.image.clone();
        let (fh, fw) = self.filter.as_tuple();
        self.grid.positions().map(move |(row, col, y, x)| {
            (row, col, image.clone().slice_move(s![y..y + fh, x..x + fw]))
        })
    }
}

impl<'a> Patches<'a, f64> {
    /// Flattens every patch (row-major) into one row of a
    /// `(n_patches, fh * fw)` matrix.
    pub fn to_vectors(&self) -> Array2<f64> {
        let mut vectors = Array2::zeros((self.len(), self.filter.area()));
        for (mut row, patch) in vectors.rows_mut().into_iter().zip(self.iter()) {
            row.iter_mut()
                .zip(patch.iter())
                .for_each(|(dst, &src)| *dst = src);
        }
        vectors
    }
}

/// Extracts, flattens and mean-centers the patches of one image.
///
/// This is the sample batch fed to a layer's component estimator.
pub fn image_to_patch_vectors(image: ArrayView2<'_, f64>, filter: Shape, step: Shape) -> Array2<f64> {
    remove_patch_mean(Patches::new(image, filter, step).to_vectors())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    fn ramp(h: usize, w: usize) -> Array2<f64> {
        Array2::from_shape_fn((h, w), |(y, x)| (y * w + x) as f64)
    }

    #[test]
    fn test_patch_order_and_content() {
        let image = ramp(3, 3);
        let patches = Patches::new(image.view(), Shape::square(2), Shape::square(1));
        let collected: Vec<_> = patches.iter().collect();

        assert_eq!(collected.len(), 4);
        assert_eq!(collected[0], array![[0.0, 1.0], [3.0, 4.0]]);
        assert_eq!(collected[1], array![[1.0, 2.0], [4.0, 5.0]]);
        assert_eq!(collected[2], array![[3.0, 4.0], [6.0, 7.0]]);
        assert_eq!(collected[3], array![[4.0, 5.0], [7.0, 8.0]]);
    }

    #[test]
    fn test_vectors_are_row_major() {
        let image = ramp(4, 4);
        let vectors = Patches::new(image.view(), Shape::square(2), Shape::square(2)).to_vectors();

        assert_eq!(vectors.dim(), (4, 4));
        assert_eq!(vectors.row(0).to_vec(), vec![0.0, 1.0, 4.0, 5.0]);
        assert_eq!(vectors.row(3).to_vec(), vec![10.0, 11.0, 14.0, 15.0]);
    }

    #[test]
    fn test_patch_vectors_are_centered() {
        let image = ramp(4, 4);
        let vectors = image_to_patch_vectors(image.view(), Shape::square(2), Shape::square(2));
        assert_eq!(vectors.row(0).to_vec(), vec![-2.5, -1.5, 1.5, 2.5]);
    }

    #[test]
    fn test_transposed_view_extracts_logically() {
        let image = ramp(3, 2);
        let transposed = image.t();
        let vectors = Patches::new(transposed, Shape::new(2, 3), Shape::square(1)).to_vectors();
        assert_eq!(vectors.row(0).to_vec(), vec![0.0, 2.0, 4.0, 1.0, 3.0, 5.0]);
    }

    proptest! {
        #[test]
        fn prop_patch_count_and_shape(
            h in 1usize..24, w in 1usize..24,
            fh in 1usize..6, fw in 1usize..6,
            sh in 1usize..4, sw in 1usize..4,
        ) {
            prop_assume!(fh <= h && fw <= w);
            let image = ramp(h, w);
            let patches = Patches::new(image.view(), Shape::new(fh, fw), Shape::new(sh, sw));
            let grid = patches.grid();
            prop_assert_eq!(patches.iter().count(), grid.ys.len() * grid.xs.len());
            for patch in patches.iter() {
                prop_assert_eq!(patch.dim(), (fh, fw));
            }
        }
    }
}
