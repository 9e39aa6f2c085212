//! Patch-wise convolution with a filter bank.

use crate::config::Shape;
use crate::extraction::{steps, Patches};
use crate::filters::FilterBank;
use ndarray::{Array4, ArrayView2, ArrayView3};

/// Correlates every image with every filter on the step grid, no padding.
///
/// `images` is `(n_images, h, w)`. The result is
/// `(n_filters, n_images, out_h, out_w)` where the output shape comes from
/// the patch grid of `(h, w)`.
pub fn convolution(images: ArrayView3<'_, f64>, bank: &FilterBank, step: Shape) -> Array4<f64> {
    let (n_images, height, width) = images.dim();
    let filter_shape = bank.filter_shape();
    let out = steps(Shape::new(height, width), filter_shape, step).output_shape();

    let filters = bank.filters();
    let mut maps = Array4::zeros((bank.len(), n_images, out.height, out.width));

    for (i, image) in images.outer_iter().enumerate() {
        let patches = Patches::new(image, filter_shape, step);
        for (row, col, patch) in patches.indexed() {
            for (k, filter) in filters.outer_iter().enumerate() {
                maps[[k, i, row, col]] = inner_product(patch, filter);
            }
        }
    }
    maps
}

#[inline]
fn inner_product(patch: ArrayView2<'_, f64>, filter: ArrayView2<'_, f64>) -> f64 {
    patch.iter().zip(filter.iter()).map(|(p, f)| p * f).sum()
}
