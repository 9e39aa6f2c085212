//! Filter banks derived from principal components.

use super::estimator::EstimatorError;
use crate::config::Shape;
use ndarray::{Array3, ArrayView2, ArrayView3};

/// Reshapes a `(K, fh * fw)` component basis into `K` filters of `filter_shape`.
///
/// Each component is read row-major, matching how patches are flattened.
pub fn components_to_filters(
    components: ArrayView2<'_, f64>,
    filter_shape: Shape,
) -> Result<Array3<f64>, EstimatorError> {
    let (n_filters, n_features) = components.dim();
    if n_features != filter_shape.area() {
        return Err(EstimatorError::FeatureMismatch {
            expected: filter_shape.area(),
            found: n_features,
        });
    }
    let width = filter_shape.width;
    Ok(Array3::from_shape_fn(
        (n_filters, filter_shape.height, width),
        |(k, y, x)| components[[k, y * width + x]],
    ))
}

/// An immutable, ordered set of 2D filters of one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    /// `(n_filters, fh, fw)`.
    filters: Array3<f64>,
}

impl FilterBank {
    /// Wraps an explicit `(n_filters, fh, fw)` stack.
    pub fn new(filters: Array3<f64>) -> Self {
        Self { filters }
    }

    /// Builds the bank from an estimator's component basis.
    pub fn from_components(
        components: ArrayView2<'_, f64>,
        filter_shape: Shape,
    ) -> Result<Self, EstimatorError> {
        components_to_filters(components, filter_shape).map(Self::new)
    }

    /// The filter stack.
    #[inline]
    pub fn filters(&self) -> ArrayView3<'_, f64> {
        self.filters.view()
    }

    /// Number of filters.
    #[inline]
    pub fn len(&self) -> usize {
        self.filters.len_of(ndarray::Axis(0))
    }

    /// Returns true if the bank holds no filters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape shared by every filter.
    pub fn filter_shape(&self) -> Shape {
        let (_, height, width) = self.filters.dim();
        Shape::new(height, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_components_reshape_row_major() {
        let components = array![[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [6.0, 5.0, 4.0, 3.0, 2.0, 1.0]];
        let filters = components_to_filters(components.view(), Shape::new(2, 3)).unwrap();

        assert_eq!(filters.dim(), (2, 2, 3));
        assert_eq!(filters.index_axis(ndarray::Axis(0), 0), array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(filters[[1, 1, 0]], 3.0);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let components = array![[1.0, 2.0, 3.0]];
        assert_eq!(
            components_to_filters(components.view(), Shape::square(2)),
            Err(EstimatorError::FeatureMismatch { expected: 4, found: 3 })
        );
    }

    #[test]
    fn test_bank_shape() {
        let bank = FilterBank::from_components(array![[1.0, 0.0, 0.0, 0.0]].view(), Shape::square(2)).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.filter_shape(), Shape::square(2));
        assert!(!bank.is_empty());
    }
}
