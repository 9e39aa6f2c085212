//! Incremental principal component estimation.
//!
//! The network learns its filters from patch streams that are fed one
//! image at a time, so estimators must accept many batches before being
//! queried.

use super::eigen::symmetric_eigen;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use thiserror::Error;

/// Errors raised by component estimators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimatorError {
    #[error("sample width mismatch: estimator has {expected} features, batch has {found}")]
    FeatureMismatch { expected: usize, found: usize },
}

/// A running estimate of the top principal directions of a sample stream.
///
/// `partial_fit` is the only mutation. `components` is a read-only
/// snapshot and may be taken at any point after the first batch.
pub trait ComponentEstimator {
    /// Refines the running estimate with a `(n_samples, n_features)` batch.
    fn partial_fit(&mut self, samples: ArrayView2<'_, f64>) -> Result<(), EstimatorError>;

    /// Current top-K orthonormal directions as a `(K, n_features)` matrix,
    /// or `None` before any sample has been seen.
    fn components(&self) -> Option<Array2<f64>>;

    /// Number of components the estimator was configured to keep.
    fn n_components(&self) -> usize;

    /// Total number of samples folded into the estimate.
    fn n_samples_seen(&self) -> u64;
}

/// Exact incremental PCA over sufficient statistics.
///
/// Keeps the sample count, the running mean and the centered scatter
/// matrix. Batches are merged with the pairwise update, so fitting in any
/// number of batches gives the same basis as one full-batch fit.
#[derive(Debug, Clone)]
pub struct IncrementalPca {
    n_components: usize,
    n_samples_seen: u64,
    /// Per-feature mean of all samples seen. Empty until the first batch.
    mean: Array1<f64>,
    /// Sum of outer products of mean-centered samples.
    scatter: Array2<f64>,
}

impl IncrementalPca {
    /// Creates an unfit estimator keeping `n_components` directions.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            n_samples_seen: 0,
            mean: Array1::zeros(0),
            scatter: Array2::zeros((0, 0)),
        }
    }

    /// Sample width, known after the first non-empty batch.
    pub fn n_features(&self) -> Option<usize> {
        (self.n_samples_seen > 0).then(|| self.mean.len())
    }

    /// Running per-feature mean.
    pub fn mean(&self) -> Option<&Array1<f64>> {
        (self.n_samples_seen > 0).then_some(&self.mean)
    }

    /// Variance captured by each returned component, descending.
    pub fn explained_variance(&self) -> Option<Array1<f64>> {
        self.decompose().map(|(variance, _)| variance)
    }

    /// Sample covariance (`scatter / (n - 1)`).
    fn covariance(&self) -> Array2<f64> {
        let dof = self.n_samples_seen.saturating_sub(1).max(1) as f64;
        &self.scatter / dof
    }

    /// Top-K `(variances, components)`, components as rows with a fixed sign.
    fn decompose(&self) -> Option<(Array1<f64>, Array2<f64>)> {
        let n_features = self.n_features()?;
        let (values, vectors) = symmetric_eigen(&self.covariance());

        let mut order: Vec<usize> = (0..n_features).collect();
        order.sort_by(|&a, &b| {
            values[b]
                .partial_cmp(&values[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let k = self.n_components.min(n_features);
        let mut variances = Array1::zeros(k);
        let mut components = Array2::zeros((k, n_features));
        for (row, &index) in order.iter().take(k).enumerate() {
            variances[row] = values[index];
            let mut component = components.row_mut(row);
            component.assign(&vectors.column(index));

            // largest-magnitude entry is positive
            let pivot = component
                .iter()
                .copied()
                .fold(0.0f64, |best, x| if x.abs() > best.abs() { x } else { best });
            if pivot < 0.0 {
                component.mapv_inplace(|x| -x);
            }
        }
        Some((variances, components))
    }
}

impl ComponentEstimator for IncrementalPca {
    fn partial_fit(&mut self, samples: ArrayView2<'_, f64>) -> Result<(), EstimatorError> {
        let (n_samples, n_features) = samples.dim();
        if n_samples == 0 {
            return Ok(());
        }

        match self.n_features() {
            Some(expected) if expected != n_features => {
                return Err(EstimatorError::FeatureMismatch {
                    expected,
                    found: n_features,
                });
            }
            Some(_) => {}
            None => {
                self.mean = Array1::zeros(n_features);
                self.scatter = Array2::zeros((n_features, n_features));
            }
        }

        let Some(batch_mean) = samples.mean_axis(Axis(0)) else {
            return Ok(());
        };
        let centered = &samples - &batch_mean;
        let batch_scatter = centered.t().dot(&centered);

        let n_seen = self.n_samples_seen as f64;
        let n_batch = n_samples as f64;
        let n_total = n_seen + n_batch;

        let delta = &batch_mean - &self.mean;
        let delta_column = delta.view().insert_axis(Axis(1));
        let correction = delta_column.dot(&delta_column.t());

        self.scatter += &batch_scatter;
        self.scatter.scaled_add(n_seen * n_batch / n_total, &correction);
        self.mean.scaled_add(n_batch / n_total, &delta);
        self.n_samples_seen += n_samples as u64;

        tracing::trace!(
            batch = n_samples,
            total = self.n_samples_seen,
            features = n_features,
            "Updated component estimate"
        );
        Ok(())
    }

    fn components(&self) -> Option<Array2<f64>> {
        self.decompose().map(|(_, components)| components)
    }

    fn n_components(&self) -> usize {
        self.n_components
    }

    fn n_samples_seen(&self) -> u64 {
        self.n_samples_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, s, Array2};

    fn samples() -> Array2<f64> {
        Array2::from_shape_fn((40, 4), |(i, j)| {
            let t = i as f64;
            match j {
                0 => t.sin() * 3.0,
                1 => (t * 0.7).cos() * 2.0 + 1.0,
                2 => t * 0.1 - (t * 1.3).sin(),
                _ => ((i * 7 + 3) % 11) as f64 * 0.25,
            }
        })
    }

    fn assert_close(a: &Array2<f64>, b: &Array2<f64>, tolerance: f64) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tolerance, "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_unfit_has_no_components() {
        let pca = IncrementalPca::new(2);
        assert!(pca.components().is_none());
        assert_eq!(pca.n_samples_seen(), 0);
        assert_eq!(pca.n_features(), None);
    }

    #[test]
    fn test_batches_match_single_fit() {
        let data = samples();

        let mut single = IncrementalPca::new(3);
        single.partial_fit(data.view()).unwrap();

        let mut streamed = IncrementalPca::new(3);
        for start in (0..40).step_by(7) {
            let end = (start + 7).min(40);
            streamed.partial_fit(data.slice(s![start..end, ..])).unwrap();
        }

        assert_eq!(streamed.n_samples_seen(), 40);
        for (a, b) in single.mean().unwrap().iter().zip(streamed.mean().unwrap().iter()) {
            assert!((a - b).abs() < 1e-10);
        }
        assert_close(&single.components().unwrap(), &streamed.components().unwrap(), 1e-7);
    }

    #[test]
    fn test_components_are_orthonormal() {
        let mut pca = IncrementalPca::new(4);
        pca.partial_fit(samples().view()).unwrap();

        let components = pca.components().unwrap();
        let gram = components.dot(&components.t());
        assert_close(&gram, &Array2::eye(4), 1e-9);
    }

    #[test]
    fn test_rank_one_direction() {
        let direction = array![0.6, 0.0, -0.8];
        let data = Array2::from_shape_fn((10, 3), |(i, j)| (i as f64 - 4.5) * direction[j]);

        let mut pca = IncrementalPca::new(1);
        pca.partial_fit(data.view()).unwrap();

        let component = pca.components().unwrap();
        // sign puts the largest-magnitude entry positive
        assert_close(&component, &array![[-0.6, 0.0, 0.8]], 1e-9);
    }

    #[test]
    fn test_explained_variance_descending() {
        let mut pca = IncrementalPca::new(4);
        pca.partial_fit(samples().view()).unwrap();

        let variance = pca.explained_variance().unwrap();
        assert!(variance.to_vec().windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_feature_mismatch_rejected() {
        let mut pca = IncrementalPca::new(1);
        pca.partial_fit(Array2::zeros((2, 4)).view()).unwrap();

        let err = pca.partial_fit(Array2::zeros((2, 5)).view()).unwrap_err();
        assert_eq!(err, EstimatorError::FeatureMismatch { expected: 4, found: 5 });
        assert_eq!(pca.n_samples_seen(), 2);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut pca = IncrementalPca::new(1);
        pca.partial_fit(Array2::zeros((0, 4)).view()).unwrap();
        assert!(pca.components().is_none());
    }
}
