//! Single-channel two-stage PCANet.

use super::error::{NetworkError, Stage};
use super::structure::validate_structure;
use crate::config::{NetworkConfig, Shape};
use crate::extraction::image_to_patch_vectors;
use crate::filters::{ComponentEstimator, FilterBank, IncrementalPca};
use crate::stages::{binarize, binary_to_decimal, convolution, BlockHistogram};
use ndarray::{s, Array2, ArrayView3, Axis};
use tracing::{debug, info, trace};

/// Training state of one convolution layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    /// No samples seen.
    Unfit,
    /// The estimator is consuming the training stream.
    Fitting,
    /// Filters have been derived and are ready for use.
    Fitted,
}

/// A two-stage PCANet over one image channel.
///
/// `fit` learns both filter banks; `transform` maps images to descriptors
/// without touching the learned state.
#[derive(Debug, Clone)]
pub struct TwoStageNet<E = IncrementalPca> {
    config: NetworkConfig,
    estimator_l1: E,
    estimator_l2: E,
    state_l1: StageState,
    state_l2: StageState,
    filters_l1: Option<FilterBank>,
    filters_l2: Option<FilterBank>,
    pooling: BlockHistogram,
}

impl TwoStageNet<IncrementalPca> {
    /// Creates an unfit network backed by [`IncrementalPca`] estimators.
    pub fn new(config: NetworkConfig) -> Result<Self, NetworkError> {
        let estimator_l1 = IncrementalPca::new(config.n_l1_output);
        let estimator_l2 = IncrementalPca::new(config.n_l2_output);
        Self::with_estimators(config, estimator_l1, estimator_l2)
    }
}

impl<E: ComponentEstimator> TwoStageNet<E> {
    /// Creates an unfit network with caller-supplied estimators.
    ///
    /// Each estimator must keep exactly the number of components its layer
    /// is configured for.
    pub fn with_estimators(
        config: NetworkConfig,
        estimator_l1: E,
        estimator_l2: E,
    ) -> Result<Self, NetworkError> {
        config.validate()?;
        for (stage, expected, found) in [
            (Stage::First, config.n_l1_output, estimator_l1.n_components()),
            (Stage::Second, config.n_l2_output, estimator_l2.n_components()),
        ] {
            if expected != found {
                return Err(NetworkError::EstimatorMismatch {
                    stage,
                    expected,
                    found,
                });
            }
        }

        let pooling = BlockHistogram::for_config(&config);
        Ok(Self {
            config,
            estimator_l1,
            estimator_l2,
            state_l1: StageState::Unfit,
            state_l2: StageState::Unfit,
            filters_l1: None,
            filters_l2: None,
            pooling,
        })
    }

    /// The network configuration.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Training state of the first and second layer.
    pub fn stage_states(&self) -> (StageState, StageState) {
        (self.state_l1, self.state_l2)
    }

    /// Returns true once both layers are fitted.
    pub fn is_fitted(&self) -> bool {
        self.stage_states() == (StageState::Fitted, StageState::Fitted)
    }

    /// First-layer filters, once fitted.
    pub fn filters_l1(&self) -> Option<&FilterBank> {
        self.filters_l1.as_ref()
    }

    /// Second-layer filters, once fitted.
    pub fn filters_l2(&self) -> Option<&FilterBank> {
        self.filters_l2.as_ref()
    }

    /// Read access to the layer estimators.
    pub fn estimators(&self) -> (&E, &E) {
        (&self.estimator_l1, &self.estimator_l2)
    }

    /// Length of the descriptor produced per image.
    pub fn feature_len(&self) -> usize {
        self.config.feature_len()
    }

    /// Checks that every stage tiles its input exactly.
    pub fn validate_structure(&self) -> Result<(), NetworkError> {
        validate_structure(&self.config)
    }

    fn check_images(&self, images: &ArrayView3<'_, f64>) -> Result<(), NetworkError> {
        let (_, height, width) = images.dim();
        let found = Shape::new(height, width);
        if found != self.config.image_shape {
            return Err(NetworkError::ShapeMismatch {
                expected: self.config.image_shape,
                found,
            });
        }
        Ok(())
    }

    /// Runs both training stages on `self`; may leave it half-updated on error.
    fn fit_stages(&mut self, images: ArrayView3<'_, f64>) -> Result<(), NetworkError> {
        let n_images = images.len_of(Axis(0));
        let config = &self.config;
        let (filter_l1, step_l1) = (config.filter_shape_l1, config.step_shape_l1);
        let (filter_l2, step_l2) = (config.filter_shape_l2, config.step_shape_l2);

        self.state_l1 = StageState::Fitting;
        for image in images.outer_iter() {
            let vectors = image_to_patch_vectors(image, filter_l1, step_l1);
            self.estimator_l1.partial_fit(vectors.view())?;
        }
        let filters_l1 = snapshot(&self.estimator_l1, filter_l1)?;
        self.state_l1 = StageState::Fitted;
        debug!(
            filters = filters_l1.len(),
            samples = self.estimator_l1.n_samples_seen(),
            "Fitted layer 1"
        );

        // (L1, n_images, h, w); every map feeds layer 2
        let maps = convolution(images, &filters_l1, step_l1);
        self.filters_l1 = Some(filters_l1);

        self.state_l2 = StageState::Fitting;
        for stack in maps.outer_iter() {
            for map in stack.outer_iter() {
                let vectors = image_to_patch_vectors(map, filter_l2, step_l2);
                self.estimator_l2.partial_fit(vectors.view())?;
            }
        }
        let filters_l2 = snapshot(&self.estimator_l2, filter_l2)?;
        self.state_l2 = StageState::Fitted;
        debug!(
            filters = filters_l2.len(),
            samples = self.estimator_l2.n_samples_seen(),
            "Fitted layer 2"
        );
        self.filters_l2 = Some(filters_l2);

        info!(
            images = n_images,
            l1 = self.config.n_l1_output,
            l2 = self.config.n_l2_output,
            "Network fitted"
        );
        Ok(())
    }

    /// Maps a `(n_images, h, w)` batch to `(n_images, feature_len)` descriptors.
    ///
    /// For each layer-1 map the layer-2 responses are binarized, packed into
    /// codes and block-histogrammed; the per-filter vectors are concatenated
    /// in layer-1 filter order.
    pub fn transform(&self, images: ArrayView3<'_, f64>) -> Result<Array2<f64>, NetworkError> {
        self.check_images(&images)?;
        let (filters_l1, filters_l2) = match (&self.filters_l1, &self.filters_l2) {
            (Some(l1), Some(l2)) if self.is_fitted() => (l1, l2),
            _ => return Err(NetworkError::NotFitted),
        };

        let n_images = images.len_of(Axis(0));
        let per_filter = self.pooling.feature_len(self.config.output_shape_l2());
        let mut features = Array2::zeros((n_images, filters_l1.len() * per_filter));

        let layer1 = convolution(images, filters_l1, self.config.step_shape_l1);
        for (k, maps) in layer1.outer_iter().enumerate() {
            // (L2, n_images, h, w)
            let mut layer2 = convolution(maps, filters_l2, self.config.step_shape_l2);
            binarize(&mut layer2);
            let codes = binary_to_decimal(layer2.view().permuted_axes([1, 0, 2, 3]));
            let pooled = self.pooling.histogram(codes.view());

            features
                .slice_mut(s![.., k * per_filter..(k + 1) * per_filter])
                .assign(&pooled);
            trace!(filter = k, "Pooled layer-1 map");
        }
        Ok(features)
    }
}

impl<E: ComponentEstimator + Clone> TwoStageNet<E> {
    /// Learns both filter banks from a `(n_images, h, w)` batch.
    ///
    /// Layer 1 is fitted on patches of every image. The training set is
    /// then convolved with the layer-1 filters and layer 2 is fitted on
    /// patches of every resulting map. Calling `fit` again keeps refining
    /// the same running estimates.
    ///
    /// Training runs on a copy of the network that replaces `self` only
    /// once both layers are fitted. On error `self` is left as it was.
    pub fn fit(&mut self, images: ArrayView3<'_, f64>) -> Result<(), NetworkError> {
        self.check_images(&images)?;
        if images.len_of(Axis(0)) == 0 {
            return Err(NetworkError::EmptyBatch);
        }

        let mut staged = self.clone();
        staged.fit_stages(images)?;
        *self = staged;
        Ok(())
    }
}

/// Derives a layer's filter bank from its estimator's current basis.
fn snapshot<E: ComponentEstimator>(estimator: &E, filter_shape: Shape) -> Result<FilterBank, NetworkError> {
    let components = estimator.components().ok_or(NetworkError::NotFitted)?;
    Ok(FilterBank::from_components(components.view(), filter_shape)?)
}
