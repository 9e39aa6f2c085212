//! PCA-derived filter banks.
//!
//! Each convolution layer owns a component estimator that is fed
//! mean-centered patches during training. Once a layer has seen its whole
//! training stream, the top principal directions are reshaped into the
//! 2D filters that layer convolves with.

mod bank;
mod eigen;
mod estimator;

pub use bank::{components_to_filters, FilterBank};
pub use estimator::{ComponentEstimator, EstimatorError, IncrementalPca};
