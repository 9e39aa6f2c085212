//! Network errors.

use crate::config::{ConfigError, Shape};
use crate::filters::EstimatorError;
use std::fmt;
use thiserror::Error;

/// A layer of the network, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// First convolution layer.
    First,
    /// Second convolution layer.
    Second,
    /// Histogram pooling layer.
    Pooling,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::First => f.write_str("layer 1"),
            Stage::Second => f.write_str("layer 2"),
            Stage::Pooling => f.write_str("pooling layer"),
        }
    }
}

/// Errors raised by network construction, fitting and transformation.
///
/// Every error aborts the call that raised it; no partial output is produced.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("image shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: Shape, found: Shape },

    #[error("expected {expected}, found an array with {found} dimensions")]
    Dimensionality { expected: &'static str, found: usize },

    #[error("invalid network structure: {stage} covers only {covered} of its {input} input")]
    StructuralInvalidity {
        stage: Stage,
        input: Shape,
        covered: Shape,
    },

    #[error("network used before fit completed")]
    NotFitted,

    #[error("cannot fit on an empty image batch")]
    EmptyBatch,

    #[error("channel count mismatch: fitted with {expected}, found {found}")]
    ChannelMismatch { expected: usize, found: usize },

    #[error("{stage} estimator keeps {found} components, configuration requires {expected}")]
    EstimatorMismatch {
        stage: Stage,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("component estimation failed: {0}")]
    Estimator(#[from] EstimatorError),
}
