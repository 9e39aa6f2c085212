//! PCANet Feature Extraction Library
//!
//! Computes fixed-length image descriptors with a two-stage PCANet:
//! cascaded PCA-derived convolution filters, binary hashing and block
//! histograms.
//!
//! # Architecture
//!
//! The system follows an explicit, strictly forward data flow:
//!
//! ```text
//! extraction → filters (PCA, L1) → stages::convolution
//!            → filters (PCA, L2) → stages::convolution
//!            → stages::binarize → stages::binary_to_decimal → stages::BlockHistogram
//! ```
//!
//! # Design Principles
//!
//! - **Explicit estimator state**: each layer's PCA is an owned object that
//!   is only mutated by `partial_fit` and read through snapshots
//! - **Fail loudly**: shape mismatches, untiled structures and use before
//!   fit are errors, never silent truncation
//! - **Pure stages**: convolution, encoding and pooling are functions of
//!   their inputs; `transform` never mutates a fitted network
//!
//! # Example
//!
//! ```no_run
//! use pcanet::{NetworkConfig, PcaNet, Shape, SyntheticImages};
//!
//! let config = NetworkConfig {
//!     image_shape: Shape::square(8),
//!     filter_shape_l1: Shape::square(4),
//!     step_shape_l1: Shape::square(2),
//!     n_l1_output: 4,
//!     filter_shape_l2: Shape::square(2),
//!     step_shape_l2: Shape::square(1),
//!     n_l2_output: 3,
//!     block_shape: Shape::square(2),
//!     n_bins: None,
//! };
//!
//! let mut net = PcaNet::new(config).unwrap();
//! net.validate_structure().unwrap();
//!
//! let images = SyntheticImages::new(42).batch(16, Shape::square(8));
//! net.fit(images.view()).unwrap();
//!
//! let features = net.transform(images.view()).unwrap();
//! assert_eq!(features.ncols(), net.feature_len());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod extraction;
pub mod filters;
pub mod network;
pub mod stages;
pub mod synthetic;

// Re-export commonly used types at crate root
pub use config::{ConfigError, NetworkConfig, Shape};
pub use filters::{ComponentEstimator, FilterBank, IncrementalPca};
pub use network::{NetworkError, PcaNet, TwoStageNet};
pub use synthetic::SyntheticImages;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
