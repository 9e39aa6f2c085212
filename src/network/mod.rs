//! The two-stage PCANet.
//!
//! ```text
//! fit:        patches → PCA (L1) → convolve → patches → PCA (L2)
//! transform:  convolve (L1) → convolve (L2) → binarize → encode → block histograms
//! ```
//!
//! [`TwoStageNet`] handles one channel. [`PcaNet`] runs one independent
//! `TwoStageNet` per channel and concatenates their descriptors.

mod error;
mod multi;
mod single;
mod structure;

pub use error::{NetworkError, Stage};
pub use multi::PcaNet;
pub use single::{StageState, TwoStageNet};
pub use structure::validate_structure;
