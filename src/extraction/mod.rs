//! Patch extraction and normalization.
//!
//! Every layer of the network looks at its input through the same lens:
//! a fixed-size window stepped over an integer grid. This module computes
//! that grid, extracts the windows, and turns them into mean-centered
//! sample vectors for component estimation.

mod normalize;
mod patches;
mod steps;

pub use normalize::remove_patch_mean;
pub use patches::{image_to_patch_vectors, Patches};
pub use steps::{steps, Grid};
