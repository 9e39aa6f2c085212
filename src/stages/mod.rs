//! Network stages: convolution, binary hashing and histogram pooling.
//!
//! These are pure functions over arrays. The network module wires them
//! together in order:
//!
//! ```text
//! images → convolution (L1) → convolution (L2) → binarize → binary_to_decimal → histogram
//! ```

mod convolution;
mod encoding;
mod histogram;

pub use convolution::convolution;
pub use encoding::binarize;
pub(crate) use encoding::binary_to_decimal;
pub use histogram::{BinEdges, BlockHistogram};
