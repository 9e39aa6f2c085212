//! Network configuration and shape parameters.
//!
//! A network is fully described by its image shape, the filter and step
//! shapes of both convolution layers, the two filter counts and the
//! pooling block shape. Configurations can be built in code or loaded
//! from TOML.

mod network;
mod shape;

pub use network::{ConfigError, NetworkConfig, MAX_L2_OUTPUT};
pub use shape::Shape;
