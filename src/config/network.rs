//! Network configuration.
//!
//! The network is described by a flat set of shape parameters. Parameter
//! validation happens here; whether the chosen shapes tile every stage
//! exactly is a separate structural check (see
//! [`validate_structure`](crate::network::validate_structure)).

use super::Shape;
use crate::extraction::steps;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest supported L2. The default histogram has `2^L2 + 1` edges per block.
pub const MAX_L2_OUTPUT: usize = 16;

/// Configuration of a two-stage PCANet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Input image shape.
    pub image_shape: Shape,
    /// Kernel shape of the first convolution layer.
    pub filter_shape_l1: Shape,
    /// Kernel step of the first convolution layer.
    pub step_shape_l1: Shape,
    /// L1: number of filters learned in the first layer.
    pub n_l1_output: usize,
    /// Kernel shape of the second convolution layer.
    pub filter_shape_l2: Shape,
    /// Kernel step of the second convolution layer.
    pub step_shape_l2: Shape,
    /// L2: number of filters learned in the second layer.
    pub n_l2_output: usize,
    /// Block shape of the histogram pooling layer.
    pub block_shape: Shape,
    /// Number of histogram bin edges, between 2 and `2^L2 + 1`.
    /// Defaults to `2^L2 + 1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_bins: Option<usize>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            image_shape: Shape::square(28),
            filter_shape_l1: Shape::square(4),
            step_shape_l1: Shape::square(2),
            n_l1_output: 4,
            filter_shape_l2: Shape::square(2),
            step_shape_l2: Shape::square(1),
            n_l2_output: 4,
            block_shape: Shape::square(4),
            n_bins: None,
        }
    }
}

impl NetworkConfig {
    /// Number of bin edges used by the histogram layer.
    pub fn n_bins(&self) -> usize {
        self.n_bins.unwrap_or_else(|| (1usize << self.n_l2_output) + 1)
    }

    /// Number of distinct encoded values, `2^L2`.
    pub fn n_codes(&self) -> usize {
        1usize << self.n_l2_output
    }

    /// Spatial shape of the first-layer feature maps.
    pub fn output_shape_l1(&self) -> Shape {
        steps(self.image_shape, self.filter_shape_l1, self.step_shape_l1).output_shape()
    }

    /// Spatial shape of the second-layer feature maps.
    pub fn output_shape_l2(&self) -> Shape {
        steps(self.output_shape_l1(), self.filter_shape_l2, self.step_shape_l2).output_shape()
    }

    /// Number of histogram blocks per encoded map.
    pub fn n_blocks(&self) -> usize {
        steps(self.output_shape_l2(), self.block_shape, self.block_shape)
            .output_shape()
            .area()
    }

    /// Length of the descriptor produced for one image of one channel.
    pub fn feature_len(&self) -> usize {
        self.n_l1_output * self.n_blocks() * self.n_bins().saturating_sub(1)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let shapes = [
            ("image_shape", self.image_shape),
            ("filter_shape_l1", self.filter_shape_l1),
            ("filter_shape_l2", self.filter_shape_l2),
            ("block_shape", self.block_shape),
        ];
        for (name, shape) in shapes {
            if shape.is_empty() {
                return Err(ConfigError::InvalidShape { name, shape });
            }
        }
        for (name, shape) in [
            ("step_shape_l1", self.step_shape_l1),
            ("step_shape_l2", self.step_shape_l2),
        ] {
            if shape.is_empty() {
                return Err(ConfigError::ZeroStep { name, shape });
            }
        }
        if self.n_l1_output == 0 {
            return Err(ConfigError::ZeroOutputs { name: "n_l1_output" });
        }
        if self.n_l2_output == 0 {
            return Err(ConfigError::ZeroOutputs { name: "n_l2_output" });
        }
        if self.n_l2_output > MAX_L2_OUTPUT {
            return Err(ConfigError::TooManyBits {
                requested: self.n_l2_output,
                max: MAX_L2_OUTPUT,
            });
        }

        if !self.filter_shape_l1.fits_within(self.image_shape) {
            return Err(ConfigError::FilterTooLarge {
                name: "filter_shape_l1",
                filter: self.filter_shape_l1,
                input: self.image_shape,
            });
        }
        let l1 = self.output_shape_l1();
        if !self.filter_shape_l2.fits_within(l1) {
            return Err(ConfigError::FilterTooLarge {
                name: "filter_shape_l2",
                filter: self.filter_shape_l2,
                input: l1,
            });
        }
        let l2 = self.output_shape_l2();
        if !self.block_shape.fits_within(l2) {
            return Err(ConfigError::FilterTooLarge {
                name: "block_shape",
                filter: self.block_shape,
                input: l2,
            });
        }

        if self.n_l1_output > self.filter_shape_l1.area() {
            return Err(ConfigError::TooManyComponents {
                name: "n_l1_output",
                requested: self.n_l1_output,
                available: self.filter_shape_l1.area(),
            });
        }
        if self.n_l2_output > self.filter_shape_l2.area() {
            return Err(ConfigError::TooManyComponents {
                name: "n_l2_output",
                requested: self.n_l2_output,
                available: self.filter_shape_l2.area(),
            });
        }
        if let Some(n_bins) = self.n_bins {
            if n_bins < 2 {
                return Err(ConfigError::TooFewBins(n_bins));
            }
            let max = self.n_codes() + 1;
            if n_bins > max {
                return Err(ConfigError::TooManyBins {
                    requested: n_bins,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: NetworkConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml_str(&content)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must have non-zero dimensions, got {shape}")]
    InvalidShape { name: &'static str, shape: Shape },
    #[error("{name} must be at least 1x1, got {shape}")]
    ZeroStep { name: &'static str, shape: Shape },
    #[error("{name} must be at least 1")]
    ZeroOutputs { name: &'static str },
    #[error("{name} {filter} does not fit its {input} input")]
    FilterTooLarge {
        name: &'static str,
        filter: Shape,
        input: Shape,
    },
    #[error("{name} = {requested} exceeds the {available} features of a patch")]
    TooManyComponents {
        name: &'static str,
        requested: usize,
        available: usize,
    },
    #[error("n_l2_output = {requested} exceeds the supported maximum of {max}")]
    TooManyBits { requested: usize, max: usize },
    #[error("n_bins must be at least 2, got {0}")]
    TooFewBins(usize),
    #[error("n_bins = {requested} exceeds {max}, one edge past every code")]
    TooManyBins { requested: usize, max: usize },
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}
