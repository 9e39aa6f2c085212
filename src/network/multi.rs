//! Multi-channel PCANet: one independent two-stage network per channel.

use super::error::NetworkError;
use super::single::TwoStageNet;
use super::structure::validate_structure;
use crate::config::NetworkConfig;
use ndarray::{s, Array2, ArrayView, ArrayView4, ArrayViewD, Axis, Dimension, Ix3, Ix4};
use tracing::{debug, info};

const ACCEPTED_LAYOUTS: &str = "(n_images, h, w) or (n_images, h, w, n_channels) images";

/// A PCANet over grayscale or multi-channel images.
///
/// Grayscale batches `(n_images, h, w)` are treated as single-channel
/// `(n_images, h, w, 1)` batches. Each channel gets its own
/// [`TwoStageNet`] with the shared configuration, and descriptors are
/// concatenated in channel order.
#[derive(Debug, Clone)]
pub struct PcaNet {
    config: NetworkConfig,
    channels: Vec<TwoStageNet>,
}

impl PcaNet {
    /// Creates an unfit network. The channel count is taken from the
    /// first `fit`.
    pub fn new(config: NetworkConfig) -> Result<Self, NetworkError> {
        config.validate()?;
        Ok(Self {
            config,
            channels: Vec::new(),
        })
    }

    /// The configuration shared by every channel.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Per-channel networks, indexed by channel.
    pub fn channels(&self) -> &[TwoStageNet] {
        &self.channels
    }

    /// Number of channels fitted so far (0 before `fit`).
    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }

    /// Returns true once every channel network is fitted.
    pub fn is_fitted(&self) -> bool {
        !self.channels.is_empty() && self.channels.iter().all(TwoStageNet::is_fitted)
    }

    /// Length of the concatenated descriptor per image.
    pub fn feature_len(&self) -> usize {
        self.config.feature_len() * self.channels.len()
    }

    /// Fits one fresh network per channel, replacing any previous fit.
    pub fn fit<D: Dimension>(&mut self, images: ArrayView<'_, f64, D>) -> Result<(), NetworkError> {
        let images = as_channels(images.into_dyn())?;
        let n_channels = images.len_of(Axis(3));
        if n_channels == 0 {
            return Err(NetworkError::EmptyBatch);
        }

        let mut channels = Vec::with_capacity(n_channels);
        for (index, channel) in images.axis_iter(Axis(3)).enumerate() {
            debug!(channel = index, "Fitting channel");
            let mut net = TwoStageNet::new(self.config.clone())?;
            net.fit(channel)?;
            channels.push(net);
        }
        self.channels = channels;

        info!(
            channels = n_channels,
            feature_len = self.feature_len(),
            "Multi-channel network fitted"
        );
        Ok(())
    }

    /// Transforms every channel and concatenates descriptors per image.
    pub fn transform<D: Dimension>(&self, images: ArrayView<'_, f64, D>) -> Result<Array2<f64>, NetworkError> {
        if !self.is_fitted() {
            return Err(NetworkError::NotFitted);
        }
        let images = as_channels(images.into_dyn())?;
        let n_channels = images.len_of(Axis(3));
        if n_channels != self.channels.len() {
            return Err(NetworkError::ChannelMismatch {
                expected: self.channels.len(),
                found: n_channels,
            });
        }

        let per_channel = self.config.feature_len();
        let mut features = Array2::zeros((images.len_of(Axis(0)), self.feature_len()));
        for (index, (net, channel)) in self
            .channels
            .iter()
            .zip(images.axis_iter(Axis(3)))
            .enumerate()
        {
            let x = net.transform(channel)?;
            features
                .slice_mut(s![.., index * per_channel..(index + 1) * per_channel])
                .assign(&x);
        }
        Ok(features)
    }

    /// Checks that every stage tiles its input exactly.
    ///
    /// Channels share one configuration; before `fit` the configuration is
    /// checked directly.
    pub fn validate_structure(&self) -> Result<(), NetworkError> {
        if self.channels.is_empty() {
            return validate_structure(&self.config);
        }
        self.channels
            .iter()
            .try_for_each(TwoStageNet::validate_structure)
    }
}

/// Views a grayscale or multi-channel batch as `(n_images, h, w, n_channels)`.
fn as_channels(images: ArrayViewD<'_, f64>) -> Result<ArrayView4<'_, f64>, NetworkError> {
    let found = images.ndim();
    let mismatch = |_| NetworkError::Dimensionality {
        expected: ACCEPTED_LAYOUTS,
        found,
    };
    match found {
        3 => Ok(images
            .into_dimensionality::<Ix3>()
            .map_err(mismatch)?
            .insert_axis(Axis(3))),
        4 => images.into_dimensionality::<Ix4>().map_err(mismatch),
        _ => Err(NetworkError::Dimensionality {
            expected: ACCEPTED_LAYOUTS,
            found,
        }),
    }
}
