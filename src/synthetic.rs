//! Deterministic synthetic images.
//!
//! Stands in for a dataset loader in demos, benchmarks and tests. Images
//! mix a random gradient, a soft blob, oriented stripes and a little noise,
//! so patch statistics have real structure for the estimators to find.
//! NOT a substitute for real data when judging descriptor quality.

use crate::config::Shape;
use ndarray::{Array2, Array3, Array4, Axis};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};

/// Seeded generator of grayscale images with values roughly in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct SyntheticImages {
    rng: ChaCha8Rng,
}

impl SyntheticImages {
    /// Creates a generator; equal seeds give equal image sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in `[0, 1]`.
    fn unit(&mut self) -> f64 {
        f64::from(self.rng.next_u32()) / f64::from(u32::MAX)
    }

    /// Uniform sample in `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.unit()
    }

    /// Generates one image.
    pub fn image(&mut self, shape: Shape) -> Array2<f64> {
        let (height, width) = shape.as_tuple();
        let scale = height.max(width).max(1) as f64;

        let gradient = (self.uniform(-0.5, 0.5), self.uniform(-0.5, 0.5));
        let center = (
            self.uniform(0.0, height as f64),
            self.uniform(0.0, width as f64),
        );
        let radius = self.uniform(0.15, 0.4) * scale;
        let blob = self.uniform(-0.6, 0.6);
        let angle = self.uniform(0.0, std::f64::consts::PI);
        let frequency = self.uniform(0.2, 1.2);
        let stripes = self.uniform(0.0, 0.3);

        let mut image = Array2::from_shape_fn((height, width), |(y, x)| {
            let (fy, fx) = (y as f64, x as f64);
            let ramp = 0.5 + gradient.0 * fy / scale + gradient.1 * fx / scale;
            let d2 = (fy - center.0).powi(2) + (fx - center.1).powi(2);
            let bump = blob * (-d2 / (2.0 * radius * radius)).exp();
            let phase = frequency * (fy * angle.sin() + fx * angle.cos());
            ramp + bump + stripes * phase.sin()
        });
        image.mapv_inplace(|v| v + 0.05 * (self.unit() - 0.5));
        image
    }

    /// Generates a `(n_images, h, w)` grayscale batch.
    pub fn batch(&mut self, n_images: usize, shape: Shape) -> Array3<f64> {
        let mut images = Array3::zeros((n_images, shape.height, shape.width));
        for mut slot in images.outer_iter_mut() {
            slot.assign(&self.image(shape));
        }
        images
    }

    /// Generates a `(n_images, h, w, n_channels)` batch with independent channels.
    pub fn multichannel(&mut self, n_images: usize, shape: Shape, n_channels: usize) -> Array4<f64> {
        let mut images = Array4::zeros((n_images, shape.height, shape.width, n_channels));
        for mut channel in images.axis_iter_mut(Axis(3)) {
            channel.assign(&self.batch(n_images, shape));
        }
        images
    }
}
