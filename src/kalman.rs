// src/kalman.rs
use crate::error::{Result, SmootherError};
use serde::{Deserialize, Serialize};

/// Noise parameters shared by every per-axis filter a smoother creates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KalmanParams {
    /// Higher = follows the input faster, output gets noisier.
    pub process_noise: f64,
    /// Higher = trusts measurements less, output gets smoother.
    pub measurement_noise: f64,
    /// Initial error covariance. Washes out after a few frames.
    pub estimated_error: f64,
}

impl Default for KalmanParams {
    fn default() -> Self {
        Self {
            process_noise: 0.01,
            measurement_noise: 0.1,
            estimated_error: 1.0,
        }
    }
}

impl KalmanParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("process_noise", self.process_noise),
            ("measurement_noise", self.measurement_noise),
            ("estimated_error", self.estimated_error),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SmootherError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// One-dimensional Kalman filter over a random-walk process.
///
/// Callers must supply strictly positive noise; with `q = r = 0` and a
/// collapsed covariance the gain is `0/0`.
#[derive(Debug, Clone)]
pub struct ScalarKalmanFilter {
    estimate: f64,
    error_covariance: f64,
    process_noise: f64,
    measurement_noise: f64,
    gain: f64,
}

impl ScalarKalmanFilter {
    pub fn new(params: &KalmanParams, initial_value: f64) -> Self {
        Self {
            estimate: initial_value,
            error_covariance: params.estimated_error,
            process_noise: params.process_noise,
            measurement_noise: params.measurement_noise,
            gain: 0.0,
        }
    }

    /// Runs one predict + correct cycle and returns the new estimate.
    pub fn update(&mut self, measurement: f64) -> f64 {
        // Predict
        self.error_covariance += self.process_noise;

        // Correct
        self.gain = self.error_covariance / (self.error_covariance + self.measurement_noise);
        self.estimate += self.gain * (measurement - self.estimate);
        self.error_covariance *= 1.0 - self.gain;

        self.estimate
    }

    pub fn estimate(&self) -> f64 {
        self.estimate
    }

    pub fn error_covariance(&self) -> f64 {
        self.error_covariance
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }
}
