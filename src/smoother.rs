// src/smoother.rs
use crate::config::SmootherConfig;
use crate::error::{Result, SmootherError};
use crate::ewma::EwmaSmoother;
use crate::kalman_smoother::KalmanSmoother;
use crate::landmarks::Frame;
use serde::{Deserialize, Serialize};
use tracing::debug;
use std::fmt;
use std::str::FromStr;

/// Per-frame post-processing applied to detector output. Implementors keep
/// whatever history they need between calls and always return a frame with
/// the same shape as the input.
pub trait LandmarkSmoother {
    fn update(&mut self, frame: &Frame) -> Frame;

    fn name(&self) -> &'static str;
}

impl LandmarkSmoother for EwmaSmoother {
    fn update(&mut self, frame: &Frame) -> Frame {
        EwmaSmoother::update(self, frame)
    }

    fn name(&self) -> &'static str {
        "ewma"
    }
}

impl LandmarkSmoother for KalmanSmoother {
    fn update(&mut self, frame: &Frame) -> Frame {
        KalmanSmoother::update(self, frame)
    }

    fn name(&self) -> &'static str {
        "kalman"
    }
}

/// Identity post-processing: hands back a copy of the raw detections.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl LandmarkSmoother for Passthrough {
    fn update(&mut self, frame: &Frame) -> Frame {
        frame.clone()
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    None,
    Ewma,
    #[default]
    Kalman,
}

impl FromStr for FilterKind {
    type Err = SmootherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "identity" => Ok(FilterKind::None),
            "ewma" => Ok(FilterKind::Ewma),
            "kalman" => Ok(FilterKind::Kalman),
            _ => Err(SmootherError::UnknownFilter(s.to_string())),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::None => "none",
            FilterKind::Ewma => "ewma",
            FilterKind::Kalman => "kalman",
        };
        f.write_str(name)
    }
}

/// Builds the smoother selected by `config`, rejecting invalid options.
pub fn build_smoother(config: &SmootherConfig) -> Result<Box<dyn LandmarkSmoother + Send>> {
    let smoother: Box<dyn LandmarkSmoother + Send> = match config.filter {
        FilterKind::None => Box::new(Passthrough),
        FilterKind::Ewma => {
            let smoother = EwmaSmoother::new(config.ewma)?.with_policy(config.shape_policy);
            debug!(strength = smoother.strength(), policy = ?config.shape_policy, "Built EWMA smoother");
            Box::new(smoother)
        }
        FilterKind::Kalman => {
            let smoother = KalmanSmoother::new(config.kalman)?.with_policy(config.shape_policy);
            let params = smoother.params();
            debug!(
                process_noise = params.process_noise,
                measurement_noise = params.measurement_noise,
                estimated_error = params.estimated_error,
                policy = ?config.shape_policy,
                "Built Kalman smoother"
            );
            Box::new(smoother)
        }
    };
    Ok(smoother)
}
