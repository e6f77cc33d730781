// src/lib.rs
//! Temporal smoothing for per-frame landmark detections.
//!
//! A detector hands over a [`Frame`] (every pose or face it found, each an
//! ordered list of 3D landmarks) once per video frame. One smoother, chosen
//! up front, turns it into a frame of the same shape with the jitter taken
//! out: [`EwmaSmoother`] blends each landmark into a running average,
//! [`KalmanSmoother`] runs a scalar Kalman filter per axis. Both throw their
//! history away when the number of detected entities changes.

pub mod config;
pub mod data;
pub mod error;
pub mod ewma;
pub mod kalman;
pub mod kalman_smoother;
pub mod landmarks;
pub mod normalizer;
pub mod pipeline;
pub mod smoother;

pub use config::{SessionSettings, SmootherConfig};
pub use error::{Result, SmootherError};
pub use ewma::{EwmaOptions, EwmaSmoother};
pub use kalman::{KalmanParams, ScalarKalmanFilter};
pub use kalman_smoother::{AxisFilters, KalmanSmoother};
pub use landmarks::{Frame, FrameShape, Point3, PointSet};
pub use normalizer::{reconcile, ShapeDecision, ShapePolicy};
pub use pipeline::{FrameDriver, Observation, PerformanceMetrics, SmoothedFrame};
pub use smoother::{build_smoother, FilterKind, LandmarkSmoother, Passthrough};
