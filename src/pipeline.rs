// src/pipeline.rs
use crate::config::SmootherConfig;
use crate::error::Result;
use crate::landmarks::Frame;
use crate::smoother::{build_smoother, LandmarkSmoother};
use tracing::{debug, info};
use std::collections::VecDeque;
use std::time::Instant;

const METRICS_WINDOW: usize = 30;

/// Raw detector output for one video time step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    /// Video time in milliseconds.
    pub timestamp: f64,
    pub poses: Frame,
    pub faces: Frame,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothedFrame {
    pub timestamp: f64,
    pub poses: Frame,
    pub faces: Frame,
}

#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    pub avg_fps: f32,
    pub avg_processing_time: f32,
    pub frames_processed: u64,
    pub frames_skipped: u64,
    frame_times: VecDeque<f32>,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            avg_fps: 0.0,
            avg_processing_time: 0.0,
            frames_processed: 0,
            frames_skipped: 0,
            frame_times: VecDeque::with_capacity(METRICS_WINDOW),
        }
    }

    fn record(&mut self, elapsed: f32) {
        self.frames_processed += 1;
        self.frame_times.push_front(elapsed);
        if self.frame_times.len() > METRICS_WINDOW {
            self.frame_times.pop_back();
        }

        self.avg_processing_time =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        self.avg_fps = if self.avg_processing_time > 0.0 {
            1.0 / self.avg_processing_time
        } else {
            0.0
        };
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds detector output through one smoother per landmark stream.
///
/// Pose and face landmarks are smoothed by separate instances so that a face
/// appearing never resets pose history and vice versa. A frame that repeats
/// the last processed timestamp is dropped without touching any smoother, so
/// a paused video does not keep pulling the Kalman estimate. Any other
/// timestamp is processed, including one earlier than the last after a seek.
pub struct FrameDriver {
    pose_smoother: Box<dyn LandmarkSmoother + Send>,
    face_smoother: Box<dyn LandmarkSmoother + Send>,
    last_timestamp: Option<f64>,
    metrics: PerformanceMetrics,
}

impl FrameDriver {
    pub fn new(config: &SmootherConfig) -> Result<Self> {
        let pose_smoother = build_smoother(config)?;
        let face_smoother = build_smoother(config)?;
        info!(filter = %config.filter, policy = ?config.shape_policy, "Frame driver ready");

        Ok(Self::with_smoothers(pose_smoother, face_smoother))
    }

    pub fn with_smoothers(
        pose_smoother: Box<dyn LandmarkSmoother + Send>,
        face_smoother: Box<dyn LandmarkSmoother + Send>,
    ) -> Self {
        Self {
            pose_smoother,
            face_smoother,
            last_timestamp: None,
            metrics: PerformanceMetrics::new(),
        }
    }

    /// Smooths `observation`, or returns `None` if it repeats the video time
    /// of the last processed frame.
    pub fn process(&mut self, observation: &Observation) -> Option<SmoothedFrame> {
        if let Some(last) = self.last_timestamp {
            if observation.timestamp == last {
                self.metrics.frames_skipped += 1;
                debug!(timestamp = observation.timestamp, "Skipping repeated frame");
                return None;
            }
        }

        let start = Instant::now();
        let poses = self.pose_smoother.update(&observation.poses);
        let faces = self.face_smoother.update(&observation.faces);
        self.metrics.record(start.elapsed().as_secs_f32());
        // A non-finite time never equals anything, so it is not remembered.
        if observation.timestamp.is_finite() {
            self.last_timestamp = Some(observation.timestamp);
        }

        Some(SmoothedFrame {
            timestamp: observation.timestamp,
            poses,
            faces,
        })
    }

    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn smoother_name(&self) -> &'static str {
        self.pose_smoother.name()
    }
}
