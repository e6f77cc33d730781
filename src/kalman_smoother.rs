// src/kalman_smoother.rs
use crate::error::Result;
use crate::kalman::{KalmanParams, ScalarKalmanFilter};
use crate::landmarks::{Frame, FrameShape, Point3};
use crate::normalizer::{reconcile, ShapeDecision, ShapePolicy};
use tracing::debug;

/// Independent filters for the three axes of one landmark.
#[derive(Debug, Clone)]
pub struct AxisFilters {
    pub x: ScalarKalmanFilter,
    pub y: ScalarKalmanFilter,
    pub z: ScalarKalmanFilter,
}

impl AxisFilters {
    /// Fresh filters start from zero, not from the first measurement, and
    /// converge over the following frames.
    pub fn new(params: &KalmanParams) -> Self {
        Self {
            x: ScalarKalmanFilter::new(params, 0.0),
            y: ScalarKalmanFilter::new(params, 0.0),
            z: ScalarKalmanFilter::new(params, 0.0),
        }
    }

    pub fn update(&mut self, measurement: &Point3) -> Point3 {
        Point3::new(
            self.x.update(measurement.x),
            self.y.update(measurement.y),
            self.z.update(measurement.z),
        )
    }
}

/// Smooths every landmark axis with its own scalar Kalman filter.
#[derive(Debug, Clone)]
pub struct KalmanSmoother {
    params: KalmanParams,
    policy: ShapePolicy,
    // Indexed by (entity, point). Rebuilt only on reset.
    filters: Vec<Vec<AxisFilters>>,
    shape: FrameShape,
}

impl KalmanSmoother {
    pub fn new(params: KalmanParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            policy: ShapePolicy::default(),
            filters: Vec::new(),
            shape: FrameShape::default(),
        })
    }

    pub fn with_policy(mut self, policy: ShapePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn params(&self) -> &KalmanParams {
        &self.params
    }

    pub fn tracked_shape(&self) -> &FrameShape {
        &self.shape
    }

    /// Filters held for one landmark, if that slot is being tracked.
    #[cfg(test)]
    pub(crate) fn filters_at(&self, entity: usize, point: usize) -> Option<&AxisFilters> {
        self.filters.get(entity).and_then(|set| set.get(point))
    }

    pub fn update(&mut self, frame: &Frame) -> Frame {
        match reconcile(&self.shape, frame, self.policy) {
            ShapeDecision::Empty => return Vec::new(),
            ShapeDecision::Reset => {
                self.filters = frame
                    .iter()
                    .map(|set| set.iter().map(|_| AxisFilters::new(&self.params)).collect())
                    .collect();
                self.shape = FrameShape::of(frame);
                debug!(
                    entities = self.shape.entity_count(),
                    points = self.shape.total_points(),
                    "Kalman filters rebuilt"
                );
            }
            ShapeDecision::Reuse => {}
        }

        frame
            .iter()
            .zip(self.filters.iter_mut())
            .map(|(set, filters)| {
                set.iter()
                    .zip(filters.iter_mut())
                    .map(|(landmark, filter)| filter.update(landmark))
                    .collect()
            })
            .collect()
    }
}
