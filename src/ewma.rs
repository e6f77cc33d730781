// src/ewma.rs
use crate::error::{Result, SmootherError};
use crate::landmarks::{Frame, FrameShape};
use crate::normalizer::{reconcile, ShapeDecision, ShapePolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EwmaOptions {
    /// Weight kept from the running average, in `[0, 1)`. 0 disables smoothing.
    pub strength: f64,
}

impl Default for EwmaOptions {
    fn default() -> Self {
        Self { strength: 0.5 }
    }
}

impl EwmaOptions {
    pub fn validate(&self) -> Result<()> {
        // 1.0 would freeze the average at the first frame forever.
        if !(0.0..1.0).contains(&self.strength) {
            return Err(SmootherError::InvalidStrength(self.strength));
        }
        Ok(())
    }
}

/// Exponentially weighted moving average over every landmark axis.
#[derive(Debug, Clone)]
pub struct EwmaSmoother {
    strength: f64,
    policy: ShapePolicy,
    averages: Frame,
    shape: FrameShape,
}

impl EwmaSmoother {
    pub fn new(options: EwmaOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            strength: options.strength,
            policy: ShapePolicy::default(),
            averages: Vec::new(),
            shape: FrameShape::default(),
        })
    }

    pub fn with_policy(mut self, policy: ShapePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Shape of the averages currently held.
    pub fn tracked_shape(&self) -> &FrameShape {
        &self.shape
    }

    /// Blends `frame` into the running averages and returns a copy of them.
    pub fn update(&mut self, frame: &Frame) -> Frame {
        match reconcile(&self.shape, frame, self.policy) {
            ShapeDecision::Empty => return Vec::new(),
            ShapeDecision::Reset => {
                self.shape = FrameShape::of(frame);
                debug!(
                    entities = self.shape.entity_count(),
                    points = self.shape.total_points(),
                    "EWMA state reset"
                );
                self.averages = frame.clone();
            }
            ShapeDecision::Reuse => {
                let keep = self.strength;
                for (averages, raw) in self.averages.iter_mut().zip(frame) {
                    for (average, landmark) in averages.iter_mut().zip(raw) {
                        *average = average.scale(keep) + landmark.scale(1.0 - keep);
                    }
                }
            }
        }

        self.averages.clone()
    }
}
