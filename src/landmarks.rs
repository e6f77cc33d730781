// src/landmarks.rs
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A single tracked location. Units are whatever the detector emits
/// (normalized image space or pixels); smoothing does not care.
pub type Point3 = Vector3<f64>;

/// Ordered landmarks of one detected entity. Index `i` names the same
/// anatomical landmark in every frame.
pub type PointSet = Vec<Point3>;

/// Every entity (pose or face) detected in one time step.
pub type Frame = Vec<PointSet>;

/// Wire form of a landmark as detectors write it: `{ "x": .., "y": .., "z": .. }`.
/// Extra fields such as `visibility` are ignored on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl From<LandmarkRecord> for Point3 {
    fn from(record: LandmarkRecord) -> Self {
        Vector3::new(record.x, record.y, record.z)
    }
}

impl From<&Point3> for LandmarkRecord {
    fn from(point: &Point3) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: point.z,
        }
    }
}

pub fn frame_from_records(records: &[Vec<LandmarkRecord>]) -> Frame {
    records
        .iter()
        .map(|set| set.iter().map(|&lm| Point3::from(lm)).collect())
        .collect()
}

pub fn frame_to_records(frame: &Frame) -> Vec<Vec<LandmarkRecord>> {
    frame
        .iter()
        .map(|set| set.iter().map(LandmarkRecord::from).collect())
        .collect()
}

/// Entity count plus the point count of each entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameShape {
    point_counts: Vec<usize>,
}

impl FrameShape {
    pub fn of(frame: &Frame) -> Self {
        Self {
            point_counts: frame.iter().map(Vec::len).collect(),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.point_counts.len()
    }

    pub fn point_counts(&self) -> &[usize] {
        &self.point_counts
    }

    pub fn is_empty(&self) -> bool {
        self.point_counts.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.point_counts.iter().sum()
    }
}
