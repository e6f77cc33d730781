// src/normalizer.rs
//! Decides whether per-point filter state held by a smoother still fits the
//! incoming frame or has to be rebuilt.
//!
//! The entity count changes when someone walks into or out of view; that is
//! where state gets thrown away so one person's history never bleeds into
//! another's. Per-entity point counts are a model constant in practice, so
//! the default policy does not compare them.

use crate::landmarks::{Frame, FrameShape};
use serde::{Deserialize, Serialize};

/// How much of the frame shape is compared against the held state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePolicy {
    /// Reset only when the entity count changes. A point-count change on an
    /// already tracked entity is a caller bug.
    #[default]
    EntityCount,
    /// Reset whenever the entity count or any per-entity point count changes.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeDecision {
    /// Nothing detected. Return an empty frame and leave state alone.
    Empty,
    /// Discard state and rebuild it from the new frame's shape.
    Reset,
    /// Held state lines up with the frame; update it in place.
    Reuse,
}

pub fn reconcile(held: &FrameShape, frame: &Frame, policy: ShapePolicy) -> ShapeDecision {
    if frame.is_empty() {
        return ShapeDecision::Empty;
    }

    if held.entity_count() != frame.len() {
        return ShapeDecision::Reset;
    }

    let points_match = held
        .point_counts()
        .iter()
        .zip(frame)
        .all(|(&count, set)| count == set.len());

    match policy {
        ShapePolicy::Strict if !points_match => ShapeDecision::Reset,
        ShapePolicy::Strict => ShapeDecision::Reuse,
        ShapePolicy::EntityCount => {
            debug_assert!(
                points_match,
                "per-entity point count changed while entity count stayed at {}: held {:?}, got {:?}",
                frame.len(),
                held.point_counts(),
                FrameShape::of(frame).point_counts(),
            );
            // Release builds rebuild rather than index past the held state.
            if points_match {
                ShapeDecision::Reuse
            } else {
                ShapeDecision::Reset
            }
        }
    }
}
