//! Planar position/orientation of an agent's collision footprint.
//!
//! Coordinates are local metres (`f32`).  The classifier only ever compares
//! two transforms against a tolerance, so no projection or 3-D data is kept.

use std::f32::consts::{PI, TAU};

/// A point or offset on the ground plane, in metres.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in metres.
    #[inline]
    pub fn distance_m(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Position plus heading (radians, counter-clockwise from +x).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position:    Vec2,
    pub heading_rad: f32,
}

impl Transform {
    #[inline]
    pub fn new(position: Vec2, heading_rad: f32) -> Self {
        Self { position, heading_rad }
    }

    /// Smallest absolute angle between the two headings, in `[0, π]`.
    pub fn heading_delta(self, other: Transform) -> f32 {
        let d = (other.heading_rad - self.heading_rad).rem_euclid(TAU);
        if d > PI { TAU - d } else { d }
    }

    /// `true` if `other` is further away than `tolerance` allows in either
    /// position or heading.
    pub fn differs_from(self, other: Transform, tolerance: &TransformTolerance) -> bool {
        self.position.distance_m(other.position) > tolerance.position_m
            || self.heading_delta(other) > tolerance.heading_rad
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) @ {:.1}°",
            self.position.x,
            self.position.y,
            self.heading_rad.to_degrees()
        )
    }
}

/// How far a footprint may drift before baked obstacle data counts as stale.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformTolerance {
    pub position_m:  f32,
    pub heading_rad: f32,
}

impl Default for TransformTolerance {
    fn default() -> Self {
        Self {
            position_m:  0.1,
            heading_rad: 2.0_f32.to_radians(),
        }
    }
}
