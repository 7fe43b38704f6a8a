use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Graph identity of a world position: the exact bit patterns of `x` and `z`.
///
/// Two positions share a key only when their coordinates are identical. The
/// height (`y`) never participates. `-0.0` folds onto `+0.0` and every NaN
/// folds onto one key, so the key behaves like formatting the floats into text
/// and comparing strings. Nothing is rounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionKey {
    pub x: u32,
    pub z: u32,
}

impl PositionKey {
    pub fn of(position: Vec3) -> Self {
        Self {
            x: canonical_bits(position.x),
            z: canonical_bits(position.z),
        }
    }
}

impl From<Vec3> for PositionKey {
    fn from(position: Vec3) -> Self {
        Self::of(position)
    }
}

#[inline]
fn canonical_bits(value: f32) -> u32 {
    if value.is_nan() {
        f32::NAN.to_bits()
    } else if value == 0.0 {
        0.0f32.to_bits()
    } else {
        value.to_bits()
    }
}

/// Euclidean distance on the XZ plane.
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Per-axis tolerance match on the XZ plane (`|dx| < tol && |dz| < tol`).
///
/// Deliberately looser than [`PositionKey`] equality: used for goal tests and
/// narration, never for graph construction.
#[inline]
pub fn planar_approx_eq(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    (a.x - b.x).abs() < tolerance && (a.z - b.z).abs() < tolerance
}
