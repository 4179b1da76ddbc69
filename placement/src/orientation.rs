use nalgebra as na;

use crate::{
    error::PlacementError,
    settings::{DEGENERATE_NORMAL_EPS, reference_up},
    types::{Quat, Vec3},
};

/// Squared length below which the shortest-arc axis is considered undefined.
const ANTIPARALLEL_AXIS_EPS_SQ: f32 = 1.0e-12;

/// Rotation that maps the local +Y axis onto `normal`.
///
/// - `normal` need not be unit length; it is normalized first.
/// - The result is the shortest-arc rotation, so it carries no twist about the normal. Two
///   surfaces with the same normal but a different in-plane rotation yield the same result.
/// - A normal pointing straight down has no unique shortest arc. The result is then exactly a
///   half turn about +X, so repeated calls are bit-identical.
///
/// Fails with [`PlacementError::DegenerateNormal`] if `normal` is (near) zero or not finite.
pub fn align_to_normal(normal: Vec3) -> Result<Quat, PlacementError> {
    let length = normal.norm();
    if !length.is_finite() || length < DEGENERATE_NORMAL_EPS {
        return Err(PlacementError::DegenerateNormal { length });
    }
    let n = normal / length;
    let up = reference_up();

    let d = up.dot(&n);
    let axis = up.cross(&n);

    if axis.norm_squared() <= ANTIPARALLEL_AXIS_EPS_SQ {
        return Ok(if d < 0.0 {
            half_turn_about_x()
        } else {
            Quat::identity()
        });
    }

    // atan2 keeps the angle accurate near a half turn, where 1 + up⋅n cancels.
    let angle = axis.norm().atan2(d);
    Ok(Quat::from_axis_angle(&na::Unit::new_normalize(axis), angle))
}

/// Exact 180° rotation about +X (w = 0, i = 1).
#[inline]
fn half_turn_about_x() -> Quat {
    Quat::new_unchecked(na::Quaternion::new(0.0, 1.0, 0.0, 0.0))
}
