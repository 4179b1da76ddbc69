//! Conversions between Bevy's glam types and the nalgebra types used by `placement`.

use bevy::prelude::*;

#[inline]
pub fn vec3_to_na(v: Vec3) -> placement::Vec3 {
    placement::Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn vec3_from_na(v: placement::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn quat_to_na(q: Quat) -> placement::Quat {
    placement::Quat::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub fn quat_from_na(q: placement::Quat) -> Quat {
    let q = q.into_inner();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

/// Placement pose of a Bevy transform. Scale is dropped.
#[inline]
pub fn transform_to_na(t: &Transform) -> placement::Transform {
    placement::Transform::new(vec3_to_na(t.translation), quat_to_na(t.rotation))
}

/// Write a placement pose into a Bevy transform, keeping its scale.
#[inline]
pub fn apply_na_transform(target: &mut Transform, pose: &placement::Transform) {
    target.translation = vec3_from_na(pose.translation);
    target.rotation = quat_from_na(pose.rotation);
}
