//! Raycasts issued from the tracking device.
//!
//! A [`DevicePose`] is a snapshot handed in by the world-tracking collaborator; it is only
//! valid for the instant it was sampled and is never cached here.

use std::time::Duration;

use crate::{
    error::PlacementError,
    orientation::align_to_normal,
    raycast::{Raycaster, first_hit_on},
    types::{Quat, QueryMode, RaycastHit, RaycastQuery, SurfaceId, Transform, Vec3},
};

/// Position and orientation of the tracking device at `timestamp`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DevicePose {
    pub position: Vec3,
    pub orientation: Quat,
    /// Sample time on the tracking clock.
    pub timestamp: Duration,
}

impl DevicePose {
    pub fn new(position: Vec3, orientation: Quat, timestamp: Duration) -> Self {
        Self {
            position,
            orientation,
            timestamp,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.orientation)
    }
}

/// First hit on `surface` along the segment from the device to `destination`.
pub fn raycast_onto<R: Raycaster + ?Sized>(
    surface: SurfaceId,
    destination: Vec3,
    pose: &DevicePose,
    raycaster: &R,
) -> Option<RaycastHit> {
    first_hit_on(raycaster, pose.position, destination, surface, None)
}

/// Closest hit on any surface along the segment from the device to `destination`.
pub fn raycast_nearest<R: Raycaster + ?Sized>(
    destination: Vec3,
    pose: &DevicePose,
    raycaster: &R,
) -> Option<RaycastHit> {
    let query = RaycastQuery::new(pose.position, destination, QueryMode::Nearest);
    let hit = raycaster.cast(&query).into_iter().next();
    if hit.is_none() {
        log::debug!(
            "no raycast hit from device: origin {:?}, destination {:?}",
            pose.position,
            destination
        );
    }
    hit
}

/// Rotation aligning an object to `surface` at the point the device sees at `destination`.
///
/// `Ok(None)` when the device's line of sight does not meet the surface.
pub fn reorient<R: Raycaster + ?Sized>(
    surface: SurfaceId,
    destination: Vec3,
    pose: &DevicePose,
    raycaster: &R,
) -> Result<Option<Quat>, PlacementError> {
    raycast_onto(surface, destination, pose, raycaster)
        .map(|hit| align_to_normal(hit.normal))
        .transpose()
}
