//! Raycasting capability consumed by the placement operations.
//!
//! The placement code never owns scene geometry. It asks a [`Raycaster`] for the
//! intersections of a segment and works from the returned hits. The host decides how the
//! scene is stored and accelerated; [`RapierQueryWorld`](crate::rapier_world::RapierQueryWorld)
//! is the in-crate implementation for static collision volumes.

use crate::{
    layers::LayerMask,
    types::{QueryMode, RaycastHit, RaycastQuery, SurfaceId, Vec3},
};

/// Segment raycasts against a static scene.
///
/// Contract
/// - Hits are ordered by increasing distance from `query.origin`.
/// - [`QueryMode::Nearest`] yields at most one hit; [`QueryMode::All`] yields every
///   intersection along the segment from origin to destination.
/// - Surfaces outside `query.filter` (when set) are never reported.
/// - Casting never mutates the scene, so one raycaster may serve concurrent readers.
///
/// An empty result means "nothing was struck". Implementations that can fail (host
/// capability unavailable) also return an empty result.
pub trait Raycaster {
    fn cast(&self, query: &RaycastQuery) -> Vec<RaycastHit>;
}

impl<R: Raycaster + ?Sized> Raycaster for &R {
    fn cast(&self, query: &RaycastQuery) -> Vec<RaycastHit> {
        (**self).cast(query)
    }
}

/// Cast every intersection from `origin` toward `destination` and return the first one
/// that struck `surface`.
pub fn first_hit_on<R: Raycaster + ?Sized>(
    raycaster: &R,
    origin: Vec3,
    destination: Vec3,
    surface: SurfaceId,
    filter: Option<LayerMask>,
) -> Option<RaycastHit> {
    let query = RaycastQuery::new(origin, destination, QueryMode::All).with_filter(filter);
    let hit = raycaster
        .cast(&query)
        .into_iter()
        .find(|hit| hit.surface == surface);

    if hit.is_none() {
        log::debug!(
            "no raycast hit on surface {:?}: origin {:?}, destination {:?}",
            surface,
            origin,
            destination
        );
    }
    hit
}
