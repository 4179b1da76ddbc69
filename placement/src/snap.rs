use crate::{
    orientation::align_to_normal,
    raycast::{Raycaster, first_hit_on},
    settings::SnapSettings,
    types::{PlacementOutcome, SurfaceId, Transform, Vec3},
};

/// Place a moving object on the surface of `surface_id`, resting on it without
/// interpenetrating, and oriented so its local +Y follows the surface normal.
///
/// - `moving`: world position of the object being placed.
/// - `surface_position`: world position of the target surface's origin; every cast aims at it.
///
/// Algorithm
/// 1. Cast every intersection from `moving` toward `surface_position` and keep the first hit
///    on `surface_id`. None: `NoIntersection`, no second cast.
/// 2. Push the origin out along that hit's normal by `clearance_offset`. A cast starting
///    inside or behind the surface geometry may miss or self-intersect; the pushed origin
///    sits in front of the surface regardless of how deep the object already is.
/// 3. Cast again from the pushed origin. None: `NoIntersection`. This hit is authoritative.
/// 4. Rest the object `normal_offset` above the hit along its normal, aligned to the normal.
///
/// Both offsets are applied along the raw hit normals, as reported by the raycaster (unit
/// length for [`RapierQueryWorld`](crate::rapier_world::RapierQueryWorld)), and are taken
/// as given, including negative values.
///
/// At most two casts are issued. `NoIntersection` is the expected "not over the surface"
/// case; the caller leaves the object untouched.
pub fn snap<R: Raycaster + ?Sized>(
    moving: Vec3,
    surface_position: Vec3,
    surface_id: SurfaceId,
    raycaster: &R,
    settings: &SnapSettings,
) -> PlacementOutcome {
    let Some(first) = first_hit_on(
        raycaster,
        moving,
        surface_position,
        surface_id,
        settings.filter,
    ) else {
        return PlacementOutcome::NoIntersection;
    };

    let corrected_origin = moving + first.normal * settings.clearance_offset;

    let Some(hit) = first_hit_on(
        raycaster,
        corrected_origin,
        surface_position,
        surface_id,
        settings.filter,
    ) else {
        return PlacementOutcome::NoIntersection;
    };

    let rotation = match align_to_normal(hit.normal) {
        Ok(rotation) => rotation,
        Err(err) => {
            log::warn!("surface {surface_id:?} reported an unusable normal: {err}");
            return PlacementOutcome::NoIntersection;
        }
    };
    let translation = hit.position + hit.normal * settings.normal_offset;

    PlacementOutcome::Placed(Transform::new(translation, rotation))
}
