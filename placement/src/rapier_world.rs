//! Rapier-based query world for immutable placement surfaces.
//!
//! Builds an in-memory Rapier scene from a set of static surface definitions and answers
//! segment raycasts against it through the [`Raycaster`] contract.
//!
//! Design goals
//! - Deterministic: given the same inputs, build identical in-memory sets (sorted by `id`).
//! - Query-focused: no dynamics are ever stepped; only the broad phase is populated.
//! - Immutable world: surfaces do not move after construction. Rebuild to edit the scene.

use std::collections::BTreeMap;

use rapier3d::prelude::{
    BroadPhaseBvh, Collider, ColliderBuilder, ColliderHandle, ColliderSet, HalfSpace,
    IntegrationParameters, NarrowPhase, QueryFilter, QueryPipeline, Ray, RigidBodySet,
    SharedShape, Vector,
};

use crate::{
    layers::{CollisionLayer, LayerMask},
    raycast::Raycaster,
    types::{QueryMode, RaycastHit, RaycastQuery, SurfaceId, Transform, Vec3},
};

/// Queries shorter than this are treated as empty segments (meters).
const MIN_SEGMENT_LENGTH: f32 = 1.0e-6;

/// Canonical, scene-agnostic definition of an immutable placement surface.
///
/// Conventions
/// - Units are meters.
/// - For planes, the normal is pose-derived: `normal = rotation * +Y`, and the plane passes
///   through `translation + normal * offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier, reported back in every [`RaycastHit`] on this surface.
    pub id: SurfaceId,
    /// World-space pose.
    pub transform: Transform,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
    /// Layers this surface belongs to.
    pub layers: LayerMask,
}

impl WorldStaticDef {
    /// A surface on the [`CollisionLayer::Surface`] layer.
    pub fn surface(id: impl Into<SurfaceId>, transform: Transform, shape: ColliderShapeDef) -> Self {
        Self {
            id: id.into(),
            transform,
            shape,
            layers: LayerMask::only(CollisionLayer::Surface),
        }
    }

    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space), offset along its pose-derived normal.
    Plane { offset_along_normal: f32 },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Rounded cuboid; `border_radius` rounds all edges and corners.
    RoundCuboid {
        half_extents: Vec3,
        border_radius: f32,
    },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },
}

/// In-memory Rapier structures needed for raycasts against static surfaces.
pub struct RapierQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    surfaces: BTreeMap<SurfaceId, Transform>,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static surface definitions.
    ///
    /// The input is sorted by `id` before insertion. Definitions sharing an `id` are all
    /// inserted, but [`surface_transform`](Self::surface_transform) reports the last one.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut modified_colliders = Vec::with_capacity(defs.len());
        let mut surfaces = BTreeMap::new();

        for def in defs {
            let collider = collider_from_def(&def);
            modified_colliders.push(colliders.insert(collider));
            surfaces.insert(def.id, def.transform);
        }

        // Populate the broad-phase BVH only; nothing is ever stepped.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut events = Vec::new();
        broad_phase.update(
            &IntegrationParameters::default(),
            &colliders,
            &bodies,
            &modified_colliders,
            &[],
            &mut events,
        );

        log::info!("built placement query world with {} surfaces", surfaces.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase: NarrowPhase::default(),
            surfaces,
        }
    }

    /// World pose of a surface, if it exists.
    pub fn surface_transform(&self, id: SurfaceId) -> Option<Transform> {
        self.surfaces.get(&id).copied()
    }

    /// World position of a surface's origin, the usual aim point for [`snap`](crate::snap::snap).
    pub fn surface_position(&self, id: SurfaceId) -> Option<Vec3> {
        self.surface_transform(id).map(|t| t.translation)
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }
}

impl Raycaster for RapierQueryWorld {
    fn cast(&self, query: &RaycastQuery) -> Vec<RaycastHit> {
        let segment = query.segment();
        let max_toi = segment.norm();
        if !max_toi.is_finite() || max_toi < MIN_SEGMENT_LENGTH {
            return Vec::new();
        }

        let ray = Ray::new(query.origin.into(), segment / max_toi);

        let mask = query.filter;
        let in_layers =
            move |_handle: ColliderHandle, collider: &Collider| match mask {
                Some(mask) => unpack_layers(collider.user_data).intersects(&mask),
                None => true,
            };
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&in_layers));

        // Non-solid: a ray starting inside a shape reports the boundary it leaves through
        // rather than a zero-distance hit with no normal.
        let solid = false;

        let hit_at = |collider: ColliderHandle, toi: f32, normal: Vector<f32>| {
            let surface = self
                .colliders
                .get(collider)
                .map(|c| unpack_surface_id(c.user_data))?;
            Some(RaycastHit {
                position: ray.point_at(toi).coords,
                normal,
                surface,
                distance: toi,
            })
        };

        match query.mode {
            QueryMode::Nearest => pipeline
                .cast_ray_and_get_normal(&ray, max_toi, solid)
                .and_then(|(handle, hit)| hit_at(handle, hit.time_of_impact, hit.normal))
                .into_iter()
                .collect(),
            QueryMode::All => {
                let mut hits: Vec<RaycastHit> = pipeline
                    .intersect_ray(ray, max_toi, solid)
                    .filter_map(|(handle, _, hit)| hit_at(handle, hit.time_of_impact, hit.normal))
                    .collect();
                hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
                hits
            }
        }
    }
}

/// Collider user data layout: bits 0..=31 surface id, bits 32..=63 layer mask.
#[inline]
fn pack_user_data(id: SurfaceId, layers: LayerMask) -> u128 {
    (id.0 as u128) | ((layers.bits as u128) << 32)
}

#[inline]
fn unpack_surface_id(user_data: u128) -> SurfaceId {
    SurfaceId(user_data as u32)
}

#[inline]
fn unpack_layers(user_data: u128) -> LayerMask {
    LayerMask::new((user_data >> 32) as u32)
}

/// Build a Rapier collider from a `WorldStaticDef`, posed in world space.
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let mut pose = def.transform.iso();

    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // Local half-space faces +Y; shifting along local Y keeps the world normal
            // `rotation * +Y` and moves the plane by the offset along it.
            pose = pose * rapier3d::na::Translation3::new(0.0, *offset_along_normal, 0.0);
            ColliderBuilder::new(SharedShape::new(HalfSpace::new(Vector::y_axis())))
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z,
            *border_radius,
        ),

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
    };

    let mut collider = builder
        .user_data(pack_user_data(def.id, def.layers))
        .build();
    collider.set_position(pose);
    collider
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        orientation::align_to_normal, settings::SnapSettings, snap::snap,
        types::PlacementOutcome, types::Quat,
    };

    const TOL: f32 = 1.0e-4;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).norm() <= TOL, "expected {b:?}, got {a:?}");
    }

    fn unit_box(id: u32, translation: Vec3) -> WorldStaticDef {
        WorldStaticDef::surface(
            id,
            Transform::from_translation(translation),
            ColliderShapeDef::Cuboid {
                half_extents: Vec3::new(0.5, 0.5, 0.5),
            },
        )
    }

    #[test]
    fn user_data_round_trips_id_and_layers() {
        let layers = LayerMask::from_flags(&[CollisionLayer::Surface, CollisionLayer::Debug]);
        let packed = pack_user_data(SurfaceId(u32::MAX), layers);
        assert_eq!(unpack_surface_id(packed), SurfaceId(u32::MAX));
        assert_eq!(unpack_layers(packed), layers);
    }

    #[test]
    fn nearest_reports_the_closest_surface() {
        let world = RapierQueryWorld::build(vec![
            unit_box(2, Vec3::new(0.0, -3.0, 0.0)),
            unit_box(1, Vec3::zeros()),
        ]);
        assert_eq!(world.len(), 2);

        let hits = world.cast(&RaycastQuery::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, -5.0, 0.0),
            QueryMode::Nearest,
        ));

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].surface, SurfaceId(1));
        assert_vec_close(hits[0].position, Vec3::new(0.0, 0.5, 0.0));
        assert_vec_close(hits[0].normal, Vec3::y());
        assert!((hits[0].distance - 1.5).abs() <= TOL);
    }

    #[test]
    fn all_reports_every_surface_in_distance_order() {
        let world = RapierQueryWorld::build(vec![
            unit_box(2, Vec3::new(0.0, -3.0, 0.0)),
            unit_box(1, Vec3::zeros()),
        ]);

        let hits = world.cast(&RaycastQuery::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, -5.0, 0.0),
            QueryMode::All,
        ));

        let ids: Vec<SurfaceId> = hits.iter().map(|h| h.surface).collect();
        assert_eq!(ids, vec![SurfaceId(1), SurfaceId(2)]);
        assert!(hits[0].distance <= hits[1].distance);
    }

    #[test]
    fn segment_ends_at_destination() {
        let world = RapierQueryWorld::build(vec![unit_box(1, Vec3::new(0.0, -3.0, 0.0))]);

        let hits = world.cast(&RaycastQuery::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::zeros(),
            QueryMode::All,
        ));
        assert!(hits.is_empty());

        let degenerate = world.cast(&RaycastQuery::new(Vec3::zeros(), Vec3::zeros(), QueryMode::All));
        assert!(degenerate.is_empty());
    }

    #[test]
    fn layer_filter_excludes_other_layers() {
        let world = RapierQueryWorld::build(vec![
            unit_box(1, Vec3::zeros()).with_layers(LayerMask::only(CollisionLayer::Debug)),
            unit_box(2, Vec3::new(0.0, -3.0, 0.0)),
        ]);

        let query = RaycastQuery::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, -5.0, 0.0),
            QueryMode::Nearest,
        )
        .with_filter(Some(LayerMask::only(CollisionLayer::Surface)));

        let hits = world.cast(&query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].surface, SurfaceId(2));
    }

    #[test]
    fn plane_normal_follows_pose() {
        // Plane tilted 90° about X: normal = rotation * +Y = +Z.
        let rotation = Quat::from_axis_angle(&Vec3::x_axis(), std::f32::consts::FRAC_PI_2);
        let world = RapierQueryWorld::build(vec![WorldStaticDef::surface(
            9,
            Transform::new(Vec3::zeros(), rotation),
            ColliderShapeDef::Plane {
                offset_along_normal: 1.0,
            },
        )]);

        let hits = world.cast(&RaycastQuery::new(
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(0.0, 0.0, -4.0),
            QueryMode::Nearest,
        ));

        assert_eq!(hits.len(), 1);
        assert_vec_close(hits[0].position, Vec3::new(0.0, 0.0, 1.0));
        assert_vec_close(hits[0].normal, Vec3::z());
    }

    #[test]
    fn snap_onto_flat_top_rests_at_normal_offset() {
        // Cuboid whose top face is the y = 0 plane.
        let world = RapierQueryWorld::build(vec![unit_box(1, Vec3::new(0.0, -0.5, 0.0))]);
        let surface_position = world.surface_position(SurfaceId(1)).unwrap();

        let outcome = snap(
            Vec3::new(0.0, 2.0, 0.0),
            surface_position,
            SurfaceId(1),
            &world,
            &SnapSettings::default(),
        );

        let placed = outcome.transform().expect("placed");
        assert_vec_close(placed.translation, Vec3::new(0.0, 0.05, 0.0));
        assert!(placed.rotation.angle() <= TOL);
    }

    #[test]
    fn snap_onto_side_face_aligns_up_with_face_normal() {
        let world = RapierQueryWorld::build(vec![unit_box(1, Vec3::new(0.0, 1.0, -3.0))]);

        let outcome = snap(
            Vec3::new(0.2, 1.1, -1.0),
            Vec3::new(0.0, 1.0, -3.0),
            SurfaceId(1),
            &world,
            &SnapSettings::default(),
        );

        let placed = outcome.transform().expect("placed");
        assert!((placed.translation.z - (-2.5 + 0.05)).abs() <= TOL);
        assert_vec_close(placed.rotation * Vec3::y(), Vec3::z());
        assert!(placed.rotation.angle_to(&align_to_normal(Vec3::z()).unwrap()) <= TOL);
    }

    #[test]
    fn snap_from_just_above_the_surface() {
        // Closer to the face than the clearance offset.
        let world = RapierQueryWorld::build(vec![unit_box(1, Vec3::zeros())]);

        let outcome = snap(
            Vec3::new(0.0, 0.6, 0.0),
            Vec3::zeros(),
            SurfaceId(1),
            &world,
            &SnapSettings::default(),
        );

        let placed = outcome.transform().expect("placed");
        assert_vec_close(placed.translation, Vec3::new(0.0, 0.55, 0.0));
    }

    #[test]
    fn empty_world_never_places() {
        let world = RapierQueryWorld::build(Vec::new());
        assert!(world.is_empty());

        let outcome = snap(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::zeros(),
            SurfaceId(1),
            &world,
            &SnapSettings::default(),
        );
        assert_eq!(outcome, PlacementOutcome::NoIntersection);
    }

    #[test]
    fn repeated_snap_does_not_drift() {
        let world = RapierQueryWorld::build(vec![unit_box(1, Vec3::new(0.0, -0.5, 0.0))]);
        let surface = world.surface_position(SurfaceId(1)).unwrap();
        let settings = SnapSettings::default();

        let first = snap(Vec3::new(0.1, 1.5, 0.2), surface, SurfaceId(1), &world, &settings)
            .transform()
            .expect("first placed");
        let second = snap(first.translation, surface, SurfaceId(1), &world, &settings)
            .transform()
            .expect("second placed");

        let drift = (second.translation - first.translation).norm();
        assert!(drift <= settings.clearance_offset + settings.normal_offset);
        assert!((second.translation.y - 0.05).abs() <= TOL);
    }

    #[test]
    fn surface_lookup() {
        let world = RapierQueryWorld::build(vec![unit_box(4, Vec3::new(1.0, 2.0, 3.0))]);
        assert_eq!(world.surface_position(SurfaceId(4)), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(world.surface_position(SurfaceId(5)), None);
        assert!(!world.is_empty());
    }
}
