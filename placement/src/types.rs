/*!
Core placement types and math aliases shared by the placement submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- the raycaster contract (queries in, hits out)
- the surface snapper (two-pass placement)
- the orientation solver (normal → rotation)
- the device-pose helpers and the drag update

Everything here is a value type. Nothing owns anything else across calls: a caller builds
a query, receives hits, and discards them once the resulting transform has been applied.
*/

use nalgebra as na;

use crate::layers::LayerMask;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Opaque identifier of a collision surface.
///
/// Matches the `id` of the static definition the surface was built from, so callers can
/// tell which surface a ray struck without holding collider handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl From<u32> for SurfaceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    #[inline]
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }

    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
        }
    }

    /// Convert to nalgebra `Isometry3` for use with Rapier/parry queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }
}

/// How many intersections a raycast should report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// At most one hit: the closest intersection along the segment.
    #[default]
    Nearest,
    /// Every intersection along the segment, ordered by distance from the origin.
    All,
}

/// A segment raycast from `origin` to `destination`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastQuery {
    pub origin: Vec3,
    pub destination: Vec3,
    pub mode: QueryMode,
    /// Only surfaces belonging to one of these layers are considered. `None` means all.
    pub filter: Option<LayerMask>,
}

impl RaycastQuery {
    #[inline]
    pub fn new(origin: Vec3, destination: Vec3, mode: QueryMode) -> Self {
        Self {
            origin,
            destination,
            mode,
            filter: None,
        }
    }

    #[inline]
    pub fn with_filter(mut self, filter: Option<LayerMask>) -> Self {
        self.filter = filter;
        self
    }

    /// Segment vector (destination - origin).
    #[inline]
    pub fn segment(&self) -> Vec3 {
        self.destination - self.origin
    }
}

/// A single intersection reported by a [`Raycaster`](crate::raycast::Raycaster).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// World-space impact point.
    pub position: Vec3,
    /// World-space surface normal at the impact point.
    pub normal: Vec3,
    /// Surface that was struck.
    pub surface: SurfaceId,
    /// Distance from the query origin to `position` (meters).
    pub distance: f32,
}

/// Result of a snap attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacementOutcome {
    /// The object should take this transform.
    Placed(Transform),
    /// No ray met the target surface; the object must be left untouched.
    NoIntersection,
}

impl PlacementOutcome {
    #[inline]
    pub fn transform(&self) -> Option<Transform> {
        match *self {
            PlacementOutcome::Placed(transform) => Some(transform),
            PlacementOutcome::NoIntersection => None,
        }
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed(_))
    }

    /// Apply a placed transform in place. `NoIntersection` leaves `target` unchanged.
    ///
    /// Returns whether `target` was written.
    #[inline]
    pub fn apply_to(&self, target: &mut Transform) -> bool {
        match *self {
            PlacementOutcome::Placed(transform) => {
                *target = transform;
                true
            }
            PlacementOutcome::NoIntersection => false,
        }
    }
}
