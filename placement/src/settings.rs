/*!
Placement settings and tolerances.

These constants centralize the parameters used by the surface snapper and the
orientation solver. The defaults are tuned for objects roughly 0.1 to 1.0 meters across;
callers placing larger or smaller objects should override the offsets through
[`SnapSettings`] rather than editing the constants.

Notes
- Distances are in meters.
- Offsets are applied as given. A negative rest gap sinks the object into the surface.
*/

use crate::{layers::LayerMask, types::Vec3};

/// Distance the first-pass ray origin is pushed out along the first hit's normal before
/// the authoritative second cast (meters).
/// Large enough to clear an object that already overlaps the surface.
pub const DEFAULT_CLEARANCE_OFFSET: f32 = 0.15;

/// Gap kept between the placed object's origin and the surface, along the surface normal
/// (meters). Half the thickness of the demo's 0.1 m box.
pub const DEFAULT_NORMAL_OFFSET: f32 = 0.05;

/// Normals shorter than this cannot be aligned to.
pub const DEGENERATE_NORMAL_EPS: f32 = 1.0e-6;

/// Canonical "up" axis of a placed object in its local frame.
#[inline]
pub fn reference_up() -> Vec3 {
    Vec3::y()
}

/// Tunables for a single [`snap`](crate::snap::snap) call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapSettings {
    /// Distance pushed outward before the authoritative cast.
    pub clearance_offset: f32,
    /// Rest gap between the object origin and the surface.
    pub normal_offset: f32,
    /// Restrict both casts to surfaces on these layers.
    pub filter: Option<LayerMask>,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            clearance_offset: DEFAULT_CLEARANCE_OFFSET,
            normal_offset: DEFAULT_NORMAL_OFFSET,
            filter: None,
        }
    }
}

impl SnapSettings {
    #[inline]
    pub fn with_offsets(clearance_offset: f32, normal_offset: f32) -> Self {
        Self {
            clearance_offset,
            normal_offset,
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_filter(mut self, filter: LayerMask) -> Self {
        self.filter = Some(filter);
        self
    }
}
