pub mod anchors;
pub mod device;
pub mod drag;
pub mod error;
pub mod layers;
pub mod orientation;
pub mod rapier_world;
pub mod raycast;
pub mod settings;
pub mod snap;
pub mod types;

pub use anchors::{AnchorEvent, AnchorId, AnchorRegistry, AnchorUpdate, WorldAnchor};
pub use device::{DevicePose, raycast_nearest, raycast_onto, reorient};
pub use drag::{DragState, drag_and_snap, drag_update};
pub use error::PlacementError;
pub use layers::{CollisionLayer, LayerMask};
pub use orientation::align_to_normal;
pub use rapier_world::{ColliderShapeDef, RapierQueryWorld, WorldStaticDef};
pub use raycast::{Raycaster, first_hit_on};
pub use settings::{DEFAULT_CLEARANCE_OFFSET, DEFAULT_NORMAL_OFFSET, SnapSettings};
pub use snap::snap;
pub use types::{
    PlacementOutcome, Quat, QueryMode, RaycastHit, RaycastQuery, SurfaceId, Transform, Vec3,
};
