use bevy::{picking::pointer::PointerInteraction, prelude::*};
use leafwing_input_manager::prelude::ActionState;
use placement::reorient;

use crate::{
    camera::device_pose,
    convert::{quat_from_na, vec3_to_na},
    input::InputAction,
    rays::{RaycastLog, RecordingRaycaster},
    world::{NormalIndicator, SnapSurface, SurfaceWorld},
};

/// How far past the tapped point the device ray is extended, so the segment does not end
/// exactly on the surface it is meant to hit (meters).
const TAP_OVERSHOOT: f32 = 0.01;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, tap_surface);
}

/// Tapping a surface turns the indicator cylinder to the surface normal under the tap,
/// as seen from the device.
fn tap_surface(
    actions: Res<ActionState<InputAction>>,
    interactions: Query<&PointerInteraction>,
    snap_surfaces: Query<&SnapSurface>,
    camera: Single<&GlobalTransform, With<Camera3d>>,
    time: Res<Time>,
    surfaces: Res<SurfaceWorld>,
    mut indicator: Single<&mut Transform, With<NormalIndicator>>,
    mut rays: ResMut<RaycastLog>,
) {
    if !actions.just_pressed(&InputAction::Select) {
        return;
    }
    let Ok(interaction) = interactions.single() else {
        return;
    };
    let Some((entity, hit)) = interaction.get_nearest_hit() else {
        return;
    };
    let Ok(SnapSurface(surface_id)) = snap_surfaces.get(*entity) else {
        return;
    };
    let Some(position) = hit.position else {
        return;
    };

    let pose = device_pose(&camera, &time);
    let eye = camera.translation();
    let destination = position + (position - eye).normalize_or_zero() * TAP_OVERSHOOT;

    let raycaster = RecordingRaycaster::new(&surfaces.world);
    match reorient(*surface_id, vec3_to_na(destination), &pose, &raycaster) {
        Ok(Some(rotation)) => indicator.rotation = quat_from_na(rotation),
        Ok(None) => debug!("tap at {position} did not reach {surface_id:?} from the device"),
        Err(err) => warn!("cannot orient to tapped surface: {err}"),
    }
    rays.extend(raycaster.into_rays());
}
