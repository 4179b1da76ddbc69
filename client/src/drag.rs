//! Drag the target box with the pointer; it snaps onto the surface cube when the drag
//! brings it over the cube.
//!
//! The pointer position is projected onto a camera-facing plane through the point where
//! the drag started. The displacement on that plane since the start is the drag delta
//! handed to `placement::drag_and_snap`, once per frame while the button is held.

use bevy::{picking::pointer::PointerInteraction, prelude::*, window::PrimaryWindow};
use leafwing_input_manager::prelude::ActionState;
use placement::{DragState, drag_and_snap};

use crate::{
    convert::{apply_na_transform, transform_to_na, vec3_to_na},
    input::InputAction,
    rays::{RaycastLog, RecordingRaycaster},
    world::{Draggable, SurfaceWorld},
};

const TARGET_HOME: Vec3 = Vec3::new(0.0, 2.5, -1.0);

/// The drag in progress, if any.
#[derive(Resource, Debug, Default)]
pub struct DragGesture {
    active: Option<ActiveDrag>,
}

impl DragGesture {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

#[derive(Debug)]
struct ActiveDrag {
    entity: Entity,
    /// Where the pointer first touched the object.
    start_location: Vec3,
    plane_normal: Dir3,
    state: DragState,
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DragGesture>();
    app.add_systems(
        Update,
        (begin_drag, update_drag, end_drag, reset_target).chain(),
    );
}

fn begin_drag(
    actions: Res<ActionState<InputAction>>,
    interactions: Query<&PointerInteraction>,
    draggables: Query<&Transform, With<Draggable>>,
    camera: Single<&GlobalTransform, With<Camera3d>>,
    mut gesture: ResMut<DragGesture>,
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
    let Ok(transform) = draggables.get(*entity) else {
        return;
    };

    let start_location = hit.position.unwrap_or(transform.translation);
    let Ok(plane_normal) = Dir3::new(camera.translation() - start_location) else {
        return;
    };

    debug!("drag started on {entity:?} at {start_location}");
    gesture.active = Some(ActiveDrag {
        entity: *entity,
        start_location,
        plane_normal,
        state: DragState::new(),
    });
}

fn update_drag(
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform), With<Camera3d>>,
    surfaces: Res<SurfaceWorld>,
    mut gesture: ResMut<DragGesture>,
    mut draggables: Query<&mut Transform, With<Draggable>>,
    mut rays: ResMut<RaycastLog>,
) {
    let Some(active) = gesture.active.as_mut() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let (camera, camera_transform) = *camera;
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    let plane = InfinitePlane3d {
        normal: active.plane_normal,
    };
    let Some(distance) = ray.intersect_plane(active.start_location, plane) else {
        return;
    };
    let delta = ray.get_point(distance) - active.start_location;

    let Ok(mut transform) = draggables.get_mut(active.entity) else {
        return;
    };
    let Some(surface_position) = surfaces.world.surface_position(surfaces.target) else {
        return;
    };

    let raycaster = RecordingRaycaster::new(&surfaces.world);
    let pose = drag_and_snap(
        &mut active.state,
        &transform_to_na(&transform),
        vec3_to_na(delta),
        surface_position,
        surfaces.target,
        &raycaster,
        &surfaces.settings,
    );
    apply_na_transform(&mut transform, &pose);
    rays.extend(raycaster.into_rays());
}

fn end_drag(actions: Res<ActionState<InputAction>>, mut gesture: ResMut<DragGesture>) {
    if gesture.is_active() && !actions.pressed(&InputAction::Select) {
        debug!("drag ended");
        gesture.active = None;
    }
}

fn reset_target(
    actions: Res<ActionState<InputAction>>,
    mut gesture: ResMut<DragGesture>,
    mut draggables: Query<&mut Transform, With<Draggable>>,
) {
    if !actions.just_pressed(&InputAction::Reset) {
        return;
    }
    gesture.active = None;
    for mut transform in &mut draggables {
        transform.translation = TARGET_HOME;
        transform.rotation = Quat::IDENTITY;
    }
}
