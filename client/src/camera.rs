use bevy::prelude::*;
use placement::DevicePose;

use crate::convert::{quat_to_na, vec3_to_na};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
}

/// Eye height of a standing user (meters).
const EYE_POSITION: Vec3 = Vec3::new(0.0, 1.6, 1.0);
const LOOK_AT: Vec3 = Vec3::new(0.0, 1.2, -3.0);

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Transform::from_translation(EYE_POSITION).looking_at(LOOK_AT, Vec3::Y),
    ));
}

/// The camera stands in for the head-mounted device: its pose is the device pose.
pub fn device_pose(camera: &GlobalTransform, time: &Time) -> DevicePose {
    let (_, rotation, translation) = camera.to_scale_rotation_translation();
    DevicePose::new(vec3_to_na(translation), quat_to_na(rotation), time.elapsed())
}
