use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use placement::{
    ColliderShapeDef, RapierQueryWorld, SnapSettings, SurfaceId, WorldStaticDef,
};

use crate::convert::{transform_to_na, vec3_to_na};

/// Id of the cube objects snap onto.
pub const SURFACE_CUBE_ID: SurfaceId = SurfaceId(1);

const SURFACE_CUBE_SIZE: f32 = 1.0;
const TARGET_SIZE: f32 = 0.1;

/// Marks an entity whose collision volume lives in [`SurfaceWorld`].
#[derive(Component, Debug, Clone, Copy)]
pub struct SnapSurface(pub SurfaceId);

/// The small box the user drags around.
#[derive(Component, Debug)]
pub struct Draggable;

/// Cylinder that is turned to face along whatever surface normal was last tapped.
#[derive(Component, Debug)]
pub struct NormalIndicator;

/// Static collision scene plus the snapping target, passed explicitly to the systems that
/// raycast.
#[derive(Resource)]
pub struct SurfaceWorld {
    pub world: RapierQueryWorld,
    pub target: SurfaceId,
    pub settings: SnapSettings,
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, setup);
}

fn surface_cube_transform() -> Transform {
    Transform::from_xyz(0.0, 1.0, -3.0).with_rotation(
        Quat::from_rotation_x(FRAC_PI_2)
            * Quat::from_rotation_y(FRAC_PI_2)
            * Quat::from_rotation_z(FRAC_PI_2),
    )
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("World setup");

    let cube_transform = surface_cube_transform();
    let half = SURFACE_CUBE_SIZE * 0.5;

    commands.insert_resource(SurfaceWorld {
        world: RapierQueryWorld::build(vec![WorldStaticDef::surface(
            SURFACE_CUBE_ID,
            transform_to_na(&cube_transform),
            ColliderShapeDef::Cuboid {
                half_extents: vec3_to_na(Vec3::splat(half)),
            },
        )]),
        target: SURFACE_CUBE_ID,
        settings: SnapSettings::default(),
    });

    // Surface cube
    commands.spawn((
        SnapSurface(SURFACE_CUBE_ID),
        Pickable::default(),
        cube_transform,
        Mesh3d(meshes.add(Cuboid::new(
            SURFACE_CUBE_SIZE,
            SURFACE_CUBE_SIZE,
            SURFACE_CUBE_SIZE,
        ))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.6),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
    ));

    // Draggable target
    commands.spawn((
        Draggable,
        Pickable::default(),
        Transform::from_xyz(0.0, 2.5, -1.0),
        Mesh3d(meshes.add(Cuboid::new(TARGET_SIZE, TARGET_SIZE, TARGET_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.0, 1.0, 1.0),
            perceptual_roughness: 0.5,
            metallic: 1.0,
            ..default()
        })),
    ));

    // Normal indicator
    commands.spawn((
        NormalIndicator,
        Pickable::IGNORE,
        Transform::from_xyz(0.0, 2.5, -3.0),
        Mesh3d(meshes.add(Cylinder::new(0.02, 0.5))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.0, 0.0),
            metallic: 1.0,
            ..default()
        })),
    ));

    // light
    commands.spawn((
        PointLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_cube_stays_axis_aligned() {
        // Three quarter turns about the principal axes permute the cube's faces.
        let rotated = surface_cube_transform().rotation * Vec3::Y;
        let max_component = rotated.abs().max_element();
        assert!((max_component - 1.0).abs() < 1.0e-5);
    }
}
