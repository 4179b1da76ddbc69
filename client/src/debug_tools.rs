//! Debug drawing for native dev builds.
//!
//! Compiled only behind `dev_native` (`#[cfg(feature = "dev_native")] mod debug_tools;` in
//! `main.rs`). Draws the most recent raycasts: green up to the hit, red when nothing was hit.

use bevy::prelude::*;

use crate::rays::RaycastLog;

const HIT_COLOR: Color = Color::srgb(0.1, 0.9, 0.2);
const MISS_COLOR: Color = Color::srgb(0.9, 0.1, 0.1);

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, draw_raycasts);
}

fn draw_raycasts(mut gizmos: Gizmos, rays: Res<RaycastLog>) {
    for ray in &rays.rays {
        match ray.hit {
            Some(hit) => {
                gizmos.line(ray.origin, hit, HIT_COLOR);
                gizmos.line(hit, ray.destination, HIT_COLOR.with_alpha(0.25));
            }
            None => gizmos.line(ray.origin, ray.destination, MISS_COLOR),
        }
    }
}
