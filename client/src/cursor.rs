use bevy::{
    prelude::*,
    window::{CursorIcon, PrimaryWindow, SystemCursorIcon},
};

use crate::drag::DragGesture;

pub(super) fn plugin(app: &mut App) {
    // Apply when the drag starts or stops
    app.add_systems(
        Update,
        apply_cursor.run_if(resource_changed::<DragGesture>),
    );
}

fn desired_icon(gesture: &DragGesture) -> SystemCursorIcon {
    if gesture.is_active() {
        SystemCursorIcon::Grabbing
    } else {
        SystemCursorIcon::Default
    }
}

fn apply_cursor(
    mut commands: Commands,
    window: Single<Entity, With<PrimaryWindow>>,
    gesture: Res<DragGesture>,
    q_icon: Query<Option<&CursorIcon>, With<PrimaryWindow>>,
) {
    let desired = CursorIcon::System(desired_icon(&gesture));

    // Only insert if missing or different
    let needs_update = match q_icon.get(*window) {
        Ok(Some(existing)) => existing != &desired,
        Ok(None) => true,
        Err(_) => true,
    };

    if needs_update {
        commands.entity(*window).insert(desired);
    }
}
