use crate::{
    raycast::Raycaster,
    settings::SnapSettings,
    snap::snap,
    types::{SurfaceId, Transform, Vec3},
};

/// Position of a dragged object given where it was when the drag began and the total
/// displacement of the drag so far.
#[inline]
pub fn drag_update(start_position: Vec3, delta: Vec3) -> Vec3 {
    start_position + delta
}

/// Tracks one drag gesture.
///
/// Drag events report the displacement since the gesture began, not since the last event.
/// The object's position is latched on the first event and every update is applied to that
/// latched position, so snapping between events never accumulates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    start: Option<Vec3>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch `position` as the drag origin. Ignored if a drag is already in progress.
    pub fn begin(&mut self, position: Vec3) {
        self.start.get_or_insert(position);
    }

    /// Forget the drag origin; the next update starts a new gesture.
    pub fn end(&mut self) {
        self.start = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    pub fn start(&self) -> Option<Vec3> {
        self.start
    }

    /// New transform for an object currently at `current` after a drag of `delta`.
    /// The rotation is kept.
    pub fn update(&mut self, current: &Transform, delta: Vec3) -> Transform {
        self.begin(current.translation);
        let start = self.start.unwrap_or(current.translation);
        Transform::new(drag_update(start, delta), current.rotation)
    }
}

/// Drag the object, then snap it onto `surface_id` if the dragged position reaches it.
///
/// When the snap finds no intersection the plain dragged transform is returned, so the
/// object keeps following the gesture until it reaches the surface.
pub fn drag_and_snap<R: Raycaster + ?Sized>(
    drag: &mut DragState,
    current: &Transform,
    delta: Vec3,
    surface_position: Vec3,
    surface_id: SurfaceId,
    raycaster: &R,
    settings: &SnapSettings,
) -> Transform {
    let dragged = drag.update(current, delta);
    snap(
        dragged.translation,
        surface_position,
        surface_id,
        raycaster,
        settings,
    )
    .transform()
    .unwrap_or(dragged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raycast::testing::{ScriptedRaycaster, hit};
    use crate::types::Quat;

    #[test]
    fn update_is_relative_to_the_latched_start() {
        let mut drag = DragState::new();
        let mut object = Transform::from_translation(Vec3::new(0.0, 2.5, -1.0));

        object = drag.update(&object, Vec3::new(0.1, 0.0, 0.0));
        assert_eq!(object.translation, Vec3::new(0.1, 2.5, -1.0));

        // Second event carries the total displacement, not an increment.
        object = drag.update(&object, Vec3::new(0.3, -0.2, 0.0));
        assert_eq!(object.translation, Vec3::new(0.3, 2.3, -1.0));
        assert_eq!(drag.start(), Some(Vec3::new(0.0, 2.5, -1.0)));
    }

    #[test]
    fn end_resets_the_gesture() {
        let mut drag = DragState::new();
        let object = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let moved = drag.update(&object, Vec3::new(1.0, 0.0, 0.0));
        assert!(drag.is_dragging());

        drag.end();
        assert!(!drag.is_dragging());

        let moved_again = drag.update(&moved, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(moved_again.translation, Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn update_keeps_rotation() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), 0.5);
        let object = Transform::new(Vec3::zeros(), rotation);
        let moved = DragState::new().update(&object, Vec3::x());
        assert_eq!(moved.rotation, rotation);
    }

    #[test]
    fn drag_and_snap_falls_back_to_the_dragged_transform() {
        let raycaster = ScriptedRaycaster::default();
        let mut drag = DragState::new();
        let object = Transform::from_translation(Vec3::new(0.0, 2.5, -1.0));

        let result = drag_and_snap(
            &mut drag,
            &object,
            Vec3::new(0.0, 0.0, -0.5),
            Vec3::new(0.0, 1.0, -3.0),
            SurfaceId(1),
            &raycaster,
            &SnapSettings::default(),
        );

        assert_eq!(result.translation, Vec3::new(0.0, 2.5, -1.5));
    }

    #[test]
    fn drag_and_snap_casts_from_the_dragged_position() {
        let raycaster = ScriptedRaycaster::new(vec![
            vec![hit(Vec3::new(0.0, 1.5, -3.0), Vec3::y(), 1, 1.0)],
            vec![hit(Vec3::new(0.0, 1.5, -3.0), Vec3::y(), 1, 1.15)],
        ]);
        let mut drag = DragState::new();
        let object = Transform::from_translation(Vec3::new(0.0, 2.5, -1.0));

        let result = drag_and_snap(
            &mut drag,
            &object,
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(0.0, 1.0, -3.0),
            SurfaceId(1),
            &raycaster,
            &SnapSettings::default(),
        );

        assert_eq!(raycaster.query(0).origin, Vec3::new(0.0, 2.5, -3.0));
        assert!((result.translation - Vec3::new(0.0, 1.55, -3.0)).norm() <= 1.0e-5);
    }
}
