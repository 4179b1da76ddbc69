//! Bookkeeping of recent raycasts, for the debug overlay.

use std::cell::RefCell;

use bevy::prelude::*;
use placement::{RaycastHit, RaycastQuery, Raycaster};

use crate::convert::vec3_from_na;

/// How many casts are kept for drawing.
const MAX_RECORDED_RAYS: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct DebugRay {
    pub origin: Vec3,
    pub destination: Vec3,
    pub hit: Option<Vec3>,
}

/// Most recent casts, oldest first.
#[derive(Resource, Debug, Default)]
pub struct RaycastLog {
    pub rays: Vec<DebugRay>,
}

impl RaycastLog {
    pub fn extend(&mut self, rays: impl IntoIterator<Item = DebugRay>) {
        self.rays.extend(rays);
        let overflow = self.rays.len().saturating_sub(MAX_RECORDED_RAYS);
        self.rays.drain(..overflow);
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<RaycastLog>();
}

/// Forwards casts to `inner` and remembers each query with its first hit.
pub struct RecordingRaycaster<'a, R: Raycaster + ?Sized> {
    inner: &'a R,
    rays: RefCell<Vec<DebugRay>>,
}

impl<'a, R: Raycaster + ?Sized> RecordingRaycaster<'a, R> {
    pub fn new(inner: &'a R) -> Self {
        Self {
            inner,
            rays: RefCell::new(Vec::new()),
        }
    }

    pub fn into_rays(self) -> Vec<DebugRay> {
        self.rays.into_inner()
    }
}

impl<R: Raycaster + ?Sized> Raycaster for RecordingRaycaster<'_, R> {
    fn cast(&self, query: &RaycastQuery) -> Vec<RaycastHit> {
        let hits = self.inner.cast(query);
        self.rays.borrow_mut().push(DebugRay {
            origin: vec3_from_na(query.origin),
            destination: vec3_from_na(query.destination),
            hit: hits.first().map(|h| vec3_from_na(h.position)),
        });
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray(x: f32) -> DebugRay {
        DebugRay {
            origin: Vec3::new(x, 0.0, 0.0),
            destination: Vec3::ZERO,
            hit: None,
        }
    }

    #[test]
    fn log_keeps_only_the_newest_rays() {
        let mut log = RaycastLog::default();
        log.extend((0..12).map(|i| ray(i as f32)));

        assert_eq!(log.rays.len(), MAX_RECORDED_RAYS);
        assert_eq!(log.rays[0].origin.x, 4.0);
        assert_eq!(log.rays[MAX_RECORDED_RAYS - 1].origin.x, 11.0);
    }
}
