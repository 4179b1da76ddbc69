//! World anchors reported by the tracking session.
//!
//! The session owns a long-lived stream of [`AnchorUpdate`]s; whoever drains it feeds the
//! updates into an [`AnchorRegistry`], which holds the latest state per anchor. The registry
//! is an explicit value passed to whoever needs it, never a global.

use std::collections::HashMap;

use uuid::Uuid;

use crate::types::Transform;

/// Identifier assigned to an anchor by the tracking session.
pub type AnchorId = Uuid;

/// A fixed point in the tracked world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldAnchor {
    pub id: AnchorId,
    /// Anchor pose in the session's world frame.
    pub transform: Transform,
    /// Whether the session currently has a good fix on this anchor.
    pub is_tracked: bool,
}

impl WorldAnchor {
    pub fn new(transform: Transform) -> Self {
        Self {
            id: Uuid::new_v4(),
            transform,
            is_tracked: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorEvent {
    Added,
    Updated,
    Removed,
}

/// One entry of the session's anchor stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorUpdate {
    pub event: AnchorEvent,
    pub anchor: WorldAnchor,
}

impl AnchorUpdate {
    pub fn added(anchor: WorldAnchor) -> Self {
        Self {
            event: AnchorEvent::Added,
            anchor,
        }
    }

    pub fn updated(anchor: WorldAnchor) -> Self {
        Self {
            event: AnchorEvent::Updated,
            anchor,
        }
    }

    pub fn removed(anchor: WorldAnchor) -> Self {
        Self {
            event: AnchorEvent::Removed,
            anchor,
        }
    }
}

/// Latest known state of every live anchor.
#[derive(Clone, Debug, Default)]
pub struct AnchorRegistry {
    anchors: HashMap<AnchorId, WorldAnchor>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one update. An update for an unknown anchor inserts it; removing an unknown
    /// anchor is a no-op.
    pub fn apply(&mut self, update: AnchorUpdate) {
        match update.event {
            AnchorEvent::Added | AnchorEvent::Updated => {
                self.anchors.insert(update.anchor.id, update.anchor);
            }
            AnchorEvent::Removed => {
                if self.anchors.remove(&update.anchor.id).is_none() {
                    log::debug!("removal of unknown anchor {}", update.anchor.id);
                }
            }
        }
    }

    /// Drain updates until the source ends. The source is consumed and cannot be replayed.
    pub fn apply_all(&mut self, updates: impl IntoIterator<Item = AnchorUpdate>) {
        for update in updates {
            self.apply(update);
        }
    }

    pub fn get(&self, id: &AnchorId) -> Option<&WorldAnchor> {
        self.anchors.get(id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldAnchor> {
        self.anchors.values()
    }

    /// Drop every anchor, e.g. when the session stops.
    pub fn clear(&mut self) {
        self.anchors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;

    fn anchor_at(x: f32) -> WorldAnchor {
        WorldAnchor::new(Transform::from_translation(Vec3::new(x, 0.0, 0.0)))
    }

    #[test]
    fn added_then_updated_keeps_latest_state() {
        let mut registry = AnchorRegistry::new();
        let mut anchor = anchor_at(1.0);

        registry.apply(AnchorUpdate::added(anchor));
        anchor.transform.translation.x = 2.0;
        anchor.is_tracked = false;
        registry.apply(AnchorUpdate::updated(anchor));

        assert_eq!(registry.len(), 1);
        let stored = registry.get(&anchor.id).unwrap();
        assert_eq!(stored.transform.translation.x, 2.0);
        assert!(!stored.is_tracked);
    }

    #[test]
    fn removed_drops_the_anchor() {
        let mut registry = AnchorRegistry::new();
        let a = anchor_at(1.0);
        let b = anchor_at(2.0);

        registry.apply_all([
            AnchorUpdate::added(a),
            AnchorUpdate::added(b),
            AnchorUpdate::removed(a),
        ]);

        assert_eq!(registry.len(), 1);
        assert!(registry.get(&a.id).is_none());
        assert!(registry.get(&b.id).is_some());
    }

    #[test]
    fn removing_unknown_anchor_is_a_no_op() {
        let mut registry = AnchorRegistry::new();
        registry.apply(AnchorUpdate::removed(anchor_at(0.0)));
        assert!(registry.is_empty());
    }

    #[test]
    fn apply_all_drains_a_lazy_stream() {
        let mut registry = AnchorRegistry::new();
        let stream = (0..5).map(|i| AnchorUpdate::added(anchor_at(i as f32)));
        registry.apply_all(stream);
        assert_eq!(registry.iter().count(), 5);

        registry.clear();
        assert!(registry.is_empty());
    }
}
