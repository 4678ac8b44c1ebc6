//! Shared entity vocabulary
//!
//! Entities are plain structs; the behaviors the session composes over are
//! capability traits rather than a base class. `Tickable` covers per-frame
//! motion and lifecycle, `Collidable` covers participation in the collision
//! sweep. UI-facing state goes through `Visual` snapshots so the renderer
//! never reaches into simulation fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{POSITION_EPSILON, SIZE_EPSILON_PX};
use crate::coords::GameArea;
use crate::sim::collision::{Bounds, CollisionLayer};

/// Per-frame update capability
pub trait Tickable {
    /// Advance by `dt` seconds; returns whether the entity is still active
    fn tick(&mut self, dt: f32, area: &GameArea) -> bool;
}

/// Collision sweep participation
pub trait Collidable {
    fn id(&self) -> u32;
    fn layer(&self) -> CollisionLayer;
    fn is_collidable(&self) -> bool;
    fn bounds(&self, area: &GameArea) -> Bounds;
}

/// Renderer-facing snapshot of one entity
///
/// Position is proportional ([0,1] on-screen, with off-screen overshoot
/// allowed); size is in pixels so the host can assign it to a widget
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub pos: Vec2,
    pub size_px: f32,
    pub visible: bool,
}

/// Change filter the host keeps per widget to skip redundant re-layout
///
/// Sub-epsilon position and size deltas are dropped; layout passes are
/// expensive on mobile hosts and a stream of identical updates is the common
/// case for idle entities. The first sync after construction always emits.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VisualCache {
    last: Option<Visual>,
}

impl VisualCache {
    /// Pass `next` through unless it is indistinguishable from the last
    /// emitted snapshot
    pub fn sync(&mut self, next: Visual) -> Option<Visual> {
        if let Some(last) = self.last {
            let unchanged = (last.pos.x - next.pos.x).abs() <= POSITION_EPSILON
                && (last.pos.y - next.pos.y).abs() <= POSITION_EPSILON
                && (last.size_px - next.size_px).abs() <= SIZE_EPSILON_PX
                && last.visible == next.visible;
            if unchanged {
                return None;
            }
        }
        self.last = Some(next);
        Some(next)
    }
}

/// Monotonic entity id allocator, one per session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visual(x: f32, y: f32, size_px: f32, visible: bool) -> Visual {
        Visual {
            pos: Vec2::new(x, y),
            size_px,
            visible,
        }
    }

    #[test]
    fn test_first_sync_always_emits() {
        let mut cache = VisualCache::default();
        assert!(cache.sync(visual(0.5, 0.5, 80.0, true)).is_some());
    }

    #[test]
    fn test_sub_epsilon_changes_are_skipped() {
        let mut cache = VisualCache::default();
        cache.sync(visual(0.5, 0.5, 80.0, true));

        assert!(cache.sync(visual(0.50005, 0.5, 80.0, true)).is_none());
        assert!(cache.sync(visual(0.5, 0.5, 80.05, true)).is_none());

        assert!(cache.sync(visual(0.51, 0.5, 80.0, true)).is_some());
        assert!(cache.sync(visual(0.51, 0.5, 81.0, true)).is_some());
        assert!(cache.sync(visual(0.51, 0.5, 81.0, false)).is_some());
    }

    #[test]
    fn test_skipped_change_does_not_move_baseline() {
        let mut cache = VisualCache::default();
        cache.sync(visual(0.5, 0.5, 80.0, true));

        // Many skipped micro-steps still emit once they add up past epsilon
        assert!(cache.sync(visual(0.50006, 0.5, 80.0, true)).is_none());
        assert!(cache.sync(visual(0.50012, 0.5, 80.0, true)).is_some());
    }

    #[test]
    fn test_entity_ids_are_monotonic() {
        let mut ids = EntityIds::default();
        let first = ids.next_id();
        let second = ids.next_id();
        assert_eq!(first, 1);
        assert!(second > first);
    }
}
