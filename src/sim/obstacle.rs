//! Falling obstacle entity
//!
//! Obstacles flow straight down: spawned a render distance below the
//! screen center, moved toward decreasing Y every tick, deactivated once
//! they pass a render distance above the center. Speed is in virtual units
//! per second and converts through the same aspect-corrected path as the
//! boundaries, so travel time depends only on distance and speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CENTER_Y;
use crate::coords::GameArea;
use crate::level::{ObstacleSpec, Tint};
use crate::sim::collision::{Bounds, CollisionLayer};
use crate::sim::entity::{Collidable, Tickable, Visual};

/// A single falling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Proportional position; Y overshoots past [0,1] around spawn/despawn
    pub pos: Vec2,
    /// Side length in virtual units
    pub size: f32,
    /// Fall speed in virtual units per second
    pub speed: f32,
    /// Spawn/despawn distance past the vertical center, virtual units
    pub render_distance: f32,
    pub tint: Tint,
    pub active: bool,
}

impl Obstacle {
    /// Build an inactive obstacle from a template slot; `spawn` places it
    pub fn new(id: u32, spec: &ObstacleSpec, speed: f32, render_distance: f32) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            size: spec.size,
            speed,
            render_distance,
            tint: spec.tint,
            active: false,
        }
    }

    /// Re-imprint template fields onto a pooled slot
    pub fn reset(&mut self, spec: &ObstacleSpec, speed: f32, render_distance: f32) {
        self.size = spec.size;
        self.tint = spec.tint;
        self.speed = speed;
        self.render_distance = render_distance;
    }

    /// Place at the below-screen spawn boundary and activate
    pub fn spawn(&mut self, start_x: f32, area: &GameArea) {
        self.pos.x = start_x;
        self.pos.y = CENTER_Y + area.prop_y_from_units(self.render_distance);
        self.active = true;
    }

    /// Snapshot for the renderer
    pub fn visual(&self, area: &GameArea) -> Visual {
        Visual {
            pos: self.pos,
            size_px: area.px_from_units(self.size),
            visible: self.active,
        }
    }
}

impl Tickable for Obstacle {
    fn tick(&mut self, dt: f32, area: &GameArea) -> bool {
        if !self.active {
            return false;
        }
        if !area.is_ready() {
            return true;
        }

        self.pos.y -= area.prop_y_from_units(self.speed) * dt;

        if self.pos.y < CENTER_Y - area.prop_y_from_units(self.render_distance) {
            self.active = false;
            log::trace!("obstacle {} despawned", self.id);
            return false;
        }
        true
    }
}

impl Collidable for Obstacle {
    fn id(&self) -> u32 {
        self.id
    }

    fn layer(&self) -> CollisionLayer {
        CollisionLayer::Obstacle
    }

    fn is_collidable(&self) -> bool {
        self.active
    }

    fn bounds(&self, area: &GameArea) -> Bounds {
        Bounds::square(self.pos, self.size, area)
    }
}
