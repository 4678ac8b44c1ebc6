//! Player entity
//!
//! Horizontal-only movement with ramped speed. Holding a direction
//! accelerates toward max speed along a diminishing-returns curve; reversing
//! while moving resets speed to a starting fraction so momentum never
//! carries straight into the opposite direction.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_HEALTH, PLAYER_SIZE_UNITS, STARTING_SPEED_FRACTION};
use crate::coords::GameArea;
use crate::sim::collision::{Bounds, CollisionLayer};
use crate::sim::entity::{Collidable, Tickable, Visual};

/// Movement intent, fed in from the host's input handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum MoveState {
    Idle,
    Moving,
}

/// The dodging square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    /// Proportional position; X clamps to [0,1], Y is fixed at mid-screen
    pub pos: Vec2,
    /// Side length in virtual units
    pub size: f32,
    /// Top speed, virtual units per second
    pub max_speed: f32,
    /// Ramp rate, virtual units per second squared
    pub acceleration: f32,
    /// Current ramped speed
    pub current_speed: f32,
    pub health: i32,
    pub active: bool,
    direction: Direction,
    state: MoveState,
}

impl Player {
    pub fn new(id: u32, max_speed: f32, acceleration: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(0.5, 0.5),
            size: PLAYER_SIZE_UNITS,
            max_speed,
            acceleration,
            current_speed: 0.0,
            health: MAX_HEALTH,
            active: true,
            direction: Direction::None,
            state: MoveState::Idle,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Steer the player; reversing mid-run applies the turn penalty
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == Direction::None {
            self.stop();
            return;
        }

        let reversing = self.state == MoveState::Moving
            && self.direction != Direction::None
            && self.direction != direction;
        if reversing {
            self.current_speed = STARTING_SPEED_FRACTION * self.max_speed;
        }

        self.direction = direction;
        self.state = MoveState::Moving;
    }

    /// Drop to a standstill
    pub fn stop(&mut self) {
        self.direction = Direction::None;
        self.state = MoveState::Idle;
        self.current_speed = 0.0;
    }

    /// Remove health; returns the new health fraction, `None` for
    /// non-positive amounts (which are a no-op)
    pub fn take_damage(&mut self, amount: i32) -> Option<f32> {
        if amount <= 0 {
            return None;
        }
        self.health = (self.health - amount).clamp(0, MAX_HEALTH);
        Some(self.health_fraction())
    }

    /// Health as a 0..1 fraction for the host's health bar
    #[inline]
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / MAX_HEALTH as f32
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

impl Tickable for Player {
    fn tick(&mut self, dt: f32, area: &GameArea) -> bool {
        if !self.active {
            return false;
        }
        if self.direction == Direction::None {
            self.state = MoveState::Idle;
            self.current_speed = 0.0;
            return true;
        }

        // Ramp speed with diminishing returns near the top end
        let floor = STARTING_SPEED_FRACTION * self.max_speed;
        if self.current_speed < floor {
            self.current_speed = floor;
        }
        let ratio = self.current_speed / self.max_speed;
        self.current_speed += self.acceleration * dt * accel_multiplier(ratio);
        self.current_speed = self.current_speed.min(self.max_speed);

        let step = area.prop_x_from_units(self.current_speed) * dt;
        let step = if self.direction == Direction::Left {
            -step
        } else {
            step
        };
        self.pos.x = (self.pos.x + step).clamp(0.0, 1.0);
        true
    }
}

impl Collidable for Player {
    fn id(&self) -> u32 {
        self.id
    }

    fn layer(&self) -> CollisionLayer {
        CollisionLayer::Player
    }

    fn is_collidable(&self) -> bool {
        self.active
    }

    fn bounds(&self, area: &GameArea) -> Bounds {
        Bounds::square(self.pos, self.size, area)
    }
}

/// Acceleration effectiveness at a given fraction of max speed
///
/// Full effect below 70%, then two linear shelves down to half effect at
/// 90% and above.
#[inline]
pub fn accel_multiplier(speed_ratio: f32) -> f32 {
    if speed_ratio < 0.7 {
        1.0
    } else if speed_ratio < 0.8 {
        1.0 - (speed_ratio - 0.7) / 0.1 * 0.25
    } else if speed_ratio < 0.9 {
        0.75 - (speed_ratio - 0.8) / 0.1 * 0.25
    } else {
        0.5
    }
}
