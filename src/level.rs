//! Data-driven level configuration
//!
//! A level is pure data: player/obstacle tuning plus a formation template.
//! Hosts ship their own catalogs as JSON; the two built-in levels exist as a
//! reference tuning and for tests.

use serde::{Deserialize, Serialize};

/// 0xRRGGBB color, carried opaquely for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tint(pub u32);

impl Tint {
    /// Red/green/blue channels
    pub fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }
}

/// One obstacle slot in a formation template
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    /// Horizontal offset from the formation anchor, virtual units
    pub offset_x: f32,
    /// Vertical offset from the spawn row, virtual units
    pub offset_y: f32,
    /// Side length in virtual units
    pub size: f32,
    pub tint: Tint,
}

/// Ordered obstacle template a formation is materialized from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormationPlan {
    pub members: Vec<ObstacleSpec>,
}

impl FormationPlan {
    pub fn push(&mut self, spec: ObstacleSpec) {
        self.members.push(spec);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Complete tuning for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub title: String,
    /// Backdrop color for the host
    pub background: Tint,
    /// Player top speed, virtual units per second
    pub player_max_speed: f32,
    /// Player acceleration, virtual units per second squared
    pub player_acceleration: f32,
    /// Obstacle fall speed, virtual units per second
    pub falling_speed: f32,
    /// Health removed per obstacle hit; non-positive values disable damage
    pub damage_per_hit: i32,
    pub formation: FormationPlan,
}

impl LevelConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// First level: a wide center obstacle with two small outriders
    pub fn level_one() -> Self {
        let mut formation = FormationPlan::default();
        formation.push(ObstacleSpec {
            offset_x: 0.0,
            offset_y: 0.0,
            size: 10.0,
            tint: Tint(0xff0000),
        });
        formation.push(ObstacleSpec {
            offset_x: -25.0,
            offset_y: 0.0,
            size: 5.0,
            tint: Tint(0x8b0000),
        });
        formation.push(ObstacleSpec {
            offset_x: 25.0,
            offset_y: 0.0,
            size: 5.0,
            tint: Tint(0xdb7093),
        });

        Self {
            title: "Level 1".into(),
            background: Tint(0xbfd7ff),
            player_max_speed: 40.0,
            player_acceleration: 50.0,
            falling_speed: 30.0,
            damage_per_hit: 40,
            formation,
        }
    }

    /// Second level: a five-wide picket line of small obstacles
    pub fn level_two() -> Self {
        let mut formation = FormationPlan::default();
        for (offset_x, tint) in [
            (-50.0, Tint(0xdb7093)),
            (-25.0, Tint(0xff0000)),
            (0.0, Tint(0x8b0000)),
            (25.0, Tint(0xff0000)),
            (50.0, Tint(0xdb7093)),
        ] {
            formation.push(ObstacleSpec {
                offset_x,
                offset_y: 0.0,
                size: 5.0,
                tint,
            });
        }

        Self {
            title: "Level 2".into(),
            background: Tint(0xbff5e1),
            player_max_speed: 40.0,
            player_acceleration: 50.0,
            falling_speed: 35.0,
            damage_per_hit: 10,
            formation,
        }
    }
}
