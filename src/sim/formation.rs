//! Obstacle formations
//!
//! A formation is an immutable template plus an arena of live obstacle
//! slots. Respawning reuses the slots in place whenever the template still
//! matches, so steady-state play allocates nothing per respawn; the arena is
//! only rebuilt on first spawn or after a template change.

use serde::{Deserialize, Serialize};

use crate::coords::GameArea;
use crate::level::{FormationPlan, ObstacleSpec};
use crate::sim::entity::{EntityIds, Tickable};
use crate::sim::obstacle::Obstacle;

/// One live slot: an obstacle plus its fixed offset from the anchor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub obstacle: Obstacle,
    offset_x: f32,
    offset_y: f32,
}

/// A set of obstacles spawned and respawned as a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    template: Vec<ObstacleSpec>,
    members: Vec<Member>,
    speed: f32,
    render_distance: f32,
}

impl Formation {
    pub fn new(speed: f32, render_distance: f32) -> Self {
        Self {
            template: Vec::new(),
            members: Vec::new(),
            speed,
            render_distance,
        }
    }

    /// Materialize a formation from a level's plan
    pub fn from_plan(plan: &FormationPlan, speed: f32, render_distance: f32) -> Self {
        let mut formation = Self::new(speed, render_distance);
        for spec in &plan.members {
            formation.add_member(*spec);
        }
        formation
    }

    /// Append a slot to the template; build-time only, before the first spawn
    pub fn add_member(&mut self, spec: ObstacleSpec) {
        self.template.push(spec);
    }

    /// Pick up new tuning for the next spawn (applied to every slot then)
    pub fn retune(&mut self, speed: f32, render_distance: f32) {
        self.speed = speed;
        self.render_distance = render_distance;
    }

    /// Place every member at the spawn row anchored at `start_x`
    ///
    /// Slots are reused in place when the live arena still matches the
    /// template; otherwise the arena is rebuilt with fresh ids. Offsets are
    /// in virtual units: X shifts the spawn column, Y shifts along the
    /// spawn row after the boundary placement.
    pub fn spawn(&mut self, start_x: f32, area: &GameArea, ids: &mut EntityIds) {
        if self.members.len() == self.template.len() {
            for (member, spec) in self.members.iter_mut().zip(self.template.iter()) {
                member.obstacle.reset(spec, self.speed, self.render_distance);
                member.offset_x = spec.offset_x;
                member.offset_y = spec.offset_y;
            }
        } else {
            self.members = self
                .template
                .iter()
                .map(|spec| Member {
                    obstacle: Obstacle::new(ids.next_id(), spec, self.speed, self.render_distance),
                    offset_x: spec.offset_x,
                    offset_y: spec.offset_y,
                })
                .collect();
        }

        for member in &mut self.members {
            let x = start_x + area.prop_x_from_units(member.offset_x);
            member.obstacle.spawn(x, area);
            member.obstacle.pos.y += area.prop_y_from_units(member.offset_y);
        }
    }

    /// Highest member Y (closest to the spawn row); `f32::MIN` when none active
    pub fn highest_y(&self) -> f32 {
        self.members
            .iter()
            .filter(|m| m.obstacle.active)
            .map(|m| m.obstacle.pos.y)
            .fold(f32::MIN, f32::max)
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Member] {
        &mut self.members
    }
}

impl Tickable for Formation {
    /// Tick every member; the formation stays alive while any member does
    fn tick(&mut self, dt: f32, area: &GameArea) -> bool {
        let mut any_active = false;
        for member in &mut self.members {
            if member.obstacle.tick(dt, area) {
                any_active = true;
            }
        }
        any_active
    }
}
