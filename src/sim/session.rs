//! Game session orchestration
//!
//! Owns the player, the active formations, and the collision grid, and
//! drives them from the clock's tick. Each tick: advance formations and
//! recycle fully-despawned ones, spawn on the distance cadence, advance the
//! player, then run the throttled collision/damage pass. Session-level
//! outcomes (health changes, game over) queue as events the host drains.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CENTER_Y, COLLISION_INTERVAL, DEFAULT_SPAWN_X, RENDER_DISTANCE_UNITS, SPAWN_CANDIDATES,
    SPAWN_DISTANCE_UNITS,
};
use crate::coords::GameArea;
use crate::level::LevelConfig;
use crate::sim::collision::{Collider, CollisionEvent, CollisionGrid};
use crate::sim::entity::{Collidable, EntityIds, Tickable};
use crate::sim::formation::Formation;
use crate::sim::player::{Direction, Player};

/// Session lifecycle; `GameOver` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    GameOver,
}

/// Fire-and-forget notifications for the host, drained in fire order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player health changed; fraction in [0, 1] for the health bar
    HealthChanged { percent: f32 },
    /// Health hit zero; the session has frozen
    GameOver,
}

/// Where new formations spawn horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnPolicy {
    /// Always the default column
    #[default]
    Fixed,
    /// Try the candidate columns in order, then a random one, skipping any
    /// that would drop straight onto the player
    AvoidPlayer,
}

/// One run of the game, from construction to game over
pub struct Session {
    level: LevelConfig,
    area: GameArea,
    player: Player,
    formations: Vec<Formation>,
    /// Fully-despawned formations held for slot reuse
    pool: Vec<Formation>,
    ids: EntityIds,
    grid: CollisionGrid,
    probes: Vec<Collider>,
    sweep_events: Vec<CollisionEvent>,
    events: Vec<GameEvent>,
    phase: GamePhase,
    policy: SpawnPolicy,
    rng: Pcg32,
    /// Spawn-row Y of the most recent spawn; `MAX` before the first one
    last_spawn_y: f32,
    render_distance: f32,
    spawn_distance: f32,
    collision_interval: f32,
    collision_accum: f32,
}

impl Session {
    /// New session over a level; the seed fixes every random decision
    pub fn new(level: LevelConfig, seed: u64) -> Self {
        let mut ids = EntityIds::default();
        let player = Player::new(
            ids.next_id(),
            level.player_max_speed,
            level.player_acceleration,
        );
        let initial_health = player.health_fraction();

        let mut session = Self {
            level,
            area: GameArea::default(),
            player,
            formations: Vec::new(),
            pool: Vec::new(),
            ids,
            grid: CollisionGrid::new(),
            probes: Vec::new(),
            sweep_events: Vec::new(),
            events: Vec::new(),
            phase: GamePhase::Running,
            policy: SpawnPolicy::default(),
            rng: Pcg32::seed_from_u64(seed),
            last_spawn_y: f32::MAX,
            render_distance: RENDER_DISTANCE_UNITS,
            spawn_distance: SPAWN_DISTANCE_UNITS,
            collision_interval: COLLISION_INTERVAL,
            collision_accum: 0.0,
        };

        // The host's health bar gets a baseline before the first tick
        session.events.push(GameEvent::HealthChanged {
            percent: initial_health,
        });
        session
    }

    /// Forward a viewport change; the first usable size unblocks ticking
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.area.resize(viewport_width, viewport_height);
    }

    /// Advance the whole session by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        if !self.area.is_ready() {
            return;
        }
        let area = self.area;

        // Back-to-front so removal never skips a neighbor; despawned
        // formations go to the pool instead of being dropped
        for i in (0..self.formations.len()).rev() {
            if !self.formations[i].tick(dt, &area) {
                let formation = self.formations.remove(i);
                self.pool.push(formation);
            }
        }

        if self.formations.is_empty() {
            self.spawn_formation();
        } else {
            let highest = self
                .formations
                .iter()
                .map(Formation::highest_y)
                .fold(f32::MIN, f32::max);
            if self.last_spawn_y - highest >= area.prop_y_from_units(self.spawn_distance) {
                self.spawn_formation();
            }
        }

        self.player.tick(dt, &area);

        self.collision_accum += dt;
        if self.collision_accum >= self.collision_interval {
            self.collision_accum = 0.0;
            self.collision_pass();
        }
    }

    /// Drain queued notifications in fire order
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_player_direction(&mut self, direction: Direction) {
        self.player.set_direction(direction);
    }

    pub fn stop_player_movement(&mut self) {
        self.player.stop();
    }

    pub fn set_spawn_policy(&mut self, policy: SpawnPolicy) {
        self.policy = policy;
    }

    /// Spawn/despawn distance past the center, virtual units
    pub fn set_render_distance(&mut self, units: f32) {
        self.render_distance = units;
    }

    /// Vertical gap between consecutive spawns, virtual units
    pub fn set_spawn_distance(&mut self, units: f32) {
        self.spawn_distance = units;
    }

    /// Seconds between collision sweeps; zero sweeps every tick
    pub fn set_collision_interval(&mut self, seconds: f32) {
        self.collision_interval = seconds;
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn area(&self) -> &GameArea {
        &self.area
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    // --- Spawning ---

    fn spawn_formation(&mut self) {
        let start_x = self.pick_spawn_x();

        let mut formation = self.pool.pop().unwrap_or_else(|| {
            Formation::from_plan(
                &self.level.formation,
                self.level.falling_speed,
                self.render_distance,
            )
        });
        formation.retune(self.level.falling_speed, self.render_distance);
        formation.spawn(start_x, &self.area, &mut self.ids);

        self.last_spawn_y = CENTER_Y + self.area.prop_y_from_units(self.render_distance);
        self.formations.push(formation);
        log::debug!(
            "formation spawned at x={start_x:.2}, {} active",
            self.formations.len()
        );
    }

    fn pick_spawn_x(&mut self) -> f32 {
        match self.policy {
            SpawnPolicy::Fixed => DEFAULT_SPAWN_X,
            SpawnPolicy::AvoidPlayer => {
                for candidate in SPAWN_CANDIDATES {
                    if !self.column_overlaps_player(candidate) {
                        return candidate;
                    }
                }
                let random_x = self.rng.random_range(0.0..=1.0);
                if !self.column_overlaps_player(random_x) {
                    return random_x;
                }
                DEFAULT_SPAWN_X
            }
        }
    }

    /// Would a formation anchored at `start_x` drop a member straight onto
    /// the player's column?
    fn column_overlaps_player(&self, start_x: f32) -> bool {
        let player = self.player.bounds(&self.area);
        self.level.formation.members.iter().any(|spec| {
            let x = start_x + self.area.prop_x_from_units(spec.offset_x);
            let half_w = self.area.prop_x_from_units(spec.size) / 2.0;
            (x - player.center.x).abs() < half_w + player.half_w
        })
    }

    // --- Collision / damage ---

    fn collision_pass(&mut self) {
        let area = self.area;

        self.probes.clear();
        push_probe(&mut self.probes, &self.player, &area);
        for formation in &self.formations {
            for member in formation.members() {
                push_probe(&mut self.probes, &member.obstacle, &area);
            }
        }

        self.sweep_events.clear();
        self.grid.sweep_into(&self.probes, &mut self.sweep_events);
        for event in &self.sweep_events {
            match event {
                CollisionEvent::Enter { a, b } => log::debug!("collision enter: {a} <> {b}"),
                CollisionEvent::Exit { a, b } => log::debug!("collision exit: {a} <> {b}"),
            }
        }

        // Resolve at most one obstacle per pass, first found in
        // formation/member order
        let player_id = self.player.id;
        let mut hit = None;
        'scan: for formation in &mut self.formations {
            for member in formation.members_mut() {
                let obstacle = &mut member.obstacle;
                if obstacle.active && self.grid.is_overlapping(player_id, obstacle.id) {
                    obstacle.active = false;
                    hit = Some(obstacle.id);
                    break 'scan;
                }
            }
        }

        let Some(obstacle_id) = hit else {
            return;
        };
        if let Some(percent) = self.player.take_damage(self.level.damage_per_hit) {
            log::debug!("player hit by obstacle {obstacle_id}, health {percent:.2}");
            self.events.push(GameEvent::HealthChanged { percent });
            if self.player.health <= 0 {
                self.phase = GamePhase::GameOver;
                self.events.push(GameEvent::GameOver);
                log::info!("game over");
            }
        }
    }
}

/// Append an entity to the probe list if it can collide right now
fn push_probe(probes: &mut Vec<Collider>, entity: &impl Collidable, area: &GameArea) {
    if entity.is_collidable() {
        probes.push(Collider {
            id: entity.id(),
            layer: entity.layer(),
            bounds: entity.bounds(area),
        });
    }
}
