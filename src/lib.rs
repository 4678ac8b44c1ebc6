//! Downpour - headless core of a falling-obstacle dodge game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formations, collisions, session)
//! - `clock`: Frame clock broadcasting clamped delta-time ticks
//! - `coords`: Letterboxed virtual coordinate system
//! - `level`: Data-driven level configuration
//!
//! The crate never touches pixels or input devices directly. A host shell
//! owns the windowing/rendering stack, forwards viewport sizes and direction
//! intents in, and reads entity visual state and session events back out.

pub mod clock;
pub mod coords;
pub mod level;
pub mod sim;

pub use clock::{FrameClock, Subscription};
pub use coords::GameArea;
pub use level::{FormationPlan, LevelConfig, ObstacleSpec, Tint};

/// Game configuration constants
pub mod consts {
    /// Virtual design-space width in units (portrait phone shape)
    pub const TARGET_WIDTH_UNITS: f32 = 9.0;
    /// Virtual design-space height in units
    pub const TARGET_HEIGHT_UNITS: f32 = 16.0;
    /// Virtual units spanned by the full game-area width
    pub const UNITS_PER_WIDTH: f32 = 100.0;
    /// Proportional Y of the game-area center; spawn and despawn boundaries
    /// sit a render distance past it on either side
    pub const CENTER_Y: f32 = 0.5;

    /// Frame clock target rate
    pub const TARGET_FPS: f32 = 60.0;
    /// Target frame interval in seconds
    pub const TARGET_DT: f32 = 1.0 / TARGET_FPS;
    /// Largest delta fed to subscribers (absorbs suspend/resume stalls)
    pub const MAX_DT: f32 = 0.1;

    /// Player square side length in virtual units
    pub const PLAYER_SIZE_UNITS: f32 = 10.0;
    /// Fraction of max speed the player restarts from after a reversal
    pub const STARTING_SPEED_FRACTION: f32 = 0.25;
    /// Health at session start (also the cap)
    pub const MAX_HEALTH: i32 = 100;

    /// Distance past the vertical center, in units, where obstacles spawn and despawn
    pub const RENDER_DISTANCE_UNITS: f32 = 200.0;
    /// Vertical gap, in units, between consecutive formation spawns
    pub const SPAWN_DISTANCE_UNITS: f32 = 100.0;
    /// Seconds between collision sweeps
    pub const COLLISION_INTERVAL: f32 = 0.016;

    /// Broad-phase grid resolution per axis
    pub const GRID_SIZE: usize = 8;

    /// Default spawn column (proportional X)
    pub const DEFAULT_SPAWN_X: f32 = 0.5;
    /// Columns the avoid-player policy tries, in order, before going random
    pub const SPAWN_CANDIDATES: [f32; 3] = [0.5, 0.2, 0.8];

    /// Position change below this is not worth pushing to the UI (proportional)
    pub const POSITION_EPSILON: f32 = 1e-4;
    /// Size change below this is not worth pushing to the UI (pixels)
    pub const SIZE_EPSILON_PX: f32 = 0.1;
}
