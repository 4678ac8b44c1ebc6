//! Headless gameplay simulation
//!
//! Everything that moves lives here: the player, falling obstacle
//! formations, the collision grid, and the session that ties them to the
//! frame clock. Rendering and input mapping stay on the host side; the sim
//! reads and writes normalized coordinates only.

pub mod collision;
pub mod entity;
pub mod formation;
pub mod obstacle;
pub mod player;
pub mod session;

pub use collision::{Bounds, Collider, CollisionEvent, CollisionGrid, CollisionLayer};
pub use entity::{Collidable, EntityIds, Tickable, Visual, VisualCache};
pub use formation::{Formation, Member};
pub use obstacle::Obstacle;
pub use player::{Direction, Player};
pub use session::{GameEvent, GamePhase, Session, SpawnPolicy};
