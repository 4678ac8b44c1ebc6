//! Spatial-grid collision detection
//!
//! Broad phase is a fixed 8x8 uniform grid over proportional [0,1] space;
//! entities bucket by center. Narrow phase is a strict AABB overlap test,
//! skipped for same-layer pairs. Overlap state persists across sweeps as
//! normalized id pairs, so enter/exit events fire on edges only.
//!
//! The detector holds no entity references. Callers submit a fresh probe
//! list per sweep (only entities that should collide) and throttle sweeps
//! themselves; a pair whose entity stops being probed exits like a
//! separation would.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;
use crate::coords::GameArea;

/// Same-layer pairs never collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionLayer {
    Player,
    Obstacle,
    Boundary,
}

/// Axis-aligned box in proportional coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Vec2,
    pub half_w: f32,
    pub half_h: f32,
}

impl Bounds {
    pub fn new(center: Vec2, half_w: f32, half_h: f32) -> Self {
        Self {
            center,
            half_w,
            half_h,
        }
    }

    /// Box for a square of `size` virtual units centered at `center`
    ///
    /// Width and height convert separately: the square is aspect-corrected
    /// into a proportional rectangle that renders square on screen.
    pub fn square(center: Vec2, size: f32, area: &GameArea) -> Self {
        Self {
            center,
            half_w: area.prop_x_from_units(size) / 2.0,
            half_h: area.prop_y_from_units(size) / 2.0,
        }
    }

    #[inline]
    pub fn overlaps(&self, other: &Bounds) -> bool {
        (self.center.x - other.center.x).abs() < self.half_w + other.half_w
            && (self.center.y - other.center.y).abs() < self.half_h + other.half_h
    }
}

/// One entity's entry in a sweep
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub id: u32,
    pub layer: CollisionLayer,
    pub bounds: Bounds,
}

/// Edge-triggered overlap transition between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CollisionEvent {
    Enter { a: u32, b: u32 },
    Exit { a: u32, b: u32 },
}

/// Broad-phase grid plus the persistent overlap set
///
/// Cell buffers and overlap sets are reused across sweeps; steady-state
/// sweeps allocate nothing.
#[derive(Debug)]
pub struct CollisionGrid {
    /// `GRID_SIZE` x `GRID_SIZE` buckets of probe indices, row-major
    cells: Vec<Vec<usize>>,
    /// Normalized id pairs overlapping as of the last sweep
    overlaps: HashSet<(u32, u32)>,
    /// Scratch set for the sweep in progress
    scratch: HashSet<(u32, u32)>,
}

impl CollisionGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![Vec::new(); GRID_SIZE * GRID_SIZE],
            overlaps: HashSet::new(),
            scratch: HashSet::new(),
        }
    }

    /// Sweep the probe list and append enter/exit events to `events`
    ///
    /// Events for one sweep are sorted for deterministic output; enters
    /// precede exits.
    pub fn sweep_into(&mut self, probes: &[Collider], events: &mut Vec<CollisionEvent>) {
        for cell in &mut self.cells {
            cell.clear();
        }
        for (index, probe) in probes.iter().enumerate() {
            self.cells[cell_index(probe.bounds.center)].push(index);
        }

        let mut current = std::mem::take(&mut self.scratch);
        current.clear();

        // Left-to-right, top-to-bottom sweep. Checking each cell against
        // itself plus its right, down-right, down, and down-left neighbors
        // covers every adjacent cell pair exactly once.
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let cell = &self.cells[y * GRID_SIZE + x];
                if cell.is_empty() {
                    continue;
                }

                for i in 0..cell.len() {
                    for j in (i + 1)..cell.len() {
                        test_pair(probes, cell[i], cell[j], &mut current);
                    }
                }

                if x + 1 < GRID_SIZE {
                    test_cells(probes, cell, &self.cells[y * GRID_SIZE + x + 1], &mut current);
                    if y + 1 < GRID_SIZE {
                        test_cells(
                            probes,
                            cell,
                            &self.cells[(y + 1) * GRID_SIZE + x + 1],
                            &mut current,
                        );
                    }
                }
                if y + 1 < GRID_SIZE {
                    test_cells(probes, cell, &self.cells[(y + 1) * GRID_SIZE + x], &mut current);
                    if x > 0 {
                        test_cells(
                            probes,
                            cell,
                            &self.cells[(y + 1) * GRID_SIZE + x - 1],
                            &mut current,
                        );
                    }
                }
            }
        }

        let start = events.len();
        for &(a, b) in &current {
            if !self.overlaps.contains(&(a, b)) {
                events.push(CollisionEvent::Enter { a, b });
            }
        }
        for &(a, b) in &self.overlaps {
            if !current.contains(&(a, b)) {
                events.push(CollisionEvent::Exit { a, b });
            }
        }
        events[start..].sort_unstable();

        std::mem::swap(&mut self.overlaps, &mut current);
        self.scratch = current;
    }

    /// Whether the pair was overlapping as of the last sweep
    #[inline]
    pub fn is_overlapping(&self, a: u32, b: u32) -> bool {
        self.overlaps.contains(&pair_key(a, b))
    }

    pub fn overlap_count(&self) -> usize {
        self.overlaps.len()
    }
}

impl Default for CollisionGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Bucket for a proportional center position, clamped onto the grid
#[inline]
fn cell_index(center: Vec2) -> usize {
    let max = GRID_SIZE as i32 - 1;
    let x = ((center.x * GRID_SIZE as f32) as i32).clamp(0, max) as usize;
    let y = ((center.y * GRID_SIZE as f32) as i32).clamp(0, max) as usize;
    y * GRID_SIZE + x
}

/// Unordered pair normalized to (low, high)
#[inline]
fn pair_key(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}

fn test_pair(probes: &[Collider], i: usize, j: usize, current: &mut HashSet<(u32, u32)>) {
    let a = &probes[i];
    let b = &probes[j];
    if a.layer == b.layer {
        return;
    }
    if a.bounds.overlaps(&b.bounds) {
        current.insert(pair_key(a.id, b.id));
    }
}

fn test_cells(probes: &[Collider], a: &[usize], b: &[usize], current: &mut HashSet<(u32, u32)>) {
    for &i in a {
        for &j in b {
            test_pair(probes, i, j, current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> GameArea {
        GameArea::sized(900.0, 1600.0)
    }

    fn probe(id: u32, layer: CollisionLayer, x: f32, y: f32, half: f32) -> Collider {
        Collider {
            id,
            layer,
            bounds: Bounds::new(Vec2::new(x, y), half, half),
        }
    }

    #[test]
    fn test_aabb_overlap_is_strict() {
        let a = Bounds::new(Vec2::new(0.5, 0.5), 0.05, 0.05);
        let touching = Bounds::new(Vec2::new(0.6, 0.5), 0.05, 0.05);
        let inside = Bounds::new(Vec2::new(0.59, 0.5), 0.05, 0.05);

        // Exactly touching edges do not count as overlap
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_square_bounds_are_aspect_corrected() {
        let area = area();
        let bounds = Bounds::square(Vec2::new(0.5, 0.5), 10.0, &area);
        assert!((bounds.half_w - 0.05).abs() < 1e-6);
        // Proportional Y spans more pixels, so the proportional half height
        // shrinks by the aspect ratio
        assert!((bounds.half_h - 0.05 / area.aspect()).abs() < 1e-6);
    }

    #[test]
    fn test_enter_fires_once() {
        let mut grid = CollisionGrid::new();
        let mut events = Vec::new();

        let probes = vec![
            probe(1, CollisionLayer::Player, 0.5, 0.5, 0.05),
            probe(2, CollisionLayer::Obstacle, 0.52, 0.5, 0.05),
        ];
        grid.sweep_into(&probes, &mut events);
        assert_eq!(events, vec![CollisionEvent::Enter { a: 1, b: 2 }]);
        assert!(grid.is_overlapping(1, 2));
        assert!(grid.is_overlapping(2, 1));

        // Still overlapping: no repeat event
        events.clear();
        grid.sweep_into(&probes, &mut events);
        assert!(events.is_empty());
        assert!(grid.is_overlapping(1, 2));
    }

    #[test]
    fn test_exit_fires_on_separation() {
        let mut grid = CollisionGrid::new();
        let mut events = Vec::new();

        let together = vec![
            probe(1, CollisionLayer::Player, 0.5, 0.5, 0.05),
            probe(2, CollisionLayer::Obstacle, 0.52, 0.5, 0.05),
        ];
        grid.sweep_into(&together, &mut events);

        let apart = vec![
            probe(1, CollisionLayer::Player, 0.5, 0.5, 0.05),
            probe(2, CollisionLayer::Obstacle, 0.9, 0.9, 0.05),
        ];
        events.clear();
        grid.sweep_into(&apart, &mut events);
        assert_eq!(events, vec![CollisionEvent::Exit { a: 1, b: 2 }]);
        assert!(!grid.is_overlapping(1, 2));
    }

    #[test]
    fn test_unprobed_entity_exits() {
        let mut grid = CollisionGrid::new();
        let mut events = Vec::new();

        let together = vec![
            probe(1, CollisionLayer::Player, 0.5, 0.5, 0.05),
            probe(2, CollisionLayer::Obstacle, 0.52, 0.5, 0.05),
        ];
        grid.sweep_into(&together, &mut events);

        // Entity 2 deactivated and dropped from the probe list
        let remaining = vec![probe(1, CollisionLayer::Player, 0.5, 0.5, 0.05)];
        events.clear();
        grid.sweep_into(&remaining, &mut events);
        assert_eq!(events, vec![CollisionEvent::Exit { a: 1, b: 2 }]);
        assert_eq!(grid.overlap_count(), 0);
    }

    #[test]
    fn test_same_layer_never_collides() {
        let mut grid = CollisionGrid::new();
        let mut events = Vec::new();

        let probes = vec![
            probe(1, CollisionLayer::Obstacle, 0.5, 0.5, 0.05),
            probe(2, CollisionLayer::Obstacle, 0.5, 0.5, 0.05),
        ];
        grid.sweep_into(&probes, &mut events);
        assert!(events.is_empty());
        assert!(!grid.is_overlapping(1, 2));
    }

    #[test]
    fn test_adjacent_cell_pairs_are_found() {
        let mut grid = CollisionGrid::new();
        let mut events = Vec::new();

        // Centers straddle the 0.5 cell boundary: buckets (3,4) and (4,4).
        // Their boxes overlap even though the cells differ.
        let probes = vec![
            probe(1, CollisionLayer::Player, 0.49, 0.5, 0.05),
            probe(2, CollisionLayer::Obstacle, 0.51, 0.5, 0.05),
        ];
        grid.sweep_into(&probes, &mut events);
        assert_eq!(events, vec![CollisionEvent::Enter { a: 1, b: 2 }]);
    }

    #[test]
    fn test_down_left_neighbor_is_covered() {
        let mut grid = CollisionGrid::new();
        let mut events = Vec::new();

        // Diagonal neighbors: (4,3) and (3,4)
        let probes = vec![
            probe(1, CollisionLayer::Player, 0.505, 0.495, 0.03),
            probe(2, CollisionLayer::Obstacle, 0.495, 0.505, 0.03),
        ];
        grid.sweep_into(&probes, &mut events);
        assert_eq!(events, vec![CollisionEvent::Enter { a: 1, b: 2 }]);
    }

    #[test]
    fn test_off_grid_centers_clamp_into_edge_cells() {
        let mut grid = CollisionGrid::new();
        let mut events = Vec::new();

        // Off-screen overshoot positions still land in boundary cells
        let probes = vec![
            probe(1, CollisionLayer::Player, -0.1, 1.3, 0.2),
            probe(2, CollisionLayer::Obstacle, -0.05, 1.25, 0.2),
        ];
        grid.sweep_into(&probes, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_pair_normalization() {
        assert_eq!(pair_key(7, 3), (3, 7));
        assert_eq!(pair_key(3, 7), (3, 7));
        assert_eq!(pair_key(5, 5), (5, 5));
    }
}
