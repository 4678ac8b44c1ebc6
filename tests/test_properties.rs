use glam::Vec2;
use proptest::prelude::*;

use downpour_core::consts::MAX_DT;
use downpour_core::sim::player::accel_multiplier;
use downpour_core::sim::{
    Bounds, Collider, CollisionEvent, CollisionGrid, CollisionLayer, Direction, Obstacle, Player,
    Session, SpawnPolicy, Tickable,
};
use downpour_core::{FormationPlan, FrameClock, GameArea, LevelConfig, ObstacleSpec, Tint};

const DT: f32 = 1.0 / 60.0;

fn layer_from(index: u8) -> CollisionLayer {
    match index % 3 {
        0 => CollisionLayer::Player,
        1 => CollisionLayer::Obstacle,
        _ => CollisionLayer::Boundary,
    }
}

fn single_drop_level() -> LevelConfig {
    let mut formation = FormationPlan::default();
    formation.push(ObstacleSpec {
        offset_x: 0.0,
        offset_y: 0.0,
        size: 10.0,
        tint: Tint(0xff0000),
    });
    LevelConfig {
        title: "drop".into(),
        background: Tint(0),
        player_max_speed: 40.0,
        player_acceleration: 50.0,
        falling_speed: 300.0,
        damage_per_hit: 40,
        formation,
    }
}

proptest! {
    #[test]
    fn fitted_area_keeps_target_ratio(w in 1.0f32..4000.0, h in 1.0f32..4000.0) {
        let area = GameArea::sized(w, h);
        prop_assert!(area.is_ready());
        prop_assert!((area.height / area.width - 16.0 / 9.0).abs() < 1e-3);

        // Fits inside the viewport, centered by the letterbox offsets
        prop_assert!(area.width <= w * 1.0001);
        prop_assert!(area.height <= h * 1.0001);
        prop_assert!(area.offset_x >= -1e-3 && area.offset_y >= -1e-3);
        prop_assert!((2.0 * area.offset_x + area.width - w).abs() < 1e-2);
        prop_assert!((2.0 * area.offset_y + area.height - h).abs() < 1e-2);
    }

    #[test]
    fn unit_distances_agree_across_axes(
        w in 100.0f32..4000.0,
        h in 100.0f32..4000.0,
        units in -400.0f32..400.0,
    ) {
        let area = GameArea::sized(w, h);
        let px = area.px_from_units(units);
        // The same unit distance measures the same pixel length whether it
        // goes through the X axis, the Y axis, or straight to pixels
        prop_assert!((area.prop_x_from_units(units) * area.width - px).abs() < 0.5);
        prop_assert!((area.prop_y_from_units(units) * area.height - px).abs() < 0.5);
    }

    #[test]
    fn grid_sweep_matches_brute_force(
        raw in prop::collection::vec(
            // Halves stay under half a grid cell, the regime the game's
            // entity sizes live in; centers may fall off the grid
            (-0.2f32..1.2, -0.2f32..1.2, 0.005f32..0.06, 0.005f32..0.06, 0u8..3),
            0..20,
        )
    ) {
        let probes: Vec<Collider> = raw
            .iter()
            .enumerate()
            .map(|(i, &(x, y, half_w, half_h, l))| Collider {
                id: i as u32 + 1,
                layer: layer_from(l),
                bounds: Bounds::new(Vec2::new(x, y), half_w, half_h),
            })
            .collect();

        let mut expected = Vec::new();
        for i in 0..probes.len() {
            for j in (i + 1)..probes.len() {
                let (a, b) = (&probes[i], &probes[j]);
                if a.layer != b.layer && a.bounds.overlaps(&b.bounds) {
                    expected.push(CollisionEvent::Enter {
                        a: a.id.min(b.id),
                        b: a.id.max(b.id),
                    });
                }
            }
        }
        expected.sort_unstable();

        let mut grid = CollisionGrid::new();
        let mut events = Vec::new();
        grid.sweep_into(&probes, &mut events);
        prop_assert_eq!(&events, &expected);

        // Edge triggering: an unchanged world emits nothing, an emptied
        // world exits every overlap
        events.clear();
        grid.sweep_into(&probes, &mut events);
        prop_assert!(events.is_empty());

        events.clear();
        grid.sweep_into(&[], &mut events);
        prop_assert_eq!(events.len(), expected.len());
        prop_assert!(
            events.iter().all(|e| matches!(e, CollisionEvent::Exit { .. })),
            "expected only Exit events"
        );
    }

    #[test]
    fn accel_multiplier_is_bounded_and_non_increasing(
        r1 in 0.0f32..2.0,
        r2 in 0.0f32..2.0,
    ) {
        let (lo, hi) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        let (m_lo, m_hi) = (accel_multiplier(lo), accel_multiplier(hi));
        prop_assert!((0.5..=1.0).contains(&m_lo));
        prop_assert!((0.5..=1.0).contains(&m_hi));
        prop_assert!(m_lo >= m_hi - 1e-6);
    }

    #[test]
    fn player_never_leaves_the_area(
        max_speed in 10.0f32..200.0,
        steps in prop::collection::vec((0u8..3, 0.0f32..0.12), 1..60),
    ) {
        let area = GameArea::sized(900.0, 1600.0);
        let mut player = Player::new(1, max_speed, 50.0);
        for (direction, dt) in steps {
            player.set_direction(match direction {
                0 => Direction::None,
                1 => Direction::Left,
                _ => Direction::Right,
            });
            player.tick(dt, &area);
            prop_assert!((0.0..=1.0).contains(&player.pos.x));
            prop_assert!(player.current_speed >= 0.0);
            prop_assert!(player.current_speed <= max_speed * 1.0001);
        }
    }

    #[test]
    fn obstacle_round_trip_time_is_distance_over_speed(
        speed in 50.0f32..400.0,
        render_distance in 50.0f32..300.0,
    ) {
        let area = GameArea::sized(900.0, 1600.0);
        let spec = ObstacleSpec {
            offset_x: 0.0,
            offset_y: 0.0,
            size: 10.0,
            tint: Tint(0xff0000),
        };
        let mut obstacle = Obstacle::new(1, &spec, speed, render_distance);
        obstacle.spawn(0.5, &area);

        let expected_ticks = 2.0 * render_distance / (speed * DT);
        let mut ticks = 0u32;
        while obstacle.tick(DT, &area) {
            ticks += 1;
            prop_assert!(ticks < 20_000);
        }
        prop_assert!((ticks as f32 - expected_ticks).abs() <= 2.0);
    }

    #[test]
    fn clock_clamps_any_elapsed(elapsed in -10.0f32..10.0) {
        let mut clock = FrameClock::new();
        clock.start();
        let dt = clock.advance(elapsed);
        prop_assert!(dt.is_some());
        let dt = dt.unwrap();
        prop_assert!((0.0..=MAX_DT).contains(&dt));
    }

    #[test]
    fn avoiding_spawns_step_around_the_player(
        seed in any::<u64>(),
        directions in prop::collection::vec(0u8..3, 1..50),
    ) {
        let mut session = Session::new(single_drop_level(), seed);
        session.resize(900.0, 1600.0);
        session.set_spawn_policy(SpawnPolicy::AvoidPlayer);

        for direction in directions {
            session.set_player_direction(match direction {
                0 => Direction::None,
                1 => Direction::Left,
                _ => Direction::Right,
            });
            let before = session.formations().len();
            session.tick(DT);

            if session.formations().len() > before {
                let newest = session.formations().last().unwrap();
                let spawn_x = newest.members()[0].obstacle.pos.x;
                // Decided against the pre-tick player position; one tick of
                // player motion cannot close the full column gap
                prop_assert!((spawn_x - session.player().pos.x).abs() >= 0.09);
            }
        }
    }
}
