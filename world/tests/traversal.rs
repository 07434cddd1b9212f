use std::time::Duration;

use path_defence_core::{Command, Event, FollowerId, Health, Path};
use path_defence_system_motion::remaining_travel_time;
use path_defence_world::{self as world, query, World, WorldConfig};
use test_log::test;

fn serpentine_world() -> World {
    World::new(WorldConfig {
        columns: 6,
        rows: 6,
        path: Path::serpentine(6, 15.0).expect("valid serpentine"),
    })
    .expect("serpentine fits grid")
}

#[test]
fn follower_reports_every_waypoint_before_escaping() {
    let mut world = serpentine_world();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SpawnFollower {
            speed: 30.0,
            health: Health::new(1),
        },
        &mut events,
    );

    let follower = FollowerId::new(0);
    let view = query::follower_view(&world);
    let snapshot = view.get(follower).expect("spawned follower");
    let travel = remaining_travel_time(&snapshot.follower, query::path(&world))
        .expect("follower on path");
    assert_eq!(travel, Duration::from_millis(5_500));

    events.clear();
    for _ in 0..120 {
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(50),
            },
            &mut events,
        );
    }

    let reached: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            Event::FollowerAdvanced { path_index, .. } => Some(*path_index),
            _ => None,
        })
        .collect();
    assert_eq!(reached, (1..=11).collect::<Vec<_>>());

    let escapes = events
        .iter()
        .filter(|event| matches!(event, Event::FollowerEscaped { .. }))
        .count();
    assert_eq!(escapes, 1);
    assert!(query::follower_view(&world).is_empty());
}

#[test]
fn identifiers_are_allocated_per_world() {
    let mut first = serpentine_world();
    let mut second = serpentine_world();
    let mut events = Vec::new();

    for world in [&mut first, &mut second] {
        world::apply(
            world,
            Command::SpawnFollower {
                speed: 10.0,
                health: Health::new(1),
            },
            &mut events,
        );
    }

    assert_eq!(
        events,
        vec![
            Event::FollowerSpawned {
                follower: FollowerId::new(0),
                position: glam::Vec2::new(15.0, 0.0),
            },
            Event::FollowerSpawned {
                follower: FollowerId::new(0),
                position: glam::Vec2::new(15.0, 0.0),
            },
        ]
    );
}
