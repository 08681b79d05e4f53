use std::time::Duration;

use gremlin_maze_core::{
    Command, DestructionStage, Event, LevelLayout, SessionConfig, TileCell, Tuning,
};
use gremlin_maze_system_demolition::Demolition;
use gremlin_maze_world::{self as world, query, World};

const BRICK: TileCell = TileCell::new(3, 0);

fn world_with_brick() -> World {
    World::new(SessionConfig {
        lives: 3,
        levels: vec![LevelLayout::parse("XW.B.E")],
        tuning: Tuning::default(),
    })
    .expect("valid layout")
}

fn frame(world: &mut World, demolition: &Demolition, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);
    world::apply(world, Command::PruneDestroyedWalls, &mut events);

    let mut commands = Vec::new();
    demolition.handle(
        query::now(world),
        query::tuning(world),
        &query::wall_view(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn struck_brick_counts_down_and_disappears() {
    let mut world = world_with_brick();
    let demolition = Demolition::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StrikeWall { cell: BRICK }, &mut events);
    assert_eq!(events, vec![Event::WallStruck { cell: BRICK }]);

    let mut stages = Vec::new();
    let mut removed_at = None;
    for _ in 0..20 {
        for event in frame(&mut world, &demolition, Duration::from_millis(50)) {
            match event {
                Event::WallDecayed { stage, .. } => stages.push((query::now(&world), stage)),
                Event::WallRemoved { cell } => {
                    assert_eq!(cell, BRICK);
                    removed_at = Some(query::now(&world));
                }
                _ => {}
            }
        }
    }

    assert_eq!(
        stages,
        vec![
            (Duration::from_millis(200), DestructionStage::new(2)),
            (Duration::from_millis(400), DestructionStage::new(1)),
            (Duration::from_millis(600), DestructionStage::SPENT),
        ]
    );
    let removed_at = removed_at.expect("wall removed");
    assert!(removed_at <= Duration::from_millis(800));
    assert!(query::wall_view(&world)
        .iter()
        .all(|wall| wall.cell != BRICK));
}

#[test]
fn second_strike_does_not_restart_countdown() {
    let mut world = world_with_brick();
    let demolition = Demolition::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StrikeWall { cell: BRICK }, &mut events);

    let _ = frame(&mut world, &demolition, Duration::from_millis(150));
    events.clear();
    world::apply(&mut world, Command::StrikeWall { cell: BRICK }, &mut events);
    assert!(events.is_empty());

    let decayed = frame(&mut world, &demolition, Duration::from_millis(50));
    assert!(decayed.contains(&Event::WallDecayed {
        cell: BRICK,
        stage: DestructionStage::new(2),
    }));
}

#[test]
fn untouched_walls_never_decay() {
    let mut world = world_with_brick();
    let demolition = Demolition::new();
    for _ in 0..10 {
        let events = frame(&mut world, &demolition, Duration::from_millis(500));
        assert!(events
            .iter()
            .all(|event| matches!(event, Event::TimeAdvanced { .. })));
    }
    assert_eq!(query::wall_view(&world).len(), 2);
}
