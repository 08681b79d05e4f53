use gremlin_maze_core::{
    Command, DestructionStage, Direction, Event, LevelLayout, SessionConfig, TileCell, Tuning,
    WallKind,
};
use gremlin_maze_system_projectiles::Projectiles;
use gremlin_maze_world::{self as world, query, World};

fn world_from(layout: &str) -> World {
    World::new(SessionConfig {
        lives: 3,
        levels: vec![LevelLayout::parse(layout)],
        tuning: Tuning::default(),
    })
    .expect("valid layout")
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn step(world: &mut World, projectiles: &mut Projectiles) -> Vec<Event> {
    let mut commands = Vec::new();
    projectiles.handle(
        &query::tuning(world).clone(),
        &query::projectile_view(world),
        &query::wall_view(world),
        &query::enemy_view(world),
        &mut commands,
    );
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn fly_until<F>(world: &mut World, stop: F) -> Vec<Event>
where
    F: Fn(&Event) -> bool,
{
    let mut projectiles = Projectiles::new();
    let mut seen = Vec::new();
    for _ in 0..200 {
        let events = step(world, &mut projectiles);
        let done = events.iter().any(&stop);
        seen.extend(events);
        if done {
            return seen;
        }
    }
    panic!("projectile never reached its target: {seen:?}");
}

fn shoot_right(world: &mut World) {
    let _ = apply(
        world,
        Command::StepPlayer {
            direction: Direction::Right,
        },
    );
    let fired = apply(world, Command::FireProjectile);
    assert!(matches!(
        fired.as_slice(),
        [Event::ProjectileFired {
            direction: Direction::Right,
            ..
        }]
    ));
}

#[test]
fn projectile_crumbles_brick_it_reaches() {
    let mut world = world_from("XW...B.E");
    shoot_right(&mut world);

    let events = fly_until(&mut world, |event| {
        matches!(event, Event::WallStruck { .. })
    });

    assert!(events.contains(&Event::WallStruck {
        cell: TileCell::new(5, 0)
    }));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileDespawned { .. })));
    assert!(query::projectile_view(&world).is_empty());

    let brick = query::wall_view(&world)
        .into_vec()
        .into_iter()
        .find(|wall| wall.kind == WallKind::Brick)
        .expect("brick still standing while it crumbles");
    assert_eq!(brick.stage, Some(DestructionStage::STRUCK));
}

#[test]
fn stone_absorbs_projectile_without_damage() {
    let mut world = world_from("XW..X.E");
    shoot_right(&mut world);

    let events = fly_until(&mut world, |event| {
        matches!(event, Event::ProjectileDespawned { .. })
    });

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::WallStruck { .. })));
    assert!(query::wall_view(&world)
        .iter()
        .all(|wall| wall.stage.is_none()));
}

#[test]
fn projectile_kills_enemy_in_its_path() {
    let mut world = world_from("XW..G.E");
    shoot_right(&mut world);

    let events = fly_until(&mut world, |event| {
        matches!(event, Event::EnemyKilled { .. })
    });

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::ProjectileDespawned { .. })));
    assert!(query::projectile_view(&world).is_empty());
    assert_eq!(query::enemy_view(&world).living().count(), 0);
}

#[test]
fn in_flight_count_is_capped() {
    let mut world = world_from("XW.....E");
    for _ in 0..5 {
        let _ = apply(&mut world, Command::FireProjectile);
    }
    assert_eq!(
        query::projectile_view(&world).len(),
        query::tuning(&world).projectile_cap
    );
}
