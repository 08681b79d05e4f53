#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-stepped composition of the world and the gameplay systems.
//!
//! A host drives the session through [`Simulation::update`] once per frame and
//! forwards player intents through [`Simulation::handle_intent`] (or the named
//! wrappers) whenever they arrive. Every system reads fresh snapshot views and
//! its commands are applied before the next stage runs, so stages observe the
//! effects of the ones before them within the same tick.

use std::time::Duration;

use gremlin_maze_core::{
    Command, Direction, EntitySnapshot, Event, Intent, SessionConfig, SessionSnapshot, TileCell,
    Tuning,
};
use gremlin_maze_system_demolition::Demolition;
use gremlin_maze_system_progression::{Progression, RespawnPulse};
use gremlin_maze_system_projectiles::Projectiles;
use gremlin_maze_system_wander::Wander;
use gremlin_maze_world::{self as world, query, LevelError, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Owns the world, the systems and the single random number generator of a session.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    wander: Wander,
    projectiles: Projectiles,
    demolition: Demolition,
    progression: Progression,
    respawn: RespawnPulse,
    rng: ChaCha8Rng,
    commands: Vec<Command>,
}

impl Simulation {
    /// Builds a session from the configuration, seeding the generator with `seed`.
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self, LevelError> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Builds a session that draws from the provided generator.
    pub fn with_rng(config: SessionConfig, rng: ChaCha8Rng) -> Result<Self, LevelError> {
        Ok(Self {
            world: World::new(config)?,
            wander: Wander::new(),
            projectiles: Projectiles::new(),
            demolition: Demolition::new(),
            progression: Progression::new(),
            respawn: RespawnPulse::new(),
            rng,
            commands: Vec::new(),
        })
    }

    /// Runs one tick of the pipeline and appends the resulting events to `out_events`.
    ///
    /// Stages run in a fixed order: clock, pruning of spent walls, projectile
    /// resolution, wander, wall animation, respawn pulse and finally the win
    /// and loss evaluation. Once the session is over only the clock moves.
    pub fn update(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        world::apply(&mut self.world, Command::Tick { dt }, out_events);
        if self.is_over() {
            return;
        }
        trace!(now = ?query::now(&self.world), "tick");

        world::apply(&mut self.world, Command::PruneDestroyedWalls, out_events);

        self.projectiles.handle(
            query::tuning(&self.world),
            &query::projectile_view(&self.world),
            &query::wall_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.commands,
        );
        self.flush("projectiles", out_events);

        self.wander.handle(
            query::now(&self.world),
            query::tuning(&self.world),
            &query::enemy_view(&self.world),
            &query::wall_view(&self.world),
            &mut self.rng,
            &mut self.commands,
        );
        self.flush("wander", out_events);

        self.demolition.handle(
            query::now(&self.world),
            query::tuning(&self.world),
            &query::wall_view(&self.world),
            &mut self.commands,
        );
        self.flush("demolition", out_events);

        self.respawn
            .handle(query::tuning(&self.world), &mut self.rng, &mut self.commands);
        self.flush("respawn", out_events);

        self.progression.handle(
            &query::session(&self.world),
            &query::player(&self.world),
            query::door(&self.world),
            &query::enemy_view(&self.world),
            &mut self.commands,
        );
        self.flush("progression", out_events);
    }

    /// Translates a player intent into world commands.
    pub fn handle_intent(&mut self, intent: Intent, out_events: &mut Vec<Event>) {
        debug!(?intent, "intent");
        let command = match intent {
            Intent::MoveLeft => Command::StepPlayer {
                direction: Direction::Left,
            },
            Intent::MoveRight => Command::StepPlayer {
                direction: Direction::Right,
            },
            Intent::MoveUp => Command::StepPlayer {
                direction: Direction::Up,
            },
            Intent::MoveDown => Command::StepPlayer {
                direction: Direction::Down,
            },
            Intent::StopMoving => Command::StopPlayer,
            Intent::Shoot => Command::FireProjectile,
            Intent::Restart => Command::RestartSession,
        };
        world::apply(&mut self.world, command, out_events);
    }

    /// Steps the player one tile to the left.
    pub fn move_left(&mut self, out_events: &mut Vec<Event>) {
        self.handle_intent(Intent::MoveLeft, out_events);
    }

    /// Steps the player one tile to the right.
    pub fn move_right(&mut self, out_events: &mut Vec<Event>) {
        self.handle_intent(Intent::MoveRight, out_events);
    }

    /// Steps the player one tile up.
    pub fn move_up(&mut self, out_events: &mut Vec<Event>) {
        self.handle_intent(Intent::MoveUp, out_events);
    }

    /// Steps the player one tile down.
    pub fn move_down(&mut self, out_events: &mut Vec<Event>) {
        self.handle_intent(Intent::MoveDown, out_events);
    }

    /// Snaps the player to the nearest tile.
    pub fn stop_moving(&mut self, out_events: &mut Vec<Event>) {
        self.handle_intent(Intent::StopMoving, out_events);
    }

    /// Fires a projectile in the player's facing direction.
    pub fn shoot(&mut self, out_events: &mut Vec<Event>) {
        self.handle_intent(Intent::Shoot, out_events);
    }

    /// Starts the session over from the first level.
    pub fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.handle_intent(Intent::Restart, out_events);
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Summary of the session bookkeeping.
    #[must_use]
    pub fn session(&self) -> SessionSnapshot {
        query::session(&self.world)
    }

    /// Reports whether the session reached a terminal outcome.
    #[must_use]
    pub fn is_over(&self) -> bool {
        query::session(&self.world).status.is_over()
    }

    /// Session clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        query::now(&self.world)
    }

    /// Gameplay constants of the session.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        query::tuning(&self.world)
    }

    /// Cell of the active level's door.
    #[must_use]
    pub fn door(&self) -> TileCell {
        query::door(&self.world)
    }

    /// Columns and rows of the active level's layout.
    #[must_use]
    pub fn grid_size(&self) -> (usize, usize) {
        query::level(&self.world).map_or((0, 0), |level| (level.columns(), level.rows()))
    }

    /// Entities of the active level in draw order.
    #[must_use]
    pub fn entities(&self) -> Vec<EntitySnapshot> {
        query::entities(&self.world)
    }

    fn flush(&mut self, stage: &'static str, out_events: &mut Vec<Event>) {
        if self.commands.is_empty() {
            return;
        }
        trace!(stage, commands = self.commands.len(), "applying");
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }
}
