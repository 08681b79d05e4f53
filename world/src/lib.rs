#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Gremlin Maze.
//!
//! The world owns the entity store of the active level (walls, the player,
//! enemies and projectiles) together with the session bookkeeping that
//! survives level changes. It is mutated exclusively through [`apply`].

use std::time::Duration;

use gremlin_maze_core::{
    collision::{self, Obstacle},
    Collision, Command, DestructionStage, Direction, EnemyId, Event, LevelLayout, Outcome,
    Position, ProjectileId, SessionConfig, SessionStatus, Tile, TileCell, Tuning, WallKind,
};
use thiserror::Error;
use tracing::{debug, info};

/// Direction the player faces when a level starts.
const SPAWN_FACING: Direction = Direction::Left;

/// Reasons a session configuration cannot be turned into playable levels.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The configuration lists no levels at all.
    #[error("session configuration lists no levels")]
    NoLevels,
    /// A layout has no `W` tile.
    #[error("level {} has no player spawn ('W')", .level + 1)]
    MissingPlayer {
        /// Zero-based index of the offending level.
        level: usize,
    },
    /// A layout has no `E` tile.
    #[error("level {} has no door ('E')", .level + 1)]
    MissingDoor {
        /// Zero-based index of the offending level.
        level: usize,
    },
}

/// Immutable blueprint of a level, built once from its layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    walls: Vec<(TileCell, WallKind)>,
    enemy_spawns: Vec<TileCell>,
    player_spawn: TileCell,
    door: TileCell,
    columns: usize,
    rows: usize,
}

impl Level {
    /// Builds a level from a parsed layout.
    ///
    /// When `W` or `E` appears more than once the last occurrence in
    /// row-major order is used.
    pub fn from_layout(index: usize, layout: &LevelLayout) -> Result<Self, LevelError> {
        let mut walls = Vec::new();
        let mut enemy_spawns = Vec::new();
        let mut player_spawn = None;
        let mut door = None;

        for (cell, tile) in layout.tiles() {
            match tile {
                Tile::Stone => walls.push((cell, WallKind::Stone)),
                Tile::Brick => walls.push((cell, WallKind::Brick)),
                Tile::EnemySpawn => enemy_spawns.push(cell),
                Tile::PlayerSpawn => player_spawn = Some(cell),
                Tile::Door => door = Some(cell),
                Tile::Empty => {}
            }
        }

        Ok(Self {
            walls,
            enemy_spawns,
            player_spawn: player_spawn.ok_or(LevelError::MissingPlayer { level: index })?,
            door: door.ok_or(LevelError::MissingDoor { level: index })?,
            columns: layout.column_count(),
            rows: layout.row_count(),
        })
    }

    /// Walls of the level in row-major order.
    #[must_use]
    pub fn walls(&self) -> &[(TileCell, WallKind)] {
        &self.walls
    }

    /// Cells where enemies appear when the level starts.
    #[must_use]
    pub fn enemy_spawns(&self) -> &[TileCell] {
        &self.enemy_spawns
    }

    /// Cell where the player appears when the level starts.
    #[must_use]
    pub const fn player_spawn(&self) -> TileCell {
        self.player_spawn
    }

    /// Cell of the exit door.
    #[must_use]
    pub const fn door(&self) -> TileCell {
        self.door
    }

    /// Width of the layout in tiles.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Height of the layout in tiles.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }
}

/// Represents the authoritative Gremlin Maze world state.
#[derive(Debug)]
pub struct World {
    levels: Vec<Level>,
    starting_lives: u32,
    tuning: Tuning,
    session: Session,
    store: EntityStore,
    now: Duration,
}

impl World {
    /// Creates a world positioned at the start of the first level.
    pub fn new(config: SessionConfig) -> Result<Self, LevelError> {
        let levels = config
            .levels
            .iter()
            .enumerate()
            .map(|(index, layout)| Level::from_layout(index, layout))
            .collect::<Result<Vec<_>, _>>()?;
        let first = levels.first().ok_or(LevelError::NoLevels)?;
        let store = EntityStore::from_level(first);

        Ok(Self {
            starting_lives: config.lives,
            tuning: config.tuning,
            session: Session::new(config.lives),
            store,
            levels,
            now: Duration::ZERO,
        })
    }

    fn enter_level(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let Some(level) = self.levels.get(index) else {
            return;
        };
        self.store = EntityStore::from_level(level);
        self.session.level_index = index;
        info!(
            level = index + 1,
            total = self.levels.len(),
            lives = self.session.lives,
            "level started"
        );
        out_events.push(Event::LevelStarted { index });
    }

    fn end_session(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        if self.session.status.is_over() {
            return;
        }
        self.session.status = SessionStatus::Over { outcome };
        info!(?outcome, level = self.session.level_index + 1, "session ended");
        out_events.push(Event::SessionEnded { outcome });
    }

    fn step_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let player = &mut self.store.player;
        player.facing = direction;

        let from = player.position;
        let candidate = from.advanced(
            direction,
            self.tuning.player_step_px,
            self.tuning.tile_size_px,
        );
        match collision::resolve(&self.store.walls, candidate) {
            Collision::None => {
                player.position = candidate;
                out_events.push(Event::PlayerMoved {
                    from,
                    to: candidate,
                });
            }
            blocked => out_events.push(Event::PlayerBlocked {
                direction,
                collision: blocked,
            }),
        }
    }

    fn fire_projectile(&mut self, out_events: &mut Vec<Event>) {
        if self.store.projectiles.len() >= self.tuning.projectile_cap {
            return;
        }

        let id = ProjectileId::new(self.store.next_projectile);
        self.store.next_projectile = self.store.next_projectile.wrapping_add(1);
        let origin = self.store.player.position;
        let direction = self.store.player.facing;
        self.store.projectiles.push(Projectile {
            id,
            position: origin,
            direction,
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            origin,
            direction,
        });
    }

    fn prune_destroyed_walls(&mut self, out_events: &mut Vec<Event>) {
        self.store.walls.retain(|wall| {
            if wall.is_spent() {
                out_events.push(Event::WallRemoved { cell: wall.cell });
                false
            } else {
                true
            }
        });
    }

    fn strike_wall(&mut self, cell: TileCell, out_events: &mut Vec<Event>) {
        let now = self.now;
        let Some(wall) = self
            .store
            .walls
            .iter_mut()
            .find(|wall| wall.cell == cell && wall.kind == WallKind::Brick)
        else {
            return;
        };
        if wall.stage.is_some() {
            return;
        }

        wall.stage = Some(DestructionStage::STRUCK);
        wall.stage_started_at = now;
        debug!(column = cell.column(), row = cell.row(), "brick wall struck");
        out_events.push(Event::WallStruck { cell });
    }

    fn decay_wall(&mut self, cell: TileCell, out_events: &mut Vec<Event>) {
        let now = self.now;
        let Some(wall) = self.store.walls.iter_mut().find(|wall| wall.cell == cell) else {
            return;
        };
        let Some(stage) = wall.stage else {
            return;
        };
        if stage.is_spent() {
            return;
        }

        let next = stage.next();
        wall.stage = Some(next);
        wall.stage_started_at = now;
        out_events.push(Event::WallDecayed { cell, stage: next });
    }

    fn kill_enemy(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        if let Some(target) = self.store.enemy_mut(enemy) {
            if target.kill() {
                debug!(enemy = enemy.get(), "enemy killed");
                out_events.push(Event::EnemyKilled { enemy });
            }
        }
    }

    fn revive_enemies(&mut self, out_events: &mut Vec<Event>) {
        let mut count = 0;
        for enemy in &mut self.store.enemies {
            if enemy.revive() {
                count += 1;
            }
        }
        debug!(count, "respawn pulse");
        out_events.push(Event::EnemiesRevived { count });
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) {
        let next = self.session.level_index + 1;
        if next >= self.levels.len() {
            self.session.level_index = next;
            self.end_session(Outcome::Won, out_events);
        } else {
            self.enter_level(next, out_events);
        }
    }

    fn lose_life(&mut self, out_events: &mut Vec<Event>) {
        self.session.lives = self.session.lives.saturating_sub(1);
        info!(remaining = self.session.lives, "life lost");
        out_events.push(Event::LifeLost {
            remaining: self.session.lives,
        });
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.session = Session::new(self.starting_lives);
        out_events.push(Event::SessionRestarted);
        self.enter_level(0, out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the session is over only [`Command::Tick`] and
/// [`Command::RestartSession`] have any effect.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.session.status.is_over()
        && !matches!(command, Command::Tick { .. } | Command::RestartSession)
    {
        return;
    }

    match command {
        Command::Tick { dt } => {
            world.now = world.now.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt, now: world.now });
        }
        Command::StepPlayer { direction } => world.step_player(direction, out_events),
        Command::StopPlayer => {
            let player = &mut world.store.player;
            let from = player.position;
            let to = from.rounded();
            if to != from {
                player.position = to;
                out_events.push(Event::PlayerSnapped { from, to });
            }
        }
        Command::FireProjectile => world.fire_projectile(out_events),
        Command::PruneDestroyedWalls => world.prune_destroyed_walls(out_events),
        Command::StrikeWall { cell } => world.strike_wall(cell, out_events),
        Command::DecayWall { cell } => world.decay_wall(cell, out_events),
        Command::KillEnemy { enemy } => world.kill_enemy(enemy, out_events),
        Command::DespawnProjectile { projectile } => {
            let before = world.store.projectiles.len();
            world
                .store
                .projectiles
                .retain(|candidate| candidate.id != projectile);
            if world.store.projectiles.len() != before {
                out_events.push(Event::ProjectileDespawned { projectile });
            }
        }
        Command::AdvanceProjectiles => {
            let speed = world.tuning.projectile_speed_px;
            let tile = world.tuning.tile_size_px;
            for projectile in &mut world.store.projectiles {
                projectile.position =
                    projectile
                        .position
                        .advanced(projectile.direction, speed, tile);
            }
        }
        Command::SteerEnemy { enemy, direction } => {
            if let Some(target) = world.store.enemy_mut(enemy) {
                if target.heading != Some(direction) {
                    target.heading = Some(direction);
                    out_events.push(Event::EnemySteered { enemy, direction });
                }
            }
        }
        Command::AdvanceEnemy { enemy } => {
            let speed = world.tuning.enemy_speed_px;
            let tile = world.tuning.tile_size_px;
            if let Some(target) = world.store.enemy_mut(enemy) {
                if let Some(heading) = target.heading {
                    target.position = target.position.advanced(heading, speed, tile);
                }
            }
        }
        Command::ReviveEnemies => world.revive_enemies(out_events),
        Command::AdvanceLevel => world.advance_level(out_events),
        Command::LoseLife => world.lose_life(out_events),
        Command::EndSession { outcome } => world.end_session(outcome, out_events),
        Command::RestartSession => world.restart(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use gremlin_maze_core::{
        EnemySnapshot, EnemyView, EntitySnapshot, PlayerSnapshot, ProjectileSnapshot,
        ProjectileView, SessionSnapshot, TileCell, Tuning, WallSnapshot, WallView,
    };

    use super::{Level, World};

    /// Session clock: time accumulated through ticks since the world was created.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now
    }

    /// Gameplay constants the world was configured with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Summary of the session bookkeeping.
    #[must_use]
    pub fn session(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            level_index: world.session.level_index,
            total_levels: world.levels.len(),
            lives: world.session.lives,
            status: world.session.status,
        }
    }

    /// Blueprint of the level currently being played.
    ///
    /// After the final door the index runs past the level list; the last
    /// level is reported in that case.
    #[must_use]
    pub fn level(world: &World) -> Option<&Level> {
        world
            .levels
            .get(world.session.level_index)
            .or_else(|| world.levels.last())
    }

    /// Cell of the active level's door.
    #[must_use]
    pub fn door(world: &World) -> TileCell {
        world.store.door
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.store.player.position,
            facing: world.store.player.facing,
        }
    }

    /// Captures a read-only view of the walls in store order.
    #[must_use]
    pub fn wall_view(world: &World) -> WallView {
        WallView::from_snapshots(
            world
                .store
                .walls
                .iter()
                .map(|wall| WallSnapshot {
                    cell: wall.cell,
                    kind: wall.kind,
                    stage: wall.stage,
                    stage_started_at: wall.stage_started_at,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the enemies, dead ones included.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .store
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    heading: enemy.heading,
                    alive: enemy.is_alive(),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .store
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    position: projectile.position,
                    direction: projectile.direction,
                })
                .collect(),
        )
    }

    /// Every entity of the level in draw order: walls, player, enemies, projectiles.
    #[must_use]
    pub fn entities(world: &World) -> Vec<EntitySnapshot> {
        let walls = wall_view(world).into_vec().into_iter().map(EntitySnapshot::Wall);
        let enemies = enemy_view(world).into_vec().into_iter().map(EntitySnapshot::Enemy);
        let projectiles = projectile_view(world)
            .iter()
            .copied()
            .map(EntitySnapshot::Projectile)
            .collect::<Vec<_>>();

        walls
            .chain(std::iter::once(EntitySnapshot::Player(player(world))))
            .chain(enemies)
            .chain(projectiles)
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct Session {
    level_index: usize,
    lives: u32,
    status: SessionStatus,
}

impl Session {
    fn new(lives: u32) -> Self {
        Self {
            level_index: 0,
            lives,
            status: SessionStatus::Playing,
        }
    }
}

#[derive(Debug)]
struct EntityStore {
    walls: Vec<Wall>,
    player: Player,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    door: TileCell,
    next_projectile: u32,
}

impl EntityStore {
    fn from_level(level: &Level) -> Self {
        Self {
            walls: level
                .walls()
                .iter()
                .map(|&(cell, kind)| Wall {
                    cell,
                    kind,
                    stage: None,
                    stage_started_at: Duration::ZERO,
                })
                .collect(),
            player: Player {
                position: level.player_spawn().to_position(),
                facing: SPAWN_FACING,
            },
            enemies: level
                .enemy_spawns()
                .iter()
                .enumerate()
                .map(|(index, cell)| Enemy {
                    id: EnemyId::new(index as u32),
                    position: cell.to_position(),
                    heading: None,
                    alive: true,
                })
                .collect(),
            projectiles: Vec::new(),
            door: level.door(),
            next_projectile: 0,
        }
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|candidate| candidate.id == enemy)
    }
}

#[derive(Clone, Debug)]
struct Wall {
    cell: TileCell,
    kind: WallKind,
    stage: Option<DestructionStage>,
    stage_started_at: Duration,
}

impl Wall {
    fn is_spent(&self) -> bool {
        self.stage.is_some_and(|stage| stage.is_spent())
    }
}

impl Obstacle for Wall {
    fn cell(&self) -> TileCell {
        self.cell
    }

    fn kind(&self) -> WallKind {
        self.kind
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    position: Position,
    facing: Direction,
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    position: Position,
    heading: Option<Direction>,
    alive: bool,
}

impl Enemy {
    fn is_alive(&self) -> bool {
        self.alive
    }

    /// Returns whether the enemy was alive before the call.
    fn kill(&mut self) -> bool {
        let was_alive = self.alive;
        self.alive = false;
        was_alive
    }

    /// Returns whether the enemy was dead before the call.
    fn revive(&mut self) -> bool {
        let was_dead = !self.alive;
        self.alive = true;
        was_dead
    }
}

#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    position: Position,
    direction: Direction,
}
