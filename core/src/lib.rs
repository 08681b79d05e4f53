#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gremlin Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate player intents
//! into [`Command`] values, the world executes those commands via its `apply`
//! entry point and broadcasts [`Event`] values describing what changed.
//! Systems read immutable snapshot views, such as [`WallView`] and
//! [`EnemyView`], and respond exclusively with new command batches.

pub mod collision;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Gremlin Maze.";

/// Cardinal directions available to every moving entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Location of a single grid tile expressed as column and row indices.
///
/// Indices are signed because fractional agent positions may be probed
/// past the edge of the layout before a wall turns them around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCell {
    column: i32,
    row: i32,
}

impl TileCell {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Continuous position anchored at the tile's origin.
    #[must_use]
    pub fn to_position(self) -> Position {
        Position::new(f64::from(self.column), f64::from(self.row))
    }
}

/// Continuous position measured in tiles.
///
/// The fractional part expresses travel progress inside a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a position from column (`x`) and row (`y`) coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Column coordinate in tiles.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Row coordinate in tiles.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Tile containing the position, obtained by flooring both axes.
    #[must_use]
    pub fn cell(&self) -> TileCell {
        self.floor_cell()
    }

    /// Tile addressed by flooring both coordinates.
    #[must_use]
    pub fn floor_cell(&self) -> TileCell {
        TileCell::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    /// Tile addressed by taking the ceiling of both coordinates.
    #[must_use]
    pub fn ceil_cell(&self) -> TileCell {
        TileCell::new(self.x.ceil() as i32, self.y.ceil() as i32)
    }

    /// Position snapped to the nearest tile on both axes.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    /// Position reached after travelling `distance_px` pixels along `direction`.
    ///
    /// Travel happens in pixel space so that sub-tile speeds accumulate the
    /// same way a sprite would move on screen; only one axis changes.
    #[must_use]
    pub fn advanced(&self, direction: Direction, distance_px: f64, tile_size_px: f64) -> Self {
        match direction {
            Direction::Up => Self::new(self.x, (self.y * tile_size_px - distance_px) / tile_size_px),
            Direction::Down => {
                Self::new(self.x, (self.y * tile_size_px + distance_px) / tile_size_px)
            }
            Direction::Left => {
                Self::new((self.x * tile_size_px - distance_px) / tile_size_px, self.y)
            }
            Direction::Right => {
                Self::new((self.x * tile_size_px + distance_px) / tile_size_px, self.y)
            }
        }
    }
}

/// Material of a wall tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    /// Indestructible obstacle.
    Stone,
    /// Destructible obstacle that crumbles after a projectile strike.
    Brick,
}

/// Remaining crumble stages of a struck brick wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestructionStage(u8);

impl DestructionStage {
    /// Stage assigned the moment a brick wall is struck.
    pub const STRUCK: DestructionStage = DestructionStage(3);

    /// Terminal stage at which the wall is spent.
    pub const SPENT: DestructionStage = DestructionStage(0);

    /// Creates a stage from its numeric value, clamped to the struck stage.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value > Self::STRUCK.0 {
            Self::STRUCK
        } else {
            Self(value)
        }
    }

    /// Numeric representation of the stage.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Reports whether the wall finished crumbling.
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        self.0 == 0
    }

    /// Stage that follows this one, saturating at [`DestructionStage::SPENT`].
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

/// Result of probing a prospective position against the wall layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collision {
    /// The position is free.
    None,
    /// The position overlaps an indestructible wall.
    Stone,
    /// The position overlaps a destructible wall.
    Brick,
}

impl Collision {
    /// Reports whether the probe hit any wall.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Unique identifier assigned to an enemy within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// How a finished session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player walked through the door of the final level.
    Won,
    /// The player was caught with no lives left.
    Lost,
}

/// Lifecycle state of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Levels are being played.
    Playing,
    /// The session ended and waits for a restart.
    Over {
        /// How the session ended.
        outcome: Outcome,
    },
}

impl SessionStatus {
    /// Reports whether the session reached a terminal state.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::Over { .. })
    }
}

/// Meaning of a single layout symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// `X`: indestructible wall.
    Stone,
    /// `B`: destructible wall.
    Brick,
    /// `W`: player spawn.
    PlayerSpawn,
    /// `E`: exit door.
    Door,
    /// `G`: enemy spawn.
    EnemySpawn,
    /// Any other symbol: walkable floor.
    Empty,
}

impl Tile {
    /// Interprets a layout symbol; unrecognised symbols are walkable floor.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            'X' => Self::Stone,
            'B' => Self::Brick,
            'W' => Self::PlayerSpawn,
            'E' => Self::Door,
            'G' => Self::EnemySpawn,
            _ => Self::Empty,
        }
    }
}

/// Parsed level layout: one character array per row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelLayout {
    rows: Vec<Vec<char>>,
}

impl LevelLayout {
    /// Creates a layout from already-split rows.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<char>>) -> Self {
        Self { rows }
    }

    /// Splits newline-delimited text into layout rows.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            rows: text.lines().map(|line| line.chars().collect()).collect(),
        }
    }

    /// Rows of the layout in top-to-bottom order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// Number of rows in the layout.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Iterates every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileCell, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, symbols)| {
            symbols.iter().enumerate().map(move |(column, symbol)| {
                (
                    TileCell::new(column as i32, row as i32),
                    Tile::from_symbol(*symbol),
                )
            })
        })
    }
}

/// Fully loaded session configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionConfig {
    /// Lives granted at session start.
    pub lives: u32,
    /// Level layouts in play order.
    pub levels: Vec<LevelLayout>,
    /// Gameplay constants shared by the world and every system.
    pub tuning: Tuning,
}

/// Gameplay constants threaded through every component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Pixel size of one tile.
    pub tile_size_px: f64,
    /// Player displacement per movement intent; one tile by default.
    pub player_step_px: f64,
    /// Enemy displacement per tick.
    pub enemy_speed_px: f64,
    /// Projectile displacement per tick.
    pub projectile_speed_px: f64,
    /// Maximum number of projectiles alive at the same time.
    pub projectile_cap: usize,
    /// Minimum time a destruction stage is held, in milliseconds.
    pub stage_duration_ms: u64,
    /// Lower bound of the enemy think interval, in milliseconds.
    pub think_interval_min_ms: u64,
    /// Inclusive random jitter added to the think interval, in milliseconds.
    pub think_interval_jitter_ms: u64,
    /// Number of equally likely outcomes in the respawn draw.
    pub respawn_odds: u32,
    /// Draw outcome that revives every dead enemy.
    pub respawn_trigger: u32,
    /// Maximum heading re-selections per enemy per tick.
    pub steer_attempts: u32,
}

impl Tuning {
    /// Minimum time a destruction stage is held.
    #[must_use]
    pub const fn stage_duration(&self) -> Duration {
        Duration::from_millis(self.stage_duration_ms)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size_px: 20.0,
            player_step_px: 20.0,
            enemy_speed_px: 0.5,
            projectile_speed_px: 0.7,
            projectile_cap: 2,
            stage_duration_ms: 200,
            think_interval_min_ms: 100,
            think_interval_jitter_ms: 400,
            respawn_odds: 1_000,
            respawn_trigger: 551,
            steer_attempts: 64,
        }
    }
}

/// Discrete player intents delivered by the input-mapping collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Step one tile to the left.
    MoveLeft,
    /// Step one tile to the right.
    MoveRight,
    /// Step one tile up.
    MoveUp,
    /// Step one tile down.
    MoveDown,
    /// Movement key released.
    StopMoving,
    /// Fire a projectile in the facing direction.
    Shoot,
    /// Start the session over from the first level.
    Restart,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player step one unit in the specified direction.
    StepPlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Snaps the player to the nearest tile.
    StopPlayer,
    /// Requests a projectile from the player's position.
    FireProjectile,
    /// Removes every brick wall that finished crumbling.
    PruneDestroyedWalls,
    /// Starts the destruction sequence of the brick wall at the cell.
    StrikeWall {
        /// Cell of the struck wall.
        cell: TileCell,
    },
    /// Moves a crumbling wall to its next destruction stage.
    DecayWall {
        /// Cell of the crumbling wall.
        cell: TileCell,
    },
    /// Marks an enemy as dead.
    KillEnemy {
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
    },
    /// Removes a projectile from the active set.
    DespawnProjectile {
        /// Identifier of the projectile to remove.
        projectile: ProjectileId,
    },
    /// Moves every live projectile along its heading.
    AdvanceProjectiles,
    /// Assigns a new heading to an enemy.
    SteerEnemy {
        /// Identifier of the enemy being steered.
        enemy: EnemyId,
        /// New heading for the enemy.
        direction: Direction,
    },
    /// Moves an enemy one tick along its heading.
    AdvanceEnemy {
        /// Identifier of the enemy to move.
        enemy: EnemyId,
    },
    /// Brings every dead enemy back to life.
    ReviveEnemies,
    /// Leaves the current level through its door.
    AdvanceLevel,
    /// Removes one life from the pool.
    LoseLife,
    /// Ends the session with the provided outcome.
    EndSession {
        /// How the session ended.
        outcome: Outcome,
    },
    /// Resets the session to the first level.
    RestartSession,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
        /// Session clock after the tick.
        now: Duration,
    },
    /// Confirms that the player moved.
    PlayerMoved {
        /// Position before the step.
        from: Position,
        /// Position after the step.
        to: Position,
    },
    /// Reports that a player step was refused by a wall.
    PlayerBlocked {
        /// Direction of the refused step.
        direction: Direction,
        /// Kind of wall that refused the step.
        collision: Collision,
    },
    /// Confirms that the player was snapped to a tile.
    PlayerSnapped {
        /// Position before snapping.
        from: Position,
        /// Tile-aligned position after snapping.
        to: Position,
    },
    /// Confirms that a projectile was created.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Position the projectile starts from.
        origin: Position,
        /// Heading of the projectile.
        direction: Direction,
    },
    /// Confirms that a projectile left the active set.
    ProjectileDespawned {
        /// Identifier of the removed projectile.
        projectile: ProjectileId,
    },
    /// Confirms that a brick wall started crumbling.
    WallStruck {
        /// Cell of the struck wall.
        cell: TileCell,
    },
    /// Confirms that a crumbling wall reached its next stage.
    WallDecayed {
        /// Cell of the crumbling wall.
        cell: TileCell,
        /// Stage the wall reached.
        stage: DestructionStage,
    },
    /// Confirms that a spent wall was removed.
    WallRemoved {
        /// Cell the wall occupied.
        cell: TileCell,
    },
    /// Confirms that an enemy died.
    EnemyKilled {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Confirms that an enemy changed heading.
    EnemySteered {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// New heading.
        direction: Direction,
    },
    /// Reports that the respawn pulse fired.
    EnemiesRevived {
        /// Number of enemies that came back to life.
        count: usize,
    },
    /// Reports that the player lost a life.
    LifeLost {
        /// Lives left after the loss.
        remaining: u32,
    },
    /// Reports that a level was built and entered.
    LevelStarted {
        /// Zero-based index of the level.
        index: usize,
    },
    /// Reports that the session reached a terminal state.
    SessionEnded {
        /// How the session ended.
        outcome: Outcome,
    },
    /// Reports that the session was reset to the first level.
    SessionRestarted,
}

/// Immutable representation of a wall used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallSnapshot {
    /// Cell occupied by the wall.
    pub cell: TileCell,
    /// Material of the wall.
    pub kind: WallKind,
    /// Current destruction stage, if the wall was struck.
    pub stage: Option<DestructionStage>,
    /// Session time at which the current stage began.
    pub stage_started_at: Duration,
}

/// Read-only snapshot describing all walls of the level.
#[derive(Clone, Debug, Default)]
pub struct WallView {
    snapshots: Vec<WallSnapshot>,
}

impl WallView {
    /// Creates a new wall view from the provided snapshots, preserving order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<WallSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured wall snapshots in store order.
    pub fn iter(&self) -> impl Iterator<Item = &WallSnapshot> {
        self.snapshots.iter()
    }

    /// Number of walls captured in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no walls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<WallSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position of the player.
    pub position: Position,
    /// Direction the player faces; projectiles travel this way.
    pub facing: Direction,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current position of the enemy.
    pub position: Position,
    /// Current heading; unset until the first wander evaluation.
    pub heading: Option<Direction>,
    /// Whether the enemy is alive.
    pub alive: bool,
}

/// Read-only snapshot describing all enemies of the level.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over enemies that are currently alive.
    pub fn living(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.alive)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Current position of the projectile.
    pub position: Position,
    /// Fixed heading of the projectile.
    pub direction: Direction,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable summary of the session bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Zero-based index of the level being played.
    pub level_index: usize,
    /// Number of levels in the session.
    pub total_levels: usize,
    /// Lives left in the pool.
    pub lives: u32,
    /// Lifecycle state of the session.
    pub status: SessionStatus,
}

/// Sprite variant selected for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// The player, drawn facing the provided direction.
    Player {
        /// Facing used to pick the sprite.
        facing: Direction,
    },
    /// A wandering enemy.
    Enemy,
    /// An intact stone wall.
    StoneWall,
    /// An intact brick wall.
    BrickWall,
    /// A brick wall partway through its destruction sequence.
    CrumblingBrick {
        /// Destruction stage being shown.
        stage: DestructionStage,
    },
    /// A projectile in flight.
    Projectile,
}

/// Capability interface shared by everything the render collaborator draws.
pub trait Entity {
    /// Position of the entity in tiles.
    fn position(&self) -> Position;

    /// Sprite variant the entity should be drawn with.
    fn sprite(&self) -> SpriteKey;

    /// Whether the entity should be drawn at all.
    fn is_alive(&self) -> bool;
}

impl Entity for PlayerSnapshot {
    fn position(&self) -> Position {
        self.position
    }

    fn sprite(&self) -> SpriteKey {
        SpriteKey::Player {
            facing: self.facing,
        }
    }

    fn is_alive(&self) -> bool {
        true
    }
}

impl Entity for EnemySnapshot {
    fn position(&self) -> Position {
        self.position
    }

    fn sprite(&self) -> SpriteKey {
        SpriteKey::Enemy
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

impl Entity for WallSnapshot {
    fn position(&self) -> Position {
        self.cell.to_position()
    }

    fn sprite(&self) -> SpriteKey {
        match (self.kind, self.stage) {
            (WallKind::Stone, _) => SpriteKey::StoneWall,
            (WallKind::Brick, None) => SpriteKey::BrickWall,
            (WallKind::Brick, Some(stage)) => SpriteKey::CrumblingBrick { stage },
        }
    }

    fn is_alive(&self) -> bool {
        true
    }
}

impl Entity for ProjectileSnapshot {
    fn position(&self) -> Position {
        self.position
    }

    fn sprite(&self) -> SpriteKey {
        SpriteKey::Projectile
    }

    fn is_alive(&self) -> bool {
        true
    }
}

/// Closed set of drawable entities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntitySnapshot {
    /// The player agent.
    Player(PlayerSnapshot),
    /// A wandering enemy.
    Enemy(EnemySnapshot),
    /// A stone or brick wall.
    Wall(WallSnapshot),
    /// A projectile in flight.
    Projectile(ProjectileSnapshot),
}

impl Entity for EntitySnapshot {
    fn position(&self) -> Position {
        match self {
            Self::Player(player) => player.position(),
            Self::Enemy(enemy) => enemy.position(),
            Self::Wall(wall) => wall.position(),
            Self::Projectile(projectile) => projectile.position(),
        }
    }

    fn sprite(&self) -> SpriteKey {
        match self {
            Self::Player(player) => player.sprite(),
            Self::Enemy(enemy) => enemy.sprite(),
            Self::Wall(wall) => wall.sprite(),
            Self::Projectile(projectile) => projectile.sprite(),
        }
    }

    fn is_alive(&self) -> bool {
        match self {
            Self::Player(player) => player.is_alive(),
            Self::Enemy(enemy) => enemy.is_alive(),
            Self::Wall(wall) => wall.is_alive(),
            Self::Projectile(projectile) => projectile.is_alive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_step_lands_on_next_tile() {
        let tuning = Tuning::default();
        let start = Position::new(3.0, 4.0);
        let moved = start.advanced(Direction::Right, tuning.player_step_px, tuning.tile_size_px);
        assert_eq!(moved, Position::new(4.0, 4.0));
        let moved = start.advanced(Direction::Up, tuning.player_step_px, tuning.tile_size_px);
        assert_eq!(moved, Position::new(3.0, 3.0));
    }

    #[test]
    fn enemy_step_moves_a_fraction_of_a_tile() {
        let tuning = Tuning::default();
        let start = Position::new(2.0, 2.0);
        let moved = start.advanced(Direction::Left, tuning.enemy_speed_px, tuning.tile_size_px);
        assert!((moved.x() - 1.975).abs() < 1e-9);
        assert_eq!(moved.y(), 2.0);
        assert_eq!(moved.floor_cell(), TileCell::new(1, 2));
        assert_eq!(moved.ceil_cell(), TileCell::new(2, 2));
    }

    #[test]
    fn rounding_is_idempotent() {
        let position = Position::new(2.6, 1.2);
        let once = position.rounded();
        assert_eq!(once, Position::new(3.0, 1.0));
        assert_eq!(once.rounded(), once);
    }

    #[test]
    fn destruction_stage_counts_down_and_saturates() {
        let mut stage = DestructionStage::STRUCK;
        let mut seen = vec![stage.get()];
        while !stage.is_spent() {
            stage = stage.next();
            seen.push(stage.get());
        }
        assert_eq!(seen, vec![3, 2, 1, 0]);
        assert_eq!(stage.next(), DestructionStage::SPENT);
        assert_eq!(DestructionStage::new(9), DestructionStage::STRUCK);
    }

    #[test]
    fn layout_symbols_map_to_tiles() {
        let layout = LevelLayout::parse("XW.G\nBE?");
        let tiles: Vec<_> = layout.tiles().collect();
        assert_eq!(layout.row_count(), 2);
        assert_eq!(layout.column_count(), 4);
        assert_eq!(tiles[0], (TileCell::new(0, 0), Tile::Stone));
        assert_eq!(tiles[1], (TileCell::new(1, 0), Tile::PlayerSpawn));
        assert_eq!(tiles[2], (TileCell::new(2, 0), Tile::Empty));
        assert_eq!(tiles[3], (TileCell::new(3, 0), Tile::EnemySpawn));
        assert_eq!(tiles[4], (TileCell::new(0, 1), Tile::Brick));
        assert_eq!(tiles[5], (TileCell::new(1, 1), Tile::Door));
        assert_eq!(tiles[6], (TileCell::new(2, 1), Tile::Empty));
    }

    #[test]
    fn tuning_fills_missing_fields_with_defaults() {
        let tuning: Tuning =
            serde_json::from_str(r#"{ "projectile_cap": 3, "stage_duration_ms": 50 }"#)
                .expect("tuning parses");
        assert_eq!(tuning.projectile_cap, 3);
        assert_eq!(tuning.stage_duration(), Duration::from_millis(50));
        assert_eq!(tuning.respawn_trigger, Tuning::default().respawn_trigger);
    }

    #[test]
    fn crumbling_brick_selects_stage_sprite() {
        let wall = WallSnapshot {
            cell: TileCell::new(1, 1),
            kind: WallKind::Brick,
            stage: Some(DestructionStage::new(2)),
            stage_started_at: Duration::ZERO,
        };
        assert_eq!(
            EntitySnapshot::Wall(wall).sprite(),
            SpriteKey::CrumblingBrick {
                stage: DestructionStage::new(2)
            }
        );
        assert_eq!(wall.position(), Position::new(1.0, 1.0));
    }

    #[test]
    fn dead_enemy_is_not_drawn() {
        let enemy = EnemySnapshot {
            id: EnemyId::new(0),
            position: Position::new(1.0, 1.0),
            heading: None,
            alive: false,
        };
        assert!(!EntitySnapshot::Enemy(enemy).is_alive());
    }
}
