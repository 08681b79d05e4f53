#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Gremlin Maze adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use gremlin_maze_core::{
    DestructionStage, Entity, Position, SessionSnapshot, SpriteKey, TileCell,
};
use std::{error::Error, fmt};

/// Banner shown once the session is over, whatever the outcome.
pub const GAME_OVER_BANNER: &str = "GAME OVER!!! Press R to Restart";

/// Label drawn on the door tile.
pub const DOOR_LABEL: &str = "EXIT";

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Flat fill used for a sprite by backends without image assets.
///
/// Crumbling bricks fade towards white as they approach the spent stage.
#[must_use]
pub fn sprite_color(key: SpriteKey) -> Color {
    const BRICK: Color = Color::from_rgb_u8(170, 74, 68);
    match key {
        SpriteKey::Player { .. } => Color::from_rgb_u8(64, 96, 230),
        SpriteKey::Enemy => Color::from_rgb_u8(60, 170, 70),
        SpriteKey::StoneWall => Color::from_rgb_u8(120, 120, 128),
        SpriteKey::BrickWall => BRICK,
        SpriteKey::CrumblingBrick { stage } => {
            let struck = f32::from(DestructionStage::STRUCK.get());
            let remaining = f32::from(stage.get());
            BRICK.lighten((struck - remaining + 1.0) / (struck + 1.0))
        }
        SpriteKey::Projectile => Color::from_rgb_u8(250, 200, 40),
    }
}

/// Describes the tile grid of a level in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in pixels.
    pub tile_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl TileGridPresentation {
    /// Height reserved below the grid for the heads-up display.
    pub const HUD_HEIGHT: f32 = 60.0;

    /// Creates a new tile grid descriptor.
    ///
    /// Returns an error when `tile_length` is not a positive, finite number.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        line_color: Color,
    ) -> Result<Self, RenderingError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            line_color,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Maps a tile-space position to the pixel-space origin of its sprite.
    #[must_use]
    pub fn pixel_origin(&self, position: Position) -> Vec2 {
        Vec2::new(position.x() as f32, position.y() as f32) * self.tile_length
    }

    /// Pixel-space origin of a tile.
    #[must_use]
    pub fn cell_origin(&self, cell: TileCell) -> Vec2 {
        self.pixel_origin(cell.to_position())
    }

    /// Tile whose area contains the provided pixel-space point.
    ///
    /// Returns `None` for points outside the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<TileCell> {
        if point.x < 0.0 || point.y < 0.0 || point.x >= self.width() || point.y >= self.height() {
            return None;
        }
        let tile = (point / self.tile_length).floor();
        Some(TileCell::new(tile.x as i32, tile.y as i32))
    }
}

/// A single drawable placed in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSprite {
    /// Variant the backend should draw.
    pub key: SpriteKey,
    /// Top-left corner of the sprite in pixels.
    pub origin: Vec2,
    /// Flat fill for backends without image assets.
    pub color: Color,
}

impl SceneSprite {
    /// Creates a sprite descriptor using the default palette.
    #[must_use]
    pub fn new(key: SpriteKey, origin: Vec2) -> Self {
        Self {
            key,
            origin,
            color: sprite_color(key),
        }
    }
}

/// The exit tile, drawn as a labelled square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorPresentation {
    /// Tile occupied by the door.
    pub cell: TileCell,
    /// Top-left corner of the door in pixels.
    pub origin: Vec2,
    /// Text drawn over the door.
    pub label: &'static str,
}

/// Lives, level counter and banner drawn in the bottom bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Lives left in the pool.
    pub lives: u32,
    /// One-based number of the level being played.
    pub level: usize,
    /// Number of levels in the session.
    pub total_levels: usize,
    /// Banner shown over the play area, if any.
    pub banner: Option<&'static str>,
}

impl HudPresentation {
    /// Derives the display from the session bookkeeping.
    ///
    /// After the final door the level counter stays on the last level.
    #[must_use]
    pub fn from_session(session: &SessionSnapshot) -> Self {
        Self {
            lives: session.lives,
            level: (session.level_index + 1).min(session.total_levels.max(1)),
            total_levels: session.total_levels,
            banner: session.status.is_over().then_some(GAME_OVER_BANNER),
        }
    }

    /// Text for the lives counter.
    #[must_use]
    pub fn lives_label(&self) -> String {
        format!("Lives: {}", self.lives)
    }

    /// Text for the level counter.
    #[must_use]
    pub fn level_label(&self) -> String {
        format!("Level {}/{}", self.level, self.total_levels)
    }
}

/// Scene description combining the tile grid, the entities and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the play area.
    pub tile_grid: TileGridPresentation,
    /// Sprites in draw order.
    pub sprites: Vec<SceneSprite>,
    /// Exit tile of the level.
    pub door: DoorPresentation,
    /// Bottom bar contents.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        tile_grid: TileGridPresentation,
        sprites: Vec<SceneSprite>,
        door: DoorPresentation,
        hud: HudPresentation,
    ) -> Self {
        Self {
            tile_grid,
            sprites,
            door,
            hud,
        }
    }

    /// Builds a scene from entity snapshots, skipping the ones that are not alive.
    pub fn from_entities<'a, E, I>(
        tile_grid: TileGridPresentation,
        entities: I,
        door: TileCell,
        session: &SessionSnapshot,
    ) -> Self
    where
        E: Entity + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        let sprites = entities
            .into_iter()
            .filter(|entity| entity.is_alive())
            .map(|entity| {
                SceneSprite::new(entity.sprite(), tile_grid.pixel_origin(entity.position()))
            })
            .collect();
        let door = DoorPresentation {
            cell: door,
            origin: tile_grid.cell_origin(door),
            label: DOOR_LABEL,
        };

        Self::new(tile_grid, sprites, door, HudPresentation::from_session(session))
    }

    /// Height of the entire scene including the bottom bar.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.tile_grid.height() + TileGridPresentation::HUD_HEIGHT
    }
}

/// Rendering backend capable of presenting Gremlin Maze scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive side length.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use gremlin_maze_core::{
        Direction, EnemyId, EnemySnapshot, EntitySnapshot, Outcome, PlayerSnapshot,
        SessionStatus, WallKind, WallSnapshot,
    };
    use std::time::Duration;

    fn grid() -> TileGridPresentation {
        TileGridPresentation::new(6, 4, 20.0, Color::from_rgb_u8(0, 0, 0)).expect("valid grid")
    }

    fn session(status: SessionStatus) -> SessionSnapshot {
        SessionSnapshot {
            level_index: 1,
            total_levels: 2,
            lives: 3,
            status,
        }
    }

    #[test]
    fn tile_grid_rejects_degenerate_tile_length() {
        let error = TileGridPresentation::new(3, 3, 0.0, Color::from_rgb_u8(0, 0, 0))
            .expect_err("zero tile length must be rejected");
        assert!(matches!(
            error,
            RenderingError::InvalidTileLength { tile_length } if tile_length == 0.0
        ));
    }

    #[test]
    fn positions_map_to_pixel_origins_and_back() {
        let grid = grid();
        let origin = grid.pixel_origin(Position::new(2.5, 1.0));
        assert_eq!(origin, Vec2::new(50.0, 20.0));
        assert_eq!(grid.cell_at(origin), Some(TileCell::new(2, 1)));
        assert_eq!(grid.cell_at(Vec2::new(120.0, 10.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(-0.1, 10.0)), None);
    }

    #[test]
    fn scene_skips_dead_entities_and_keeps_draw_order() {
        let entities = vec![
            EntitySnapshot::Wall(WallSnapshot {
                cell: TileCell::new(0, 0),
                kind: WallKind::Brick,
                stage: Some(DestructionStage::new(2)),
                stage_started_at: Duration::ZERO,
            }),
            EntitySnapshot::Player(PlayerSnapshot {
                position: Position::new(1.0, 1.0),
                facing: Direction::Up,
            }),
            EntitySnapshot::Enemy(EnemySnapshot {
                id: EnemyId::new(0),
                position: Position::new(3.0, 2.0),
                heading: None,
                alive: false,
            }),
        ];

        let scene = Scene::from_entities(
            grid(),
            &entities,
            TileCell::new(5, 3),
            &session(SessionStatus::Playing),
        );

        let keys: Vec<_> = scene.sprites.iter().map(|sprite| sprite.key).collect();
        assert_eq!(
            keys,
            vec![
                SpriteKey::CrumblingBrick {
                    stage: DestructionStage::new(2)
                },
                SpriteKey::Player {
                    facing: Direction::Up
                },
            ]
        );
        assert_eq!(scene.door.origin, Vec2::new(100.0, 60.0));
        assert_eq!(scene.door.label, DOOR_LABEL);
        assert_eq!(scene.total_height(), 80.0 + TileGridPresentation::HUD_HEIGHT);
    }

    #[test]
    fn hud_reports_progress_and_banner() {
        let playing = HudPresentation::from_session(&session(SessionStatus::Playing));
        assert_eq!(playing.lives_label(), "Lives: 3");
        assert_eq!(playing.level_label(), "Level 2/2");
        assert_eq!(playing.banner, None);

        let won = HudPresentation::from_session(&SessionSnapshot {
            level_index: 2,
            ..session(SessionStatus::Over {
                outcome: Outcome::Won,
            })
        });
        assert_eq!(won.level_label(), "Level 2/2");
        assert_eq!(won.banner, Some(GAME_OVER_BANNER));
    }

    #[test]
    fn crumbling_bricks_fade_with_each_stage() {
        let intact = sprite_color(SpriteKey::BrickWall);
        let fading: Vec<_> = [3, 2, 1, 0]
            .into_iter()
            .map(|stage| {
                sprite_color(SpriteKey::CrumblingBrick {
                    stage: DestructionStage::new(stage),
                })
            })
            .collect();

        assert!(fading[0].green > intact.green);
        for pair in fading.windows(2) {
            assert!(pair[1].green > pair[0].green);
        }
    }
}
