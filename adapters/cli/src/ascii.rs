//! Text backend that prints each presented scene as a character grid.

use std::io::Write;

use anyhow::{Context, Result};
use glam::Vec2;
use gremlin_maze_core::{Direction, SpriteKey};
use gremlin_maze_rendering::{RenderingBackend, Scene};

/// Presents scenes as text on the wrapped writer.
#[derive(Debug)]
pub(crate) struct AsciiBackend<W> {
    out: W,
    frames: usize,
}

impl<W: Write> AsciiBackend<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Number of frames presented so far.
    pub(crate) fn frames(&self) -> usize {
        self.frames
    }
}

impl<W: Write> RenderingBackend for AsciiBackend<W> {
    fn present(&mut self, scene: &Scene) -> Result<()> {
        let frame = render(scene);
        self.out
            .write_all(frame.as_bytes())
            .context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")?;
        self.frames += 1;
        Ok(())
    }
}

/// Glyph used for a sprite.
pub(crate) fn glyph(key: SpriteKey) -> char {
    match key {
        SpriteKey::Player { facing } => match facing {
            Direction::Up => '^',
            Direction::Down => 'v',
            Direction::Left => '<',
            Direction::Right => '>',
        },
        SpriteKey::Enemy => 'G',
        SpriteKey::StoneWall => 'X',
        SpriteKey::BrickWall => 'B',
        SpriteKey::CrumblingBrick { stage } => {
            char::from_digit(u32::from(stage.get()), 10).unwrap_or('B')
        }
        SpriteKey::Projectile => '*',
    }
}

/// Renders a scene to text: the grid, then the HUD and the banner.
///
/// Sprites are placed on the tile nearest to their origin; later sprites
/// cover earlier ones.
pub(crate) fn render(scene: &Scene) -> String {
    let grid = &scene.tile_grid;
    let columns = grid.columns as usize;
    let rows = grid.rows as usize;
    let mut cells = vec![vec!['.'; columns]; rows];

    let half_tile = Vec2::splat(grid.tile_length * 0.5);
    let mut place = |origin: Vec2, glyph: char| {
        if let Some(cell) = grid.cell_at(origin + half_tile) {
            if let Some(slot) = cells
                .get_mut(cell.row() as usize)
                .and_then(|row| row.get_mut(cell.column() as usize))
            {
                *slot = glyph;
            }
        }
    };

    place(scene.door.origin, 'E');
    for sprite in &scene.sprites {
        place(sprite.origin, glyph(sprite.key));
    }

    let mut text = String::with_capacity((columns + 1) * (rows + 3));
    for row in cells {
        text.extend(row);
        text.push('\n');
    }
    text.push_str(&format!(
        "{}    {}\n",
        scene.hud.lives_label(),
        scene.hud.level_label()
    ));
    if let Some(banner) = scene.hud.banner {
        text.push_str(banner);
        text.push('\n');
    }
    text.push('\n');
    text
}
