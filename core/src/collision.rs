//! Tile hit-tests shared by the world and every system.
//!
//! A probe position touches two candidate tiles: the one addressed by
//! flooring both coordinates and the one addressed by taking the ceiling of
//! both. Mixed floor/ceiling corners are not tested, so a probe sitting
//! fractionally on both axes can slip past a wall on the off-diagonal.

use crate::{Collision, Position, TileCell, WallKind, WallSnapshot};

/// Anything that occupies a wall tile.
pub trait Obstacle {
    /// Tile occupied by the obstacle.
    fn cell(&self) -> TileCell;

    /// Material of the obstacle.
    fn kind(&self) -> WallKind;
}

impl Obstacle for WallSnapshot {
    fn cell(&self) -> TileCell {
        self.cell
    }

    fn kind(&self) -> WallKind {
        self.kind
    }
}

/// Reports whether a probe at `next` touches `cell`.
#[must_use]
pub fn touches(next: Position, cell: TileCell) -> bool {
    cell == next.floor_cell() || cell == next.ceil_cell()
}

/// Resolves a prospective position against the wall layout.
///
/// A brick match takes precedence over a stone match; with no match the
/// probe is free.
#[must_use]
pub fn resolve<'a, W, I>(walls: I, next: Position) -> Collision
where
    W: Obstacle + 'a,
    I: IntoIterator<Item = &'a W>,
{
    let mut hit_stone = false;
    for wall in walls {
        if !touches(next, wall.cell()) {
            continue;
        }
        match wall.kind() {
            WallKind::Brick => return Collision::Brick,
            WallKind::Stone => hit_stone = true,
        }
    }

    if hit_stone {
        Collision::Stone
    } else {
        Collision::None
    }
}

/// Finds the first brick wall, in store order, touched by a probe at `next`.
#[must_use]
pub fn struck_brick<'a, W, I>(walls: I, next: Position) -> Option<TileCell>
where
    W: Obstacle + 'a,
    I: IntoIterator<Item = &'a W>,
{
    walls
        .into_iter()
        .filter(|wall| wall.kind() == WallKind::Brick)
        .map(Obstacle::cell)
        .find(|cell| touches(next, *cell))
}

/// Reports whether a projectile probing `next` hits an enemy standing at `enemy`.
///
/// The floor corner compares both axes; the ceiling corner reads the
/// projectile's row against both enemy axes.
#[must_use]
pub fn projectile_hits_enemy(next: Position, enemy: Position) -> bool {
    let floor_hit =
        next.x().floor() == enemy.x().floor() && next.y().floor() == enemy.y().floor();
    let ceil_hit = next.y().ceil() == enemy.x().ceil() && next.y().ceil() == enemy.y().ceil();
    floor_hit || ceil_hit
}
