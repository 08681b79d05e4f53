#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wander system that steers enemies on a randomised think interval.

use std::time::Duration;

use gremlin_maze_core::{
    collision, Command, Direction, EnemySnapshot, EnemyView, Position, Tuning, WallView,
};
use rand::Rng;

/// Pure system that re-evaluates enemy headings and emits movement commands.
#[derive(Debug, Default)]
pub struct Wander {
    last_update: Duration,
}

impl Wander {
    /// Creates a wander system whose timer starts at the beginning of the session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session time of the previous evaluation.
    #[must_use]
    pub const fn last_update(&self) -> Duration {
        self.last_update
    }

    /// Consumes immutable views to emit steering and advance commands.
    ///
    /// A single think interval is drawn per call and compared against the
    /// time since the previous call. Enemies without a heading always pick
    /// one. Whatever the timer says, a heading that runs into a wall is
    /// re-derived until a free one is found or `steer_attempts` runs out, in
    /// which case the enemy holds still for this tick.
    pub fn handle<R>(
        &mut self,
        now: Duration,
        tuning: &Tuning,
        enemies: &EnemyView,
        walls: &WallView,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: Rng + ?Sized,
    {
        let jitter = rng.gen_range(0..=tuning.think_interval_jitter_ms);
        let think_interval =
            Duration::from_millis(tuning.think_interval_min_ms.saturating_add(jitter));
        let due = now.saturating_sub(self.last_update) >= think_interval;

        for enemy in enemies.iter() {
            steer(enemy, due, tuning, walls, rng, out);
        }

        self.last_update = now;
    }
}

fn steer<R>(
    enemy: &EnemySnapshot,
    due: bool,
    tuning: &Tuning,
    walls: &WallView,
    rng: &mut R,
    out: &mut Vec<Command>,
) where
    R: Rng + ?Sized,
{
    let mut heading = match enemy.heading {
        Some(current) if !due => current,
        current => next_heading(current, rng),
    };

    let mut blocked = probe_blocked(enemy.position, heading, tuning, walls);
    let mut attempts = 0;
    while blocked && attempts < tuning.steer_attempts {
        heading = next_heading(Some(heading), rng);
        blocked = probe_blocked(enemy.position, heading, tuning, walls);
        attempts += 1;
    }

    if enemy.heading != Some(heading) {
        out.push(Command::SteerEnemy {
            enemy: enemy.id,
            direction: heading,
        });
    }
    if !blocked {
        out.push(Command::AdvanceEnemy { enemy: enemy.id });
    }
}

/// Picks the heading that follows `current`.
///
/// Up and Left turn into a horizontal heading, Down and Right into a
/// vertical one. Without a current heading any of the four is drawn.
pub fn next_heading<R>(current: Option<Direction>, rng: &mut R) -> Direction
where
    R: Rng + ?Sized,
{
    match current {
        Some(Direction::Up | Direction::Left) => {
            if rng.gen_bool(0.5) {
                Direction::Left
            } else {
                Direction::Right
            }
        }
        Some(Direction::Down | Direction::Right) => {
            if rng.gen_bool(0.5) {
                Direction::Up
            } else {
                Direction::Down
            }
        }
        None => Direction::ALL[rng.gen_range(0..Direction::ALL.len())],
    }
}

fn probe_blocked(
    position: Position,
    heading: Direction,
    tuning: &Tuning,
    walls: &WallView,
) -> bool {
    let probe = position.advanced(heading, tuning.enemy_speed_px, tuning.tile_size_px);
    collision::resolve(walls.iter(), probe).is_blocked()
}
