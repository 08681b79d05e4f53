#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Animator that walks struck brick walls through their destruction stages.

use std::time::Duration;

use gremlin_maze_core::{Command, Tuning, WallView};

/// Pure system that decays crumbling walls once their stage has elapsed.
///
/// Spent walls are left alone; removing them is the world's job at the start
/// of the following tick.
#[derive(Debug, Default)]
pub struct Demolition;

impl Demolition {
    /// Creates the animator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits a decay command for every wall whose current stage has run its course.
    pub fn handle(&self, now: Duration, tuning: &Tuning, walls: &WallView, out: &mut Vec<Command>) {
        let stage_duration = tuning.stage_duration();
        for wall in walls.iter() {
            let Some(stage) = wall.stage else {
                continue;
            };
            if stage.is_spent() {
                continue;
            }
            if now.saturating_sub(wall.stage_started_at) >= stage_duration {
                out.push(Command::DecayWall { cell: wall.cell });
            }
        }
    }
}
