#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game state machine transitions and the enemy respawn pulse.

use gremlin_maze_core::{
    Command, EnemyView, Outcome, PlayerSnapshot, SessionSnapshot, TileCell, Tuning,
};
use rand::Rng;

/// Pure system that evaluates door arrival and enemy contact once per tick.
#[derive(Debug, Default)]
pub struct Progression;

impl Progression {
    /// Creates the state machine evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits the level, lives and outcome transitions for the current tick.
    ///
    /// Reaching the door wins over enemy contact. Only the first living enemy
    /// sharing the player's tile costs a life, and the loss is decided before
    /// the decrement: contact with an empty pool ends the session.
    pub fn handle(
        &self,
        session: &SessionSnapshot,
        player: &PlayerSnapshot,
        door: TileCell,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if session.status.is_over() {
            return;
        }

        let player_cell = player.position.cell();
        if player_cell == door {
            out.push(Command::AdvanceLevel);
            return;
        }

        if enemies
            .living()
            .any(|enemy| enemy.position.cell() == player_cell)
        {
            if session.lives == 0 {
                out.push(Command::EndSession {
                    outcome: Outcome::Lost,
                });
            }
            out.push(Command::LoseLife);
        }
    }
}

/// Low-probability event that brings every dead enemy back at once.
#[derive(Debug, Default)]
pub struct RespawnPulse;

impl RespawnPulse {
    /// Creates the respawn pulse.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Draws once from the shared generator and emits a revive on the trigger value.
    pub fn handle<R>(&self, tuning: &Tuning, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        if tuning.respawn_odds == 0 {
            return;
        }
        if rng.gen_range(0..tuning.respawn_odds) == tuning.respawn_trigger {
            out.push(Command::ReviveEnemies);
        }
    }
}
