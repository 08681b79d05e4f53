//! Scripted input mapping: one token per frame.
//!
//! `L R U D` step the player, `.` releases the movement key, `F` fires, `X`
//! restarts and `-` idles. A token may carry a decimal repeat count (`-30`
//! idles for thirty frames). Whitespace separates nothing and is skipped, and
//! `#` comments run to the end of the line.

use anyhow::{bail, Context, Result};
use gremlin_maze_core::Intent;

/// What the host feeds the simulation on a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScriptStep {
    /// Deliver an intent before the update.
    Intent(Intent),
    /// Deliver nothing.
    Idle,
}

/// Parses a script into one step per frame.
pub(crate) fn parse(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        let mut chars = line.char_indices().peekable();

        while let Some((column, token)) = chars.next() {
            if token.is_whitespace() {
                continue;
            }
            let step = step_for(token).with_context(|| {
                format!("line {}, column {}", line_index + 1, column + 1)
            })?;

            let mut digits = String::new();
            while let Some(&(_, digit)) = chars.peek() {
                if !digit.is_ascii_digit() {
                    break;
                }
                digits.push(digit);
                let _ = chars.next();
            }
            let repeat = if digits.is_empty() {
                1
            } else {
                digits.parse::<usize>().with_context(|| {
                    format!(
                        "invalid repeat count on line {}, column {}",
                        line_index + 1,
                        column + 2
                    )
                })?
            };

            steps.extend(std::iter::repeat(step).take(repeat));
        }
    }

    Ok(steps)
}

fn step_for(token: char) -> Result<ScriptStep> {
    let step = match token.to_ascii_uppercase() {
        'L' => ScriptStep::Intent(Intent::MoveLeft),
        'R' => ScriptStep::Intent(Intent::MoveRight),
        'U' => ScriptStep::Intent(Intent::MoveUp),
        'D' => ScriptStep::Intent(Intent::MoveDown),
        '.' => ScriptStep::Intent(Intent::StopMoving),
        'F' => ScriptStep::Intent(Intent::Shoot),
        'X' => ScriptStep::Intent(Intent::Restart),
        '-' => ScriptStep::Idle,
        other => bail!("unknown input token '{other}'"),
    };
    Ok(step)
}
