#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Gremlin Maze session headlessly.

mod ascii;
mod config;
mod script;

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use gremlin_maze_core::{Event, Outcome, SessionStatus, WELCOME_BANNER};
use gremlin_maze_rendering::{Color, HudPresentation, RenderingBackend, Scene, TileGridPresentation};
use gremlin_maze_simulation::Simulation;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{ascii::AsciiBackend, script::ScriptStep};

/// Frame rate the default speeds are calibrated for.
const DEFAULT_FPS: u32 = 360;

#[derive(Debug, Parser)]
#[command(name = "gremlin-maze")]
#[command(about = "Run a Gremlin Maze session with scripted input and a text display")]
struct Args {
    /// Session configuration listing lives and level layouts.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
    /// Seed for the session's random number generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Simulated frames per second.
    #[arg(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    frames: usize,
    /// Script file with one input token per frame.
    #[arg(long, value_name = "SCRIPT")]
    inputs: Option<PathBuf>,
    /// Print the play area every N frames; 0 prints only the final frame.
    #[arg(long, default_value_t = 0)]
    render_every: usize,
}

/// Totals reported once the run ends.
#[derive(Debug, Default)]
struct Tally {
    frames: usize,
    enemies_killed: usize,
    walls_destroyed: usize,
    lives_lost: usize,
}

impl Tally {
    fn record(&mut self, event: &Event) {
        match event {
            Event::EnemyKilled { .. } => self.enemies_killed += 1,
            Event::WallRemoved { .. } => self.walls_destroyed += 1,
            Event::LifeLost { .. } => self.lives_lost += 1,
            _ => {}
        }
    }
}

/// Entry point for the Gremlin Maze command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    info!("{WELCOME_BANNER}");
    run(&args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(args: &Args) -> Result<()> {
    let session = config::load_session(&args.config)?;
    let mut simulation = Simulation::new(session, args.seed)
        .with_context(|| format!("invalid levels in {}", args.config.display()))?;
    let steps = match &args.inputs {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    let dt = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let stdout = io::stdout();
    let mut backend = AsciiBackend::new(stdout.lock());
    let mut tally = Tally::default();
    let mut events = Vec::new();

    for frame in 0..args.frames {
        if simulation.is_over() && frame >= steps.len() {
            break;
        }
        if let Some(ScriptStep::Intent(intent)) = steps.get(frame) {
            simulation.handle_intent(*intent, &mut events);
        }
        simulation.update(dt, &mut events);
        for event in events.drain(..) {
            tally.record(&event);
        }
        tally.frames = frame + 1;

        if args.render_every > 0 && tally.frames % args.render_every == 0 {
            backend.present(&scene(&simulation)?)?;
        }
    }
    backend.present(&scene(&simulation)?)?;

    let session = simulation.session();
    let outcome = match session.status {
        SessionStatus::Playing => "in progress",
        SessionStatus::Over {
            outcome: Outcome::Won,
        } => "won",
        SessionStatus::Over {
            outcome: Outcome::Lost,
        } => "lost",
    };
    let hud = HudPresentation::from_session(&session);
    println!("{}, {}, outcome {outcome}", hud.level_label(), hud.lives_label());
    println!(
        "frames {} ({:.2}s simulated, {} displayed), enemies killed {}, walls destroyed {}, lives lost {}",
        tally.frames,
        simulation.now().as_secs_f64(),
        backend.frames(),
        tally.enemies_killed,
        tally.walls_destroyed,
        tally.lives_lost
    );
    Ok(())
}

fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input script {}", path.display()))?;
    script::parse(&text).with_context(|| format!("invalid input script {}", path.display()))
}

fn scene(simulation: &Simulation) -> Result<Scene> {
    let (columns, rows) = simulation.grid_size();
    let tile_grid = TileGridPresentation::new(
        u32::try_from(columns).context("level too wide")?,
        u32::try_from(rows).context("level too tall")?,
        simulation.tuning().tile_size_px as f32,
        Color::from_rgb_u8(40, 40, 40),
    )?;
    Ok(Scene::from_entities(
        tile_grid,
        &simulation.entities(),
        simulation.door(),
        &simulation.session(),
    ))
}
