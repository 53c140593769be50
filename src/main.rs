//! Ability Pong headless runner
//!
//! Plays one seeded exhibition match: a simple tracker drives the left
//! paddle, the built-in AI drives the right. Prints the final frame as JSON.

#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};

#[cfg(not(target_arch = "wasm32"))]
use ability_pong::sim::{AbilityKind, FrameSnapshot, GameEvent, Side, TickInput, start_match};
#[cfg(not(target_arch = "wasm32"))]
use ability_pong::{ConfigError, GameMode, MatchConfig};
#[cfg(not(target_arch = "wasm32"))]
use clap::{Parser, ValueEnum};

/// Ten minutes at 60 ticks per second
#[cfg(not(target_arch = "wasm32"))]
const MAX_TICKS: u64 = 60 * 60 * 10;

/// Horizontal distance at which the tracker fires an ability
#[cfg(not(target_arch = "wasm32"))]
const TRACKER_REACH: f32 = 200.0;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(
    name = "ability-pong",
    about = "Play one seeded headless Ability Pong match and print the final frame as JSON"
)]
struct Cli {
    /// Seed for ability draw, serves and AI rolls
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// JSON match config; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scoring rules
    #[arg(long, value_enum, default_value_t = CliMode::Standard)]
    mode: CliMode,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliMode {
    Standard,
    Arcade,
}

#[cfg(not(target_arch = "wasm32"))]
impl From<CliMode> for GameMode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Standard => GameMode::Standard,
            CliMode::Arcade => GameMode::Arcade,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: Option<&Path>, mode: GameMode) -> Result<MatchConfig, ConfigError> {
    let base = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            MatchConfig::from_json(&json)?
        }
        None => MatchConfig::default(),
    };
    Ok(base.with_mode(mode))
}

/// Left-paddle tracker: follow the ball while it approaches, drift back
/// to centre otherwise, and fire the first ready ability when it is close.
#[cfg(not(target_arch = "wasm32"))]
fn tracker_input(frame: &FrameSnapshot, field_height: f32) -> TickInput {
    let paddle = &frame.paddles[Side::Player.index()];
    let center_y = paddle.y + paddle.height / 2.0;

    let Some(ball) = frame.balls.iter().find(|b| !b.is_clone).or(frame.balls.first()) else {
        return TickInput::default();
    };
    let approaching = ball.vel.x < 0.0;
    let target_y = if approaching { ball.pos.y } else { field_height / 2.0 };

    let diff = target_y - center_y;
    let move_direction = if diff.abs() < 30.0 {
        0
    } else if diff > 0.0 {
        1
    } else {
        -1
    };

    let activate_key = (approaching && ball.pos.x - paddle.x < TRACKER_REACH)
        .then(|| {
            paddle
                .effects
                .iter()
                .find(|e| e.cooldown_remaining == 0)
                .map(|e| e.kind.def().key)
        })
        .flatten();

    TickInput {
        move_direction,
        activate_key,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(cli: &Cli) -> Result<FrameSnapshot, ConfigError> {
    let config = load_config(cli.config.as_deref(), cli.mode.into())?;
    let field_height = config.field_height;
    let mut game = start_match(&AbilityKind::ALL, config, cli.seed)?;

    let mut frame = game.snapshot();
    while !game.is_over() && game.time_ticks < MAX_TICKS {
        let input = tracker_input(&frame, field_height);
        frame = game.tick(&input);
        for event in &frame.events {
            match event {
                GameEvent::Score { side, points } => log::info!(
                    "[{}] {:?} scores {} ({}-{})",
                    frame.tick,
                    side,
                    points,
                    frame.score.player,
                    frame.score.ai
                ),
                GameEvent::AbilityActivated { side, kind } => {
                    log::debug!("[{}] {:?} uses {}", frame.tick, side, kind.def().name)
                }
                _ => {}
            }
        }
    }

    if !game.is_over() {
        log::warn!("Tick limit reached before the match was decided");
    }
    Ok(frame)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::info!(
        "Ability Pong (headless) starting, seed {}, mode {:?}",
        cli.seed,
        cli.mode
    );

    let frame = match run(&cli) {
        Ok(frame) => frame,
        Err(e) => {
            log::error!("Cannot start match: {e}");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&frame) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to encode final frame: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
