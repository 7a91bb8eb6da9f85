//! Phase-driven match driver
//!
//! The loop is deliberately sequential and retry-free: a power that fails to
//! produce usable orders is skipped for the phase, a rejected order or message
//! is logged and ignored, and only a failed phase-processing step ends the
//! match early. Whatever way the loop ends, the exported game is saved.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use parley_agent::Agent;
use parley_error::{Error, ErrorKind, Result};
use parley_llm::ChatClient;
use tracing::{error, info, warn};

use crate::engine::{Broadcast, GameEngine};
use crate::prompt::build_power_prompt;
use crate::wire::parse_directive;

/// Configuration for one match run.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Wall-clock ceiling; past it the match is drawn. Checked at phase
    /// boundaries only, so a hung completion call is not interruptible.
    pub max_duration: Duration,
    /// Pause between phases.
    pub phase_pause: Duration,
    /// Where the exported saved game is written.
    pub output_path: PathBuf,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(180),
            phase_pause: Duration::from_millis(100),
            output_path: PathBuf::from("game.json"),
        }
    }
}

/// How a finished match went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    /// Phases fully processed before the loop ended.
    pub phases: usize,
    /// Whether the wall-clock ceiling forced a draw.
    pub forced_draw: bool,
}

/// Drive the engine to completion with one agent per controlled power.
///
/// Powers are consulted in slice order each phase; an agent's name is the
/// power it controls. The saved game is written to `cfg.output_path` on every
/// exit path, including a fatal phase-processing failure (which is then
/// returned as the error).
pub async fn run_match<E, C>(
    engine: &mut E,
    agents: &mut [Agent<C>],
    cfg: &MatchConfig,
) -> Result<MatchSummary>
where
    E: GameEngine,
    C: ChatClient,
{
    let started = Instant::now();
    let mut phases = 0usize;
    let mut forced_draw = false;
    let mut fatal: Option<Error> = None;

    while !engine.is_done().await? {
        if started.elapsed() > cfg.max_duration {
            warn!(
                elapsed_secs = started.elapsed().as_secs(),
                "maximum match time reached; forcing a draw"
            );
            engine.draw().await?;
            forced_draw = true;
            break;
        }

        let phase = engine.phase().await?;
        info!(phase_counter = phases, phase = %phase, "processing phase");

        for agent in agents.iter_mut() {
            let power = agent.name().to_string();
            let state = engine.state().await?;
            let messages = engine.messages().await?;
            let prompt = build_power_prompt(&state, &messages, &power);

            let raw = match agent.respond_to(&prompt, "GameState").await {
                Ok(raw) => raw,
                Err(err) => {
                    error!(power = %power, error = %err, "agent failed to respond; skipping");
                    continue;
                }
            };

            let directive = match parse_directive(&raw) {
                Ok(directive) => directive,
                Err(err) => {
                    error!(power = %power, error = %err, "undecodable reply; skipping orders");
                    continue;
                }
            };
            info!(power = %power, orders = ?directive.orders, "directive received");

            if let Err(err) = engine.set_orders(&power, &directive.orders).await {
                error!(power = %power, error = %err, "engine rejected orders");
            }

            if directive.has_message() {
                let broadcast = Broadcast::global(power.clone(), directive.message.clone());
                if let Err(err) = engine.add_message(&broadcast).await {
                    error!(power = %power, error = %err, "engine rejected message");
                }
            }
        }

        match engine.process().await {
            Ok(report) => info!(phase = %report.name, "phase processed and archived"),
            Err(err) => {
                error!(error = %err, "phase processing failed; stopping match");
                fatal = Some(err);
                break;
            }
        }

        phases += 1;
        if !cfg.phase_pause.is_zero() {
            tokio::time::sleep(cfg.phase_pause).await;
        }
    }

    save_game(engine, cfg).await?;

    match fatal {
        Some(err) => Err(err.with_operation("driver::run_match")),
        None => Ok(MatchSummary {
            phases,
            forced_draw,
        }),
    }
}

async fn save_game<E: GameEngine>(engine: &mut E, cfg: &MatchConfig) -> Result<()> {
    let saved = engine.export().await?;
    let text = serde_json::to_string_pretty(&saved).map_err(|e| {
        Error::new(ErrorKind::SerializationFailed, "cannot serialize saved game")
            .with_operation("driver::save_game")
            .set_source(e)
    })?;
    std::fs::write(&cfg.output_path, text).map_err(|e| {
        Error::from(e)
            .with_operation("driver::save_game")
            .with_context("path", cfg.output_path.display().to_string())
    })?;
    info!(path = %cfg.output_path.display(), "final state saved");
    Ok(())
}
