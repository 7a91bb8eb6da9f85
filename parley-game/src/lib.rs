//! # Parley Game
//!
//! The structured-turn side of parley: a phase loop that couples agents to an
//! external board-game engine.
//!
//! 1. Read the full game state and message history from the engine
//! 2. Build a per-power prompt and ask that power's agent to respond
//! 3. Parse the reply as `{ "orders": [...], "message": "..." }`
//! 4. Submit orders and broadcast the message; rejections are logged, not fatal
//! 5. After all controlled powers, run the engine's phase processing
//!
//! The engine is the sole authority on phase transition and game completion.
//! The loop carries a wall-clock ceiling; past it the match is drawn. Whatever
//! way the loop ends, the exported game is written to disk.

pub mod driver;
pub mod engine;
pub mod prompt;
pub mod remote;
pub mod wire;

pub use driver::{run_match, MatchConfig, MatchSummary};
pub use engine::{Broadcast, GameEngine, PhaseReport, GLOBAL_RECIPIENT};
pub use prompt::build_power_prompt;
pub use remote::RemoteEngine;
pub use wire::{parse_directive, Directive};
