//! # Parley Agent
//!
//! An agent is a named persona bound to a model and an append-only transcript:
//! 1. Someone sends the agent a message
//! 2. The message is recorded as a user turn ("{sender}: {text}")
//! 3. The accumulated transcript goes to the chat client at temperature 0.7
//! 4. The reply is recorded as an assistant turn and handed back
//!
//! A failed completion leaves the user turn in place: the transcript keeps the
//! dangling question. The `dialogue` module alternates two agents for a fixed
//! number of round-trips, threading each reply as the other agent's input.

mod agent;
mod dialogue;

pub use agent::{Agent, ContextPolicy, SAMPLING_TEMPERATURE};
pub use dialogue::{run_dialogue, DialogueConfig, Exchange};
