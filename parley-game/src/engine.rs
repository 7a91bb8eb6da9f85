//! Game engine boundary

use parley_error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Recipient name for table-wide messages.
pub const GLOBAL_RECIPIENT: &str = "GLOBAL";

/// A diplomatic message added to the engine's message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broadcast {
    pub sender: String,
    pub recipient: String,
    pub body: String,
}

impl Broadcast {
    /// A message from `sender` to the whole table.
    pub fn global(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipient: GLOBAL_RECIPIENT.into(),
            body: body.into(),
        }
    }
}

/// What the engine reports after processing a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Name of the phase that was archived, e.g. `S1901M`.
    pub name: String,
}

/// The external rule engine, seen through the only operations the loop needs.
///
/// The engine owns all game semantics: what an order means, when the game is
/// done, what a phase transition does. The driver never interprets state; it
/// passes snapshots through to prompts and writes orders/messages back.
#[allow(async_fn_in_trait)]
pub trait GameEngine {
    /// Full snapshot of the current game state, as the engine serializes it.
    async fn state(&mut self) -> Result<Value>;

    /// Mapping of all exchanged messages so far.
    async fn messages(&mut self) -> Result<Value>;

    /// Current phase identifier.
    async fn phase(&mut self) -> Result<String>;

    /// Whether the engine considers the game finished.
    async fn is_done(&mut self) -> Result<bool>;

    /// Submit a power's orders for the current phase. May reject.
    async fn set_orders(&mut self, power: &str, orders: &[String]) -> Result<()>;

    /// Add a diplomatic message to the engine's log. May reject.
    async fn add_message(&mut self, message: &Broadcast) -> Result<()>;

    /// Resolve the current phase and advance. Sole authority on transition.
    async fn process(&mut self) -> Result<PhaseReport>;

    /// Force the game to end in a draw.
    async fn draw(&mut self) -> Result<()>;

    /// The engine's exported saved game, for persistence.
    async fn export(&mut self) -> Result<Value>;
}
