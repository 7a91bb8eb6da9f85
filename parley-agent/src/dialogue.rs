//! Free-turn dialogue loop between two agents

use std::time::Duration;

use parley_llm::ChatClient;

use crate::Agent;

/// Configuration for a two-agent conversation.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Number of round-trips; each one is two individual responses.
    pub turns: usize,
    /// Pause before each response, for readability of the console output only.
    pub delay: Duration,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            turns: 5,
            delay: Duration::from_secs(1),
        }
    }
}

/// One recorded response in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub speaker: String,
    pub text: String,
}

/// Alternate two agents for `cfg.turns` round-trips, starting from
/// `opening_prompt` spoken by `speaker`.
///
/// Exactly `2 * cfg.turns` responses happen, the responding agent swapping
/// every time; each reply becomes the next message. A failed completion is
/// logged and the agent's fallback reply is threaded onward, so one bad turn
/// never ends the conversation. Returns the responses in order; the last
/// entry is the conversation's final word.
pub async fn run_dialogue<'a, C: ChatClient>(
    mut speaker: &'a mut Agent<C>,
    mut listener: &'a mut Agent<C>,
    opening_prompt: &str,
    cfg: &DialogueConfig,
) -> Vec<Exchange> {
    println!("\n{}", "=".repeat(50));
    println!(
        "Starting conversation between {} and {}",
        speaker.name(),
        listener.name()
    );
    println!("Initial prompt: {}", opening_prompt);
    println!("{}\n", "=".repeat(50));

    let mut message = opening_prompt.to_string();
    let mut exchanges = Vec::with_capacity(cfg.turns * 2);

    for _ in 0..cfg.turns * 2 {
        println!("{}: {}", speaker.name(), message);
        if !cfg.delay.is_zero() {
            tokio::time::sleep(cfg.delay).await;
        }

        let reply = match listener.respond_to(&message, speaker.name()).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(agent = listener.name(), error = %err, "failed to respond");
                listener.fallback_reply()
            }
        };

        exchanges.push(Exchange {
            speaker: listener.name().to_string(),
            text: reply.clone(),
        });

        std::mem::swap(&mut speaker, &mut listener);
        message = reply;
        println!("{}", "-".repeat(30));
    }

    println!("\n{}", "=".repeat(50));
    println!("Conversation ended");
    println!("{}\n", "=".repeat(50));

    exchanges
}
