//! Per-power prompt construction

use serde_json::Value;

/// Build the order prompt for one power: the full engine state and message
/// history as pretty JSON, followed by the reply contract.
pub fn build_power_prompt(state: &Value, messages: &Value, power: &str) -> String {
    let state_json = serde_json::to_string_pretty(state).unwrap_or_else(|_| "{}".to_string());
    let messages_json =
        serde_json::to_string_pretty(messages).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Game State:\n{}\n\nMessage History:\n{}\n\n\
         You are playing as {} in a game of Diplomacy. \
         Based on the above state and recent messages, decide your orders for this phase \
         and, if appropriate, include a message for the other players. \
         Return your response in JSON format with exactly two keys: \
         'orders' (a list) and 'message' (a string).",
        state_json, messages_json, power
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_embeds_state_messages_and_power() {
        let state = json!({"phase": "S1901M", "units": {"FRANCE": ["A PAR"]}});
        let messages = json!({"1": {"sender": "ENGLAND", "message": "hello"}});

        let prompt = build_power_prompt(&state, &messages, "FRANCE");

        assert!(prompt.starts_with("Game State:\n"));
        assert!(prompt.contains("\"S1901M\""));
        assert!(prompt.contains("Message History:\n"));
        assert!(prompt.contains("\"ENGLAND\""));
        assert!(prompt.contains("You are playing as FRANCE"));
        assert!(prompt.contains("'orders' (a list) and 'message' (a string)"));
    }

    #[test]
    fn prompt_handles_empty_history() {
        let prompt = build_power_prompt(&json!({}), &json!({}), "ENGLAND");
        assert!(prompt.contains("You are playing as ENGLAND"));
    }
}
