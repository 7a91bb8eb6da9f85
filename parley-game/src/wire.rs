//! Wire format for a power's reply: orders plus an optional table message

use parley_error::{Error, Result};
use serde::{Deserialize, Serialize};

/// What a power's agent is asked to return each phase.
///
/// Both keys are optional on the wire; a missing `orders` means no orders and
/// a missing `message` means nothing to say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    #[serde(default)]
    pub orders: Vec<String>,
    #[serde(default)]
    pub message: String,
}

impl Directive {
    /// Whether the message is worth broadcasting (non-blank).
    pub fn has_message(&self) -> bool {
        !self.message.trim().is_empty()
    }
}

/// Extract the JSON payload from a reply that may wrap it in markdown fences.
fn strip_fences(content: &str) -> &str {
    if content.contains("```json") {
        content
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(str::trim)
            .unwrap_or(content)
    } else if content.contains("```") {
        content
            .split("```")
            .nth(1)
            .map(str::trim)
            .unwrap_or(content)
    } else {
        content.trim()
    }
}

/// Parse a raw model reply into a `Directive`.
pub fn parse_directive(raw: &str) -> Result<Directive> {
    let json_str = strip_fences(raw);
    serde_json::from_str::<Directive>(json_str).map_err(|e| {
        Error::parse_failed(format!("reply is not a valid directive: {}", e))
            .with_operation("wire::parse_directive")
            .with_context("reply", truncate(raw, 120))
    })
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i < max_len)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}…", &s[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_error::ErrorKind;

    #[test]
    fn parse_plain_json() {
        let raw = r#"{"orders": ["A PAR - BUR", "F BRE - MAO"], "message": "Shall we ally?"}"#;
        let d = parse_directive(raw).unwrap();
        assert_eq!(d.orders, vec!["A PAR - BUR", "F BRE - MAO"]);
        assert_eq!(d.message, "Shall we ally?");
        assert!(d.has_message());
    }

    #[test]
    fn parse_json_fenced_reply() {
        let raw = "Here are my orders:\n```json\n{\"orders\": [\"A LON H\"], \"message\": \"\"}\n```\nGood luck!";
        let d = parse_directive(raw).unwrap();
        assert_eq!(d.orders, vec!["A LON H"]);
        assert!(!d.has_message());
    }

    #[test]
    fn parse_bare_fenced_reply() {
        let raw = "```\n{\"orders\": [], \"message\": \"waiting\"}\n```";
        let d = parse_directive(raw).unwrap();
        assert!(d.orders.is_empty());
        assert_eq!(d.message, "waiting");
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let d = parse_directive("{}").unwrap();
        assert!(d.orders.is_empty());
        assert_eq!(d.message, "");
        assert!(!d.has_message());
    }

    #[test]
    fn prose_reply_is_a_parse_error() {
        let err = parse_directive("I think I will attack Burgundy this turn.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailed);
    }

    #[test]
    fn blank_message_is_not_broadcast_worthy() {
        let d = parse_directive(r#"{"orders": ["A PAR H"], "message": "   "}"#).unwrap();
        assert!(!d.has_message());
    }
}
