//! Agent implementation - persona plus append-only transcript

use parley_error::{Error, ErrorKind, Result};
use parley_llm::{ChatClient, ChatMessage, CompletionRequest, ProviderError, Role};

/// Every completion an agent makes uses this sampling temperature.
pub const SAMPLING_TEMPERATURE: f32 = 0.7;

/// Bounds the context window handed to the chat client.
///
/// The stored transcript is append-only and never truncated; the policy only
/// selects which suffix of it is sent with each completion. System turns are
/// always kept so a persona survives any bound.
#[derive(Debug, Clone, Default)]
pub struct ContextPolicy {
    /// Maximum number of non-system turns per request; `None` sends everything.
    pub max_turns: Option<usize>,
}

impl ContextPolicy {
    /// Send the full transcript with every request (the default).
    pub fn unbounded() -> Self {
        Self { max_turns: None }
    }

    /// Keep at most `max_turns` of the newest non-system turns per request.
    pub fn bounded(max_turns: usize) -> Self {
        Self {
            max_turns: Some(max_turns),
        }
    }

    /// Select the request window out of a transcript.
    pub fn window(&self, transcript: &[ChatMessage]) -> Vec<ChatMessage> {
        let Some(limit) = self.max_turns else {
            return transcript.to_vec();
        };

        let mut window: Vec<ChatMessage> = transcript
            .iter()
            .filter(|m| m.role == Role::System)
            .cloned()
            .collect();
        let rest: Vec<&ChatMessage> = transcript
            .iter()
            .filter(|m| m.role != Role::System)
            .collect();
        let skip = rest.len().saturating_sub(limit);
        window.extend(rest.into_iter().skip(skip).cloned());
        window
    }
}

/// A named persona bound to a model and an append-only transcript.
///
/// Not safe for concurrent use: `respond_to` takes `&mut self` and the
/// transcript ordering depends on calls being sequential.
pub struct Agent<C> {
    name: String,
    model: String,
    persona: Option<String>,
    transcript: Vec<ChatMessage>,
    policy: ContextPolicy,
    client: C,
}

impl<C: ChatClient> Agent<C> {
    /// Create an agent. With a persona, the transcript is seeded with a
    /// system turn: `You are {name} with a {persona}`.
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        persona: Option<String>,
        client: C,
    ) -> Self {
        let name = name.into();
        let mut transcript = Vec::new();
        if let Some(persona) = &persona {
            transcript.push(ChatMessage::system(format!(
                "You are {} with a {}",
                name, persona
            )));
        }

        Self {
            name,
            model: model.into(),
            persona,
            transcript,
            policy: ContextPolicy::default(),
            client,
        }
    }

    /// Replace the default unbounded context policy.
    pub fn with_context_policy(mut self, policy: ContextPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn persona(&self) -> Option<&str> {
        self.persona.as_deref()
    }

    /// The full recorded transcript, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// The fixed reply loops substitute when a completion fails.
    pub fn fallback_reply(&self) -> String {
        format!("[Error: {} couldn't generate a response]", self.name)
    }

    /// Respond to a message from `sender`.
    ///
    /// Appends `"{sender}: {message}"` as a user turn, completes against the
    /// policy-selected window, and on success appends the reply as an
    /// assistant turn. On failure the user turn is NOT rolled back; the
    /// transcript keeps the question this agent never answered.
    pub async fn respond_to(&mut self, message: &str, sender: &str) -> Result<String> {
        self.transcript
            .push(ChatMessage::user(format!("{}: {}", sender, message)));

        let request = CompletionRequest::new(self.policy.window(&self.transcript))
            .with_model(self.model.clone())
            .with_temperature(SAMPLING_TEMPERATURE);

        match self.client.complete(request).await {
            Ok(reply) => {
                self.transcript.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => Err(completion_error(&self.name, &self.model, err)),
        }
    }
}

fn completion_error(agent: &str, model: &str, err: ProviderError) -> Error {
    let kind = match &err {
        ProviderError::Network(_) => ErrorKind::NetworkFailed,
        ProviderError::Api { status: 429, .. } => ErrorKind::RateLimited,
        _ => ErrorKind::InferenceFailed,
    };
    Error::new(kind, "chat completion failed")
        .with_operation("agent::respond_to")
        .with_context("agent", agent)
        .with_context("model", model)
        .set_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted chat client; clones share the reply queue and request log.
    #[derive(Clone, Default)]
    struct ScriptedClient {
        replies: Arc<Mutex<VecDeque<std::result::Result<String, ProviderError>>>>,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl ScriptedClient {
        fn push_reply(&self, text: impl Into<String>) {
            self.replies.lock().unwrap().push_back(Ok(text.into()));
        }

        fn push_failure(&self) {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(ProviderError::Network("connection refused".into())));
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ChatClient for ScriptedClient {
        fn name(&self) -> &str {
            "scripted"
        }

        fn default_model(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: CompletionRequest) -> std::result::Result<String, ProviderError> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Other("no reply queued".into())))
        }
    }

    #[test]
    fn persona_seeds_system_turn() {
        let client = ScriptedClient::default();
        let agent = Agent::new(
            "FRANCE",
            "qwen2.5:3b",
            Some("strategic and diplomatic mindset".into()),
            client,
        );

        let transcript = agent.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role, Role::System);
        assert_eq!(
            transcript[0].content,
            "You are FRANCE with a strategic and diplomatic mindset"
        );
    }

    #[test]
    fn no_persona_means_empty_transcript() {
        let client = ScriptedClient::default();
        let agent = Agent::new("ENGLAND", "qwen2.5:3b", None, client);
        assert!(agent.transcript().is_empty());
        assert!(agent.persona().is_none());
    }

    #[tokio::test]
    async fn respond_to_appends_user_then_assistant() {
        let client = ScriptedClient::default();
        client.push_reply("I am well, thank you.");
        let mut agent = Agent::new("Scientist", "qwen2.5:3b", None, client.clone());

        let reply = agent.respond_to("How are you?", "Philosopher").await.unwrap();
        assert_eq!(reply, "I am well, thank you.");

        let transcript = agent.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[0].content, "Philosopher: How are you?");
        assert_eq!(transcript[1].role, Role::Assistant);
        assert_eq!(transcript[1].content, "I am well, thank you.");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model.as_deref(), Some("qwen2.5:3b"));
        assert_eq!(requests[0].temperature, Some(SAMPLING_TEMPERATURE));
    }

    #[tokio::test]
    async fn failed_completion_keeps_dangling_user_turn() {
        let client = ScriptedClient::default();
        client.push_failure();
        let mut agent = Agent::new("Scientist", "qwen2.5:3b", None, client);

        let err = agent.respond_to("Anyone there?", "Philosopher").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkFailed);

        let transcript = agent.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(
            agent.fallback_reply(),
            "[Error: Scientist couldn't generate a response]"
        );
    }

    #[tokio::test]
    async fn bounded_policy_trims_request_window_not_transcript() {
        let client = ScriptedClient::default();
        for i in 0..4 {
            client.push_reply(format!("reply {}", i));
        }
        let mut agent = Agent::new("FRANCE", "qwen2.5:3b", Some("curt manner".into()), client.clone())
            .with_context_policy(ContextPolicy::bounded(2));

        for i in 0..4 {
            agent
                .respond_to(&format!("message {}", i), "GameState")
                .await
                .unwrap();
        }

        // Stored transcript keeps everything: system + 4 * (user, assistant).
        assert_eq!(agent.transcript().len(), 9);

        // The last request saw the system turn plus at most 2 newest turns.
        let last = client.requests().pop().unwrap();
        assert_eq!(last.messages.len(), 3);
        assert_eq!(last.messages[0].role, Role::System);
        assert_eq!(last.messages[2].content, "GameState: message 3");
    }

    #[test]
    fn unbounded_window_is_identity() {
        let transcript = vec![
            ChatMessage::system("sys"),
            ChatMessage::user("a"),
            ChatMessage::assistant("b"),
        ];
        let window = ContextPolicy::unbounded().window(&transcript);
        assert_eq!(window, transcript);
    }
}
