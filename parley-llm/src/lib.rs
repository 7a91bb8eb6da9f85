//! # Parley LLM
//!
//! The chat completion boundary: everything the agents know about talking to
//! a model lives here.
//!
//! ## Design
//! - `ChatClient` trait defines the core interface
//! - `OllamaClient` implements it against an Ollama `/api/chat` endpoint
//! - Requests carry the full ordered message log plus a sampling temperature
//! - No retries, no streaming: one blocking completion per call

pub mod client;
pub mod ollama;

pub use client::{ChatClient, ChatMessage, CompletionRequest, ProviderError, Role};
pub use ollama::{OllamaClient, OllamaConfig};
