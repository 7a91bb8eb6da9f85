//! # Parley CLI
//!
//! Command-line interface for the two parley drivers.
//!
//! Usage:
//!   parley converse [--prompt <text>] [--turns <n>] [--agent1 <name>] ...
//!   parley match [--engine <addr>] [--output <path>] [--max-duration <secs>]
//!
//! Examples:
//!   parley converse --prompt "What is consciousness?" --turns 3
//!   parley converse --agent1 Optimist --personality1 "relentlessly sunny outlook"
//!   parley match --engine 127.0.0.1:7878 --output game.json

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use parley_agent::{run_dialogue, Agent, DialogueConfig};
use parley_game::{run_match, MatchConfig, RemoteEngine};
use parley_llm::{OllamaClient, OllamaConfig};

/// The controlled powers and their personas, as the match driver fields them.
const POWERS: &[(&str, &str)] = &[
    ("FRANCE", "strategic and diplomatic"),
    ("ENGLAND", "cautious and pragmatic"),
];

#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about = "Parley - LLM agents in turn-based exchange")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Alternate two agents in a free-form conversation
    Converse(ConverseArgs),
    /// Drive a match against an external game engine
    Match(MatchArgs),
}

#[derive(Args)]
struct ConverseArgs {
    /// Initial prompt to start the conversation
    #[arg(long, default_value = "Hello, how are you today?")]
    prompt: String,

    /// Number of conversation turns (each turn is two responses)
    #[arg(long, default_value_t = 5)]
    turns: usize,

    /// Delay between responses in seconds, for readability
    #[arg(long, default_value_t = 1.0)]
    delay: f64,

    /// Name of the first agent
    #[arg(long, default_value = "Philosopher")]
    agent1: String,

    /// Name of the second agent
    #[arg(long, default_value = "Scientist")]
    agent2: String,

    /// Personality for the first agent
    #[arg(
        long,
        default_value = "You are a thoughtful philosopher who considers deep questions about existence and meaning."
    )]
    personality1: String,

    /// Personality for the second agent
    #[arg(
        long,
        default_value = "You are a scientific-minded person who values empirical evidence and logical reasoning."
    )]
    personality2: String,

    /// Chat endpoint base URL
    #[arg(long, env = "PARLEY_ENDPOINT", default_value = "http://127.0.0.1:11434")]
    endpoint: String,

    /// Model identifier
    #[arg(long, env = "PARLEY_MODEL", default_value = "qwen2.5:3b")]
    model: String,
}

#[derive(Args)]
struct MatchArgs {
    /// Engine control address
    #[arg(long, env = "PARLEY_ENGINE_ADDR", default_value = "127.0.0.1:7878")]
    engine: String,

    /// Chat endpoint base URL
    #[arg(long, env = "PARLEY_ENDPOINT", default_value = "http://127.0.0.1:11434")]
    endpoint: String,

    /// Model identifier
    #[arg(long, env = "PARLEY_MODEL", default_value = "qwen2.5:3b")]
    model: String,

    /// Wall-clock ceiling in seconds before the match is drawn
    #[arg(long, default_value_t = 180)]
    max_duration: u64,

    /// Where to write the exported saved game
    #[arg(long, default_value = "game.json")]
    output: PathBuf,
}

fn chat_client(endpoint: &str, model: &str) -> OllamaClient {
    OllamaClient::new(
        OllamaConfig::local()
            .with_endpoint(endpoint)
            .with_model(model),
    )
}

async fn run_converse(args: ConverseArgs) {
    let mut first = Agent::new(
        args.agent1,
        args.model.clone(),
        Some(args.personality1),
        chat_client(&args.endpoint, &args.model),
    );
    let mut second = Agent::new(
        args.agent2,
        args.model.clone(),
        Some(args.personality2),
        chat_client(&args.endpoint, &args.model),
    );

    let cfg = DialogueConfig {
        turns: args.turns,
        delay: Duration::from_secs_f64(args.delay),
    };
    run_dialogue(&mut first, &mut second, &args.prompt, &cfg).await;
}

async fn run_game(args: MatchArgs) {
    let mut engine = match RemoteEngine::connect(&args.engine).await {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let mut agents: Vec<Agent<OllamaClient>> = POWERS
        .iter()
        .map(|(power, persona)| {
            Agent::new(
                *power,
                args.model.clone(),
                Some((*persona).to_string()),
                chat_client(&args.endpoint, &args.model),
            )
        })
        .collect();

    let cfg = MatchConfig {
        max_duration: Duration::from_secs(args.max_duration),
        output_path: args.output,
        ..MatchConfig::default()
    };

    match run_match(&mut engine, &mut agents, &cfg).await {
        Ok(summary) => {
            if summary.forced_draw {
                println!("Maximum match time reached; the game was drawn.");
            }
            println!(
                "Game completed after {} phases. Final state saved to {}.",
                summary.phases,
                cfg.output_path.display()
            );
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Converse(args) => run_converse(args).await,
        Commands::Match(args) => run_game(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_declaration_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn converse_defaults_mirror_the_classic_setup() {
        let cli = Cli::parse_from(["parley", "converse"]);
        match cli.command {
            Commands::Converse(args) => {
                assert_eq!(args.prompt, "Hello, how are you today?");
                assert_eq!(args.turns, 5);
                assert_eq!(args.agent1, "Philosopher");
                assert_eq!(args.agent2, "Scientist");
            }
            _ => panic!("expected converse"),
        }
    }

    #[test]
    fn match_defaults() {
        let cli = Cli::parse_from(["parley", "match"]);
        match cli.command {
            Commands::Match(args) => {
                assert_eq!(args.max_duration, 180);
                assert_eq!(args.output, PathBuf::from("game.json"));
            }
            _ => panic!("expected match"),
        }
    }
}
