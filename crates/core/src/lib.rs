//! Herald Core
//!
//! Natural-language command pipeline: parse a command into an intent,
//! formalize its content with a language model, and dispatch it as a draft
//! email or a chat message through a directory/messaging backend.

pub mod address;
pub mod directory;
pub mod error;
pub mod formalizer;
pub mod gateway;
pub mod graph;
pub mod intent;
pub mod llm_client;
pub mod orchestrator;
pub mod parser;

#[cfg(test)]
mod test_http;

pub use intent::{CommandResult, FormalizedContent, IntentKind, ParsedIntent};
pub use orchestrator::CommandOrchestrator;
