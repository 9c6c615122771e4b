//! Command Intents
//!
//! Typed interpretations of a raw command and the values that flow between the
//! parser, formalizer and gateway during a single request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of action a command asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    /// Create a draft email.
    Email,
    /// Post a chat message.
    Message,
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentKind::Email => write!(f, "email"),
            IntentKind::Message => write!(f, "message"),
        }
    }
}

/// A command parsed into its kind and slots.
///
/// Only the parser constructs intents, which guarantees that `recipient` is
/// non-empty, that email intents carry content, and that only email intents
/// carry a cc recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedIntent {
    kind: IntentKind,
    recipient: String,
    cc_recipient: Option<String>,
    content_hint: String,
}

impl ParsedIntent {
    pub(crate) fn email(recipient: String, cc_recipient: Option<String>, content_hint: String) -> Self {
        Self {
            kind: IntentKind::Email,
            recipient,
            cc_recipient,
            content_hint,
        }
    }

    pub(crate) fn message(recipient: String, content_hint: String) -> Self {
        Self {
            kind: IntentKind::Message,
            recipient,
            cc_recipient: None,
            content_hint,
        }
    }

    pub fn kind(&self) -> IntentKind {
        self.kind
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn cc_recipient(&self) -> Option<&str> {
        self.cc_recipient.as_deref()
    }

    pub fn content_hint(&self) -> &str {
        &self.content_hint
    }
}

/// Formal content produced by the language model for one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormalizedContent {
    Email { subject: String, body: String },
    Message { text: String },
}

/// The sole artifact returned to callers of the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_intent_never_carries_cc() {
        let intent = ParsedIntent::message("design group".into(), "demo".into());
        assert_eq!(intent.kind(), IntentKind::Message);
        assert_eq!(intent.cc_recipient(), None);
    }

    #[test]
    fn test_intent_kind_display() {
        assert_eq!(IntentKind::Email.to_string(), "email");
        assert_eq!(IntentKind::Message.to_string(), "message");
    }

    #[test]
    fn test_command_result_serialization() {
        let json = serde_json::to_string(&CommandResult::failed("Invalid command format")).unwrap();
        assert_eq!(json, r#"{"success":false,"message":"Invalid command format"}"#);
    }
}
