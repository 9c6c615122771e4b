//! Error taxonomy for the command pipeline.
//!
//! Each stage owns its error enum. `CommandError` aggregates the downstream
//! stages so the orchestrator can bubble everything with `?` to one place.

use thiserror::Error;

/// Failures raised while interpreting command text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid command format")]
    InvalidFormat,
    #[error("unsupported command type")]
    UnsupportedType,
}

/// Failures from the text-generation transport.
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("http error: {0}")]
    Http(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response error: {0}")]
    Response(String),
}

/// Failures raised while formalizing content.
#[derive(Debug, Error)]
pub enum FormalizeError {
    #[error("text generation backend error: {0}")]
    BackendError(String),
    #[error("malformed text generation response: {0}")]
    MalformedResponse(String),
}

impl From<LLMError> for FormalizeError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::Http(_) | LLMError::Status { .. } => Self::BackendError(err.to_string()),
            LLMError::Response(_) => Self::MalformedResponse(err.to_string()),
        }
    }
}

/// Failures from the directory/messaging backend client.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Http(String),
    #[error("directory returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected directory response: {0}")]
    Decode(String),
}

/// Failures raised while dispatching through the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Backend(#[from] DirectoryError),
    #[error("cannot derive an address from recipient '{0}'")]
    InvalidRecipient(String),
}

/// Any failure after parsing, surfaced to callers as text.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Formalize(#[from] FormalizeError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
