//! API Models
//!
//! Request and response bodies for the HTTP layer, annotated for OpenAPI
//! generation with `utoipa`.

use herald_core::CommandResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema, Debug)]
pub struct ProcessCommandPayload {
    /// Free-text command, e.g. "email jane doe about the budget".
    #[serde(default)]
    #[schema(example = "message the design group about the demo")]
    pub command: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct CommandResponse {
    pub success: bool,
    #[schema(example = "Message sent successfully")]
    pub message: String,
}

impl From<CommandResult> for CommandResponse {
    fn from(result: CommandResult) -> Self {
        Self {
            success: result.success,
            message: result.message,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}
