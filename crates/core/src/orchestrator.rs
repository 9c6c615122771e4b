//! Command Orchestrator
//!
//! The single entry point of the core. Parses a raw command, formalizes its
//! content, dispatches it through the gateway, and folds every outcome into a
//! [`CommandResult`]. Failures after parsing are collected here and nowhere
//! else.

use crate::directory::DirectoryClient;
use crate::error::CommandError;
use crate::formalizer::{ContentFormalizer, FormalizerSettings, PromptTemplates};
use crate::gateway::{GatewaySettings, MessagingGateway};
use crate::intent::{CommandResult, FormalizedContent, ParsedIntent};
use crate::llm_client::LLMClient;
use crate::parser;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub const INVALID_FORMAT_MESSAGE: &str = "Invalid command format";
pub const ERROR_PREFIX: &str = "Error processing command: ";
pub const EMAIL_SUCCESS_MESSAGE: &str = "Email draft created successfully";
pub const MESSAGE_SUCCESS_MESSAGE: &str = "Message sent successfully";

pub struct CommandOrchestrator {
    formalizer: ContentFormalizer,
    gateway: MessagingGateway,
}

impl CommandOrchestrator {
    pub fn new(formalizer: ContentFormalizer, gateway: MessagingGateway) -> Self {
        Self {
            formalizer,
            gateway,
        }
    }

    /// Wires the orchestrator from its two external clients.
    pub fn from_clients(
        llm_client: Arc<dyn LLMClient>,
        directory: Arc<dyn DirectoryClient>,
        formalizer_settings: FormalizerSettings,
        prompts: PromptTemplates,
        gateway_settings: GatewaySettings,
    ) -> Self {
        Self::new(
            ContentFormalizer::new(llm_client, formalizer_settings, prompts),
            MessagingGateway::new(directory, gateway_settings),
        )
    }

    /// Interprets and executes one command. Never fails; the outcome is
    /// reported through the returned [`CommandResult`].
    #[instrument(name = "command", skip_all, fields(request_id = %Uuid::new_v4()))]
    pub async fn process_command(&self, command: &str) -> CommandResult {
        let intent = match parser::parse(command) {
            Ok(intent) => intent,
            Err(e) => {
                warn!(error = %e, "command rejected by parser");
                return CommandResult::failed(INVALID_FORMAT_MESSAGE);
            }
        };
        info!(kind = %intent.kind(), recipient = %intent.recipient(), "command parsed");

        match self.execute(&intent).await {
            Ok(message) => {
                info!(kind = %intent.kind(), "command completed");
                CommandResult::ok(message)
            }
            Err(e) => {
                error!(error = %e, kind = %intent.kind(), "command failed");
                CommandResult::failed(format!("{}{}", ERROR_PREFIX, e))
            }
        }
    }

    async fn execute(&self, intent: &ParsedIntent) -> Result<&'static str, CommandError> {
        // The formalizer shapes its output by intent kind.
        match self.formalizer.formalize(intent).await? {
            FormalizedContent::Email { subject, body } => {
                self.gateway
                    .create_draft_email(intent, &subject, &body)
                    .await?;
                Ok(EMAIL_SUCCESS_MESSAGE)
            }
            FormalizedContent::Message { text } => {
                self.gateway.send_message(intent.recipient(), &text).await?;
                Ok(MESSAGE_SUCCESS_MESSAGE)
            }
        }
    }
}
