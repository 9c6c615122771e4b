//! Content Formalizer
//!
//! Rewrites the informal content of a parsed intent into formal prose through
//! a single language-model call. Email intents ask the model for a JSON object
//! with `subject` and `body`; message intents ask for plain text.

use crate::error::FormalizeError;
use crate::intent::{FormalizedContent, IntentKind, ParsedIntent};
use crate::llm_client::{CompletionRequest, LLMClient};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const MAX_LOG_CHARS: usize = 2_000;

const DEFAULT_EMAIL_PROMPT: &str = "Convert the following informal request into a formal, \
professional email.\n\
Recipient: {recipient}\n\
CC: {cc}\n\
Request: {content}\n\n\
Respond only with a JSON object containing two string fields: \"subject\" and \"body\".";

const DEFAULT_MESSAGE_PROMPT: &str = "Rewrite the following informal note as a clear, \
professional chat message to {recipient}.\n\
Note: {content}\n\n\
Respond only with the message text.";

/// Prompt templates with `{recipient}`, `{cc}` and `{content}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub email: String,
    pub message: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL_PROMPT.to_string(),
            message: DEFAULT_MESSAGE_PROMPT.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Builds templates from a map keyed by `formalize_email` and
    /// `formalize_message`, falling back to the built-in template for any
    /// missing key.
    pub fn from_map(prompts: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        Self {
            email: prompts
                .get("formalize_email")
                .cloned()
                .unwrap_or(defaults.email),
            message: prompts
                .get("formalize_message")
                .cloned()
                .unwrap_or(defaults.message),
        }
    }

    /// Fills the template matching the intent's kind.
    pub fn render(&self, intent: &ParsedIntent) -> String {
        let template = match intent.kind() {
            IntentKind::Email => &self.email,
            IntentKind::Message => &self.message,
        };
        template
            .replace("{recipient}", intent.recipient())
            .replace("{cc}", intent.cc_recipient().unwrap_or("none"))
            .replace("{content}", intent.content_hint())
    }
}

/// Model settings used for every formalization call.
#[derive(Debug, Clone)]
pub struct FormalizerSettings {
    pub model: String,
    pub temperature: f32,
}

impl Default for FormalizerSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmailPayload {
    subject: String,
    body: String,
}

/// Turns parsed intents into formal content via an [`LLMClient`].
pub struct ContentFormalizer {
    client: Arc<dyn LLMClient>,
    settings: FormalizerSettings,
    prompts: PromptTemplates,
}

impl ContentFormalizer {
    pub fn new(
        client: Arc<dyn LLMClient>,
        settings: FormalizerSettings,
        prompts: PromptTemplates,
    ) -> Self {
        Self {
            client,
            settings,
            prompts,
        }
    }

    /// Produces the formal content for `intent` with one completion call.
    pub async fn formalize(
        &self,
        intent: &ParsedIntent,
    ) -> Result<FormalizedContent, FormalizeError> {
        let prompt = self.prompts.render(intent);
        info!(
            kind = %intent.kind(),
            model = %self.settings.model,
            temperature = self.settings.temperature,
            prompt_len = prompt.len(),
            "formalization request prepared"
        );
        debug!(prompt = %truncate_for_log(&prompt, MAX_LOG_CHARS), "formalization prompt");

        let output = self
            .client
            .complete(CompletionRequest {
                model: self.settings.model.clone(),
                prompt,
                temperature: self.settings.temperature,
            })
            .await?;
        debug!(output = %truncate_for_log(&output, MAX_LOG_CHARS), "raw llm output");

        match intent.kind() {
            IntentKind::Email => parse_email_payload(&output),
            IntentKind::Message => {
                let text = output.trim();
                if text.is_empty() {
                    return Err(FormalizeError::MalformedResponse(
                        "empty message text".to_string(),
                    ));
                }
                Ok(FormalizedContent::Message {
                    text: text.to_string(),
                })
            }
        }
    }
}

fn parse_email_payload(output: &str) -> Result<FormalizedContent, FormalizeError> {
    let json = extract_json(output).ok_or_else(|| {
        FormalizeError::MalformedResponse("no JSON object in model output".to_string())
    })?;
    let payload: EmailPayload =
        serde_json::from_str(json).map_err(|e| FormalizeError::MalformedResponse(e.to_string()))?;
    Ok(FormalizedContent::Email {
        subject: payload.subject,
        body: payload.body,
    })
}

// Models frequently wrap JSON in prose or code fences.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={}]", char_count));
    preview
}
