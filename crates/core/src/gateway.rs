//! Directory/Messaging Gateway
//!
//! Translates formalized intents into backend operations: draft emails, and
//! chat messages posted to a one-on-one or group chat that is looked up first
//! and created only when no match exists. Every operation is a single attempt;
//! backend failures propagate unchanged.
//!
//! Two comparisons are configured independently. Routing to a group chat uses
//! a substring test for "group" (case-insensitive by default); matching an
//! existing group chat compares its topic for equality (case-sensitive by
//! default).

use crate::address::AddressPolicy;
use crate::directory::{ChatKind, DirectoryClient, DraftMessage, NewChat, NewChatMember};
use crate::error::GatewayError;
use crate::intent::ParsedIntent;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

const GROUP_MARKER: &str = "group";

/// How two strings are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    pub fn contains(self, haystack: &str, needle: &str) -> bool {
        match self {
            Self::Sensitive => haystack.contains(needle),
            Self::Insensitive => haystack.to_lowercase().contains(&needle.to_lowercase()),
        }
    }

    pub fn equals(self, left: &str, right: &str) -> bool {
        match self {
            Self::Sensitive => left == right,
            Self::Insensitive => left.to_lowercase() == right.to_lowercase(),
        }
    }
}

impl FromStr for CaseSensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sensitive" => Ok(Self::Sensitive),
            "insensitive" => Ok(Self::Insensitive),
            other => Err(format!(
                "'{}' is not a valid comparison (expected 'sensitive' or 'insensitive')",
                other
            )),
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub addresses: AddressPolicy,
    /// Comparison for the "group" routing test.
    pub group_routing: CaseSensitivity,
    /// Comparison between a recipient and an existing group chat topic.
    pub topic_matching: CaseSensitivity,
}

impl GatewaySettings {
    pub fn new(addresses: AddressPolicy) -> Self {
        Self {
            addresses,
            group_routing: CaseSensitivity::Insensitive,
            topic_matching: CaseSensitivity::Sensitive,
        }
    }
}

/// A resolved chat conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatHandle {
    pub id: String,
    /// Whether the chat was created during this resolution.
    pub created: bool,
}

pub struct MessagingGateway {
    directory: Arc<dyn DirectoryClient>,
    settings: GatewaySettings,
}

impl MessagingGateway {
    pub fn new(directory: Arc<dyn DirectoryClient>, settings: GatewaySettings) -> Self {
        Self {
            directory,
            settings,
        }
    }

    fn address_for(&self, name: &str) -> Result<String, GatewayError> {
        self.settings
            .addresses
            .address_for(name)
            .ok_or_else(|| GatewayError::InvalidRecipient(name.to_string()))
    }

    /// Saves a draft email addressed to the intent's recipient and optional cc.
    ///
    /// Drafts are not deduplicated: calling this twice creates two drafts.
    pub async fn create_draft_email(
        &self,
        intent: &ParsedIntent,
        subject: &str,
        body: &str,
    ) -> Result<(), GatewayError> {
        let to = self.address_for(intent.recipient())?;
        let cc = intent
            .cc_recipient()
            .map(|name| self.address_for(name))
            .transpose()?
            .into_iter()
            .collect::<Vec<_>>();

        info!(%to, cc = ?cc, "creating draft email");
        self.directory
            .create_draft_message(DraftMessage {
                subject: subject.to_string(),
                body: body.to_string(),
                to: vec![to],
                cc,
                is_draft: true,
            })
            .await?;
        Ok(())
    }

    /// Whether `recipient` is routed to group-chat resolution.
    pub fn is_group_recipient(&self, recipient: &str) -> bool {
        self.settings.group_routing.contains(recipient, GROUP_MARKER)
    }

    /// Posts `text` to the chat for `recipient`, creating the chat if needed.
    pub async fn send_message(&self, recipient: &str, text: &str) -> Result<ChatHandle, GatewayError> {
        let handle = if self.is_group_recipient(recipient) {
            self.resolve_group_chat(recipient).await?
        } else {
            self.resolve_one_on_one_chat(recipient).await?
        };

        info!(chat_id = %handle.id, created = handle.created, "posting chat message");
        self.directory.post_chat_message(&handle.id, text).await?;
        Ok(handle)
    }

    /// Finds the first one-on-one chat containing the recipient, or creates one.
    pub async fn resolve_one_on_one_chat(&self, recipient: &str) -> Result<ChatHandle, GatewayError> {
        let address = self.address_for(recipient)?;
        let user = self.directory.get_user_by_address(&address).await?;
        debug!(%address, user_id = %user.id, "resolved recipient identity");

        for chat in self.directory.list_my_chats().await? {
            if chat.kind != ChatKind::OneOnOne {
                continue;
            }
            let members = self.directory.get_chat_members(&chat.id).await?;
            if members
                .iter()
                .any(|member| member.user_id.as_deref() == Some(user.id.as_str()))
            {
                debug!(chat_id = %chat.id, "found existing one-on-one chat");
                return Ok(ChatHandle {
                    id: chat.id,
                    created: false,
                });
            }
        }

        // The backend requires both participants on a one-on-one chat.
        let me = self.directory.current_user().await?;
        let chat = self
            .directory
            .create_chat(NewChat {
                kind: ChatKind::OneOnOne,
                topic: None,
                members: vec![NewChatMember::owner(me.id), NewChatMember::owner(user.id)],
            })
            .await?;
        info!(chat_id = %chat.id, "created one-on-one chat");
        Ok(ChatHandle {
            id: chat.id,
            created: true,
        })
    }

    /// Finds the first group chat whose topic matches `topic`, or creates one
    /// with the caller as its only owner.
    pub async fn resolve_group_chat(&self, topic: &str) -> Result<ChatHandle, GatewayError> {
        let matching = self.settings.topic_matching;
        let existing = self.directory.list_my_chats().await?.into_iter().find(|chat| {
            chat.kind == ChatKind::Group
                && chat
                    .topic
                    .as_deref()
                    .is_some_and(|chat_topic| matching.equals(chat_topic, topic))
        });
        if let Some(chat) = existing {
            debug!(chat_id = %chat.id, "found existing group chat");
            return Ok(ChatHandle {
                id: chat.id,
                created: false,
            });
        }

        let me = self.directory.current_user().await?;
        let chat = self
            .directory
            .create_chat(NewChat {
                kind: ChatKind::Group,
                topic: Some(topic.to_string()),
                members: vec![NewChatMember::owner(me.id)],
            })
            .await?;
        info!(chat_id = %chat.id, %topic, "created group chat");
        Ok(ChatHandle {
            id: chat.id,
            created: true,
        })
    }
}
