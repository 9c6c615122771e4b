//! Directory/messaging backend capability.
//!
//! The gateway consumes the backend through [`DirectoryClient`] only. The
//! production implementation lives in [`crate::graph`]; tests substitute fakes.

use crate::error::DirectoryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A user known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatKind {
    #[serde(rename = "oneOnOne")]
    OneOnOne,
    #[serde(rename = "group")]
    Group,
    #[serde(rename = "meeting")]
    Meeting,
    #[serde(other)]
    Unknown,
}

/// A chat as listed by the backend. The `id` is the chat handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    #[serde(rename = "chatType")]
    pub kind: ChatKind,
    #[serde(default)]
    pub topic: Option<String>,
}

/// A chat member. `user_id` is absent for non-user members such as bots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMember {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A member to add when creating a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMember {
    pub user_id: String,
    pub roles: Vec<String>,
}

impl NewChatMember {
    pub fn owner(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            roles: vec!["owner".to_string()],
        }
    }
}

/// Parameters for creating a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChat {
    pub kind: ChatKind,
    pub topic: Option<String>,
    pub members: Vec<NewChatMember>,
}

/// An email to store in the caller's mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftMessage {
    pub subject: String,
    pub body: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    /// When set the message is saved as a draft and not transmitted.
    pub is_draft: bool,
}

/// Operations the gateway needs from the directory/messaging backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// The signed-in caller.
    async fn current_user(&self) -> Result<DirectoryUser, DirectoryError>;

    async fn get_user_by_address(&self, address: &str) -> Result<DirectoryUser, DirectoryError>;

    /// Chats the caller is a member of, in backend order.
    async fn list_my_chats(&self) -> Result<Vec<Chat>, DirectoryError>;

    async fn get_chat_members(&self, chat_id: &str) -> Result<Vec<ChatMember>, DirectoryError>;

    async fn create_chat(&self, chat: NewChat) -> Result<Chat, DirectoryError>;

    async fn post_chat_message(&self, chat_id: &str, text: &str) -> Result<(), DirectoryError>;

    async fn create_draft_message(&self, message: DraftMessage) -> Result<(), DirectoryError>;
}
