//! Microsoft Graph implementation of [`DirectoryClient`].
//!
//! Credential acquisition happens elsewhere; this client is handed a ready
//! bearer token. Each operation is one HTTP request, except collection reads,
//! which follow `@odata.nextLink` until the last page. Path segments built
//! from user input are percent-encoded.

use crate::directory::{Chat, ChatMember, DirectoryClient, DirectoryUser, DraftMessage, NewChat};
use crate::error::DirectoryError;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Connection settings for [`GraphDirectoryClient`].
#[derive(Debug, Clone)]
pub struct GraphClientConfig {
    pub base_url: String,
    pub access_token: String,
    pub timeout_secs: u64,
}

pub struct GraphDirectoryClient {
    client: reqwest::Client,
    config: GraphClientConfig,
}

/// One page of an OData collection.
#[derive(Debug, Deserialize)]
struct Collection<T> {
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
}

impl GraphDirectoryClient {
    pub fn new(config: GraphClientConfig) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DirectoryError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, DirectoryError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| DirectoryError::Http(format!("invalid base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DirectoryError::Http("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.config.access_token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, DirectoryError> {
        let response = request
            .send()
            .await
            .map_err(|e| DirectoryError::Http(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DirectoryError> {
        debug!(%url, "graph GET");
        let body = self.send(self.request(Method::GET, url)).await?;
        serde_json::from_str(&body).map_err(|e| DirectoryError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, DirectoryError> {
        self.fetch_json(self.url(segments)?).await
    }

    /// Reads every page of a collection, following `@odata.nextLink`.
    async fn get_all<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>, DirectoryError> {
        let mut page: Collection<T> = self.get_json(segments).await?;
        let mut items = Vec::new();
        loop {
            items.extend(page.value);
            let Some(link) = page.next_link else {
                return Ok(items);
            };
            let next = Url::parse(&link)
                .map_err(|e| DirectoryError::Decode(format!("invalid next link '{}': {}", link, e)))?;
            page = self.fetch_json(next).await?;
        }
    }

    async fn post_json(&self, segments: &[&str], payload: &Value) -> Result<String, DirectoryError> {
        let url = self.url(segments)?;
        debug!(%url, "graph POST");
        self.send(self.request(Method::POST, url).json(payload))
            .await
    }

    fn user_bind(&self, user_id: &str) -> String {
        format!("{}/users('{}')", self.config.base_url.trim_end_matches('/'), user_id)
    }

    fn chat_payload(&self, chat: &NewChat) -> Value {
        let members: Vec<Value> = chat
            .members
            .iter()
            .map(|member| {
                json!({
                    "@odata.type": "#microsoft.graph.aadUserConversationMember",
                    "roles": member.roles,
                    "user@odata.bind": self.user_bind(&member.user_id),
                })
            })
            .collect();
        let mut payload = json!({
            "chatType": chat.kind,
            "members": members,
        });
        if let Some(topic) = &chat.topic {
            payload["topic"] = json!(topic);
        }
        payload
    }
}

fn text_body(content: &str) -> Value {
    json!({ "contentType": "text", "content": content })
}

fn recipients(addresses: &[String]) -> Vec<Value> {
    addresses
        .iter()
        .map(|address| json!({ "emailAddress": { "address": address } }))
        .collect()
}

fn message_payload(message: &DraftMessage) -> Value {
    let mut payload = json!({
        "subject": message.subject,
        "body": text_body(&message.body),
        "toRecipients": recipients(&message.to),
    });
    if !message.cc.is_empty() {
        payload["ccRecipients"] = json!(recipients(&message.cc));
    }
    payload
}

#[async_trait]
impl DirectoryClient for GraphDirectoryClient {
    async fn current_user(&self) -> Result<DirectoryUser, DirectoryError> {
        self.get_json(&["me"]).await
    }

    async fn get_user_by_address(&self, address: &str) -> Result<DirectoryUser, DirectoryError> {
        self.get_json(&["users", address]).await
    }

    async fn list_my_chats(&self) -> Result<Vec<Chat>, DirectoryError> {
        self.get_all(&["me", "chats"]).await
    }

    async fn get_chat_members(&self, chat_id: &str) -> Result<Vec<ChatMember>, DirectoryError> {
        self.get_all(&["chats", chat_id, "members"]).await
    }

    async fn create_chat(&self, chat: NewChat) -> Result<Chat, DirectoryError> {
        let body = self.post_json(&["chats"], &self.chat_payload(&chat)).await?;
        serde_json::from_str(&body).map_err(|e| DirectoryError::Decode(e.to_string()))
    }

    async fn post_chat_message(&self, chat_id: &str, text: &str) -> Result<(), DirectoryError> {
        let payload = json!({ "body": text_body(text) });
        self.post_json(&["chats", chat_id, "messages"], &payload)
            .await?;
        Ok(())
    }

    async fn create_draft_message(&self, message: DraftMessage) -> Result<(), DirectoryError> {
        let payload = message_payload(&message);
        if message.is_draft {
            // Messages created in the mailbox are drafts until sent.
            self.post_json(&["me", "messages"], &payload).await?;
        } else {
            self.post_json(
                &["me", "sendMail"],
                &json!({ "message": payload, "saveToSentItems": true }),
            )
            .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ChatKind, NewChatMember};
    use crate::test_http::StubServer;

    fn client() -> GraphDirectoryClient {
        GraphDirectoryClient::new(GraphClientConfig {
            base_url: "https://graph.test/v1.0/".to_string(),
            access_token: "token".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        assert_eq!(
            client().url(&["me", "chats"]).unwrap().as_str(),
            "https://graph.test/v1.0/me/chats"
        );
    }

    #[test]
    fn test_url_encodes_each_segment() {
        let url = client().url(&["users", "bob#eve@example.com"]).unwrap();
        assert_eq!(url.path(), "/v1.0/users/bob%23eve@example.com");
        assert_eq!(url.fragment(), None);

        let url = client().url(&["users", "ops/../me@example.com"]).unwrap();
        assert_eq!(url.path(), "/v1.0/users/ops%2F..%2Fme@example.com");

        let url = client().url(&["users", "who?@example.com"]).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_group_chat_payload() {
        let payload = client().chat_payload(&NewChat {
            kind: ChatKind::Group,
            topic: Some("design group".to_string()),
            members: vec![NewChatMember::owner("me-1")],
        });
        assert_eq!(payload["chatType"], "group");
        assert_eq!(payload["topic"], "design group");
        assert_eq!(payload["members"][0]["roles"][0], "owner");
        assert_eq!(
            payload["members"][0]["user@odata.bind"],
            "https://graph.test/v1.0/users('me-1')"
        );
    }

    #[test]
    fn test_one_on_one_payload_has_no_topic() {
        let payload = client().chat_payload(&NewChat {
            kind: ChatKind::OneOnOne,
            topic: None,
            members: vec![NewChatMember::owner("me-1"), NewChatMember::owner("u-2")],
        });
        assert_eq!(payload["chatType"], "oneOnOne");
        assert!(payload.get("topic").is_none());
        assert_eq!(payload["members"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_message_payload_omits_empty_cc() {
        let payload = message_payload(&DraftMessage {
            subject: "S".to_string(),
            body: "B".to_string(),
            to: vec!["bob@example.com".to_string()],
            cc: vec![],
            is_draft: true,
        });
        assert_eq!(payload["subject"], "S");
        assert_eq!(payload["body"]["contentType"], "text");
        assert_eq!(payload["body"]["content"], "B");
        assert_eq!(
            payload["toRecipients"][0]["emailAddress"]["address"],
            "bob@example.com"
        );
        assert!(payload.get("ccRecipients").is_none());
    }

    #[test]
    fn test_message_payload_with_cc() {
        let payload = message_payload(&DraftMessage {
            subject: "S".to_string(),
            body: "B".to_string(),
            to: vec!["bob@example.com".to_string()],
            cc: vec!["carol@example.com".to_string()],
            is_draft: true,
        });
        assert_eq!(
            payload["ccRecipients"][0]["emailAddress"]["address"],
            "carol@example.com"
        );
    }

    fn stub_client(server: &StubServer) -> GraphDirectoryClient {
        GraphDirectoryClient::new(GraphClientConfig {
            base_url: format!("{}/v1.0", server.base_url),
            access_token: "token-123".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_user_lookup_encodes_address() {
        let server = StubServer::start(vec![(
            200,
            r#"{"id":"u-1","displayName":"Bob","mail":"bob@example.com"}"#,
        )])
        .await;

        let user = stub_client(&server)
            .get_user_by_address("bob#eve@example.com")
            .await
            .unwrap();
        assert_eq!(user.id, "u-1");

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].target, "/v1.0/users/bob%23eve@example.com");
        assert_eq!(requests[0].header("authorization"), Some("Bearer token-123"));
    }

    #[tokio::test]
    async fn test_list_chats_follows_next_link() {
        let server = StubServer::start(vec![
            (
                200,
                r#"{"value":[{"id":"c-1","chatType":"oneOnOne"}],"@odata.nextLink":"{base}/v1.0/me/chats?$skiptoken=p2"}"#,
            ),
            (
                200,
                r#"{"value":[{"id":"g-1","chatType":"group","topic":"ops group"}]}"#,
            ),
        ])
        .await;

        let chats = stub_client(&server).list_my_chats().await.unwrap();
        let ids: Vec<&str> = chats.iter().map(|chat| chat.id.as_str()).collect();
        assert_eq!(ids, vec!["c-1", "g-1"]);
        assert_eq!(chats[1].topic.as_deref(), Some("ops group"));

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].target, "/v1.0/me/chats");
        assert_eq!(requests[1].target, "/v1.0/me/chats?$skiptoken=p2");
        assert_eq!(requests[1].header("authorization"), Some("Bearer token-123"));
    }

    #[tokio::test]
    async fn test_draft_is_posted_to_mailbox() {
        let server = StubServer::start(vec![(201, r#"{"id":"msg-1","isDraft":true}"#)]).await;

        stub_client(&server)
            .create_draft_message(DraftMessage {
                subject: "Budget".to_string(),
                body: "Dear Bob".to_string(),
                to: vec!["bob@example.com".to_string()],
                cc: vec!["carol@example.com".to_string()],
                is_draft: true,
            })
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/v1.0/me/messages");
        assert_eq!(requests[0].header("authorization"), Some("Bearer token-123"));
        let body = requests[0].json();
        assert_eq!(body["subject"], "Budget");
        assert_eq!(body["body"]["content"], "Dear Bob");
        assert_eq!(
            body["toRecipients"][0]["emailAddress"]["address"],
            "bob@example.com"
        );
        assert_eq!(
            body["ccRecipients"][0]["emailAddress"]["address"],
            "carol@example.com"
        );
    }

    #[tokio::test]
    async fn test_chat_message_is_posted_to_chat() {
        let server = StubServer::start(vec![(201, r#"{"id":"1700000000000"}"#)]).await;

        stub_client(&server)
            .post_chat_message("19:abc@thread.v2", "The demo is ready.")
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/v1.0/chats/19:abc@thread.v2/messages");
        let body = requests[0].json();
        assert_eq!(body["body"]["contentType"], "text");
        assert_eq!(body["body"]["content"], "The demo is ready.");
    }

    #[tokio::test]
    async fn test_create_chat_decodes_created_chat() {
        let server = StubServer::start(vec![(
            201,
            r#"{"id":"19:new@thread.v2","chatType":"group","topic":"design group"}"#,
        )])
        .await;

        let chat = stub_client(&server)
            .create_chat(NewChat {
                kind: ChatKind::Group,
                topic: Some("design group".to_string()),
                members: vec![NewChatMember::owner("u-me")],
            })
            .await
            .unwrap();
        assert_eq!(chat.id, "19:new@thread.v2");
        assert_eq!(chat.kind, ChatKind::Group);

        let requests = server.requests();
        assert_eq!(requests[0].target, "/v1.0/chats");
        assert_eq!(requests[0].json()["chatType"], "group");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = StubServer::start(vec![(
            404,
            r#"{"error":{"code":"Request_ResourceNotFound","message":"Resource does not exist."}}"#,
        )])
        .await;

        let err = stub_client(&server)
            .get_user_by_address("ghost@example.com")
            .await
            .unwrap_err();
        match err {
            DirectoryError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("Request_ResourceNotFound"));
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }
}
