//! Provider client and the opaque conversation handle.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ApiError, ChatMessage, ChatRequest, ChatResponse};
use crate::core::credentials::Credential;
use crate::utils::url::construct_api_url;

/// Provider-side conversation context.
///
/// For an OpenAI-compatible API the context window is carried by the client,
/// so the handle privately owns the wire history (seed messages plus every
/// committed exchange) and replays it on each call. Nothing outside this
/// module can observe or edit that history; sessions hold the handle purely
/// as a capability to continue the conversation.
pub struct Conversation {
    history: Vec<ChatMessage>,
}

impl Conversation {
    pub(crate) fn new(seed: &[ChatMessage]) -> Self {
        Self {
            history: seed.to_vec(),
        }
    }

    fn request_messages(&self, text: &str) -> Vec<ChatMessage> {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::new("user", text));
        messages
    }

    /// Record a completed exchange. Only called after the provider accepted
    /// the turn, so a failed request never pollutes later context.
    fn commit_exchange(&mut self, text: &str, reply: &str) {
        self.history.push(ChatMessage::new("user", text));
        self.history.push(ChatMessage::new("assistant", reply));
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.history.len()
    }
}

/// The narrow seam to the LLM provider: open a seeded conversation, send one
/// user turn and get the complete reply. Tests substitute a scripted
/// implementation; the real one speaks HTTP.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn open_conversation(&self, seed: &[ChatMessage]) -> Result<Conversation, ApiError>;

    async fn send(&self, conversation: &mut Conversation, text: &str) -> Result<String, ApiError>;
}

pub struct HttpChatClient {
    http: reqwest::Client,
    base_url: String,
    credential: Credential,
    model: String,
}

impl HttpChatClient {
    pub fn new(
        credential: Credential,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            credential,
            model: model.to_string(),
        })
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ApiError> {
        let url = construct_api_url(&self.base_url, "chat/completions");
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
        };

        debug!(url = %url, turns = request.messages.len(), "sending chat completion request");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.credential.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "chat completion request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed.into_reply()
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn open_conversation(&self, seed: &[ChatMessage]) -> Result<Conversation, ApiError> {
        // The context window is client-carried, so opening never talks to the
        // provider; a bad credential surfaces on the first send instead.
        Ok(Conversation::new(seed))
    }

    async fn send(&self, conversation: &mut Conversation, text: &str) -> Result<String, ApiError> {
        let reply = self.complete(conversation.request_messages(text)).await?;
        conversation.commit_exchange(text, &reply);
        Ok(reply)
    }
}
