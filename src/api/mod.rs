//! Chat payloads and errors shared by provider clients.
//!
//! The wire format is the OpenAI-compatible `chat/completions` shape. Only
//! the non-streaming variant is used: one request per user turn, one complete
//! assistant reply per response.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod client;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    pub message: ChatResponseMessage,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatResponseChoice>,
}

impl ChatResponse {
    /// Pull the assistant reply out of the response, treating a missing
    /// choice or empty content as a malformed answer.
    pub fn into_reply(self) -> Result<String, ApiError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(ApiError::EmptyResponse)
    }
}

/// Failures surfaced by a provider call. All of them are terminal for the
/// current interaction: the UI reports the error and the user retries
/// manually if they want to.
#[derive(Debug)]
pub enum ApiError {
    /// The provider answered with a non-success HTTP status.
    Status { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    Timeout,

    /// Connection, TLS, or protocol failure below the HTTP layer.
    Transport(reqwest::Error),

    /// The response decoded, but carried no usable assistant reply.
    EmptyResponse,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "API request failed with status {status}")
                } else {
                    write!(f, "API request failed with status {status}: {body}")
                }
            }
            ApiError::Timeout => write!(f, "API request timed out"),
            ApiError::Transport(err) => write!(f, "API request failed: {err}"),
            ApiError::EmptyResponse => write!(f, "API response contained no reply"),
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ApiError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_wire_shape() {
        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![
                ChatMessage::new("system", "Be helpful."),
                ChatMessage::new("user", "hi"),
            ],
            stream: false,
        };

        let value = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
    }

    #[test]
    fn response_reply_is_extracted() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"hello there"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).expect("parse response");
        assert_eq!(response.into_reply().expect("reply"), "hello there");
    }

    #[test]
    fn empty_choices_are_rejected() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[]}"#).expect("parse response");
        assert!(matches!(response.into_reply(), Err(ApiError::EmptyResponse)));
    }

    #[test]
    fn null_content_is_rejected() {
        let raw = r#"{"choices":[{"message":{"content":null}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).expect("parse response");
        assert!(matches!(response.into_reply(), Err(ApiError::EmptyResponse)));
    }

    #[test]
    fn error_display_is_user_readable() {
        let status = ApiError::Status {
            status: 401,
            body: "invalid api key".to_string(),
        };
        assert_eq!(
            status.to_string(),
            "API request failed with status 401: invalid api key"
        );

        let bare = ApiError::Status {
            status: 503,
            body: "  ".to_string(),
        };
        assert_eq!(bare.to_string(), "API request failed with status 503");

        assert_eq!(ApiError::Timeout.to_string(), "API request timed out");
    }
}
