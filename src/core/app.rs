//! Application state and the operations driven by user interactions.
//!
//! Every interaction takes the [`App`], applies exactly one mutation, and the
//! next render re-derives the whole screen from it. The provider client hangs
//! off the state as an opaque capability; until a credential is supplied
//! there is no client and every chat operation is blocked with a
//! configuration warning.

use std::error::Error as StdError;
use std::fmt;

use crate::api::client::{ChatClient, HttpChatClient};
use crate::api::{ApiError, ChatMessage};
use crate::core::config::Settings;
use crate::core::credentials::Credential;
use crate::core::message::Message;
use crate::core::session::{SessionId, SessionStore};
use crate::utils::logging::LoggingState;

const PERSONA_INSTRUCTION: &str = "You are a capable AI assistant. Explain things as clearly as \
you can, and say plainly when you do not know something.";
const PERSONA_ACK: &str = "Understood.";

/// The fixed preamble every new remote conversation is seeded with: one
/// persona instruction and one acknowledgement. Seed messages never appear
/// in the visible message log.
pub fn seed_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::new("system", PERSONA_INSTRUCTION),
        ChatMessage::new("assistant", PERSONA_ACK),
    ]
}

/// Which top-level screen the UI should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// No credential yet; chat functionality is disabled.
    EnterKey,
    /// Credential present, no active session.
    Home,
    /// An active session is on screen.
    Chat,
}

/// A transient line of UI chrome: feedback about the last interaction.
/// Notices live outside the message log; they are never sent to the provider
/// and never rendered as conversation turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Warning(text) | Notice::Error(text) => text,
        }
    }
}

/// Failures surfaced by chat operations.
#[derive(Debug)]
pub enum ChatError {
    /// No credential has been supplied yet.
    MissingCredential,
    /// A send was attempted with no session on screen.
    NoActiveSession,
    /// The provider call failed; the appended user message is preserved.
    Provider(ApiError),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::MissingCredential => {
                write!(f, "No API key configured. Enter a key to start chatting.")
            }
            ChatError::NoActiveSession => write!(f, "No active session"),
            ChatError::Provider(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for ChatError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ChatError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

pub struct App {
    pub settings: Settings,
    client: Option<Box<dyn ChatClient>>,
    pub store: SessionStore,
    pub logging: LoggingState,
    notice: Option<Notice>,
}

impl App {
    pub fn new(settings: Settings, logging: LoggingState) -> Self {
        Self {
            settings,
            client: None,
            store: SessionStore::new(),
            logging,
            notice: None,
        }
    }

    /// Build the HTTP client around a freshly supplied credential. The key
    /// stays inside the client; nothing else holds on to it.
    pub fn connect(&mut self, credential: Credential) -> Result<(), ApiError> {
        let client = HttpChatClient::new(
            credential,
            &self.settings.base_url,
            &self.settings.model,
            self.settings.timeout,
        )?;
        self.attach_client(Box::new(client));
        Ok(())
    }

    /// Install a provider client directly. Tests use this to substitute a
    /// scripted implementation.
    pub fn attach_client(&mut self, client: Box<dyn ChatClient>) {
        self.client = Some(client);
        self.notice = None;
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn view(&self) -> View {
        if self.client.is_none() {
            View::EnterKey
        } else if self.store.active_id().is_none() {
            View::Home
        } else {
            View::Chat
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Open a new seeded conversation with the provider and store it as the
    /// active session.
    pub async fn create_session(&mut self) -> Result<SessionId, ChatError> {
        let client = self.client.as_deref().ok_or(ChatError::MissingCredential)?;

        let conversation = client
            .open_conversation(&seed_messages())
            .await
            .map_err(ChatError::Provider)?;

        self.notice = None;
        Ok(self.store.create_session(conversation))
    }

    /// Point the UI at an existing session. Unknown ids no-op in the store.
    pub fn select_session(&mut self, id: &SessionId) {
        self.store.select_session(id);
        self.notice = None;
    }

    pub fn return_home(&mut self) {
        self.store.return_home();
        self.notice = None;
    }

    /// Append the user message to the active session's log, forward it
    /// through the session's remote handle, and append the assistant reply.
    ///
    /// This blocks the current interaction until the provider answers or the
    /// request times out. On failure the user message stays in the log —
    /// user input is never silently discarded — and the error is returned
    /// for the UI to surface.
    pub async fn send_message(&mut self, text: String) -> Result<(), ChatError> {
        let client = self.client.as_deref().ok_or(ChatError::MissingCredential)?;
        let id = self
            .store
            .active_id()
            .cloned()
            .ok_or(ChatError::NoActiveSession)?;
        let session = self
            .store
            .session_mut(&id)
            .ok_or(ChatError::NoActiveSession)?;

        session.messages.push(Message::user(text.clone()));
        if let Err(err) = self.logging.log_message(&format!("You: {text}")) {
            tracing::debug!(error = %err, "transcript logging failed");
        }

        let reply = client
            .send(&mut session.remote, &text)
            .await
            .map_err(ChatError::Provider)?;

        if let Err(err) = self.logging.log_message(&format!("Assistant: {reply}")) {
            tracing::debug!(error = %err, "transcript logging failed");
        }
        session.messages.push(Message::assistant(reply));
        self.notice = None;
        Ok(())
    }
}
