//! Client and server event types
//!
//! Inbound frames decode into the closed `ClientEvent` union; anything that
//! does not decode is a malformed event. Outbound frames are always one of
//! the four `ServerEvent` kinds.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use relay_core::ChatMessage;
use serde::{Deserialize, Serialize};

use super::ChatMessagePayload;

/// A serialized server event, shared across every recipient of a broadcast
pub type Frame = Arc<str>;

/// Events a client may send
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientEvent {
    /// Announce the display name for this connection
    Init { username: String },
    /// Post a chat message
    Message { message: String },
    /// The user is typing
    Typing,
}

impl ClientEvent {
    /// Decode one inbound text frame
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Event kind, for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Message { .. } => "message",
            Self::Typing => "typing",
        }
    }
}

/// Events the server sends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    /// Recent messages, oldest first; sent once to a client after `init`
    History { messages: Vec<ChatMessagePayload> },
    /// A newly stored chat message
    Message { message: ChatMessagePayload },
    /// Someone else is typing
    Typing { username: String },
    /// Join and leave notices
    System {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl ServerEvent {
    #[must_use]
    pub fn history(messages: &[ChatMessage]) -> Self {
        Self::History {
            messages: messages.iter().map(ChatMessagePayload::from).collect(),
        }
    }

    #[must_use]
    pub fn message(message: &ChatMessage) -> Self {
        Self::Message {
            message: ChatMessagePayload::from(message),
        }
    }

    #[must_use]
    pub fn typing(username: impl Into<String>) -> Self {
        Self::Typing {
            username: username.into(),
        }
    }

    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::System {
            message: text.into(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn joined(username: &str) -> Self {
        Self::system(format!("{username} joined the chat"))
    }

    #[must_use]
    pub fn left(username: &str) -> Self {
        Self::system(format!("{username} left the chat"))
    }

    /// Event kind, for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::History { .. } => "history",
            Self::Message { .. } => "message",
            Self::Typing { .. } => "typing",
            Self::System { .. } => "system",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize into a shareable frame
    pub fn to_frame(&self) -> Result<Frame, serde_json::Error> {
        self.to_json().map(Frame::from)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::History { messages } => write!(f, "history({} messages)", messages.len()),
            Self::Message { message } => write!(f, "message(id={})", message.id),
            Self::Typing { username } => write!(f, "typing({username})"),
            Self::System { message, .. } => write!(f, "system({message})"),
        }
    }
}
