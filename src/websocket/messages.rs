//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between the
//! dashboard page and the server.

use serde::{Deserialize, Serialize};

use crate::dashboard::{ControlId, ControlValue, OutputUpdate};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Page loaded; run every handler for the current state
    Init,
    /// A control changed
    SetControl {
        control: ControlId,
        value: ControlValue,
    },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique session identifier
        session_id: String,
    },
    /// New content for some outputs
    Update { outputs: Vec<OutputUpdate> },
    /// Error message
    Error {
        /// Error description
        message: String,
    },
    /// Pong response to ping
    Pong,
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}
