//! Notices shown in the messages pane

use std::time::{Duration, Instant};

/// How long a notice stays in the pane; errors are kept until they scroll out
const MESSAGE_LIFETIME: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub message_type: MessageType,
    pub text: String,
    pub timestamp: Instant,
}

impl Message {
    pub fn new(message_type: MessageType, text: String) -> Self {
        Self {
            message_type,
            text,
            timestamp: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.timestamp.elapsed() > MESSAGE_LIFETIME
    }

    pub fn icon(&self) -> &'static str {
        match self.message_type {
            MessageType::Info => "ℹ",
            MessageType::Success => "✓",
            MessageType::Warning => "⚠",
            MessageType::Error => "✗",
        }
    }
}
