//! Chat notification of published releases.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Matrix client posting announcements to a room.
pub mod matrix;

/// Chat message with a plain text body and an HTML rendering of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub body: String,
    pub formatted_body: String,
}

/// Posts messages to a chat channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_message(&self, message: &ChatMessage) -> Result<()>;
}
