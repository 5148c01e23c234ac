//! Provider-agnostic chat client abstraction.
//!
//! The theme generator only needs "send these messages, give me the reply",
//! so [`ClientWrapper`] is that and nothing more, plus optional token usage
//! bookkeeping. [`crate::clients::openai::OpenAIClient`] is the bundled
//! implementation; tests plug in their own.
//!
//! ```rust
//! use async_trait::async_trait;
//! use calcdesk::client_wrapper::{ClientWrapper, Message, Role, SendError};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ClientWrapper for Echo {
//!     fn model_name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     async fn send_message(&self, messages: &[Message]) -> Result<Message, SendError> {
//!         let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
//!         Ok(Message::new(Role::Assistant, last))
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::sync::Mutex;

/// Error returned by client implementations.
pub type SendError = Box<dyn Error + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    // steers the model
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Model identifier sent with each request.
    fn model_name(&self) -> &str;

    async fn send_message(&self, messages: &[Message]) -> Result<Message, SendError>;

    fn get_last_usage(&self) -> Option<TokenUsage> {
        self.usage_slot()
            .and_then(|slot| slot.lock().ok().and_then(|usage| usage.clone()))
    }

    /// Clients that track [`TokenUsage`] return their slot here.
    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        None
    }
}
