//! [`OpenAIClient`] implements [`ClientWrapper`] for OpenAI's Chat Completions
//! API and keeps the token usage of the latest request.
//!
//! ```rust,no_run
//! use calcdesk::clients::openai::OpenAIClient;
//! use calcdesk::client_wrapper::{ClientWrapper, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let secret_key = std::env::var("OPEN_AI_SECRET")?;
//!     let client = OpenAIClient::new_with_model_string(&secret_key, "gpt-4.1-mini");
//!
//!     let reply = client
//!         .send_message(&[Message::system("You are terse."), Message::user("Hello!")])
//!         .await?;
//!     println!("Assistant: {}", reply.content);
//!
//!     if let Some(usage) = client.get_last_usage() {
//!         println!("tokens in/out: {}/{}", usage.input_tokens, usage.output_tokens);
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Mutex;

use async_trait::async_trait;
use openai_rust::chat;
use openai_rust2 as openai_rust;

use crate::calcdesk::client_wrapper::{ClientWrapper, Message, Role, SendError, TokenUsage};
use crate::calcdesk::clients::common::{get_shared_http_client, send_and_track};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub struct OpenAIClient {
    client: openai_rust::Client,
    model: String,
    token_usage: Mutex<Option<TokenUsage>>,
}

impl OpenAIClient {
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client(
                secret_key,
                get_shared_http_client().clone(),
            ),
            model: model_name.to_string(),
            token_usage: Mutex::new(None),
        }
    }

    /// Target an OpenAI compatible endpoint instead of api.openai.com.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client_and_base_url(
                secret_key,
                get_shared_http_client().clone(),
                base_url,
            ),
            model: model_name.to_string(),
            token_usage: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn send_message(&self, messages: &[Message]) -> Result<Message, SendError> {
        let formatted_messages = messages
            .iter()
            .map(|msg| chat::Message {
                role: msg.role.as_str().to_owned(),
                content: msg.content.clone(),
            })
            .collect();

        let content = send_and_track(
            &self.client,
            &self.model,
            formatted_messages,
            Some(CHAT_COMPLETIONS_PATH.to_string()),
            &self.token_usage,
        )
        .await?;

        Ok(Message::new(Role::Assistant, content))
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}
