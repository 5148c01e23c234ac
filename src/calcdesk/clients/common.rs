//! Plumbing shared by the chat clients: one pooled HTTP client and the
//! request/usage bookkeeping around `openai_rust2`.

use crate::calcdesk::client_wrapper::{SendError, TokenUsage};
use lazy_static::lazy_static;
use openai_rust::chat;
use openai_rust2 as openai_rust;
use std::sync::Mutex;
use std::time::Duration;

lazy_static! {
    static ref SHARED_HTTP_CLIENT: reqwest::Client = reqwest::ClientBuilder::new()
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .timeout(Duration::from_secs(120))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("common: falling back to a default HTTP client: {}", e);
            reqwest::Client::new()
        });
}

/// HTTP client reused by every chat client so connections stay warm.
pub fn get_shared_http_client() -> &'static reqwest::Client {
    &SHARED_HTTP_CLIENT
}

/// Send a chat request, record its usage, and return the assistant's content.
pub async fn send_and_track(
    api: &openai_rust::Client,
    model: &str,
    formatted_msgs: Vec<chat::Message>,
    url_path: Option<String>,
    usage_slot: &Mutex<Option<TokenUsage>>,
) -> Result<String, SendError> {
    let chat_arguments = chat::ChatArguments::new(model, formatted_msgs);

    let response = api.create_chat(chat_arguments, url_path).await.map_err(|err| {
        log::error!("calcdesk::clients::common::send_and_track: API error: {}", err);
        SendError::from(err.to_string())
    })?;

    let usage = TokenUsage {
        input_tokens: response.usage.prompt_tokens as usize,
        output_tokens: response.usage.completion_tokens as usize,
        total_tokens: response.usage.total_tokens as usize,
    };
    if let Ok(mut slot) = usage_slot.lock() {
        *slot = Some(usage);
    }

    response
        .choices
        .first()
        .map(|choice| choice.message.content.clone())
        .ok_or_else(|| SendError::from("Response contained no choices"))
}
