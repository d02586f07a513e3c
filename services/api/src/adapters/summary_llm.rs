//! services/api/src/adapters/summary_llm.rs
//!
//! This module contains the adapter for the summarization LLM.
//! It implements the `SummarizationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;
use summarizer_core::ports::{PortError, PortResult, SummarizationService};
use tracing::{debug, warn};

/// Builds a client that makes exactly one attempt per request.
///
/// The client's default backoff retries 5xx and 429 responses; summaries are a
/// single attempt per user action, so the retry window is closed.
pub fn single_attempt_client(config: OpenAIConfig) -> Client<OpenAIConfig> {
    let backoff = backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build();
    Client::with_config(config).with_backoff(backoff)
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummarizationService` using an OpenAI-compatible chat model.
#[derive(Clone)]
pub struct OpenAiSummaryAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiSummaryAdapter {
    /// Creates a new `OpenAiSummaryAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

//=========================================================================================
// `SummarizationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummarizationService for OpenAiSummaryAdapter {
    /// Sends the prompt as a single user message and returns the first choice verbatim.
    async fn summarize(&self, prompt: &str) -> PortResult<String> {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()
                .map_err(|e| PortError::Upstream(e.to_string()))?,
        )];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        debug!("Sending {} prompt characters to {}", prompt.len(), self.model);

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                warn!("Summary request to {} timed out", self.model);
                PortError::Upstream(format!("request timed out after {:?}", self.timeout))
            })?
            .map_err(classify_error)?;

        // Extract the text content from the first choice in the response.
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(PortError::EmptyResponse)
    }
}

/// Maps a client error onto the port's taxonomy.
fn classify_error(err: OpenAIError) -> PortError {
    let (message, rejected_key) = match err {
        OpenAIError::ApiError(api) => {
            let rejected_key = api.code.as_deref() == Some("invalid_api_key");
            (api.message, rejected_key)
        }
        other => (other.to_string(), false),
    };

    if rejected_key || is_credential_failure(&message) {
        warn!("Model provider rejected the credential");
        PortError::Authentication(message)
    } else {
        warn!("Model provider call failed: {}", message);
        PortError::Upstream(message)
    }
}

fn is_credential_failure(message: &str) -> bool {
    let message = message.to_lowercase();
    ["api key", "unauthorized", "authentication"]
        .iter()
        .any(|needle| message.contains(needle))
}
