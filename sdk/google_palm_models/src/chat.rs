//! Chat message generation and token counting for the Generative Language API.
//!
//! Covers the `generateMessage` and `countMessageTokens` model actions.
//!
//! # Example
//!
//! ```rust,no_run
//! # use google_palm_core::client::PalmClient;
//! # use google_palm_models::chat::*;
//! # async fn example(client: &PalmClient) -> google_palm_core::error::PalmResult<()> {
//! let request = GenerateMessageRequest::builder()
//!     .prompt("What is the tallest mountain?")
//!     .context("Answer like a geography teacher.")
//!     .build();
//!
//! let response = generate_message(client, &request).await?;
//! println!("{}", response["candidates"][0]["content"]);
//!
//! let count = count_message_tokens(client, "chat-bison-001", "Hello").await?;
//! println!("{} tokens", count["tokenCount"]);
//! # Ok(())
//! # }
//! ```

use crate::DEFAULT_TEMPERATURE;
use google_palm_core::client::PalmClient;
use google_palm_core::error::{PalmError, PalmResult};
use serde::Serialize;
use serde_json::Value;

/// Model used for chat message generation.
pub const DEFAULT_CHAT_MODEL: &str = "chat-bison-001";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single chat message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub content: String,
}

impl Message {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// An input/output pair priming the model's conversational behaviour.
#[derive(Debug, Clone, Serialize)]
pub struct Example {
    pub input: Message,
    pub output: Message,
}

/// The structured prompt for a chat request.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePrompt {
    pub messages: Vec<Message>,
}

/// A `generateMessage` request.
///
/// The base body always carries `prompt.messages` built from the required
/// prompt string. A top-level `messages` field, when set explicitly, is sent
/// *in addition to* the prompt field, not instead of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMessageRequest {
    pub prompt: MessagePrompt,
    pub temperature: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

/// Body for a `countMessageTokens` request.
#[derive(Debug, Clone, Serialize)]
struct CountMessageTokensRequest {
    prompt: MessagePrompt,
}

/// Builder for [`GenerateMessageRequest`].
pub struct GenerateMessageRequestBuilder {
    prompt: Option<String>,
    temperature: Option<f64>,
    context: Option<String>,
    examples: Option<Vec<Example>>,
    messages: Option<Vec<Message>>,
    candidate_count: Option<u32>,
    top_p: Option<f64>,
    top_k: Option<u32>,
    client: Option<String>,
}

impl GenerateMessageRequest {
    /// Create a new builder.
    pub fn builder() -> GenerateMessageRequestBuilder {
        GenerateMessageRequestBuilder {
            prompt: None,
            temperature: None,
            context: None,
            examples: None,
            messages: None,
            candidate_count: None,
            top_p: None,
            top_k: None,
            client: None,
        }
    }
}

impl GenerateMessageRequestBuilder {
    /// Set the prompt; it becomes the sole message of `prompt.messages`.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the sampling temperature.
    ///
    /// Defaults to `0.0` if not set; the field is always sent.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set text that grounds the conversation (instructions, tone).
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set input/output examples priming the model.
    pub fn examples(mut self, examples: Vec<Example>) -> Self {
        self.examples = Some(examples);
        self
    }

    /// Set the top-level `messages` field.
    ///
    /// Sent alongside `prompt.messages`, not in place of it.
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }

    /// Set the number of candidate replies to return.
    pub fn candidate_count(mut self, count: u32) -> Self {
        self.candidate_count = Some(count);
        self
    }

    /// Set the nucleus-sampling probability mass.
    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the top-k sampling cutoff.
    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set the client identifier echoed to the API.
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Build the request, returning an error if required fields are missing.
    pub fn try_build(self) -> PalmResult<GenerateMessageRequest> {
        let prompt = self
            .prompt
            .ok_or_else(|| PalmError::Builder("prompt is required".into()))?;

        Ok(GenerateMessageRequest {
            prompt: MessagePrompt {
                messages: vec![Message::new(prompt)],
            },
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            context: self.context,
            examples: self.examples,
            messages: self.messages,
            candidate_count: self.candidate_count,
            top_p: self.top_p,
            top_k: self.top_k,
            client: self.client,
        })
    }

    /// Build the request. Panics if `prompt` is not set.
    ///
    /// Consider using [`try_build`](Self::try_build) for fallible construction.
    pub fn build(self) -> GenerateMessageRequest {
        self.try_build().expect("builder validation failed")
    }
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Send a `generateMessage` request against the default chat model.
///
/// Returns the decoded response body verbatim.
pub async fn generate_message(
    client: &PalmClient,
    request: &GenerateMessageRequest,
) -> PalmResult<Value> {
    let path = format!("v1beta2/models/{DEFAULT_CHAT_MODEL}:generateMessage");
    let response = client.post(&path, request).await?;
    let body = response.json::<Value>().await?;
    Ok(body)
}

/// Count the tokens of a message prompt for the given model.
///
/// Sends `{"prompt": {"messages": [{"content": <prompt>}]}}` and returns the
/// decoded response verbatim (e.g. `{"tokenCount": 14}`).
pub async fn count_message_tokens(
    client: &PalmClient,
    model: &str,
    prompt: &str,
) -> PalmResult<Value> {
    let path = format!("v1beta2/models/{model}:countMessageTokens");
    let body = CountMessageTokensRequest {
        prompt: MessagePrompt {
            messages: vec![Message::new(prompt)],
        },
    };
    let response = client.post(&path, &body).await?;
    let body = response.json::<Value>().await?;
    Ok(body)
}
