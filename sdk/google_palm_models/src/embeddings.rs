//! Text embeddings for the Generative Language API.
//!
//! # Example
//!
//! ```rust,no_run
//! # use google_palm_core::client::PalmClient;
//! # use google_palm_models::embeddings::*;
//! # async fn example(client: &PalmClient) -> google_palm_core::error::PalmResult<()> {
//! let request = EmbedTextRequest::builder()
//!     .text("The quick brown fox jumps over the lazy dog")
//!     .build();
//!
//! let response = embed_text(client, &request).await?;
//! println!("{}", response["embedding"]["value"]);
//! # Ok(())
//! # }
//! ```

use google_palm_core::client::PalmClient;
use google_palm_core::error::{PalmError, PalmResult};
use serde::Serialize;
use serde_json::Value;

/// Model used for embeddings when the request does not name one.
pub const DEFAULT_EMBEDDING_MODEL: &str = "embedding-gecko-001";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// An `embedText` request.
///
/// When `model` is set it selects the model in the request path *and* is
/// echoed into the body; when unset, the path uses
/// [`DEFAULT_EMBEDDING_MODEL`] and the body carries only `text`.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedTextRequest {
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Builder for [`EmbedTextRequest`].
pub struct EmbedTextRequestBuilder {
    text: Option<String>,
    model: Option<String>,
}

impl EmbedTextRequest {
    /// Create a new builder.
    pub fn builder() -> EmbedTextRequestBuilder {
        EmbedTextRequestBuilder {
            text: None,
            model: None,
        }
    }
}

impl EmbedTextRequestBuilder {
    /// Set the text to embed.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the embedding model explicitly.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build the request, returning an error if required fields are missing.
    pub fn try_build(self) -> PalmResult<EmbedTextRequest> {
        let text = self
            .text
            .ok_or_else(|| PalmError::Builder("text is required".into()))?;

        Ok(EmbedTextRequest {
            text,
            model: self.model,
        })
    }

    /// Build the request. Panics if `text` is not set.
    ///
    /// Consider using [`try_build`](Self::try_build) for fallible construction.
    pub fn build(self) -> EmbedTextRequest {
        self.try_build().expect("builder validation failed")
    }
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Send an `embedText` request.
///
/// Returns the decoded response body verbatim.
pub async fn embed_text(client: &PalmClient, request: &EmbedTextRequest) -> PalmResult<Value> {
    let model = request.model.as_deref().unwrap_or(DEFAULT_EMBEDDING_MODEL);
    let path = format!("v1beta2/models/{model}:embedText");
    let response = client.post(&path, request).await?;
    let body = response.json::<Value>().await?;
    Ok(body)
}
