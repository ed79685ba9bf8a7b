//! Text completion for the Generative Language API.
//!
//! Single-turn text generation against the `generateText` model action.
//!
//! # Example
//!
//! ```rust,no_run
//! # use google_palm_core::client::PalmClient;
//! # use google_palm_models::text::*;
//! # async fn example(client: &PalmClient) -> google_palm_core::error::PalmResult<()> {
//! let request = GenerateTextRequest::builder()
//!     .prompt("Write a limerick about a rusty robot")
//!     .temperature(0.5)
//!     .max_output_tokens(256)
//!     .build();
//!
//! let response = generate_text(client, &request).await?;
//! println!("{}", response["candidates"][0]["output"]);
//! # Ok(())
//! # }
//! ```

use crate::DEFAULT_TEMPERATURE;
use google_palm_core::client::PalmClient;
use google_palm_core::error::{PalmError, PalmResult};
use serde::Serialize;
use serde_json::Value;

/// Model used for text completion when none is configurable.
pub const DEFAULT_TEXT_MODEL: &str = "text-bison-001";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// The prompt for a text completion request.
#[derive(Debug, Clone, Serialize)]
pub struct TextPrompt {
    pub text: String,
}

/// A per-category safety threshold applied to the request.
#[derive(Debug, Clone, Serialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// A `generateText` request.
///
/// `temperature` is always serialized (the API distinguishes a missing field
/// from an explicit value, and the default here is an explicit `0.0`); every
/// other optional field is omitted from the body when unset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTextRequest {
    pub prompt: TextPrompt,
    pub temperature: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

/// Builder for [`GenerateTextRequest`].
pub struct GenerateTextRequestBuilder {
    prompt: Option<String>,
    temperature: Option<f64>,
    candidate_count: Option<u32>,
    max_output_tokens: Option<u32>,
    top_p: Option<f64>,
    top_k: Option<u32>,
    safety_settings: Option<Vec<SafetySetting>>,
    stop_sequences: Option<Vec<String>>,
    client: Option<String>,
}

impl GenerateTextRequest {
    /// Create a new builder.
    pub fn builder() -> GenerateTextRequestBuilder {
        GenerateTextRequestBuilder {
            prompt: None,
            temperature: None,
            candidate_count: None,
            max_output_tokens: None,
            top_p: None,
            top_k: None,
            safety_settings: None,
            stop_sequences: None,
            client: None,
        }
    }
}

impl GenerateTextRequestBuilder {
    /// Set the text prompt to complete.
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

    /// Set the number of candidate completions to return.
    pub fn candidate_count(mut self, count: u32) -> Self {
        self.candidate_count = Some(count);
        self
    }

    /// Set the maximum number of output tokens.
    pub fn max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
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

    /// Set per-category safety thresholds.
    pub fn safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = Some(settings);
        self
    }

    /// Set sequences at which generation stops.
    pub fn stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.stop_sequences = Some(sequences);
        self
    }

    /// Set the client identifier echoed to the API.
    pub fn client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Build the request, returning an error if required fields are missing.
    pub fn try_build(self) -> PalmResult<GenerateTextRequest> {
        let prompt = self
            .prompt
            .ok_or_else(|| PalmError::Builder("prompt is required".into()))?;

        Ok(GenerateTextRequest {
            prompt: TextPrompt { text: prompt },
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            candidate_count: self.candidate_count,
            max_output_tokens: self.max_output_tokens,
            top_p: self.top_p,
            top_k: self.top_k,
            safety_settings: self.safety_settings,
            stop_sequences: self.stop_sequences,
            client: self.client,
        })
    }

    /// Build the request. Panics if `prompt` is not set.
    ///
    /// Consider using [`try_build`](Self::try_build) for fallible construction.
    pub fn build(self) -> GenerateTextRequest {
        self.try_build().expect("builder validation failed")
    }
}

// ---------------------------------------------------------------------------
// API functions
// ---------------------------------------------------------------------------

/// Send a `generateText` request against the default completion model.
///
/// Returns the decoded response body verbatim.
pub async fn generate_text(client: &PalmClient, request: &GenerateTextRequest) -> PalmResult<Value> {
    let path = format!("v1beta2/models/{DEFAULT_TEXT_MODEL}:generateText");
    let response = client.post(&path, request).await?;
    let body = response.json::<Value>().await?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_client, TEST_API_KEY};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn builder_with_required_fields_only() {
        let request = GenerateTextRequest::builder()
            .prompt("Hello, world!")
            .build();

        assert_eq!(request.prompt.text, "Hello, world!");
        assert_eq!(request.temperature, 0.0);
        assert!(request.candidate_count.is_none());
        assert!(request.max_output_tokens.is_none());
        assert!(request.top_p.is_none());
        assert!(request.top_k.is_none());
        assert!(request.safety_settings.is_none());
        assert!(request.stop_sequences.is_none());
        assert!(request.client.is_none());
    }

    #[test]
    fn serialization_skips_unset_fields() {
        let request = GenerateTextRequest::builder().prompt("Hello").build();

        let json = serde_json::to_value(&request).unwrap();

        // Only prompt and the defaulted temperature are present.
        assert_eq!(
            json,
            serde_json::json!({
                "prompt": {"text": "Hello"},
                "temperature": 0.0
            })
        );
    }

    #[test]
    fn serialization_includes_set_fields_in_camel_case() {
        let request = GenerateTextRequest::builder()
            .prompt("Hello")
            .temperature(0.25)
            .candidate_count(2)
            .max_output_tokens(128)
            .top_p(0.95)
            .top_k(40)
            .safety_settings(vec![SafetySetting {
                category: "HARM_CATEGORY_TOXICITY".into(),
                threshold: "BLOCK_LOW_AND_ABOVE".into(),
            }])
            .stop_sequences(vec!["\n\n".into()])
            .client("google-palm-rs")
            .build();

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["prompt"]["text"], "Hello");
        assert_eq!(json["temperature"], 0.25);
        assert_eq!(json["candidateCount"], 2);
        assert_eq!(json["maxOutputTokens"], 128);
        assert_eq!(json["topP"], 0.95);
        assert_eq!(json["topK"], 40);
        assert_eq!(
            json["safetySettings"],
            serde_json::json!([{
                "category": "HARM_CATEGORY_TOXICITY",
                "threshold": "BLOCK_LOW_AND_ABOVE"
            }])
        );
        assert_eq!(json["stopSequences"], serde_json::json!(["\n\n"]));
        assert_eq!(json["client"], "google-palm-rs");
    }

    #[test]
    fn temperature_defaults_but_supplied_value_wins() {
        let defaulted = GenerateTextRequest::builder().prompt("a").build();
        assert_eq!(defaulted.temperature, 0.0);

        let supplied = GenerateTextRequest::builder()
            .prompt("a")
            .temperature(0.75)
            .build();
        assert_eq!(supplied.temperature, 0.75);
    }

    #[test]
    fn try_build_returns_error_when_prompt_missing() {
        let result = GenerateTextRequest::builder().try_build();

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, PalmError::Builder(_)));
        assert!(err.to_string().contains("prompt"));
    }

    #[test]
    #[should_panic(expected = "prompt is required")]
    fn build_without_prompt_panics() {
        GenerateTextRequest::builder().build();
    }

    #[tokio::test]
    async fn generate_text_sends_minimal_body() {
        let server = MockServer::start().await;

        let expected_body = serde_json::json!({
            "prompt": {"text": "Tell me a story"},
            "temperature": 0.0
        });

        let response_body = serde_json::json!({
            "candidates": [{
                "output": "Once upon a time...",
                "safetyRatings": [{"category": "HARM_CATEGORY_TOXICITY", "probability": "NEGLIGIBLE"}]
            }]
        });

        Mock::given(method("POST"))
            .and(path("/v1beta2/models/text-bison-001:generateText"))
            .and(query_param("key", TEST_API_KEY))
            .and(body_json(&expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server);
        let request = GenerateTextRequest::builder()
            .prompt("Tell me a story")
            .build();

        let response = generate_text(&client, &request).await.expect("should succeed");

        // The decoded response body comes back verbatim.
        assert_eq!(response, response_body);
    }

    #[tokio::test]
    async fn generate_text_sends_optional_parameters_when_set() {
        let server = MockServer::start().await;

        let expected_body = serde_json::json!({
            "prompt": {"text": "Tell me a story"},
            "temperature": 0.5,
            "candidateCount": 3,
            "maxOutputTokens": 64,
            "stopSequences": ["The End"]
        });

        Mock::given(method("POST"))
            .and(path("/v1beta2/models/text-bison-001:generateText"))
            .and(query_param("key", TEST_API_KEY))
            .and(body_json(&expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server);
        let request = GenerateTextRequest::builder()
            .prompt("Tell me a story")
            .temperature(0.5)
            .candidate_count(3)
            .max_output_tokens(64)
            .stop_sequences(vec!["The End".into()])
            .build();

        let response = generate_text(&client, &request).await.expect("should succeed");
        assert_eq!(response["candidates"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn generate_text_surfaces_api_error() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {
                "code": 400,
                "message": "Temperature must be in [0.0, 1.0]",
                "status": "INVALID_ARGUMENT"
            }
        });

        Mock::given(method("POST"))
            .and(path("/v1beta2/models/text-bison-001:generateText"))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server);
        let request = GenerateTextRequest::builder()
            .prompt("Hello")
            .temperature(7.0)
            .build();

        let result = generate_text(&client, &request).await;

        assert!(result.is_err());
        match result.unwrap_err() {
            PalmError::Api { status, message } => {
                assert_eq!(status, "INVALID_ARGUMENT");
                assert!(message.contains("Temperature"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }
}
