//! Model listing and inspection for the Generative Language API.
//!
//! # Example
//!
//! ```rust,no_run
//! # use google_palm_core::client::PalmClient;
//! # use google_palm_models::models::*;
//! # async fn example(client: &PalmClient) -> google_palm_core::error::PalmResult<()> {
//! let listing = list_models(client, &ListModelsParams::default()).await?;
//! if let Some(models) = listing["models"].as_array() {
//!     for model in models {
//!         println!("{}", model["name"]);
//!     }
//! }
//!
//! let model = get_model(client, "chat-bison-001").await?;
//! println!("{}", model["displayName"]);
//! # Ok(())
//! # }
//! ```

use google_palm_core::client::PalmClient;
use google_palm_core::error::PalmResult;
use serde_json::Value;

/// Pagination parameters for [`list_models`].
///
/// Both fields are optional; unset fields are absent from the query string.
#[derive(Debug, Clone, Default)]
pub struct ListModelsParams {
    page_size: Option<u32>,
    page_token: Option<String>,
}

impl ListModelsParams {
    /// Create empty parameters (first page, server-chosen page size).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of models per page.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the continuation token from a previous listing response.
    pub fn page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }
}

/// List the models available through the API.
///
/// Returns the decoded response body verbatim.
pub async fn list_models(client: &PalmClient, params: &ListModelsParams) -> PalmResult<Value> {
    let mut query = Vec::new();
    if let Some(page_size) = params.page_size {
        query.push(("pageSize", page_size.to_string()));
    }
    if let Some(page_token) = &params.page_token {
        query.push(("pageToken", page_token.clone()));
    }

    let response = client.get_with_query("v1beta2/models", &query).await?;
    let body = response.json::<Value>().await?;
    Ok(body)
}

/// Fetch a single model description by name (e.g. `chat-bison-001`).
///
/// Returns the decoded response body verbatim.
pub async fn get_model(client: &PalmClient, model: &str) -> PalmResult<Value> {
    let path = format!("v1beta2/models/{model}");
    let response = client.get(&path).await?;
    let body = response.json::<Value>().await?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_mock_client, TEST_API_KEY};
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn list_models_sends_only_key_by_default() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "models": [
                {"name": "models/chat-bison-001"},
                {"name": "models/text-bison-001"}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/v1beta2/models"))
            .and(query_param("key", TEST_API_KEY))
            .and(query_param_is_missing("pageSize"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server);
        let response = list_models(&client, &ListModelsParams::default())
            .await
            .expect("should succeed");

        assert_eq!(response, response_body);
    }

    #[tokio::test]
    async fn list_models_sends_pagination_params_when_set() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1beta2/models"))
            .and(query_param("key", TEST_API_KEY))
            .and(query_param("pageSize", "5"))
            .and(query_param("pageToken", "next-page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [],
                "nextPageToken": "page-after"
            })))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server);
        let params = ListModelsParams::new().page_size(5).page_token("next-page");

        let response = list_models(&client, &params).await.expect("should succeed");

        assert_eq!(response["nextPageToken"], "page-after");
    }

    #[tokio::test]
    async fn get_model_fetches_named_model() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "name": "models/chat-bison-001",
            "displayName": "Chat Bison",
            "inputTokenLimit": 4096,
            "outputTokenLimit": 1024
        });

        Mock::given(method("GET"))
            .and(path("/v1beta2/models/chat-bison-001"))
            .and(query_param("key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = setup_mock_client(&server);
        let response = get_model(&client, "chat-bison-001")
            .await
            .expect("should succeed");

        // Returned exactly as decoded, with no reshaping.
        assert_eq!(response, response_body);
    }
}
