//! HTTP client for Hugging Face compatible model endpoints

use serde::de::DeserializeOwned;

use super::types::QaError;

/// Posts `{inputs, parameters, options}` payloads to `{base_url}/{model}`
#[derive(Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl InferenceClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    /// Run one inference call; waits for cold models instead of failing fast
    pub async fn infer<T: DeserializeOwned>(
        &self,
        model: &str,
        inputs: serde_json::Value,
        parameters: serde_json::Value,
    ) -> Result<T, QaError> {
        let payload = serde_json::json!({
            "inputs": inputs,
            "parameters": parameters,
            "options": { "wait_for_model": true, "use_cache": true }
        });

        let mut request = self.client.post(self.model_url(model)).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| QaError::Api(format!("Failed to call {}: {}", model, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(QaError::Api(format!("{} returned {}: {}", model, status, body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| QaError::InvalidResponse(format!("{}: {}", model, e)))
    }
}
