//! Neural OCR Providers
//!
//! Defines the trait for engines that read raw, unenhanced rasters and do
//! their own preprocessing, plus the Ollama vision-model implementation.

use async_trait::async_trait;

use super::types::OcrError;

/// Neural OCR provider trait
#[async_trait]
pub trait NeuralOcrProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Check if the provider can serve requests right now
    async fn is_available(&self) -> bool;

    /// Read Hindi and English text from a PNG-encoded raster
    async fn recognize(&self, png: &[u8]) -> Result<String, OcrError>;
}

/// Ollama vision model provider
pub struct OllamaProvider {
    client: reqwest::Client,
    /// Ollama API URL
    base_url: String,
    /// Model name (e.g., "llava", "llama3.2-vision")
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    pub fn default_url() -> Self {
        Self::new("http://localhost:11434", "llava")
    }

    fn prompt() -> &'static str {
        "Extract all text from this image exactly as written. The text is mostly Hindi \
         in Devanagari script and may contain English. Keep the original line breaks. \
         Return only the extracted text, nothing else."
    }
}

#[async_trait]
impl NeuralOcrProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn recognize(&self, png: &[u8]) -> Result<String, OcrError> {
        use base64::Engine;

        let url = format!("{}/api/generate", self.base_url);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(png);

        let request = serde_json::json!({
            "model": self.model,
            "prompt": Self::prompt(),
            "images": [image_base64],
            "stream": false,
            "options": { "temperature": 0 }
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(result["response"].as_str().unwrap_or("").trim().to_string())
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockNeuralProvider {
    pub response: Result<String, String>,
    pub available: bool,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockNeuralProvider {
    pub fn returning(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            available: true,
            calls: Default::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            available: true,
            calls: Default::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            response: Ok(String::new()),
            available: false,
            calls: Default::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl NeuralOcrProvider for MockNeuralProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _png: &[u8]) -> Result<String, OcrError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.response.clone().map_err(OcrError::ProcessingError)
    }
}
