//! Configuration management for the Hindi QA server

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub ocr: OcrConfig,
    pub models: ModelConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Extra origin allowed next to the local dev host and `*.vercel.app`
    pub frontend_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Disabling this makes the neural engine absent for every request
    pub neural_enabled: bool,
    pub ollama_url: String,
    pub ollama_model: String,
    pub tesseract_cmd: String,
    /// Extra tessdata directories searched for `hin.traineddata`
    pub tessdata_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub inference_url: String,
    pub api_token: Option<String>,
    pub question_model: String,
    pub answer_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            cors: CorsConfig { frontend_url: None },
            ocr: OcrConfig {
                neural_enabled: true,
                ollama_url: "http://localhost:11434".to_string(),
                ollama_model: "llava".to_string(),
                tesseract_cmd: "tesseract".to_string(),
                tessdata_dirs: Vec::new(),
            },
            models: ModelConfig {
                inference_url: "https://api-inference.huggingface.co/models".to_string(),
                api_token: None,
                question_model: "ai4bharat/MultiIndicQuestionGenerationSS".to_string(),
                answer_model: "AVISHKAARAM/avishkaarak-ekta-hindi".to_string(),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = match env::var("SERVER_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value,
            })?,
            Err(_) => defaults.server.port,
        };

        let neural_enabled = match env::var("NEURAL_OCR_ENABLED") {
            Ok(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                name: "NEURAL_OCR_ENABLED",
                value,
            })?,
            Err(_) => defaults.ocr.neural_enabled,
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
            },
            cors: CorsConfig {
                frontend_url: non_empty_var("FRONTEND_URL"),
            },
            ocr: OcrConfig {
                neural_enabled,
                ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ocr.ollama_url),
                ollama_model: env::var("OLLAMA_OCR_MODEL").unwrap_or(defaults.ocr.ollama_model),
                tesseract_cmd: env::var("TESSERACT_CMD").unwrap_or(defaults.ocr.tesseract_cmd),
                tessdata_dirs: non_empty_var("TESSDATA_DIRS")
                    .map(|dirs| env::split_paths(&dirs).collect())
                    .unwrap_or_default(),
            },
            models: ModelConfig {
                inference_url: env::var("HF_INFERENCE_URL").unwrap_or(defaults.models.inference_url),
                api_token: non_empty_var("HF_API_TOKEN"),
                question_model: env::var("QG_MODEL").unwrap_or(defaults.models.question_model),
                answer_model: env::var("QA_MODEL").unwrap_or(defaults.models.answer_model),
            },
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_default_models() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.models.question_model,
            "ai4bharat/MultiIndicQuestionGenerationSS"
        );
        assert!(config.cors.frontend_url.is_none());
    }
}
