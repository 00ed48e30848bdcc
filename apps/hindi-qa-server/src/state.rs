//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::ocr::OcrService;
use crate::qa::QaService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    ocr: OcrService,
    qa: QaService,
}

impl AppState {
    /// Create a new application state from already-built services
    pub fn new(config: Config, ocr: OcrService, qa: QaService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, ocr, qa }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the OCR pipeline
    pub fn ocr(&self) -> &OcrService {
        &self.inner.ocr
    }

    /// Get the QA pipeline
    pub fn qa(&self) -> &QaService {
        &self.inner.qa
    }
}
