//! Hindi QA Server
//!
//! Accepts photographed Hindi documents, recognizes their text and generates
//! question-answer pairs from it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hindi_qa_server::config::Config;
use hindi_qa_server::ocr::{NeuralOcrProvider, OcrService, OllamaProvider, TesseractProvider};
use hindi_qa_server::qa::{HfAnswerModel, HfQuestionGenerator, InferenceClient, QaService};
use hindi_qa_server::routes;
use hindi_qa_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "hindi_qa_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Hindi QA Server v{}", env!("CARGO_PKG_VERSION"));

    // OCR engines
    let neural: Option<Arc<dyn NeuralOcrProvider>> = if config.ocr.neural_enabled {
        tracing::info!(
            "Neural OCR: {} at {}",
            config.ocr.ollama_model,
            config.ocr.ollama_url
        );
        Some(Arc::new(OllamaProvider::new(
            &config.ocr.ollama_url,
            &config.ocr.ollama_model,
        )) as Arc<dyn NeuralOcrProvider>)
    } else {
        tracing::warn!("Neural OCR disabled, using Tesseract only");
        None
    };
    let tesseract = TesseractProvider::new(&config.ocr.tesseract_cmd)
        .with_tessdata_dirs(config.ocr.tessdata_dirs.clone());
    let ocr = OcrService::new(neural, Arc::new(tesseract));

    // QA models
    let client = InferenceClient::new(&config.models.inference_url, config.models.api_token.clone());
    tracing::info!("Question generation model: {}", config.models.question_model);
    tracing::info!("Answer extraction model: {}", config.models.answer_model);
    let qa = QaService::new(
        Arc::new(HfQuestionGenerator::new(client.clone(), &config.models.question_model)),
        Arc::new(HfAnswerModel::new(client, &config.models.answer_model)),
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    let app = routes::router(AppState::new(config, ocr, qa));

    // Start server with graceful shutdown
    tracing::info!("Hindi QA Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
