//! Chemistry analysis server binary

use anyhow::{Context, Result};
use chemsight::analysis::Analyzer;
use chemsight::api::{create_router, ApiState};
use chemsight::provider::{CompletionProvider, GeminiProvider};
use chemsight::pubchem::PubChemClient;
use chemsight::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting chemsight server v{}", env!("CARGO_PKG_VERSION"));

    // Optional config file; defaults apply otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path))?
        }
        None => AppConfig::default(),
    };

    // The environment variable wins over the config file
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .or_else(|| config.gemini_api_key.clone());

    let provider = match api_key {
        Some(key) => {
            info!(
                text_model = config.text_model,
                vision_model = config.vision_model,
                "AI analysis enabled"
            );
            let gemini = GeminiProvider::with_base_url(&config.gemini_base_url, key)
                .with_models(&config.text_model, &config.vision_model);
            Some(Arc::new(gemini) as Arc<dyn CompletionProvider>)
        }
        None => {
            warn!("GEMINI_API_KEY not set, serving demo fallback analysis");
            None
        }
    };

    let state = Arc::new(ApiState {
        analyzer: Analyzer::new(provider),
        pubchem: PubChemClient::with_base_url(&config.pubchem_base_url),
    });

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
