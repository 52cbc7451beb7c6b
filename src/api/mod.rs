//! REST API for the chemistry analysis service

use crate::analysis::Analyzer;
use crate::models::AnalysisResult;
use crate::pubchem::{self, CompoundRecord, PubChemClient, PubChemError};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// API state
pub struct ApiState {
    pub analyzer: Analyzer,
    pub pubchem: PubChemClient,
}

/// Request to analyze a text question
#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub question: String,
}

/// Error body for rejected requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Compound lookup response with external visualization links
#[derive(Debug, Serialize)]
pub struct CompoundResponse {
    #[serde(flatten)]
    pub record: CompoundRecord,
    pub structure_image_url: String,
    pub pubchem_url: String,
    pub molview_url: String,
    pub chemspider_url: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ai_enabled: bool,
}

type Rejection = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> Rejection {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Create the API router
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/analyze-text", post(analyze_text))
        .route("/api/analyze-image", post(analyze_image))
        .route("/api/compound/{name}", get(compound_lookup))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ai_enabled: state.analyzer.ai_enabled(),
    })
}

/// Analyze a text question. Upstream failures never surface here; only a
/// missing question is rejected.
async fn analyze_text(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisResult>, Rejection> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(bad_request("No question provided"));
    }

    Ok(Json(state.analyzer.analyze_question(question).await))
}

/// Analyze an uploaded image (multipart field `image`)
async fn analyze_image(
    State(state): State<Arc<ApiState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, Rejection> {
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| bad_request("Invalid multipart payload"))?
    {
        if field.name() == Some("image") {
            let mime_type = field
                .content_type()
                .unwrap_or("image/jpeg")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| bad_request("Invalid multipart payload"))?;
            image = Some((mime_type, data.to_vec()));
            break;
        }
    }

    match image {
        Some((mime_type, data)) if !data.is_empty() => {
            Ok(Json(state.analyzer.analyze_image(&mime_type, data).await))
        }
        _ => Err(bad_request("No image provided")),
    }
}

/// Resolve a compound name through PubChem
async fn compound_lookup(
    State(state): State<Arc<ApiState>>,
    Path(name): Path<String>,
) -> Result<Json<CompoundResponse>, Rejection> {
    match state.pubchem.lookup(&name).await {
        Ok(record) => {
            let smiles = record.canonical_smiles.clone();
            Ok(Json(CompoundResponse {
                structure_image_url: pubchem::structure_image_url(&smiles),
                pubchem_url: pubchem::compound_url(record.cid),
                molview_url: pubchem::molview_url(&smiles),
                chemspider_url: pubchem::chemspider_search_url(&smiles),
                record,
            }))
        }
        Err(PubChemError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Could not fetch molecular data from PubChem".to_string(),
            }),
        )),
        Err(err) => {
            warn!(name, error = %err, "compound lookup failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Could not fetch molecular data from PubChem".to_string(),
                }),
            ))
        }
    }
}
