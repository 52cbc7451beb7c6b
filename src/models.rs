//! Domain types shared by the analysis chain, catalogs, and the API

use serde::{Deserialize, Serialize};

/// A molecule identified in a question or image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub name: String,
    /// SMILES line notation; not validated locally
    pub smiles: String,
    pub description: String,
    #[serde(default)]
    pub drawable: bool,
}

/// A reaction mechanism with ordered step descriptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub name: String,
    pub steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactants: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<String>>,
    /// Per-step intermediate structures. The upstream service is instructed
    /// to emit SMILES here; the content is passed through unverified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intermediates: Option<Vec<String>>,
}

/// Provenance of an analysis result, used for UI labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    /// Decoded from a completion-service reply
    Ai,
    /// Reply received but unusable; minimal placeholder substituted
    AiFallback,
    /// No credential configured; fixed demo payload, no outbound call
    FallbackNoApi,
    /// Completion call failed; fixed static payload substituted
    Fallback,
    /// Local keyword matching against the fixed catalogs
    Basic,
}

impl AnalysisType {
    /// Human-readable label, matching the UI badges
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::Ai => "AI Analysis",
            AnalysisType::AiFallback => "AI Fallback",
            AnalysisType::FallbackNoApi => "Demo Mode",
            AnalysisType::Fallback => "Fallback Analysis",
            AnalysisType::Basic => "Basic Analysis",
        }
    }
}

/// Structured outcome of one analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub molecules: Vec<Molecule>,
    pub reactions: Vec<Reaction>,
    pub question: String,
    /// The completion service is instructed to set this to "ai"; a decoded
    /// reply that omits it still counts as an AI result
    #[serde(rename = "analysisType", default = "default_analysis_type")]
    pub analysis_type: AnalysisType,
}

fn default_analysis_type() -> AnalysisType {
    AnalysisType::Ai
}
