//! Chemsight - chemistry question analysis service
//!
//! This crate provides:
//! - A completion-provider backend for the Gemini generateContent API (text and vision)
//! - Prompt construction and a strict-decode fallback chain for analysis replies
//! - A PubChem lookup adapter for compound metadata and structure images
//! - REST API for submitting questions and uploaded images

pub mod analysis;
pub mod api;
pub mod catalog;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod pubchem;
pub mod view;

pub use analysis::Analyzer;
pub use models::{AnalysisResult, AnalysisType, Molecule, Reaction};
pub use provider::{CompletionProvider, CompletionRequest, CompletionResponse};
pub use pubchem::PubChemClient;

/// Configuration for the analysis service
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AppConfig {
    /// Port the HTTP server binds on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Completion-service credential; absence switches every analysis
    /// request to demo fallback mode rather than being an error
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Base URL of the completion service
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Model used for text questions
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for uploaded images
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Base URL of the PubChem PUG REST service
    #[serde(default = "default_pubchem_base_url")]
    pub pubchem_base_url: String,
}

fn default_port() -> u16 {
    8080
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_vision_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_pubchem_base_url() -> String {
    "https://pubchem.ncbi.nlm.nih.gov".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            gemini_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            pubchem_base_url: default_pubchem_base_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.text_model, "gemini-2.5-flash");
    }

    #[test]
    fn test_config_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
port = 9000
gemini_api_key = "test-key"
vision_model = "gemini-1.5-flash"
"#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.gemini_api_key.as_deref(), Some("test-key"));
        assert_eq!(config.vision_model, "gemini-1.5-flash");
        assert_eq!(config.pubchem_base_url, "https://pubchem.ncbi.nlm.nih.gov");
    }
}
