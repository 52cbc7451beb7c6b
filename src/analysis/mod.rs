//! Response validation and the fallback chain
//!
//! Every analysis request resolves to a renderable `AnalysisResult`; no
//! upstream failure ever reaches the caller as an error. The chain is a
//! straight-line decision tree: no credential, transport failure, unusable
//! reply, or successful decode, each with its own provenance tag.

pub mod extract;

use crate::models::AnalysisResult;
use crate::prompt;
use crate::provider::{CompletionProvider, CompletionRequest};
use std::sync::Arc;
use tracing::{info, warn};

/// Validates completion replies and substitutes placeholder payloads when
/// the service is unconfigured, unreachable, or returns unusable output
pub struct Analyzer {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl Analyzer {
    /// Create an analyzer. `None` means no credential is configured and
    /// every request is served from the fixed demo payload.
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    /// Whether a completion provider is configured
    pub fn ai_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Analyze a text question
    pub async fn analyze_question(&self, question: &str) -> AnalysisResult {
        let Some(provider) = &self.provider else {
            info!("completion credential not configured, serving demo analysis");
            return placeholder::demo_text(question);
        };

        let request = CompletionRequest::text(prompt::question_prompt(question));
        match provider.complete(&request).await {
            Ok(reply) => match extract::analysis_from_reply(&reply.text) {
                Some(result) => {
                    info!(
                        provider = provider.name(),
                        molecules = result.molecules.len(),
                        reactions = result.reactions.len(),
                        "decoded completion reply"
                    );
                    result
                }
                None => {
                    warn!(
                        provider = provider.name(),
                        reply_len = reply.text.len(),
                        "completion reply did not decode, substituting placeholder"
                    );
                    placeholder::unparsed_text(question)
                }
            },
            Err(err) => {
                warn!(
                    provider = provider.name(),
                    error = %err,
                    "completion call failed, substituting static analysis"
                );
                placeholder::outage_text(question)
            }
        }
    }

    /// Analyze an uploaded image
    pub async fn analyze_image(&self, mime_type: &str, data: Vec<u8>) -> AnalysisResult {
        let Some(provider) = &self.provider else {
            info!("completion credential not configured, serving demo analysis");
            return placeholder::demo_image();
        };

        let request = CompletionRequest::with_image(prompt::image_prompt(), mime_type, data);
        match provider.complete(&request).await {
            Ok(reply) => match extract::analysis_from_reply(&reply.text) {
                Some(result) => {
                    info!(
                        provider = provider.name(),
                        molecules = result.molecules.len(),
                        reactions = result.reactions.len(),
                        "decoded completion reply"
                    );
                    result
                }
                None => {
                    warn!(
                        provider = provider.name(),
                        reply_len = reply.text.len(),
                        "completion reply did not decode, substituting placeholder"
                    );
                    placeholder::unparsed_image()
                }
            },
            Err(err) => {
                warn!(
                    provider = provider.name(),
                    error = %err,
                    "completion call failed, substituting static analysis"
                );
                placeholder::outage_image()
            }
        }
    }
}

/// Fixed payloads substituted by the fallback chain. Contents are part of
/// the service contract and asserted by tests; do not edit casually.
mod placeholder {
    use crate::models::{AnalysisResult, AnalysisType, Molecule, Reaction};

    const ESTERIFICATION_STEPS: [&str; 4] = [
        "Protonation of carboxylic acid",
        "Nucleophilic attack by alcohol",
        "Proton transfer",
        "Loss of water molecule",
    ];

    const IMAGE_DEMO_QUESTION: &str =
        "Chemistry question from uploaded image (AI analysis requires API key)";
    const IMAGE_UNPARSED_QUESTION: &str = "Chemistry question from uploaded image";
    const IMAGE_OUTAGE_QUESTION: &str =
        "Chemistry question from uploaded image (AI analysis unavailable)";

    fn steps() -> Vec<String> {
        ESTERIFICATION_STEPS.iter().map(|s| s.to_string()).collect()
    }

    fn smiles_list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    fn esterification(with_intermediates: bool) -> Reaction {
        Reaction {
            name: "Esterification".to_string(),
            steps: steps(),
            reactants: Some(smiles_list(&["CC(=O)O", "CCO"])),
            products: Some(smiles_list(&["CC(=O)OCC", "O"])),
            intermediates: with_intermediates
                .then(|| smiles_list(&["CC(=O)OH2+", "CC(=O)OCC(OH)2", "CC(=O)OCC"])),
        }
    }

    fn demo_molecules(drawable: bool) -> Vec<Molecule> {
        vec![
            Molecule {
                name: "Benzene".to_string(),
                smiles: "c1ccccc1".to_string(),
                description: "Aromatic hydrocarbon - common organic compound".to_string(),
                drawable,
            },
            Molecule {
                name: "Ethanol".to_string(),
                smiles: "CCO".to_string(),
                description: "Simple alcohol - commonly used solvent".to_string(),
                drawable,
            },
        ]
    }

    /// No credential configured, text mode
    pub fn demo_text(question: &str) -> AnalysisResult {
        AnalysisResult {
            molecules: demo_molecules(true),
            reactions: vec![esterification(true)],
            question: question.to_string(),
            analysis_type: AnalysisType::FallbackNoApi,
        }
    }

    /// No credential configured, image mode
    pub fn demo_image() -> AnalysisResult {
        AnalysisResult {
            molecules: demo_molecules(false),
            reactions: vec![esterification(true)],
            question: IMAGE_DEMO_QUESTION.to_string(),
            analysis_type: AnalysisType::FallbackNoApi,
        }
    }

    /// Reply received but not decodable, text mode
    pub fn unparsed_text(question: &str) -> AnalysisResult {
        AnalysisResult {
            molecules: vec![Molecule {
                name: "Unknown Compound".to_string(),
                smiles: "C".to_string(),
                description: "Compound mentioned in the question (analysis incomplete)"
                    .to_string(),
                drawable: true,
            }],
            reactions: vec![Reaction {
                name: "Chemical Reaction".to_string(),
                steps: vec!["Reaction mechanism analysis incomplete".to_string()],
                reactants: Some(smiles_list(&["C"])),
                products: Some(smiles_list(&["C"])),
                intermediates: None,
            }],
            question: question.to_string(),
            analysis_type: AnalysisType::AiFallback,
        }
    }

    /// Reply received but not decodable, image mode
    pub fn unparsed_image() -> AnalysisResult {
        AnalysisResult {
            molecules: vec![Molecule {
                name: "Unknown Compound".to_string(),
                smiles: "C".to_string(),
                description: "Compound identified in the image (analysis incomplete)".to_string(),
                drawable: false,
            }],
            reactions: vec![Reaction {
                name: "Chemical Reaction".to_string(),
                steps: vec!["Reaction mechanism analysis incomplete".to_string()],
                reactants: None,
                products: None,
                intermediates: None,
            }],
            question: IMAGE_UNPARSED_QUESTION.to_string(),
            analysis_type: AnalysisType::AiFallback,
        }
    }

    /// Completion call itself failed, text mode
    pub fn outage_text(question: &str) -> AnalysisResult {
        let question = if question.is_empty() {
            "Chemistry question".to_string()
        } else {
            question.to_string()
        };
        AnalysisResult {
            molecules: vec![Molecule {
                name: "Benzene".to_string(),
                smiles: "c1ccccc1".to_string(),
                description: "Aromatic hydrocarbon (fallback analysis)".to_string(),
                drawable: true,
            }],
            reactions: vec![esterification(false)],
            question,
            analysis_type: AnalysisType::Fallback,
        }
    }

    /// Completion call itself failed, image mode
    pub fn outage_image() -> AnalysisResult {
        AnalysisResult {
            molecules: vec![Molecule {
                name: "Benzene".to_string(),
                smiles: "c1ccccc1".to_string(),
                description: "Aromatic hydrocarbon (fallback analysis)".to_string(),
                drawable: false,
            }],
            reactions: vec![Reaction {
                name: "Esterification".to_string(),
                steps: steps(),
                reactants: None,
                products: None,
                intermediates: None,
            }],
            question: IMAGE_OUTAGE_QUESTION.to_string(),
            analysis_type: AnalysisType::Fallback,
        }
    }
}
