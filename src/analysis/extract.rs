//! Two-stage JSON extraction from free-text completion replies
//!
//! Replies usually wrap the JSON object in prose or a code fence. Stage one
//! locates the candidate brace-delimited span; stage two strict-decodes it
//! into the analysis shape. Either stage can fail independently, and the
//! caller treats both failures the same way.

use crate::models::AnalysisResult;

/// Locate the candidate JSON span: from the first `{` to the last `}`.
/// Returns `None` when no such span exists.
pub fn locate_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Strict-decode a candidate span into the analysis shape
pub fn decode(span: &str) -> Result<AnalysisResult, serde_json::Error> {
    serde_json::from_str(span)
}

/// Extract an `AnalysisResult` from a raw reply: locate, then decode
pub fn analysis_from_reply(text: &str) -> Option<AnalysisResult> {
    locate_json(text).and_then(|span| decode(span).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisType;

    const VALID_BODY: &str = r#"{
        "molecules": [{"name": "Benzene", "smiles": "c1ccccc1", "description": "aromatic", "drawable": true}],
        "reactions": [],
        "question": "draw benzene",
        "analysisType": "ai"
    }"#;

    #[test]
    fn test_locate_strips_surrounding_prose() {
        let text = format!("Sure! Here is the analysis:\n```json\n{VALID_BODY}\n```\nDone.");
        let span = locate_json(&text).unwrap();
        assert!(span.starts_with('{'));
        assert!(span.ends_with('}'));
        assert!(!span.contains("```"));
    }

    #[test]
    fn test_locate_without_braces() {
        assert!(locate_json("no json here").is_none());
        assert!(locate_json("").is_none());
    }

    #[test]
    fn test_locate_mismatched_order() {
        assert!(locate_json("} backwards {").is_none());
    }

    #[test]
    fn test_decode_rejects_malformed_content() {
        assert!(decode("{\"molecules\": [").is_err());
        assert!(decode("{\"unrelated\": true}").is_err());
    }

    #[test]
    fn test_extraction_end_to_end() {
        let text = format!("prefix {VALID_BODY} suffix");
        let result = analysis_from_reply(&text).unwrap();
        assert_eq!(result.analysis_type, AnalysisType::Ai);
        assert_eq!(result.molecules[0].name, "Benzene");
    }

    #[test]
    fn test_extraction_fails_on_prose_only() {
        assert!(analysis_from_reply("I could not identify any molecules.").is_none());
    }
}
