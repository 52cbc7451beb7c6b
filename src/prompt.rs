//! Prompt construction for the extraction task
//!
//! The completion service receives a natural-language instruction carrying
//! the exact JSON output contract. The contract pins `analysisType` to
//! "ai" and spells out, with examples, that `intermediates` entries are
//! SMILES structures rather than mechanism narration.

/// Exact output schema the service is asked to produce
const OUTPUT_CONTRACT: &str = r#"Return the response in this exact JSON format:
{
  "molecules": [
    {
      "name": "molecule name",
      "smiles": "SMILES notation",
      "description": "brief description",
      "drawable": true
    }
  ],
  "reactions": [
    {
      "name": "reaction name",
      "steps": ["step 1", "step 2", "step 3"],
      "reactants": ["SMILES1", "SMILES2"],
      "products": ["SMILES3", "SMILES4"],
      "intermediates": ["CC(=O)OH2+", "CC(=O)OCC(OH)2", "CC(=O)OCC"]
    }
  ],
  "question": "original question",
  "analysisType": "ai"
}"#;

/// Disambiguates structure notation from step narration; without this the
/// service tends to fill `intermediates` with prose
const INTERMEDIATES_RULE: &str = r#"CRITICAL: The intermediates array must contain ONLY valid SMILES notation strings, NOT text descriptions.
Examples of valid SMILES: "CC(=O)O", "c1ccccc1", "CCO", "CCBr", "CCOH"
Examples of INVALID entries: "Protonation of carboxylic acid", "Nucleophilic attack", "text descriptions"
Each intermediate must be a valid chemical structure in SMILES format that can be drawn by PubChem."#;

/// Build the extraction prompt for a text question
pub fn question_prompt(question: &str) -> String {
    format!(
        r#"Analyze this chemistry question and extract the following information in JSON format:

Question: "{question}"

1. Identify any molecules mentioned in the question
2. Identify any chemical reactions or mechanisms
3. Provide SMILES notation for any molecules identified
4. If the question asks to draw something, provide the molecular structures needed
5. For each reaction step, provide the SMILES notation of the intermediate molecule formed

{OUTPUT_CONTRACT}

If the question asks to draw specific molecules, make sure to include them in the molecules array with proper SMILES notation.

{INTERMEDIATES_RULE}"#
    )
}

/// Build the extraction prompt for an uploaded image
pub fn image_prompt() -> String {
    format!(
        r#"Analyze this chemistry image and extract the following information in JSON format:

1. Identify any molecules mentioned or shown in the image
2. Identify any chemical reactions or mechanisms
3. Extract the main chemistry question or problem
4. Provide SMILES notation for any molecules identified
5. For each reaction step, provide the SMILES notation of the intermediate molecule formed

{OUTPUT_CONTRACT}

If no specific molecules or reactions are clearly visible, provide general chemistry information related to what might be in the image.

{INTERMEDIATES_RULE}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt_embeds_question_and_contract() {
        let prompt = question_prompt("Draw the structure of benzene");
        assert!(prompt.contains("Question: \"Draw the structure of benzene\""));
        assert!(prompt.contains("\"analysisType\": \"ai\""));
        assert!(prompt.contains("CRITICAL"));
        assert!(prompt.contains("NOT text descriptions"));
    }

    #[test]
    fn test_image_prompt_targets_the_image() {
        let prompt = image_prompt();
        assert!(prompt.contains("chemistry image"));
        assert!(prompt.contains("main chemistry question or problem"));
        assert!(prompt.contains("\"analysisType\": \"ai\""));
    }
}
