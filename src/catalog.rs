//! Fixed compound and reaction tables for the offline "basic" analysis
//!
//! Used when no analysis service can be reached at all. Selection is
//! deterministic: the question is matched against known names and reaction
//! keywords, so the same question always produces the same result.

use crate::models::{AnalysisResult, AnalysisType, Molecule, Reaction};

/// Default question attributed to an image analyzed offline
const DEFAULT_IMAGE_QUESTION: &str =
    "Draw the mechanism for the esterification of benzoic acid with ethanol";

fn molecule(name: &str, smiles: &str, description: &str) -> Molecule {
    Molecule {
        name: name.to_string(),
        smiles: smiles.to_string(),
        description: description.to_string(),
        drawable: true,
    }
}

/// The fixed compound table
pub fn common_molecules() -> Vec<Molecule> {
    vec![
        molecule(
            "Benzene",
            "c1ccccc1",
            "Aromatic hydrocarbon with 6 carbon atoms in a ring structure",
        ),
        molecule(
            "Ethanol",
            "CCO",
            "Simple alcohol with 2 carbon atoms and hydroxyl group",
        ),
        molecule("Methanol", "CO", "Simple alcohol with 1 carbon atom"),
        molecule(
            "Acetic Acid",
            "CC(=O)O",
            "Carboxylic acid with 2 carbon atoms and carboxyl group",
        ),
        molecule("Propane", "CCC", "Alkane with 3 carbon atoms"),
    ]
}

/// The fixed reaction table
pub fn common_reactions() -> Vec<Reaction> {
    vec![
        Reaction {
            name: "Esterification".to_string(),
            steps: vec![
                "Protonation of carboxylic acid".to_string(),
                "Nucleophilic attack by alcohol".to_string(),
                "Proton transfer".to_string(),
                "Loss of water molecule".to_string(),
            ],
            reactants: Some(vec!["CC(=O)O".to_string(), "CCO".to_string()]),
            products: Some(vec!["CC(=O)OCC".to_string(), "O".to_string()]),
            intermediates: None,
        },
        Reaction {
            name: "SN2 Substitution".to_string(),
            steps: vec![
                "Nucleophile approaches from back side".to_string(),
                "Bond formation and breaking simultaneously".to_string(),
                "Inversion of configuration".to_string(),
            ],
            reactants: Some(vec!["CBr".to_string(), "CO".to_string()]),
            products: Some(vec!["CO".to_string(), "Br".to_string()]),
            intermediates: None,
        },
        Reaction {
            name: "SN1 Substitution".to_string(),
            steps: vec![
                "Formation of carbocation intermediate".to_string(),
                "Nucleophile attack on carbocation".to_string(),
                "Formation of substitution product".to_string(),
            ],
            reactants: Some(vec!["CBr".to_string(), "CO".to_string()]),
            products: Some(vec!["CO".to_string(), "Br".to_string()]),
            intermediates: None,
        },
    ]
}

/// Offline analysis of a text question: match the question against the
/// fixed tables. Unrecognized questions default to Benzene and
/// Esterification.
pub fn basic_question_analysis(question: &str) -> AnalysisResult {
    let lower = question.to_lowercase();
    let molecules = common_molecules();

    let molecule_name = if lower.contains("benzene") {
        "Benzene"
    } else if lower.contains("ethanol") {
        "Ethanol"
    } else if lower.contains("methanol") {
        "Methanol"
    } else if lower.contains("acetic") || lower.contains("acetate") {
        "Acetic Acid"
    } else if lower.contains("propane") {
        "Propane"
    } else {
        "Benzene"
    };

    let reaction_name = if lower.contains("sn2") {
        "SN2 Substitution"
    } else if lower.contains("sn1") {
        "SN1 Substitution"
    } else {
        "Esterification"
    };

    let selected_molecules = molecules
        .into_iter()
        .filter(|m| m.name == molecule_name)
        .collect();
    let selected_reactions = common_reactions()
        .into_iter()
        .filter(|r| r.name == reaction_name)
        .collect();

    AnalysisResult {
        molecules: selected_molecules,
        reactions: selected_reactions,
        question: question.to_string(),
        analysis_type: AnalysisType::Basic,
    }
}

/// Offline analysis of an uploaded image. With no text to match against,
/// the selection is fixed: the first two catalog molecules and the first
/// catalog reaction.
pub fn basic_image_analysis() -> AnalysisResult {
    AnalysisResult {
        molecules: common_molecules().into_iter().take(2).collect(),
        reactions: common_reactions().into_iter().take(1).collect(),
        question: DEFAULT_IMAGE_QUESTION.to_string(),
        analysis_type: AnalysisType::Basic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_match_selects_named_molecule() {
        let result = basic_question_analysis("Show me the structure of ethanol");
        assert_eq!(result.analysis_type, AnalysisType::Basic);
        assert_eq!(result.molecules.len(), 1);
        assert_eq!(result.molecules[0].name, "Ethanol");
        assert_eq!(result.molecules[0].smiles, "CCO");
    }

    #[test]
    fn test_acetate_matches_acetic_acid() {
        let result = basic_question_analysis("What does sodium acetate look like?");
        assert_eq!(result.molecules[0].name, "Acetic Acid");
    }

    #[test]
    fn test_unknown_question_defaults_to_benzene_and_esterification() {
        let result = basic_question_analysis("Explain hybridization");
        assert_eq!(result.molecules[0].name, "Benzene");
        assert_eq!(result.reactions[0].name, "Esterification");
    }

    #[test]
    fn test_reaction_keyword_selection() {
        let sn2 = basic_question_analysis("Show me the SN2 mechanism for bromomethane");
        assert_eq!(sn2.reactions[0].name, "SN2 Substitution");
        assert_eq!(sn2.reactions[0].steps.len(), 3);

        let sn1 = basic_question_analysis("Why is sn1 favored here?");
        assert_eq!(sn1.reactions[0].name, "SN1 Substitution");
    }

    #[test]
    fn test_basic_analysis_is_deterministic() {
        let question = "Draw the esterification mechanism";
        assert_eq!(
            basic_question_analysis(question),
            basic_question_analysis(question)
        );
        assert_eq!(basic_image_analysis(), basic_image_analysis());
    }

    #[test]
    fn test_image_analysis_fixed_selection() {
        let result = basic_image_analysis();
        assert_eq!(result.molecules.len(), 2);
        assert_eq!(result.molecules[0].name, "Benzene");
        assert_eq!(result.reactions.len(), 1);
        assert_eq!(result.reactions[0].name, "Esterification");
    }
}
