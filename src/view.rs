//! Presentation-layer state over one analysis result
//!
//! Tracks which molecule and reaction are active, the current mechanism
//! step, and the inline compound-lookup state. Step navigation is clamped;
//! advancing past the last step or retreating before the first is a no-op.
//! Lookups are guarded by a generation token so a slow response for a
//! previous selection can never overwrite the state of the current one.

use crate::catalog;
use crate::models::{AnalysisResult, Molecule, Reaction};
use crate::pubchem::{CompoundRecord, PubChemError};
use tracing::warn;

/// Inline error text shown when a compound lookup fails
const LOOKUP_ERROR: &str = "Could not fetch molecular data from PubChem";

/// Ties an in-flight compound lookup to the selection that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupToken(u64);

/// Inline state of the compound lookup for the active molecule
#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    Idle,
    Pending,
    Loaded(CompoundRecord),
    /// Visible but non-blocking; the rest of the view stays usable
    Failed(String),
}

/// View state over one `AnalysisResult`
#[derive(Debug)]
pub struct ResultView {
    result: AnalysisResult,
    molecule_index: usize,
    reaction_index: usize,
    step_index: usize,
    lookup_generation: u64,
    lookup: LookupState,
}

impl ResultView {
    /// Start a view with the first molecule and reaction selected and the
    /// mechanism at step 0
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            result,
            molecule_index: 0,
            reaction_index: 0,
            step_index: 0,
            lookup_generation: 0,
            lookup: LookupState::Idle,
        }
    }

    /// Build a view from the offline catalog matcher, for when no analysis
    /// service is reachable at all
    pub fn offline(question: &str) -> Self {
        Self::new(catalog::basic_question_analysis(question))
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn selected_molecule(&self) -> Option<&Molecule> {
        self.result.molecules.get(self.molecule_index)
    }

    pub fn selected_reaction(&self) -> Option<&Reaction> {
        self.result.reactions.get(self.reaction_index)
    }

    /// Description of the current mechanism step, if any
    pub fn current_step(&self) -> Option<&str> {
        self.selected_reaction()
            .and_then(|reaction| reaction.steps.get(self.step_index))
            .map(String::as_str)
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn lookup(&self) -> &LookupState {
        &self.lookup
    }

    /// Select a molecule by index; out-of-range is ignored. Switching
    /// invalidates any in-flight lookup for the previous selection.
    pub fn select_molecule(&mut self, index: usize) -> bool {
        if index >= self.result.molecules.len() {
            return false;
        }
        self.molecule_index = index;
        self.lookup_generation += 1;
        self.lookup = LookupState::Idle;
        true
    }

    /// Select a reaction by index; out-of-range is ignored. Switching
    /// resets the mechanism to step 0.
    pub fn select_reaction(&mut self, index: usize) -> bool {
        if index >= self.result.reactions.len() {
            return false;
        }
        self.reaction_index = index;
        self.step_index = 0;
        true
    }

    /// Begin a lookup for the active molecule. The returned token must be
    /// presented with the eventual outcome.
    pub fn begin_lookup(&mut self) -> LookupToken {
        self.lookup_generation += 1;
        self.lookup = LookupState::Pending;
        LookupToken(self.lookup_generation)
    }

    /// Apply a lookup outcome. Outcomes carrying a stale token are
    /// discarded and the method returns false.
    pub fn apply_lookup(
        &mut self,
        token: LookupToken,
        outcome: Result<CompoundRecord, PubChemError>,
    ) -> bool {
        if token.0 != self.lookup_generation {
            warn!(
                stale = token.0,
                current = self.lookup_generation,
                "discarding stale compound lookup"
            );
            return false;
        }
        self.lookup = match outcome {
            Ok(record) => LookupState::Loaded(record),
            Err(err) => {
                warn!(error = %err, "compound lookup failed");
                LookupState::Failed(LOOKUP_ERROR.to_string())
            }
        };
        true
    }

    /// Advance one mechanism step, clamped at the last step
    pub fn advance_step(&mut self) -> usize {
        let last = self
            .selected_reaction()
            .map(|reaction| reaction.steps.len().saturating_sub(1))
            .unwrap_or(0);
        self.step_index = (self.step_index + 1).min(last);
        self.step_index
    }

    /// Retreat one mechanism step, clamped at step 0
    pub fn retreat_step(&mut self) -> usize {
        self.step_index = self.step_index.saturating_sub(1);
        self.step_index
    }

    /// Jump back to step 0
    pub fn reset_steps(&mut self) {
        self.step_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalysisType, Reaction};

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            molecules: crate::catalog::common_molecules(),
            reactions: vec![
                Reaction {
                    name: "Esterification".to_string(),
                    steps: vec![
                        "step one".to_string(),
                        "step two".to_string(),
                        "step three".to_string(),
                    ],
                    reactants: None,
                    products: None,
                    intermediates: None,
                },
                Reaction {
                    name: "SN2 Substitution".to_string(),
                    steps: vec!["only step".to_string()],
                    reactants: None,
                    products: None,
                    intermediates: None,
                },
            ],
            question: "test".to_string(),
            analysis_type: AnalysisType::Basic,
        }
    }

    fn record(cid: u32) -> CompoundRecord {
        CompoundRecord {
            cid,
            molecular_formula: "C6H6".to_string(),
            molecular_weight: Some(78.11),
            canonical_smiles: "c1ccccc1".to_string(),
            iupac_name: "benzene".to_string(),
        }
    }

    #[test]
    fn test_first_entries_selected_on_construction() {
        let view = ResultView::new(sample_result());
        assert_eq!(view.selected_molecule().unwrap().name, "Benzene");
        assert_eq!(view.selected_reaction().unwrap().name, "Esterification");
        assert_eq!(view.step_index(), 0);
        assert_eq!(view.current_step(), Some("step one"));
    }

    #[test]
    fn test_advance_clamps_at_last_step() {
        let mut view = ResultView::new(sample_result());
        for _ in 0..10 {
            view.advance_step();
        }
        assert_eq!(view.step_index(), 2);
        assert_eq!(view.current_step(), Some("step three"));
    }

    #[test]
    fn test_retreat_clamps_at_first_step() {
        let mut view = ResultView::new(sample_result());
        view.advance_step();
        for _ in 0..10 {
            view.retreat_step();
        }
        assert_eq!(view.step_index(), 0);

        view.advance_step();
        view.reset_steps();
        assert_eq!(view.step_index(), 0);
    }

    #[test]
    fn test_reaction_selection_resets_step() {
        let mut view = ResultView::new(sample_result());
        view.advance_step();
        view.advance_step();
        assert!(view.select_reaction(1));
        assert_eq!(view.step_index(), 0);
        assert_eq!(view.current_step(), Some("only step"));
        // out of range is a no-op
        assert!(!view.select_reaction(5));
        assert_eq!(view.selected_reaction().unwrap().name, "SN2 Substitution");
    }

    #[test]
    fn test_stale_lookup_is_discarded() {
        let mut view = ResultView::new(sample_result());
        let stale = view.begin_lookup();

        // user switches molecules before the first lookup lands
        assert!(view.select_molecule(1));
        let current = view.begin_lookup();

        assert!(!view.apply_lookup(stale, Ok(record(241))));
        assert_eq!(view.lookup(), &LookupState::Pending);

        assert!(view.apply_lookup(current, Ok(record(702))));
        match view.lookup() {
            LookupState::Loaded(loaded) => assert_eq!(loaded.cid, 702),
            other => panic!("expected loaded state, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_lookup_is_inline_and_non_blocking() {
        let mut view = ResultView::new(sample_result());
        let token = view.begin_lookup();
        assert!(view.apply_lookup(token, Err(PubChemError::NotFound("x".to_string()))));
        assert_eq!(
            view.lookup(),
            &LookupState::Failed("Could not fetch molecular data from PubChem".to_string())
        );
        // the rest of the view stays usable
        assert_eq!(view.advance_step(), 1);
        assert!(view.select_molecule(2));
    }

    #[test]
    fn test_offline_view_uses_catalog_matcher() {
        let view = ResultView::offline("Draw the structure of methanol");
        assert_eq!(view.result().analysis_type, AnalysisType::Basic);
        assert_eq!(view.selected_molecule().unwrap().name, "Methanol");
    }
}
