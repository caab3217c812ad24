pub mod engine;

use crate::alphabet::Alphabet;
use crate::error::{CfResult, CipherError};
use crate::model::{build_model, BigramCounts, Normalization, TransitionMatrix};
use tracing::warn;

/// Plausibility scorer bound to one reference model.
///
/// Holds `ln(reference)` so each evaluation is a single weighted sum.
/// Read-only after construction; chains share it through an `Arc`.
pub struct Scorer {
    pub alphabet: Alphabet,
    pub reference: TransitionMatrix,
    log_table: Vec<f64>,
}

impl Scorer {
    pub fn new(alphabet: Alphabet, reference: TransitionMatrix) -> CfResult<Self> {
        if reference.size() != alphabet.len() {
            return Err(CipherError::Validation(format!(
                "Reference model is {}x{} but the alphabet has {} symbols",
                reference.size(),
                reference.size(),
                alphabet.len()
            )));
        }
        reference.validate()?;

        if reference.is_degenerate() {
            warn!("Reference model was built from no bigrams; scores will not discriminate");
        }

        let log_table = reference.cells().iter().map(|p| p.ln()).collect();

        Ok(Self {
            alphabet,
            reference,
            log_table,
        })
    }

    /// Builds the reference model from corpus text.
    pub fn from_corpus(
        alphabet: Alphabet,
        corpus: &str,
        normalization: Normalization,
    ) -> CfResult<Self> {
        let reference = build_model(&alphabet, corpus, normalization);
        Self::new(alphabet, reference)
    }

    pub fn normalization(&self) -> Normalization {
        self.reference.normalization()
    }

    pub fn log_table(&self) -> &[f64] {
        &self.log_table
    }

    /// Log-likelihood of `text` under the reference model. Higher is better.
    pub fn score_text(&self, text: &str) -> CfResult<f64> {
        let observed = build_model(&self.alphabet, text, self.normalization());
        self.score_model(&observed)
    }

    pub fn score_model(&self, observed: &TransitionMatrix) -> CfResult<f64> {
        if observed.size() != self.reference.size() {
            return Err(CipherError::Validation(format!(
                "Observed model is {}x{}, reference is {}x{}",
                observed.size(),
                observed.size(),
                self.reference.size(),
                self.reference.size()
            )));
        }
        if observed.normalization() != self.normalization() {
            return Err(CipherError::Validation(format!(
                "Observed model uses '{}' normalization, reference uses '{}'",
                observed.normalization(),
                self.normalization()
            )));
        }
        finite(engine::score_matrix(&self.log_table, observed))
    }

    /// Scores raw counts; the search loop's entry point.
    #[inline(always)]
    pub fn score_counts(&self, counts: &BigramCounts) -> CfResult<f64> {
        if counts.size() != self.reference.size() {
            return Err(CipherError::Validation(format!(
                "Count table is {}x{}, reference is {}x{}",
                counts.size(),
                counts.size(),
                self.reference.size(),
                self.reference.size()
            )));
        }
        finite(engine::score_counts(
            &self.log_table,
            counts,
            self.normalization(),
        ))
    }
}

/// One-shot plausibility of `text` against `reference`.
pub fn plausibility(
    alphabet: &Alphabet,
    text: &str,
    reference: &TransitionMatrix,
) -> CfResult<f64> {
    Scorer::new(alphabet.clone(), reference.clone())?.score_text(text)
}

#[inline(always)]
fn finite(score: f64) -> CfResult<f64> {
    if score.is_finite() {
        Ok(score)
    } else {
        Err(CipherError::DegenerateModel(format!(
            "Evaluation produced a non-finite score ({})",
            score
        )))
    }
}
