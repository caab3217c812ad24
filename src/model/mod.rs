pub mod loader;

use crate::alphabet::Alphabet;
use crate::consts::NORMALIZATION_TOLERANCE;
use crate::error::{CfResult, CipherError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How a transition table is turned into probabilities.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Each row sums to 1 (first-order Markov chain over symbols).
    #[default]
    Row,
    /// The whole table sums to 1 (joint bigram distribution).
    Grand,
}

/// Raw bigram counts, the intermediate form of a [`TransitionMatrix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigramCounts {
    size: usize,
    cells: Vec<u64>,
    pairs: u64,
}

impl BigramCounts {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
            pairs: 0,
        }
    }

    pub fn from_text(alphabet: &Alphabet, text: &str) -> Self {
        let mut counts = Self::new(alphabet.len());
        counts.add_symbols(&alphabet.encode(text));
        counts
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.pairs = 0;
    }

    /// Counts every adjacent pair of `symbols` where both sides are in range.
    #[inline(always)]
    pub fn add_symbols(&mut self, symbols: &[u8]) {
        let n = self.size;
        for w in symbols.windows(2) {
            let (a, b) = (w[0] as usize, w[1] as usize);
            if a < n && b < n {
                self.cells[a * n + b] += 1;
                self.pairs += 1;
            }
        }
    }

    /// Adds `count` occurrences of `from -> to`; the table is left untouched on overflow.
    pub fn add(&mut self, from: usize, to: usize, count: u64) -> CfResult<()> {
        let idx = from * self.size + to;
        let overflow = || {
            CipherError::Validation(format!(
                "Count for bigram ({}, {}) overflows the table",
                from, to
            ))
        };
        let cell = self.cells[idx].checked_add(count).ok_or_else(overflow)?;
        let pairs = self.pairs.checked_add(count).ok_or_else(overflow)?;
        self.cells[idx] = cell;
        self.pairs = pairs;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn pairs(&self) -> u64 {
        self.pairs
    }

    pub fn get(&self, from: usize, to: usize) -> u64 {
        self.cells[from * self.size + to]
    }

    pub fn cells(&self) -> &[u64] {
        &self.cells
    }

    /// Raises zero cells to one, then divides by the row sum or grand total.
    pub fn normalize(&self, normalization: Normalization) -> TransitionMatrix {
        let n = self.size;
        let smoothed: Vec<f64> = self.cells.iter().map(|&c| c.max(1) as f64).collect();
        let mut cells = vec![0.0; n * n];

        match normalization {
            Normalization::Row => {
                for i in 0..n {
                    let row = &smoothed[i * n..(i + 1) * n];
                    let sum: f64 = row.iter().sum();
                    for j in 0..n {
                        cells[i * n + j] = row[j] / sum;
                    }
                }
            }
            Normalization::Grand => {
                let total: f64 = smoothed.iter().sum();
                for (cell, &v) in cells.iter_mut().zip(&smoothed) {
                    *cell = v / total;
                }
            }
        }

        TransitionMatrix {
            size: n,
            normalization,
            pairs: self.pairs,
            cells,
        }
    }
}

/// Smoothed, normalized bigram probabilities over an alphabet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    size: usize,
    normalization: Normalization,
    pairs: u64,
    cells: Vec<f64>,
}

impl TransitionMatrix {
    /// Assembles a matrix from externally computed cells.
    /// Only the shape is checked here; see [`TransitionMatrix::validate`].
    pub fn from_cells(
        size: usize,
        normalization: Normalization,
        pairs: u64,
        cells: Vec<f64>,
    ) -> CfResult<Self> {
        if cells.len() != size * size {
            return Err(CipherError::Validation(format!(
                "Expected {} cells for a {}x{} table, got {}",
                size * size,
                size,
                size,
                cells.len()
            )));
        }
        Ok(Self {
            size,
            normalization,
            pairs,
            cells,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Number of bigrams the model was built from.
    pub fn pairs(&self) -> u64 {
        self.pairs
    }

    /// True when no bigram was observed; every cell is the smoothing floor
    /// and scores against this model carry no information.
    pub fn is_degenerate(&self) -> bool {
        self.pairs == 0
    }

    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.cells[from * self.size + to]
    }

    pub fn row(&self, from: usize) -> &[f64] {
        &self.cells[from * self.size..(from + 1) * self.size]
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Every cell must be a finite probability in (0, 1].
    pub fn validate(&self) -> CfResult<()> {
        for (idx, &p) in self.cells.iter().enumerate() {
            if !p.is_finite() || p <= 0.0 || p > 1.0 {
                return Err(CipherError::DegenerateModel(format!(
                    "Cell ({}, {}) holds {}, expected a probability in (0, 1]",
                    idx / self.size,
                    idx % self.size,
                    p
                )));
            }
        }
        Ok(())
    }

    /// Checks the sums demanded by the matrix's normalization.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        let n = self.size;
        match self.normalization {
            Normalization::Row => {
                (0..n).all(|i| (self.row(i).iter().sum::<f64>() - 1.0).abs() <= tolerance)
            }
            Normalization::Grand => (self.cells.iter().sum::<f64>() - 1.0).abs() <= tolerance,
        }
    }

    /// The `limit` most probable bigrams, rendered with `alphabet`.
    pub fn top_bigrams(&self, alphabet: &Alphabet, limit: usize) -> Vec<(String, f64)> {
        let n = self.size;
        let mut entries: Vec<(String, f64)> = self
            .cells
            .iter()
            .enumerate()
            .map(|(idx, &p)| {
                let s: String = [alphabet.symbol(idx / n), alphabet.symbol(idx % n)]
                    .iter()
                    .collect();
                (s, p)
            })
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }
}

/// Builds a smoothed, normalized bigram model of `text`.
///
/// Characters outside `alphabet` break pairs rather than being skipped over.
pub fn build_model(
    alphabet: &Alphabet,
    text: &str,
    normalization: Normalization,
) -> TransitionMatrix {
    let model = BigramCounts::from_text(alphabet, text).normalize(normalization);
    debug_assert!(model.is_normalized(NORMALIZATION_TOLERANCE));
    model
}
