use super::acceptance::Acceptance;
use super::mutation;
use crate::cipher;
use crate::error::{CfResult, CipherError};
use crate::key::Key;
use crate::model::BigramCounts;
use crate::scorer::Scorer;
use fastrand::Rng;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Outcome of a single proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Improved,
    AcceptedWorse,
    Rejected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChainStats {
    pub proposals: usize,
    pub improved: usize,
    pub accepted_worse: usize,
    pub rejected: usize,
}

/// One Metropolis-Hastings chain over substitution keys.
///
/// The ciphertext is encoded to symbol positions once; every evaluation
/// decodes into a scratch buffer and rescores the bigram counts.
pub struct Chain {
    pub scorer: Arc<Scorer>,
    pub acceptance: Acceptance,
    pub rng: Rng,

    pub key: Key,
    pub score: f64,
    pub best_key: Key,
    pub best_score: f64,
    pub start_score: f64,

    pub iteration: usize,
    pub stats: ChainStats,

    cipher: Vec<u8>,
    plain: Vec<u8>,
    inverse: [u8; 256],
    counts: BigramCounts,
}

impl Chain {
    pub fn new(
        scorer: Arc<Scorer>,
        ciphertext: &str,
        initial_key: Key,
        acceptance: Acceptance,
        rng: Rng,
    ) -> CfResult<Self> {
        let n = scorer.alphabet.len();
        if initial_key.len() != n {
            return Err(CipherError::InvalidKey(format!(
                "Initial key has {} symbols but the alphabet has {}",
                initial_key.len(),
                n
            )));
        }
        acceptance.validate()?;

        // Same folding as cipher::decrypt so both paths see identical pairs.
        let cipher = scorer.alphabet.encode(&ciphertext.to_uppercase());
        let counts = BigramCounts::new(n);

        let mut chain = Chain {
            scorer,
            acceptance,
            rng,
            key: initial_key.clone(),
            score: 0.0,
            best_key: initial_key,
            best_score: 0.0,
            start_score: 0.0,
            iteration: 0,
            stats: ChainStats::default(),
            plain: Vec::with_capacity(cipher.len()),
            cipher,
            inverse: [0; 256],
            counts,
        };

        let key = chain.key.clone();
        let score = chain.evaluate(&key)?;
        chain.score = score;
        chain.best_score = score;
        chain.start_score = score;

        if chain.counts.pairs() == 0 {
            warn!("Ciphertext yields no bigrams; the search has nothing to optimize");
        }

        Ok(chain)
    }

    /// Decrypts the ciphertext under `key` and scores the result.
    #[inline(always)]
    pub fn evaluate(&mut self, key: &Key) -> CfResult<f64> {
        key.inverse_into(&mut self.inverse);
        cipher::decode_positions(&self.cipher, &self.inverse, &mut self.plain);
        self.counts.clear();
        self.counts.add_symbols(&self.plain);
        self.scorer.score_counts(&self.counts)
    }

    /// Propose, evaluate, accept or reject, then track the best key.
    #[inline(always)]
    pub fn step(&mut self) -> CfResult<Step> {
        let candidate = mutation::propose(&self.key, &mut self.rng);
        let candidate_score = self.evaluate(&candidate)?;

        self.iteration += 1;
        self.stats.proposals += 1;

        let step = if candidate_score > self.score {
            Step::Improved
        } else if self
            .acceptance
            .accepts_worse(candidate_score - self.score, &mut self.rng)
        {
            Step::AcceptedWorse
        } else {
            Step::Rejected
        };

        match step {
            Step::Improved => self.stats.improved += 1,
            Step::AcceptedWorse => self.stats.accepted_worse += 1,
            Step::Rejected => self.stats.rejected += 1,
        }
        if step != Step::Rejected {
            self.key = candidate;
            self.score = candidate_score;
        }

        if self.score > self.best_score {
            self.best_score = self.score;
            self.best_key = self.key.clone();
        }

        Ok(step)
    }

    /// Runs `steps` iterations and returns how many proposals were accepted.
    pub fn evolve(&mut self, steps: usize) -> CfResult<usize> {
        let mut accepted = 0;
        for _ in 0..steps {
            if self.step()? != Step::Rejected {
                accepted += 1;
            }
        }
        Ok(accepted)
    }

    /// Decryption of `ciphertext` under the best key found so far.
    pub fn best_plaintext(&self, ciphertext: &str) -> CfResult<String> {
        cipher::decrypt_with(&self.scorer.alphabet, ciphertext, &self.best_key)
    }
}
