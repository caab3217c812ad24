pub mod acceptance;
pub mod chain;
pub mod mutation;
pub mod runner;

// Re-export specific structs for easier access
pub use self::acceptance::{Acceptance, AcceptanceRule};
pub use self::chain::{Chain, ChainStats, Step};
pub use self::runner::{
    ChainSummary, OptimizationOptions, OptimizationResult, Optimizer, ProgressCallback,
    ProgressReport, Silent,
};

use crate::error::{CfResult, CipherError};
use crate::key::Key;
use crate::scorer::Scorer;
use fastrand::Rng;
use std::sync::Arc;

/// Result of a single-chain [`search`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub key: Key,
    pub plaintext: String,
    pub score: f64,
    pub start_score: f64,
    pub stats: ChainStats,
}

/// Runs one chain for exactly `iterations` proposals from `initial_key`.
///
/// `rng` is the only source of randomness, so a seeded generator makes the
/// outcome reproducible.
pub fn search(
    scorer: Arc<Scorer>,
    ciphertext: &str,
    iterations: usize,
    initial_key: &Key,
    acceptance: Acceptance,
    rng: Rng,
) -> CfResult<SearchOutcome> {
    if iterations == 0 {
        return Err(CipherError::Config(
            "iterations must be at least 1".to_string(),
        ));
    }

    let mut chain = Chain::new(scorer, ciphertext, initial_key.clone(), acceptance, rng)?;
    chain.evolve(iterations)?;

    let plaintext = chain.best_plaintext(ciphertext)?;
    Ok(SearchOutcome {
        key: chain.best_key,
        plaintext,
        score: chain.best_score,
        start_score: chain.start_score,
        stats: chain.stats,
    })
}
