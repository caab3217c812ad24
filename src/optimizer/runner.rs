use crate::config::SearchParams;
use crate::error::{CfResult, CipherError};
use crate::key::Key;
use crate::optimizer::{Acceptance, Chain, ChainStats};
use crate::scorer::Scorer;
use fastrand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct OptimizationOptions {
    pub chains: usize,
    pub iterations: usize,
    pub report_interval: usize,
    pub acceptance: Acceptance,
    pub max_time: Option<Duration>,
}

impl From<&SearchParams> for OptimizationOptions {
    fn from(params: &SearchParams) -> Self {
        Self {
            chains: params.chains,
            iterations: params.iterations,
            report_interval: params.report_interval,
            acceptance: params.acceptance(),
            max_time: None, // Set manually if needed
        }
    }
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self::from(&SearchParams::default())
    }
}

impl OptimizationOptions {
    pub fn validate(&self) -> CfResult<()> {
        if self.iterations == 0 {
            return Err(CipherError::Config(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.chains == 0 {
            return Err(CipherError::Config("chains must be at least 1".to_string()));
        }
        if self.report_interval == 0 {
            return Err(CipherError::Config(
                "report_interval must be at least 1".to_string(),
            ));
        }
        self.acceptance.validate()
    }
}

/// Snapshot handed to a [`ProgressCallback`] after every epoch.
#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub epoch: usize,
    /// Iterations completed by each chain so far.
    pub iterations: usize,
    pub best_chain: usize,
    pub best_score: f64,
    pub best_key: String,
    pub current_scores: Vec<f64>,
    /// Proposals per second across all chains, in millions.
    pub ips: f64,
}

/// Receives progress between epochs.
/// Returning `false` stops the search at the current iteration boundary.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, report: &ProgressReport) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(&ProgressReport) -> bool + Send + Sync,
{
    fn on_progress(&self, report: &ProgressReport) -> bool {
        self(report)
    }
}

/// Callback that never interrupts and reports nothing.
pub struct Silent;

impl ProgressCallback for Silent {
    fn on_progress(&self, _report: &ProgressReport) -> bool {
        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainSummary {
    pub chain: usize,
    pub seed: Option<u64>,
    pub start_key: String,
    pub start_score: f64,
    pub best_key: String,
    pub best_score: f64,
    pub stats: ChainStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub key: String,
    pub plaintext: String,
    pub score: f64,
    pub best_chain: usize,
    pub iterations: usize,
    pub elapsed_ms: u64,
    pub chains: Vec<ChainSummary>,
}

pub struct Optimizer {
    scorer: Arc<Scorer>,
    options: OptimizationOptions,
}

impl Optimizer {
    pub fn new(scorer: Arc<Scorer>, options: OptimizationOptions) -> Self {
        Self { scorer, options }
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    /// Runs every chain to the iteration budget, or until the time limit or
    /// the callback stops it, and returns the best key over all chains.
    ///
    /// Chain `i` is seeded with `seed + i`. Without `initial_key` each chain
    /// starts from a random key drawn from its own generator.
    pub fn run<CB: ProgressCallback>(
        &self,
        ciphertext: &str,
        initial_key: Option<&Key>,
        seed: Option<u64>,
        callback: &CB,
    ) -> CfResult<OptimizationResult> {
        let opts = &self.options;
        opts.validate()?;

        let alphabet = &self.scorer.alphabet;

        // 1. Initialize Chains
        let mut seeds = Vec::with_capacity(opts.chains);
        let mut start_keys = Vec::with_capacity(opts.chains);
        let mut chains: Vec<Chain> = (0..opts.chains)
            .map(|i| {
                let chain_seed = seed.map(|s| s.wrapping_add(i as u64));
                let mut rng = match chain_seed {
                    Some(s) => Rng::with_seed(s),
                    None => Rng::new(),
                };
                let key = match initial_key {
                    Some(k) => k.clone(),
                    None => Key::random(alphabet, &mut rng),
                };
                seeds.push(chain_seed);
                start_keys.push(key.render(alphabet));
                Chain::new(
                    self.scorer.clone(),
                    ciphertext,
                    key,
                    opts.acceptance,
                    rng,
                )
            })
            .collect::<CfResult<_>>()?;

        info!(
            "Running {} chain(s) x {} iterations ({} acceptance)",
            opts.chains, opts.iterations, opts.acceptance.rule
        );

        // 2. Main Loop
        let start_time = Instant::now();
        let mut last_report = start_time;
        let mut done = 0;
        let mut epoch = 0;

        while done < opts.iterations {
            if let Some(limit) = opts.max_time {
                if start_time.elapsed() >= limit {
                    info!("Time limit reached after {} iterations", done);
                    break;
                }
            }

            // A. Evolve in Parallel
            let steps = opts.report_interval.min(opts.iterations - done);
            chains
                .par_iter_mut()
                .map(|c| c.evolve(steps))
                .collect::<CfResult<Vec<usize>>>()?;

            done += steps;
            epoch += 1;

            // B. Report Progress
            let now = Instant::now();
            let secs = now.duration_since(last_report).as_secs_f64().max(1e-9);
            let ips = (steps * chains.len()) as f64 / secs / 1_000_000.0;
            last_report = now;

            let best = best_chain(&chains);
            let report = ProgressReport {
                epoch,
                iterations: done,
                best_chain: best,
                best_score: chains[best].best_score,
                best_key: chains[best].best_key.render(alphabet),
                current_scores: chains.iter().map(|c| c.score).collect(),
                ips,
            };
            debug!(
                "Ep {:5} | Iter {:8} | Best: {:.5} (chain {}) | {:.2}M/s",
                epoch, done, report.best_score, best, ips
            );

            if !callback.on_progress(&report) {
                info!("Search stopped by observer after {} iterations", done);
                break;
            }
        }

        // 3. Harvest
        let best = best_chain(&chains);
        let winner = &chains[best];
        let plaintext = winner.best_plaintext(ciphertext)?;

        let summaries = chains
            .iter()
            .enumerate()
            .map(|(i, c)| ChainSummary {
                chain: i,
                seed: seeds[i],
                start_key: start_keys[i].clone(),
                start_score: c.start_score,
                best_key: c.best_key.render(alphabet),
                best_score: c.best_score,
                stats: c.stats,
            })
            .collect();

        Ok(OptimizationResult {
            key: winner.best_key.render(alphabet),
            plaintext,
            score: winner.best_score,
            best_chain: best,
            iterations: done,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            chains: summaries,
        })
    }
}

/// Highest best score; the lowest index wins ties.
fn best_chain(chains: &[Chain]) -> usize {
    let mut best = 0;
    for (i, c) in chains.iter().enumerate().skip(1) {
        if c.best_score > chains[best].best_score {
            best = i;
        }
    }
    best
}
