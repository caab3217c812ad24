use super::{InputArgs, ReferenceArgs};
use crate::reports;
use cipherforge::config::{ModelParams, SearchParams};
use cipherforge::optimizer::{OptimizationOptions, Optimizer, ProgressCallback, ProgressReport};
use cipherforge::{CfResult, Key, Scorer};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct CrackArgs {
    #[command(flatten)]
    pub search: SearchParams,

    #[command(flatten)]
    pub model: ModelParams,

    #[command(flatten)]
    pub reference: ReferenceArgs,

    #[command(flatten)]
    pub input: InputArgs,

    /// Starting key for every chain; random when omitted.
    #[arg(short, long)]
    pub key: Option<String>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Wall-clock limit in seconds.
    #[arg(long)]
    pub time: Option<u64>,

    /// Print the result as JSON instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

struct CliLogger;

impl ProgressCallback for CliLogger {
    fn on_progress(&self, report: &ProgressReport) -> bool {
        info!(
            "Iter {:>8} | Best: {:.5} (chain {}) | {:.2}M/s | {}",
            report.iterations, report.best_score, report.best_chain, report.ips, report.best_key
        );
        true
    }
}

pub fn run(args: CrackArgs, search: &SearchParams, params: &ModelParams) -> CfResult<()> {
    let stored = args.reference.load(params)?;
    let scorer = Arc::new(Scorer::new(stored.alphabet, stored.matrix)?);
    let alphabet = scorer.alphabet.clone();

    let ciphertext = args.input.read()?;
    if ciphertext.chars().count() < 2 {
        warn!("⚠️  Ciphertext has fewer than two symbols; every key scores the same");
    }

    let initial_key = match &args.key {
        Some(k) => Some(Key::parse(&alphabet, k)?),
        None => None,
    };

    let mut options = OptimizationOptions::from(search);
    options.max_time = args.time.map(Duration::from_secs);

    info!(
        "🔍 Cracking {} symbols with {} chain(s), {} iterations each",
        ciphertext.chars().count(),
        options.chains,
        options.iterations
    );

    let optimizer = Optimizer::new(scorer, options);
    let result = optimizer.run(&ciphertext, initial_key.as_ref(), args.seed, &CliLogger)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        reports::print_crack_report(&alphabet, &result);
    }
    Ok(())
}
