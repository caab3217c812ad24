use super::{InputArgs, ReferenceArgs};
use cipherforge::config::ModelParams;
use cipherforge::model::build_model;
use cipherforge::{CfResult, Scorer};
use clap::Args;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub model: ModelParams,

    #[command(flatten)]
    pub reference: ReferenceArgs,

    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: ScoreArgs, params: &ModelParams) -> CfResult<()> {
    let stored = args.reference.load(params)?;
    let scorer = Scorer::new(stored.alphabet, stored.matrix)?;

    let text = args.input.read()?;
    let observed = build_model(&scorer.alphabet, &text, scorer.normalization());
    if observed.is_degenerate() {
        warn!("⚠️  Text yields no bigrams; its score is not meaningful");
    }

    println!("Score: {:.6}", scorer.score_model(&observed)?);
    Ok(())
}
