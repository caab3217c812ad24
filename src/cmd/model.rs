use crate::reports;
use cipherforge::config::ModelParams;
use cipherforge::model::loader::{self, ModelFormat};
use cipherforge::model::BigramCounts;
use cipherforge::CfResult;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    #[command(flatten)]
    pub model: ModelParams,

    /// Corpus files, normalized and concatenated.
    #[arg(long, num_args = 1.., required = true)]
    pub corpus: Vec<PathBuf>,

    /// Destination; `.json` stores the model, `.csv` the raw counts.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Rows in the summary table.
    #[arg(long, default_value_t = 15)]
    pub top: usize,
}

pub fn run(args: ModelArgs, params: &ModelParams) -> CfResult<()> {
    let alphabet = params.alphabet()?;
    let format = ModelFormat::from_path(&args.output)?;

    let corpus = loader::load_corpus_files(&args.corpus, &alphabet)?;
    let counts = BigramCounts::from_text(&alphabet, &corpus);
    let matrix = counts.normalize(params.normalization);

    if matrix.is_degenerate() {
        warn!("⚠️  Corpus produced no bigrams; the model is the smoothing floor only");
    }

    match format {
        ModelFormat::Json => loader::save_model(&args.output, &alphabet, &matrix)?,
        ModelFormat::Csv => loader::save_counts(&args.output, &alphabet, &counts)?,
    }
    info!(
        "💾 Saved {} model ({} bigrams) to {}",
        format,
        counts.pairs(),
        args.output.display()
    );

    reports::print_model_summary(&alphabet, &matrix, args.top);
    Ok(())
}
