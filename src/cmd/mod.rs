pub mod cipher;
pub mod crack;
pub mod model;
pub mod score;

use cipherforge::config::ModelParams;
use cipherforge::model::loader::{self, StoredModel};
use cipherforge::model::build_model;
use cipherforge::{CfResult, CipherError};
use clap::Args;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;

/// Text to process: inline, from a file, or from stdin.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> CfResult<String> {
        let raw = match (&self.text, &self.input) {
            (Some(t), _) => t.clone(),
            (None, Some(path)) => fs::read_to_string(path)?,
            (None, None) => {
                let mut buf = String::new();
                io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };
        Ok(raw.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Where the reference model comes from.
#[derive(Args, Debug, Clone)]
pub struct ReferenceArgs {
    /// Saved model (.json) or bigram count table (.csv).
    #[arg(short, long, conflicts_with = "corpus")]
    pub model: Option<PathBuf>,

    /// Corpus files to build the model from on the fly.
    #[arg(long, num_args = 1..)]
    pub corpus: Vec<PathBuf>,
}

impl ReferenceArgs {
    pub fn load(&self, params: &ModelParams) -> CfResult<StoredModel> {
        let alphabet = params.alphabet()?;

        if let Some(path) = &self.model {
            info!("📂 Loading Model: {}", path.display());
            return loader::load_reference(path, &alphabet, params.normalization);
        }

        if self.corpus.is_empty() {
            return Err(CipherError::Config(
                "A reference is required: pass --model or --corpus".to_string(),
            ));
        }

        let corpus = loader::load_corpus_files(&self.corpus, &alphabet)?;
        let matrix = build_model(&alphabet, &corpus, params.normalization);
        Ok(StoredModel { alphabet, matrix })
    }
}
