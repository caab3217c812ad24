use crate::alphabet::Alphabet;
use crate::consts::{
    DEFAULT_ITERATIONS, DEFAULT_P_ACCEPT, DEFAULT_REPORT_INTERVAL, DEFAULT_TEMPERATURE,
    STANDARD_ALPHABET, WORD_BOUNDARY,
};
use crate::error::{CfResult, CipherError};
use crate::model::Normalization;
use crate::optimizer::{Acceptance, AcceptanceRule};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub model: ModelParams,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Iterations per chain.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,
    /// Probability of accepting a proposal that does not improve the score.
    #[arg(long, default_value_t = DEFAULT_P_ACCEPT)]
    pub p_accept: f64,
    #[arg(long, value_enum, default_value_t = AcceptanceRule::Fixed)]
    pub acceptance: AcceptanceRule,
    /// Temperature of the metropolis rule.
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,
    /// Independent chains run in parallel.
    #[arg(long, default_value_t = 1)]
    pub chains: usize,
    /// Iterations between progress reports.
    #[arg(long, default_value_t = DEFAULT_REPORT_INTERVAL)]
    pub report_interval: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            p_accept: DEFAULT_P_ACCEPT,
            acceptance: AcceptanceRule::Fixed,
            temperature: DEFAULT_TEMPERATURE,
            chains: 1,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    #[arg(long, default_value = STANDARD_ALPHABET)]
    pub alphabet: String,
    /// Word-boundary marker; ignored when the alphabet does not contain it.
    #[arg(long, default_value_t = WORD_BOUNDARY)]
    pub boundary: char,
    #[arg(long, value_enum, default_value_t = Normalization::Row)]
    pub normalization: Normalization,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            alphabet: STANDARD_ALPHABET.to_string(),
            boundary: WORD_BOUNDARY,
            normalization: Normalization::Row,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies every value the user typed on the command line over `self`.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        self.search.merge_from_cli(&cli.search, matches);
        self.model.merge_from_cli(&cli.model, matches);
    }

    pub fn validate(&self) -> CfResult<()> {
        self.search.validate()?;
        self.model.alphabet()?;
        Ok(())
    }
}

macro_rules! update_if_present {
    ($target:ident, $cli:ident, $matches:ident, $($field:ident),+) => {
        $(
            if $matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                $target.$field = $cli.$field.clone();
            }
        )+
    };
}

impl SearchParams {
    pub fn merge_from_cli(&mut self, cli: &SearchParams, matches: &ArgMatches) {
        update_if_present!(
            self,
            cli,
            matches,
            iterations,
            p_accept,
            acceptance,
            temperature,
            chains,
            report_interval
        );
    }

    pub fn acceptance(&self) -> Acceptance {
        Acceptance {
            rule: self.acceptance,
            p_accept: self.p_accept,
            temperature: self.temperature,
        }
    }

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
        self.acceptance().validate()
    }
}

impl ModelParams {
    pub fn merge_from_cli(&mut self, cli: &ModelParams, matches: &ArgMatches) {
        update_if_present!(self, cli, matches, alphabet, boundary, normalization);
    }

    pub fn alphabet(&self) -> CfResult<Alphabet> {
        let folded = self.boundary.to_ascii_uppercase();
        let boundary = if self.alphabet.to_ascii_uppercase().contains(folded) {
            Some(self.boundary)
        } else {
            debug!(
                "Boundary '{}' not in alphabet '{}'; running without one",
                self.boundary, self.alphabet
            );
            None
        };
        Alphabet::new(&self.alphabet, boundary)
    }
}
