use cipherforge::config::Config;
use cipherforge::{CfResult, CipherError};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with `search` and `model` sections; explicit flags win.
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt text with a substitution key.
    Encrypt(cmd::cipher::CipherArgs),
    /// Decrypt text with a substitution key.
    Decrypt(cmd::cipher::CipherArgs),
    /// Build a reference bigram model from a corpus.
    Model(cmd::model::ModelArgs),
    /// Score the plausibility of a text against a reference model.
    Score(cmd::score::ScoreArgs),
    /// Recover the key of a ciphertext.
    Crack(cmd::crack::CrackArgs),
}

fn main() {
    // 1. Parse raw matches (to distinguish user input from defaults)
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute(cli, &matches) {
        error!("❌ {}", e);
        process::exit(1);
    }
}

fn execute(cli: Cli, matches: &ArgMatches) -> CfResult<()> {
    // 2. File config is the base layer
    let mut config = match &cli.config {
        Some(path) => {
            info!("📂 Loading Config: {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };

    // 3. Subcommand flags live in the subcommand's matches, not the root
    let sub = matches
        .subcommand()
        .map(|(_, sub)| sub)
        .ok_or_else(|| CipherError::Config("No command given".to_string()))?;

    match cli.command {
        Commands::Encrypt(args) => {
            config.model.merge_from_cli(&args.model, sub);
            config.validate()?;
            cmd::cipher::run_encrypt(args, &config.model)
        }
        Commands::Decrypt(args) => {
            config.model.merge_from_cli(&args.model, sub);
            config.validate()?;
            cmd::cipher::run_decrypt(args, &config.model)
        }
        Commands::Model(args) => {
            config.model.merge_from_cli(&args.model, sub);
            config.validate()?;
            cmd::model::run(args, &config.model)
        }
        Commands::Score(args) => {
            config.model.merge_from_cli(&args.model, sub);
            config.validate()?;
            cmd::score::run(args, &config.model)
        }
        Commands::Crack(args) => {
            config.search.merge_from_cli(&args.search, sub);
            config.model.merge_from_cli(&args.model, sub);
            config.validate()?;
            cmd::crack::run(args, &config.search, &config.model)
        }
    }
}
