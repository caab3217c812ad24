use super::InputArgs;
use cipherforge::cipher;
use cipherforge::config::ModelParams;
use cipherforge::CfResult;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct CipherArgs {
    #[command(flatten)]
    pub model: ModelParams,

    #[command(flatten)]
    pub input: InputArgs,

    /// Permutation of the alphabet, e.g. "QWERTYUIOPASDFGHJKLZXCVBNM_".
    #[arg(short, long)]
    pub key: String,
}

pub fn run_encrypt(args: CipherArgs, params: &ModelParams) -> CfResult<()> {
    let alphabet = params.alphabet()?;
    let text = args.input.read()?;
    println!("{}", cipher::encrypt(&alphabet, &text, &args.key)?);
    Ok(())
}

pub fn run_decrypt(args: CipherArgs, params: &ModelParams) -> CfResult<()> {
    let alphabet = params.alphabet()?;
    let text = args.input.read()?;
    println!("{}", cipher::decrypt(&alphabet, &text, &args.key)?);
    Ok(())
}
