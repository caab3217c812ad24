use crate::alphabet::Alphabet;
use crate::error::{CfResult, CipherError};
use crate::key::Key;

/// Encrypts `text` with a key given as a string.
///
/// The key is validated before any character is processed.
pub fn encrypt(alphabet: &Alphabet, text: &str, key: &str) -> CfResult<String> {
    let key = Key::parse(alphabet, key)?;
    encrypt_with(alphabet, text, &key)
}

/// Decrypts `text` with a key given as a string.
pub fn decrypt(alphabet: &Alphabet, text: &str, key: &str) -> CfResult<String> {
    let key = Key::parse(alphabet, key)?;
    decrypt_with(alphabet, text, &key)
}

pub fn encrypt_with(alphabet: &Alphabet, text: &str, key: &Key) -> CfResult<String> {
    check_key(alphabet, key)?;
    let perm = key.positions();

    Ok(text
        .to_uppercase()
        .chars()
        .map(|c| match alphabet.position(c) {
            Some(p) => alphabet.symbol(perm[p] as usize),
            None => c,
        })
        .collect())
}

pub fn decrypt_with(alphabet: &Alphabet, text: &str, key: &Key) -> CfResult<String> {
    check_key(alphabet, key)?;
    let mut inverse = [0u8; 256];
    key.inverse_into(&mut inverse);

    Ok(text
        .to_uppercase()
        .chars()
        .map(|c| match alphabet.position(c) {
            Some(q) => alphabet.symbol(inverse[q] as usize),
            None => c,
        })
        .collect())
}

/// Hot-path decryption over pre-encoded symbol positions.
///
/// `inverse` comes from [`Key::inverse_into`]; foreign symbols stay foreign.
#[inline(always)]
pub fn decode_positions(cipher: &[u8], inverse: &[u8; 256], out: &mut Vec<u8>) {
    out.clear();
    out.extend(cipher.iter().map(|&q| inverse[q as usize]));
}

fn check_key(alphabet: &Alphabet, key: &Key) -> CfResult<()> {
    if key.len() != alphabet.len() {
        return Err(CipherError::InvalidKey(format!(
            "Key has {} symbols but the alphabet has {}",
            key.len(),
            alphabet.len()
        )));
    }
    Ok(())
}
