use crate::alphabet::Alphabet;
use crate::consts::SYMBOL_NOT_FOUND;
use crate::error::{CfResult, CipherError};
use fastrand::Rng;

/// A validated substitution key.
///
/// `positions()[p]` is the alphabet position of the symbol that plaintext
/// position `p` encrypts to. A `Key` is never mutated in place; proposals are
/// derived with [`Key::swapped`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    perm: Vec<u8>,
}

impl Key {
    /// Parses a key string such as `"QWERTYUIOPASDFGHJKLZXCVBNM_"`.
    pub fn parse(alphabet: &Alphabet, key: &str) -> CfResult<Self> {
        let n = alphabet.len();
        let len = key.chars().count();
        if len != n {
            return Err(CipherError::InvalidKey(format!(
                "Expected {} symbols, got {}",
                n, len
            )));
        }

        let mut perm = Vec::with_capacity(n);
        for c in key.chars() {
            match alphabet.position(c) {
                Some(p) => perm.push(p as u8),
                None => {
                    return Err(CipherError::InvalidKey(format!(
                        "Symbol '{}' is not part of the alphabet",
                        c
                    )))
                }
            }
        }

        Self::from_positions(n, perm)
    }

    pub fn from_positions(alphabet_len: usize, perm: Vec<u8>) -> CfResult<Self> {
        if perm.len() != alphabet_len {
            return Err(CipherError::InvalidKey(format!(
                "Expected {} symbols, got {}",
                alphabet_len,
                perm.len()
            )));
        }

        let mut seen = vec![false; alphabet_len];
        for &p in &perm {
            let p = p as usize;
            if p >= alphabet_len {
                return Err(CipherError::InvalidKey(format!(
                    "Position {} is outside the alphabet",
                    p
                )));
            }
            if seen[p] {
                return Err(CipherError::InvalidKey(format!(
                    "Symbol at position {} appears more than once",
                    p
                )));
            }
            seen[p] = true;
        }

        Ok(Self { perm })
    }

    pub fn identity(alphabet: &Alphabet) -> Self {
        Self {
            perm: (0..alphabet.len()).map(|p| p as u8).collect(),
        }
    }

    /// Uniformly random permutation drawn from `rng`.
    pub fn random(alphabet: &Alphabet, rng: &mut Rng) -> Self {
        let mut key = Self::identity(alphabet);
        rng.shuffle(&mut key.perm);
        key
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    pub fn positions(&self) -> &[u8] {
        &self.perm
    }

    /// Copy of this key with positions `a` and `b` exchanged.
    pub fn swapped(&self, a: usize, b: usize) -> Self {
        let mut perm = self.perm.clone();
        perm.swap(a, b);
        Self { perm }
    }

    /// Fills `out` so that `out[symbol] == p` where `positions()[p] == symbol`.
    /// Out-of-alphabet entries (index `SYMBOL_NOT_FOUND`) map to themselves.
    #[inline(always)]
    pub fn inverse_into(&self, out: &mut [u8; 256]) {
        out.fill(SYMBOL_NOT_FOUND);
        for (p, &s) in self.perm.iter().enumerate() {
            out[s as usize] = p as u8;
        }
    }

    pub fn render(&self, alphabet: &Alphabet) -> String {
        self.perm
            .iter()
            .map(|&p| alphabet.symbol(p as usize))
            .collect()
    }
}
