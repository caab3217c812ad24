use crate::consts::{MAX_ALPHABET_LEN, STANDARD_ALPHABET, SYMBOL_NOT_FOUND, WORD_BOUNDARY};
use crate::error::{CfResult, CipherError};

/// Ordered symbol set shared by keys, models and the cipher.
///
/// Symbols are stored upper-cased. Lookups fold ASCII letters to upper case,
/// so `a` and `A` resolve to the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    // byte -> position, SYMBOL_NOT_FOUND for foreign bytes
    index: [u8; 256],
    boundary: Option<u8>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::standard()
    }
}

impl Alphabet {
    /// `A`-`Z` followed by the `_` word-boundary marker.
    pub fn standard() -> Self {
        Self::build(STANDARD_ALPHABET.as_bytes(), Some(WORD_BOUNDARY as u8))
    }

    pub fn new(symbols: &str, boundary: Option<char>) -> CfResult<Self> {
        if !symbols.is_ascii() {
            return Err(CipherError::Config(format!(
                "Alphabet '{}' contains non-ASCII symbols",
                symbols
            )));
        }

        let upper = symbols.to_ascii_uppercase();
        let bytes = upper.as_bytes();

        if bytes.len() < 2 || bytes.len() > MAX_ALPHABET_LEN {
            return Err(CipherError::Config(format!(
                "Alphabet must hold between 2 and {} symbols, got {}",
                MAX_ALPHABET_LEN,
                bytes.len()
            )));
        }

        let mut seen = [false; 256];
        for &b in bytes {
            if b.is_ascii_control() {
                return Err(CipherError::Config(
                    "Alphabet contains a control character".to_string(),
                ));
            }
            if seen[b as usize] {
                return Err(CipherError::Config(format!(
                    "Alphabet repeats symbol '{}'",
                    b as char
                )));
            }
            seen[b as usize] = true;
        }

        let boundary = match boundary {
            Some(c) => {
                let folded = c.to_ascii_uppercase();
                if !folded.is_ascii() || !seen[folded as usize] {
                    return Err(CipherError::Config(format!(
                        "Boundary marker '{}' is not part of the alphabet",
                        c
                    )));
                }
                Some(folded as u8)
            }
            None => None,
        };

        Ok(Self::build(bytes, boundary))
    }

    fn build(symbols: &[u8], boundary: Option<u8>) -> Self {
        let mut index = [SYMBOL_NOT_FOUND; 256];
        for (i, &b) in symbols.iter().enumerate() {
            index[b as usize] = i as u8;
        }
        // Second pass so an explicit lowercase symbol never gets shadowed.
        for (i, &b) in symbols.iter().enumerate() {
            let lower = b.to_ascii_lowercase();
            if lower != b && index[lower as usize] == SYMBOL_NOT_FOUND {
                index[lower as usize] = i as u8;
            }
        }

        Self {
            symbols: symbols.to_vec(),
            index,
            boundary,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Position -> symbol.
    #[inline(always)]
    pub fn symbol(&self, pos: usize) -> char {
        self.symbols[pos] as char
    }

    /// Symbol -> position, ASCII case-insensitive.
    #[inline(always)]
    pub fn position(&self, c: char) -> Option<usize> {
        if !c.is_ascii() {
            return None;
        }
        match self.index[c as usize] {
            SYMBOL_NOT_FOUND => None,
            p => Some(p as usize),
        }
    }

    #[inline(always)]
    pub fn contains(&self, c: char) -> bool {
        self.position(c).is_some()
    }

    pub fn boundary(&self) -> Option<char> {
        self.boundary.map(|b| b as char)
    }

    /// Maps every character of `text` to its position, or `SYMBOL_NOT_FOUND`.
    /// One entry per `char`, so adjacency is preserved.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|c| {
                if c.is_ascii() {
                    self.index[c as usize]
                } else {
                    SYMBOL_NOT_FOUND
                }
            })
            .collect()
    }

    pub fn as_string(&self) -> String {
        self.symbols.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lookup_is_bidirectional() {
        let alphabet = Alphabet::standard();
        assert_eq!(alphabet.len(), 27);
        for pos in 0..alphabet.len() {
            assert_eq!(alphabet.position(alphabet.symbol(pos)), Some(pos));
        }
        assert_eq!(alphabet.position('q'), alphabet.position('Q'));
        assert_eq!(alphabet.position(' '), None);
        assert_eq!(alphabet.position('é'), None);
        assert_eq!(alphabet.boundary(), Some('_'));
    }

    #[test]
    fn test_rejects_bad_alphabets() {
        assert!(Alphabet::new("A", None).is_err());
        assert!(Alphabet::new("ABCA", None).is_err());
        assert!(Alphabet::new("abcA", None).is_err(), "Folding must detect repeats");
        assert!(Alphabet::new("ABC", Some('_')).is_err());
        assert!(Alphabet::new("ABÇ", None).is_err());
    }

    #[test]
    fn test_encode_marks_foreign_symbols() {
        let alphabet = Alphabet::new("ab_", Some('_')).unwrap();
        assert_eq!(alphabet.as_string(), "AB_");
        assert_eq!(alphabet.encode("a b_"), vec![0, SYMBOL_NOT_FOUND, 1, 2]);
    }
}
