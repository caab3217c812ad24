/// The standard 27-symbol alphabet: A-Z plus the word-boundary marker.
pub const STANDARD_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ_";

/// Word-boundary marker of the standard alphabet.
pub const WORD_BOUNDARY: char = '_';

/// Value used in the 256-entry lookup tables for "not an alphabet symbol".
/// This limits an alphabet to 254 symbols.
pub const SYMBOL_NOT_FOUND: u8 = 255;

/// Largest alphabet the lookup tables can address.
pub const MAX_ALPHABET_LEN: usize = 254;

/// Default iteration budget of a single chain.
pub const DEFAULT_ITERATIONS: usize = 10_000;

/// Default probability of accepting a proposal that does not improve the score.
pub const DEFAULT_P_ACCEPT: f64 = 0.01;

/// Default temperature of the log-domain Metropolis rule.
pub const DEFAULT_TEMPERATURE: f64 = 0.01;

/// Default number of iterations between progress reports.
pub const DEFAULT_REPORT_INTERVAL: usize = 1_000;

/// Tolerance used when checking that a model's probabilities sum to one.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;
