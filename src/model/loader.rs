use super::{BigramCounts, Normalization, TransitionMatrix};
use crate::alphabet::Alphabet;
use crate::error::{CfResult, CipherError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use strum_macros::{Display, EnumString};
use tracing::{debug, info, warn};

/// Tolerance when re-checking sums of a model read back from disk.
const LOAD_TOLERANCE: f64 = 1e-6;

/// On-disk representation of a reference model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, ValueEnum)]
#[strum(serialize_all = "snake_case")]
pub enum ModelFormat {
    /// Finished model: alphabet, normalization and probabilities.
    Json,
    /// Long-format bigram count table (`From,To,Count`).
    Csv,
}

impl ModelFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(CipherError::Config(format!(
                "Cannot infer model format of '{}' (expected .json or .csv)",
                path.display()
            ))),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ModelFile {
    alphabet: String,
    boundary: Option<char>,
    matrix: TransitionMatrix,
}

/// A reference model together with the alphabet it is indexed by.
#[derive(Debug, Clone)]
pub struct StoredModel {
    pub alphabet: Alphabet,
    pub matrix: TransitionMatrix,
}

/// Reduces free text to the alphabet.
///
/// Letters are upper-cased, whitespace runs (and literal boundary markers)
/// collapse into one boundary marker, everything else is dropped. Without a
/// boundary marker whitespace is dropped as well.
pub fn normalize_corpus(alphabet: &Alphabet, text: &str) -> String {
    let boundary = alphabet.boundary();
    let mut out = String::with_capacity(text.len());
    let mut pending_break = false;

    for c in text.to_uppercase().chars() {
        if c.is_whitespace() || Some(c) == boundary {
            pending_break = true;
            continue;
        }
        if !alphabet.contains(c) {
            continue;
        }
        if pending_break && !out.is_empty() {
            if let Some(b) = boundary {
                out.push(b);
            }
        }
        pending_break = false;
        out.push(c);
    }

    out
}

pub fn load_corpus<R: Read>(mut reader: R, alphabet: &Alphabet) -> CfResult<String> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    Ok(normalize_corpus(alphabet, &raw))
}

/// Loads and normalizes several corpus files, joined by the boundary marker.
pub fn load_corpus_files<P: AsRef<Path>>(paths: &[P], alphabet: &Alphabet) -> CfResult<String> {
    let mut corpus = String::new();

    for path in paths {
        let path = path.as_ref();
        debug!("Reading corpus: {}", path.display());
        let text = load_corpus(File::open(path)?, alphabet)?;
        if text.is_empty() {
            warn!("Corpus '{}' holds no alphabet symbols", path.display());
            continue;
        }
        if !corpus.is_empty() {
            if let Some(b) = alphabet.boundary() {
                corpus.push(b);
            }
        }
        corpus.push_str(&text);
    }

    info!(
        "Loaded corpus: {} symbols from {} file(s)",
        corpus.len(),
        paths.len()
    );
    Ok(corpus)
}

pub fn save_model<P: AsRef<Path>>(
    path: P,
    alphabet: &Alphabet,
    matrix: &TransitionMatrix,
) -> CfResult<()> {
    let file = ModelFile {
        alphabet: alphabet.as_string(),
        boundary: alphabet.boundary(),
        matrix: matrix.clone(),
    };
    fs::write(path, serde_json::to_string_pretty(&file)?)?;
    Ok(())
}

pub fn load_model<P: AsRef<Path>>(path: P) -> CfResult<StoredModel> {
    let content = fs::read_to_string(path)?;
    let file: ModelFile = serde_json::from_str(&content)?;
    let alphabet = Alphabet::new(&file.alphabet, file.boundary)?;
    let matrix = file.matrix;

    if matrix.size() != alphabet.len() || matrix.cells().len() != alphabet.len().pow(2) {
        return Err(CipherError::Validation(format!(
            "Model is {}x{} but its alphabet has {} symbols",
            matrix.size(),
            matrix.size(),
            alphabet.len()
        )));
    }
    matrix.validate()?;
    if !matrix.is_normalized(LOAD_TOLERANCE) {
        return Err(CipherError::Validation(format!(
            "Model cells do not satisfy '{}' normalization",
            matrix.normalization()
        )));
    }
    if matrix.is_degenerate() {
        warn!("Loaded model was built from no bigrams; scores against it are meaningless");
    }

    Ok(StoredModel { alphabet, matrix })
}

pub fn write_counts<W: Write>(
    writer: W,
    alphabet: &Alphabet,
    counts: &BigramCounts,
) -> CfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["From", "To", "Count"])?;

    let n = counts.size();
    for i in 0..n {
        for j in 0..n {
            let c = counts.get(i, j);
            if c > 0 {
                wtr.write_record([
                    alphabet.symbol(i).to_string(),
                    alphabet.symbol(j).to_string(),
                    c.to_string(),
                ])?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_counts<R: Read>(reader: R, alphabet: &Alphabet) -> CfResult<BigramCounts> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let mut counts = BigramCounts::new(alphabet.len());
    let mut skipped = 0;

    for rec in rdr.records() {
        let rec = rec?;
        if rec.len() < 3 {
            skipped += 1;
            continue;
        }

        let from = single_symbol(alphabet, &rec[0])?;
        let to = single_symbol(alphabet, &rec[1])?;
        match rec[2].trim().parse::<u64>() {
            Ok(c) => counts.add(from, to, c)?,
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} invalid rows in count table", skipped);
    }
    Ok(counts)
}

pub fn save_counts<P: AsRef<Path>>(
    path: P,
    alphabet: &Alphabet,
    counts: &BigramCounts,
) -> CfResult<()> {
    write_counts(File::create(path)?, alphabet, counts)
}

pub fn load_counts<P: AsRef<Path>>(path: P, alphabet: &Alphabet) -> CfResult<BigramCounts> {
    read_counts(File::open(path)?, alphabet)
}

/// Loads a reference model in either format.
///
/// A JSON model carries its own alphabet and normalization; a CSV count
/// table is indexed by `alphabet` and normalized with `normalization`.
pub fn load_reference<P: AsRef<Path>>(
    path: P,
    alphabet: &Alphabet,
    normalization: Normalization,
) -> CfResult<StoredModel> {
    let path = path.as_ref();
    match ModelFormat::from_path(path)? {
        ModelFormat::Json => {
            let stored = load_model(path)?;
            if stored.alphabet != *alphabet {
                warn!(
                    "Model alphabet '{}' overrides configured '{}'",
                    stored.alphabet.as_string(),
                    alphabet.as_string()
                );
            }
            if stored.matrix.normalization() != normalization {
                warn!(
                    "Model uses '{}' normalization, ignoring configured '{}'",
                    stored.matrix.normalization(),
                    normalization
                );
            }
            Ok(stored)
        }
        ModelFormat::Csv => {
            let counts = load_counts(path, alphabet)?;
            Ok(StoredModel {
                alphabet: alphabet.clone(),
                matrix: counts.normalize(normalization),
            })
        }
    }
}

fn single_symbol(alphabet: &Alphabet, field: &str) -> CfResult<usize> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => alphabet.position(c).ok_or_else(|| {
            CipherError::Validation(format!("Symbol '{}' is not part of the alphabet", c))
        }),
        _ => Err(CipherError::Validation(format!(
            "Expected a single symbol, got '{}'",
            field
        ))),
    }
}
