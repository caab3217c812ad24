use cipherforge::model::loader::{self, ModelFormat};
use cipherforge::model::{build_model, BigramCounts, Normalization, TransitionMatrix};
use cipherforge::{Alphabet, CipherError};
use rstest::rstest;
use std::fs;
use std::io::Cursor;
use strum::IntoEnumIterator;

mod common;
use common::{alphabet, normalized_corpus};

const TOLERANCE: f64 = 1e-9;

fn assert_probabilities(m: &TransitionMatrix) {
    for &p in m.cells() {
        assert!(p > 0.0 && p <= 1.0, "cell {} outside (0, 1]", p);
    }
}

#[test]
fn test_counts_follow_adjacent_pairs() {
    let a = alphabet();
    let counts = BigramCounts::from_text(&a, "ABAB");
    let (pa, pb) = (a.position('A').unwrap(), a.position('B').unwrap());

    assert_eq!(counts.pairs(), 3);
    assert_eq!(counts.get(pa, pb), 2);
    assert_eq!(counts.get(pb, pa), 1);
    assert_eq!(counts.get(pa, pa), 0);
}

#[test]
fn test_foreign_symbols_break_pairs() {
    let a = alphabet();
    // "A1B": no pair may bridge the foreign '1'.
    let counts = BigramCounts::from_text(&a, "A1B");
    assert_eq!(counts.pairs(), 0);

    let counts = BigramCounts::from_text(&a, "ab");
    assert_eq!(counts.pairs(), 1);
}

#[rstest]
#[case::empty("")]
#[case::single("A")]
#[case::foreign_only("1234")]
fn test_empty_input_is_uniform_floor(#[case] text: &str) {
    for norm in Normalization::iter() {
        let m = build_model(&alphabet(), text, norm);
        assert!(m.is_degenerate());
        assert_probabilities(&m);
        assert!(m.is_normalized(TOLERANCE));

        let first = m.cells()[0];
        assert!(m.cells().iter().all(|&p| (p - first).abs() < 1e-15));
    }
}

#[rstest]
#[case(Normalization::Row)]
#[case(Normalization::Grand)]
fn test_corpus_model_is_normalized(#[case] norm: Normalization) {
    let m = build_model(&alphabet(), &normalized_corpus(), norm);
    assert_eq!(m.normalization(), norm);
    assert!(!m.is_degenerate());
    assert_probabilities(&m);
    assert!(m.is_normalized(TOLERANCE));
}

#[test]
fn test_row_normalization_values() {
    let a = Alphabet::new("AB", None).unwrap();
    // AA:0 AB:2 BA:1 BB:0 -> smoothed 1 2 / 1 1
    let m = build_model(&a, "ABAB", Normalization::Row);
    assert!((m.get(0, 0) - 1.0 / 3.0).abs() < TOLERANCE);
    assert!((m.get(0, 1) - 2.0 / 3.0).abs() < TOLERANCE);
    assert!((m.get(1, 0) - 0.5).abs() < TOLERANCE);
    assert!((m.get(1, 1) - 0.5).abs() < TOLERANCE);
}

#[test]
fn test_grand_normalization_values() {
    let a = Alphabet::new("AB", None).unwrap();
    let m = build_model(&a, "ABAB", Normalization::Grand);
    assert!((m.get(0, 0) - 0.2).abs() < TOLERANCE);
    assert!((m.get(0, 1) - 0.4).abs() < TOLERANCE);
    assert!((m.get(1, 0) - 0.2).abs() < TOLERANCE);
    assert!((m.get(1, 1) - 0.2).abs() < TOLERANCE);
}

#[test]
fn test_smoothing_only_touches_zero_cells() {
    let a = Alphabet::new("AB", None).unwrap();
    // AB observed once: stays 1, exactly like the smoothed zeros.
    let m = build_model(&a, "AB", Normalization::Grand);
    assert!(m.cells().iter().all(|&p| (p - 0.25).abs() < TOLERANCE));
}

#[test]
fn test_common_bigrams_rank_high() {
    let a = alphabet();
    let m = build_model(&a, &normalized_corpus(), Normalization::Grand);
    let top: Vec<String> = m.top_bigrams(&a, 10).into_iter().map(|(b, _)| b).collect();
    assert!(top.contains(&"TH".to_string()), "top bigrams: {:?}", top);
    assert!(top.contains(&"HE".to_string()), "top bigrams: {:?}", top);
}

#[test]
fn test_from_cells_checks_shape() {
    let err = TransitionMatrix::from_cells(3, Normalization::Row, 0, vec![0.5; 8]).unwrap_err();
    assert!(matches!(err, CipherError::Validation(_)));
}

#[rstest]
#[case::zero(0.0)]
#[case::negative(-0.1)]
#[case::nan(f64::NAN)]
#[case::above_one(1.5)]
fn test_validate_rejects_bad_cells(#[case] bad: f64) {
    let mut cells = vec![0.25; 4];
    cells[3] = bad;
    let m = TransitionMatrix::from_cells(2, Normalization::Grand, 4, cells).unwrap();
    assert!(matches!(m.validate(), Err(CipherError::DegenerateModel(_))));
}

#[test]
fn test_normalize_corpus_collapses_whitespace() {
    let a = alphabet();
    let text = "  Hello,   World!\n\nIt's 9 o'clock_now ";
    assert_eq!(
        loader::normalize_corpus(&a, text),
        "HELLO_WORLD_ITS_OCLOCK_NOW"
    );
}

#[test]
fn test_normalize_corpus_without_boundary() {
    let a = Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ", None).unwrap();
    assert_eq!(loader::normalize_corpus(&a, "the cat sat"), "THECATSAT");
}

#[test]
fn test_load_corpus_from_reader() {
    let a = alphabet();
    let text = loader::load_corpus(Cursor::new("a b\tc"), &a).unwrap();
    assert_eq!(text, "A_B_C");
}

#[test]
fn test_load_corpus_files_joins_with_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("one.txt");
    let second = dir.path().join("two.txt");
    let empty = dir.path().join("empty.txt");
    fs::write(&first, "the end").unwrap();
    fs::write(&second, "new start").unwrap();
    fs::write(&empty, "1234").unwrap();

    let corpus = loader::load_corpus_files(&[&first, &empty, &second], &alphabet()).unwrap();
    assert_eq!(corpus, "THE_END_NEW_START");
}

#[test]
fn test_load_corpus_files_missing_file() {
    let err = loader::load_corpus_files(&["does/not/exist.txt"], &alphabet()).unwrap_err();
    assert!(matches!(err, CipherError::Io(_)));
}

#[test]
fn test_json_model_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("english.json");
    let a = alphabet();
    let m = build_model(&a, &normalized_corpus(), Normalization::Row);

    loader::save_model(&path, &a, &m).unwrap();
    let stored = loader::load_model(&path).unwrap();

    assert_eq!(stored.alphabet, a);
    assert_eq!(stored.matrix.size(), m.size());
    assert_eq!(stored.matrix.pairs(), m.pairs());
    assert_eq!(stored.matrix.normalization(), Normalization::Row);
    for (x, y) in stored.matrix.cells().iter().zip(m.cells()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn test_json_model_with_wrong_sums_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    let a = Alphabet::new("AB", None).unwrap();
    let m = TransitionMatrix::from_cells(2, Normalization::Row, 1, vec![0.5, 0.4, 0.5, 0.5])
        .unwrap();

    loader::save_model(&path, &a, &m).unwrap();
    let err = loader::load_model(&path).unwrap_err();
    assert!(matches!(err, CipherError::Validation(_)));
}

#[test]
fn test_json_model_with_zero_cell_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero.json");
    let a = Alphabet::new("AB", None).unwrap();
    let m = TransitionMatrix::from_cells(2, Normalization::Row, 1, vec![1.0, 0.0, 0.5, 0.5])
        .unwrap();

    loader::save_model(&path, &a, &m).unwrap();
    let err = loader::load_model(&path).unwrap_err();
    assert!(matches!(err, CipherError::DegenerateModel(_)));
}

#[test]
fn test_csv_counts_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counts.csv");
    let a = alphabet();
    let counts = BigramCounts::from_text(&a, &normalized_corpus());

    loader::save_counts(&path, &a, &counts).unwrap();
    let restored = loader::load_counts(&path, &a).unwrap();
    assert_eq!(restored, counts);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("From,To,Count"));
}

#[test]
fn test_csv_skips_unparsable_counts() {
    let a = alphabet();
    let data = "From,To,Count\nT,H,10\nH,E,lots\nE,_\nE,_,4\n";
    let counts = loader::read_counts(Cursor::new(data), &a).unwrap();

    let p = |c| a.position(c).unwrap();
    assert_eq!(counts.get(p('T'), p('H')), 10);
    assert_eq!(counts.get(p('H'), p('E')), 0);
    assert_eq!(counts.get(p('E'), p('_')), 4);
    assert_eq!(counts.pairs(), 14);
}

#[test]
fn test_csv_count_overflow_rejected() {
    let a = alphabet();
    let data = format!("From,To,Count\nT,H,{}\nH,E,1\n", u64::MAX);
    let err = loader::read_counts(Cursor::new(data), &a).unwrap_err();
    assert!(matches!(err, CipherError::Validation(_)));

    let data = format!("From,To,Count\nT,H,{}\nT,H,1\n", u64::MAX - 1);
    assert!(matches!(
        loader::read_counts(Cursor::new(data), &a),
        Err(CipherError::Validation(_))
    ));
}

#[test]
fn test_add_leaves_counts_untouched_on_overflow() {
    let mut counts = BigramCounts::new(2);
    counts.add(0, 1, u64::MAX).unwrap();
    assert!(counts.add(1, 0, 1).is_err());
    assert_eq!(counts.get(1, 0), 0);
    assert_eq!(counts.pairs(), u64::MAX);
    assert!(!counts.normalize(Normalization::Row).is_degenerate());
}

#[test]
fn test_csv_unknown_symbol_rejected() {
    let a = alphabet();
    let data = "From,To,Count\nT,#,10\n";
    let err = loader::read_counts(Cursor::new(data), &a).unwrap_err();
    assert!(matches!(err, CipherError::Validation(_)));
}

#[test]
fn test_load_reference_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let a = alphabet();
    let counts = BigramCounts::from_text(&a, &normalized_corpus());

    let csv_path = dir.path().join("ref.csv");
    loader::save_counts(&csv_path, &a, &counts).unwrap();
    let from_csv = loader::load_reference(&csv_path, &a, Normalization::Grand).unwrap();
    assert_eq!(from_csv.matrix, counts.normalize(Normalization::Grand));

    // JSON keeps its own normalization regardless of the requested one.
    let json_path = dir.path().join("ref.json");
    loader::save_model(&json_path, &a, &counts.normalize(Normalization::Row)).unwrap();
    let from_json = loader::load_reference(&json_path, &a, Normalization::Grand).unwrap();
    assert_eq!(from_json.matrix.normalization(), Normalization::Row);

    let err = loader::load_reference(dir.path().join("ref.txt"), &a, Normalization::Row);
    assert!(matches!(err, Err(CipherError::Config(_))));
}

#[rstest]
#[case("model.json", Some(ModelFormat::Json))]
#[case("MODEL.CSV", Some(ModelFormat::Csv))]
#[case("model", None)]
#[case("model.tsv", None)]
fn test_model_format_from_path(#[case] path: &str, #[case] expected: Option<ModelFormat>) {
    assert_eq!(ModelFormat::from_path(path).ok(), expected);
}
