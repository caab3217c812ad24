use cipherforge::optimizer::OptimizationResult;
use cipherforge::{Alphabet, TransitionMatrix};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Plain symbol above cipher symbol, one column per alphabet position.
pub fn print_key_grid(alphabet: &Alphabet, key: &str) {
    println!("\nKey:");
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let cols = 14;
    let plain: Vec<char> = alphabet.as_string().chars().collect();
    let cipher: Vec<char> = key.chars().collect();

    for (p_chunk, c_chunk) in plain.chunks(cols).zip(cipher.chunks(cols)) {
        let center = |c: &char| Cell::new(c).set_alignment(CellAlignment::Center);
        table.add_row(p_chunk.iter().map(|c| center(c).add_attribute(Attribute::Bold)));
        table.add_row(c_chunk.iter().map(|c| center(c).fg(Color::Cyan)));
    }
    println!("{}", table);
}

pub fn print_model_summary(alphabet: &Alphabet, matrix: &TransitionMatrix, top: usize) {
    println!(
        "\nModel: {} symbols | {} bigrams | {} normalization",
        matrix.size(),
        matrix.pairs(),
        matrix.normalization()
    );
    if top == 0 {
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Rank"),
        Cell::new("Bigram").add_attribute(Attribute::Bold),
        Cell::new("P").fg(Color::Cyan),
        Cell::new("ln P"),
    ]);
    for i in [0, 2, 3] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (rank, (bigram, p)) in matrix.top_bigrams(alphabet, top).into_iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(bigram).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.5}", p)).fg(Color::Cyan),
            Cell::new(format!("{:.3}", p.ln())),
        ]);
    }
    println!("{}", table);
}

pub fn print_crack_report(alphabet: &Alphabet, result: &OptimizationResult) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Chain").add_attribute(Attribute::Bold),
        Cell::new("Seed"),
        Cell::new("Start"),
        Cell::new("Best").fg(Color::Cyan),
        Cell::new("Gain"),
        Cell::new("Improved").fg(Color::Green),
        Cell::new("Worse"),
        Cell::new("Rejected").fg(Color::Red),
    ]);
    for i in 1..=7 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for c in &result.chains {
        let label = if c.chain == result.best_chain {
            Cell::new(format!("#{}", c.chain))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(format!("#{}", c.chain)).add_attribute(Attribute::Bold)
        };
        let seed = c.seed.map_or_else(|| "-".to_string(), |s| s.to_string());

        table.add_row(vec![
            label,
            Cell::new(seed),
            Cell::new(format!("{:.4}", c.start_score)),
            Cell::new(format!("{:.4}", c.best_score)).fg(Color::Cyan),
            Cell::new(format!("{:+.4}", c.best_score - c.start_score)),
            Cell::new(c.stats.improved).fg(Color::Green),
            Cell::new(c.stats.accepted_worse),
            Cell::new(c.stats.rejected).fg(Color::Red),
        ]);
    }
    println!("\n{}", table);

    print_key_grid(alphabet, &result.key);

    println!(
        "\n🏆 Best Score: {:.6} (chain #{}, {} iterations, {} ms)",
        result.score, result.best_chain, result.iterations, result.elapsed_ms
    );
    println!("Key:       {}", result.key);
    println!("Plaintext: {}", result.plaintext);
}
