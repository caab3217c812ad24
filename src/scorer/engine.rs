use crate::model::{BigramCounts, Normalization, TransitionMatrix};

/// Fast Path: used by the search chains.
///
/// Smooths and normalizes `counts` on the fly and sums against the cached
/// log table, without allocating. Produces the same value as normalizing
/// first and calling [`score_matrix`].
#[inline(always)]
pub fn score_counts(
    log_table: &[f64],
    counts: &BigramCounts,
    normalization: Normalization,
) -> f64 {
    let n = counts.size();
    let cells = counts.cells();
    let mut score = 0.0;

    match normalization {
        Normalization::Row => {
            for i in 0..n {
                let row = &cells[i * n..(i + 1) * n];
                let sum: f64 = row.iter().map(|&c| c.max(1) as f64).sum();
                let logs = &log_table[i * n..(i + 1) * n];
                for j in 0..n {
                    score += logs[j] * (row[j].max(1) as f64 / sum);
                }
            }
        }
        Normalization::Grand => {
            let total: f64 = cells.iter().map(|&c| c.max(1) as f64).sum();
            for (&l, &c) in log_table.iter().zip(cells) {
                score += l * (c.max(1) as f64 / total);
            }
        }
    }

    score
}

/// Detailed Path: scores an already normalized observed model.
pub fn score_matrix(log_table: &[f64], observed: &TransitionMatrix) -> f64 {
    log_table
        .iter()
        .zip(observed.cells())
        .map(|(&l, &p)| l * p)
        .sum()
}
