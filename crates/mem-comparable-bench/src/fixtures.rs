//! Fixture builders, each producing values of a growing size `n`.

use mem_comparable::{Fun, closure_from_fp};

/// A flat record of scalars plus a label.
#[derive(Clone, Debug)]
pub struct Record {
    pub id: u64,
    pub score: f64,
    pub label: String,
}

mem_comparable::expose_members!(Record { id, score, label });

/// `n` scalars, compared in one bulk leaf.
pub fn scalar_vec(n: usize) -> Vec<u64> {
    (0..n as u64).collect()
}

/// `n` rows of eight scalars, compared row by row.
pub fn nested_vec(n: usize) -> Vec<Vec<u32>> {
    (0..n as u32)
        .map(|row| (0..8).map(|col| row * 8 + col).collect())
        .collect()
}

/// `n` member-exposing records.
pub fn records(n: usize) -> Vec<Record> {
    (0..n as u64)
        .map(|id| Record {
            id,
            score: id as f64 * 0.5,
            label: format!("record-{id}"),
        })
        .collect()
}

fn total_score(records: Vec<Record>, weights: Vec<u64>, bias: u64) -> u64 {
    let scores: f64 = records.iter().map(|record| record.score).sum();
    scores as u64 + weights.iter().sum::<u64>() + bias
}

type TotalScore = fn(Vec<Record>, Vec<u64>, u64) -> u64;

/// A callable closing over `n` records and `n` weights.
pub fn closure_over(n: usize) -> Fun<(u64,), u64> {
    closure_from_fp(total_score as TotalScore)
        .bind(records(n))
        .bind(scalar_vec(n))
        .into_fun()
}

/// Same as [`closure_over`] but with the last weight changed.
pub fn closure_over_changed(n: usize) -> Fun<(u64,), u64> {
    let mut weights = scalar_vec(n);
    if let Some(last) = weights.last_mut() {
        *last += 1;
    }
    closure_from_fp(total_score as TotalScore)
        .bind(records(n))
        .bind(weights)
        .into_fun()
}
