//! Quick timing of identical-value comparisons across value shapes.

use std::time::{Duration, Instant};

use mem_comparable::{Comparator, Transparent};
use mem_comparable_bench::fixtures::{
    closure_over, closure_over_changed, nested_vec, records, scalar_vec,
};

fn time_compare<T: Transparent>(
    comparator: &Comparator,
    a: &T,
    b: &T,
) -> anyhow::Result<(Duration, usize)> {
    let start = Instant::now();
    let comparison = comparator.compare(a, b)?;
    let elapsed = start.elapsed();
    anyhow::ensure!(comparison.identical, "fixtures should compare identical");
    Ok((elapsed, comparison.steps))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env().init();

    let comparator = Comparator::default();
    println!("=== Identical comparisons ===\n");

    for n in [10, 100, 1000, 10_000] {
        println!("--- {} elements ---", n);

        let (time, steps) = time_compare(&comparator, &scalar_vec(n), &scalar_vec(n))?;
        println!("Scalar vec:  {:?} ({} steps)", time, steps);

        let (time, steps) = time_compare(&comparator, &nested_vec(n), &nested_vec(n))?;
        println!("Nested vec:  {:?} ({} steps)", time, steps);

        let (time, steps) = time_compare(&comparator, &records(n), &records(n))?;
        println!("Records:     {:?} ({} steps)", time, steps);

        let (time, steps) = time_compare(&comparator, &closure_over(n), &closure_over(n))?;
        println!("Closure:     {:?} ({} steps)\n", time, steps);
    }

    println!("=== Change detection (last weight changed, 10000 elements) ===\n");
    let a = closure_over(10_000);
    let b = closure_over_changed(10_000);
    let start = Instant::now();
    let comparison = comparator.compare(&a, &b)?;
    log::info!("change found after {} steps", comparison.steps);
    println!(
        "Updated: {} in {:?} ({} steps)",
        comparison.is_updated(),
        start.elapsed(),
        comparison.steps
    );
    Ok(())
}
