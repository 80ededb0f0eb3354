//! The declarative benchmark-definition macros.

use std::time::Duration;

use tachymeter::{bench, benchmark, Executor};

benchmark!(sum_reversed,
    setup: || (0..512u64).rev().collect::<Vec<u64>>(),
    core: |v: &mut Vec<u64>| v.iter().sum::<u64>(),
    teardown: |_| (),
);

#[test]
fn named_benchmark_runs() {
    let results = Executor::new()
        .samples(20)
        .budget(Duration::from_millis(500))
        .run(&mut sum_reversed())
        .unwrap();

    assert!(!results.samples.is_empty());
    assert!(results.samples.elapsed_ns().iter().all(|&t| t >= 0.0));
}

#[test]
fn bench_macro_runs_with_defaults() {
    let results = bench!((0..1000u64).sum::<u64>()).unwrap();

    assert!(!results.samples.is_empty());
    let summary = results.summary().unwrap();
    // Summing a small range costs something but nowhere near a millisecond.
    assert!(summary.elapsed_ns.center > 0.0);
    assert!(summary.elapsed_ns.center < 1_000_000.0);
}
