//! Benchmarks for the Newton solver and the independent reference path,
//! so the two can be compared at the same digit count.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use root_two_digits::digits::verifier::reference_digits;
use root_two_digits::{format_fixed, solve, DecimalPlaces};

fn solve_and_format(places: DecimalPlaces) {
    let solution = solve(places, 200).unwrap();
    black_box(format_fixed(&solution.value, places));
}

fn benchmark(c: &mut Criterion) {
    let places = DecimalPlaces::from(2_000);
    c.bench_function("solve_and_format_2000", |b| {
        b.iter(|| solve_and_format(black_box(places)));
    });
    c.bench_function("reference_digits_2000", |b| {
        b.iter(|| reference_digits(black_box(places)).unwrap());
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
