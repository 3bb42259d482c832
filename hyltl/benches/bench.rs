use criterion::{Criterion, black_box, criterion_group, criterion_main};

use hyltl::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const APS: [&str; 4] = ["a", "b", "c", "d"];

fn build_random_formula(store: &FormulaStore, budget: usize, rng: &mut impl Rng) -> Formula {
    if budget == 0 || rng.random_bool(0.2) {
        return store.ap(APS[rng.random_range(0..APS.len())]);
    }

    match rng.random_range(0..=9) {
        0 => store.not(build_random_formula(store, budget - 1, rng)),
        1 => store.x(build_random_formula(store, budget - 1, rng)),
        2 => store.f(build_random_formula(store, budget - 1, rng)),
        3 => store.g(build_random_formula(store, budget - 1, rng)),
        4..=7 => {
            let op = [Op::U, Op::R, Op::W, Op::M][rng.random_range(0..4)];
            let left = build_random_formula(store, budget - 1, rng);
            let right = build_random_formula(store, budget - 1, rng);
            store.binop(op, left, right)
        }
        8 => {
            let left = build_random_formula(store, budget - 1, rng);
            let right = build_random_formula(store, budget - 1, rng);
            store.and([left, right]).unwrap()
        }
        9 => {
            let left = build_random_formula(store, budget - 1, rng);
            let right = build_random_formula(store, budget - 1, rng);
            store.or([left, right]).unwrap()
        }
        _ => unreachable!(),
    }
}

fn build_formulas(store: &FormulaStore, count: usize) -> Vec<Formula> {
    // Seeded for determinism across runs.
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    (0..count)
        .map(|_| build_random_formula(store, 8, &mut rng))
        .collect()
}

fn bench_construction(c: &mut Criterion) {
    // A fresh store every iteration measures interning from scratch.
    c.bench_function("build_fresh_store", |b| {
        b.iter(|| {
            let store = FormulaStore::new();
            black_box(build_formulas(&store, 64));
        })
    });

    // Rebuilding formulas that are still alive only hits the table.
    let store = FormulaStore::new();
    let alive = build_formulas(&store, 64);
    c.bench_function("build_existing_nodes", |b| {
        b.iter(|| {
            black_box(build_formulas(&store, 64));
        })
    });
    black_box(alive);
}

fn bench_simplify(c: &mut Criterion) {
    let store = FormulaStore::new();
    let formulas = build_formulas(&store, 64);

    c.bench_function("simplify_cold", |b| {
        b.iter(|| {
            let mut simplifier = Simplifier::new(store.clone(), SimplifierOptions::default());
            for f in &formulas {
                black_box(simplifier.simplify(f).unwrap());
            }
        })
    });

    let mut warm = Simplifier::new(store.clone(), SimplifierOptions::default());
    c.bench_function("simplify_warm", |b| {
        b.iter(|| {
            for f in &formulas {
                black_box(warm.simplify(f).unwrap());
            }
        })
    });

    c.bench_function("negative_normal_form", |b| {
        b.iter(|| {
            let mut simplifier = Simplifier::new(store.clone(), SimplifierOptions::none());
            for f in &formulas {
                black_box(simplifier.negative_normal_form(f, true).unwrap());
            }
        })
    });
}

fn bench_display(c: &mut Criterion) {
    let store = FormulaStore::new();
    let formulas = build_formulas(&store, 64);

    c.bench_function("display", |b| {
        b.iter(|| {
            for f in &formulas {
                black_box(f.to_string());
            }
        })
    });
}

criterion_group!(benches, bench_construction, bench_simplify, bench_display);
criterion_main!(benches);
