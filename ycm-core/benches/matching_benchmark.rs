use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ycm_core::path_score::{calculate_match_score, ScoreOptions};
use ycm_core::{IdentifierCompleter, IdentifierCompleterApi};

const SYLLABLES: &[&str] = &[
    "get", "set", "foo", "bar", "Buffer", "Parse", "node", "_", "Index", "query", "tmp", "Ref",
];

fn random_identifiers(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..count)
        .map(|_| {
            let parts = rng.gen_range(1..=4);
            (0..parts)
                .map(|_| SYLLABLES[rng.gen_range(0..SYLLABLES.len())])
                .collect::<String>()
        })
        .collect()
}

fn setup_completer(count: usize) -> IdentifierCompleter {
    let completer = IdentifierCompleter::new();
    completer.add_identifiers_to_database(random_identifiers(count), "cpp".into(), "/bench.cpp".into());
    completer
}

fn bench_candidates_for_query(c: &mut Criterion) {
    let queries = [("one_char", "g"), ("lower", "gbf"), ("camel", "PI"), ("long", "setnodequery")];

    let mut group = c.benchmark_group("candidates_for_query");
    group.sample_size(20);

    for size in [10_000usize, 100_000] {
        let completer = setup_completer(size);
        for (name, query) in queries {
            group.bench_with_input(BenchmarkId::new(name, size), &query, |b, query| {
                b.iter(|| completer.candidates_for_query_and_type(query.to_string(), "cpp".into(), 50))
            });
        }
    }
    group.finish();
}

fn bench_path_score(c: &mut Criterion) {
    let options = ScoreOptions::default();
    let paths = [
        "src/components/editor/completion/identifier_completer.rs",
        "third_party/engine/cpp/core/IdentifierDatabase.cpp",
        "docs/a/b/c/d/e/f/g/h/i/j/k/l/m/n/o/p/readme.md",
    ];

    let mut group = c.benchmark_group("path_score");
    for (i, path) in paths.iter().enumerate() {
        group.bench_with_input(BenchmarkId::new("icr", i), path, |b, path| {
            b.iter(|| calculate_match_score(path, "icr", &options))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_candidates_for_query, bench_path_score);
criterion_main!(benches);
