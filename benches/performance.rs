//! Performance benchmarks for Orbit.
//!
//! Run with: cargo bench
//!
//! Target performance:
//! - Program discovery: < 500ms
//! - Search latency: < 50ms

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orbit::config::{CustomShortcut, CustomShortcutsOptions, ProgramsOptions, ShortcutType};
use orbit::core::ranking::Ranker;
use orbit::core::router::QueryRouter;
use orbit::i18n::TranslationSet;
use orbit::plugins::{CustomShortcutsPlugin, FolderProgramRepository, ProgramRepository};
use orbit::{platform, PluginRegistry, PluginType, SearchResultItem, SourcePlugin};

fn entries(count: usize) -> Vec<SearchResultItem> {
    (0..count)
        .map(|i| {
            SearchResultItem::new(
                format!("Application {} - Test Entry for Benchmarking", i),
                format!("app-{}", i),
                PluginType::Programs,
            )
            .with_tags(vec![format!("tag{}", i % 17)])
        })
        .collect()
}

/// Benchmark program discovery over the default folders.
fn bench_program_discovery(c: &mut Criterion) {
    let options = ProgramsOptions::default();

    c.bench_function("program_discovery", |b| {
        b.iter(|| black_box(FolderProgramRepository.load(&options)))
    });
}

/// Benchmark ranking a single large index.
fn bench_ranking(c: &mut Criterion) {
    let ranker = Ranker::new();
    let index = entries(500);
    let queries = ["app", "test", "application 50", "bench", "tag3", "zzz"];

    let mut group = c.benchmark_group("ranking");

    for query in queries {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, query| {
            b.iter(|| black_box(ranker.rank([(0, &index[..])], black_box(query)).len()))
        });
    }

    group.finish();
}

/// Benchmark a full routed query over an indexed plugin.
fn bench_router(c: &mut Criterion) {
    let shortcuts = (0..500)
        .map(|i| CustomShortcut {
            shortcut_type: ShortcutType::Url,
            name: format!("Bookmark {}", i),
            description: String::new(),
            execution_argument: format!("https://example.com/{}", i),
            tags: vec![format!("site{}", i % 13)],
            icon: None,
        })
        .collect();
    let registry = PluginRegistry::new(vec![SourcePlugin::CustomShortcuts(
        CustomShortcutsPlugin::new(
            CustomShortcutsOptions {
                enabled: true,
                shortcuts,
            },
            platform::current(),
        ),
    )]);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Skipping router benchmark: {}", e);
            return;
        }
    };
    for (_, plugin) in registry.iter() {
        if let Err(e) = runtime.block_on(plugin.refresh_index()) {
            eprintln!("Skipping router benchmark: {}", e);
            return;
        }
    }

    let router = QueryRouter::new();
    let translation = TranslationSet::english();

    let mut group = c.benchmark_group("router");
    for query in ["book", "bookmark 42", "site7", "nothing"] {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, query| {
            b.iter(|| black_box(router.search(&registry, black_box(query), 8, &translation)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_program_discovery, bench_ranking, bench_router);

criterion_main!(benches);
