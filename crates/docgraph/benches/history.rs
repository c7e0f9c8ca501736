//! Benchmarks for snapshot building and signature history

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docgraph::{
    build_snapshot, process_project, DocumentSnapshot, MemoryTreeProvider, ParserConfig,
    ProjectConfig, SignatureHistory, VersionOrder,
};
use docgraph_c::{CHeaderParser, HeaderParser};
use std::collections::BTreeMap;

fn generate_header(module: usize, functions: usize, extra_arg: bool) -> String {
    let mut code = String::new();
    for i in 0..functions {
        let tail = if extra_arg { ", size_t len" } else { "" };
        code.push_str(&format!(
            r#"
/**
 * Operation {i} of module {module}.
 *
 * @param out where to write the result
 * @param id identity of the object
 * @return 0 or an error code
 */
GIT_EXTERN(int) git_mod{module}_op{i}(git_oid *out, const git_oid *id{tail});
"#
        ));
    }
    code
}

fn generate_tree(modules: usize, extra_arg: bool) -> BTreeMap<String, String> {
    (0..modules)
        .map(|m| {
            (
                format!("include/git2/mod{m}.h"),
                generate_header(m, 20, extra_arg),
            )
        })
        .collect()
}

fn benchmark_build_snapshot(c: &mut Criterion) {
    let files = generate_tree(20, false);
    let parser = CHeaderParser::new();
    let config = ParserConfig::default().with_prefix("git_");

    c.bench_function("build_snapshot_400_funcs", |b| {
        b.iter(|| build_snapshot(parser.parse_tree(black_box(&files)), &config))
    });
}

fn benchmark_history(c: &mut Criterion) {
    let parser = CHeaderParser::new();
    let config = ParserConfig::default();
    let snapshots: Vec<DocumentSnapshot> = (0..10)
        .map(|v| build_snapshot(parser.parse_tree(&generate_tree(20, v % 2 == 1)), &config).0)
        .collect();
    let order = VersionOrder::new((0..10).map(|v| format!("v0.{v}.0")).collect());

    c.bench_function("history_10_versions", |b| {
        b.iter(|| {
            let mut history = SignatureHistory::new(order.clone());
            for (version, snapshot) in order.iter().zip(&snapshots) {
                history.record(version, black_box(snapshot)).unwrap();
            }
            history.finalize()
        })
    });
}

fn benchmark_project(c: &mut Criterion) {
    let mut provider = MemoryTreeProvider::new();
    for v in 0..8 {
        provider.insert_tree(format!("v0.{v}.0"), generate_tree(10, v % 2 == 1));
    }
    provider.insert_tree("HEAD", generate_tree(10, true));
    let order = VersionOrder::from_unsorted((0..8).map(|v| format!("v0.{v}.0")), "HEAD");
    let project = ProjectConfig::default();

    let mut group = c.benchmark_group("process_project_9_versions");
    for parallel in [false, true] {
        let parser = CHeaderParser::with_config(ParserConfig::default().with_parallel(parallel));
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| process_project(&provider, &order, &parser, &project).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_build_snapshot,
    benchmark_history,
    benchmark_project
);
criterion_main!(benches);
