//! Benchmarks for the C header parser

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docgraph_c::{CHeaderParser, HeaderParser};
use std::path::Path;

fn generate_function_header(num_functions: usize) -> String {
    let mut code = String::from("#ifndef INCLUDE_bench_h__\n#define INCLUDE_bench_h__\n\n");

    for i in 0..num_functions {
        code.push_str(&format!(
            r#"
/**
 * Look up object number {i}.
 *
 * The returned object is owned by the caller.
 *
 * @param out pointer to the looked up object
 * @param repo the repository to use
 * @param id identity of the object
 * @return 0 or an error code
 */
GIT_EXTERN(int) git_object{i}_lookup(git_object **out, git_repository *repo, const git_oid *id);
"#
        ));
    }

    code.push_str("\n#endif\n");
    code
}

fn generate_type_header(num_types: usize) -> String {
    let mut code = String::new();

    for i in 0..num_types {
        code.push_str(&format!(
            r#"
/** Options for operation {i} */
typedef struct {{
    unsigned int version; /**< structure version */
    int flags;
    const char *path;
    int (*progress_cb)(const char *path, size_t done, void *payload);
}} git_op{i}_options;

/** Mode flags for operation {i} */
typedef enum {{
    GIT_OP{i}_NONE = 0,
    GIT_OP{i}_FORCE = (1u << 0),
    GIT_OP{i}_DRY_RUN = (1u << 1),
}} git_op{i}_mode_t;

/** Callback for operation {i} */
typedef int (*git_op{i}_cb)(const git_oid *id, void *payload);
"#
        ));
    }

    code
}

fn benchmark_small_header(c: &mut Criterion) {
    let source = generate_function_header(10);
    let parser = CHeaderParser::new();

    c.bench_function("parse_small_header_10_funcs", |b| {
        b.iter(|| {
            parser
                .parse_source(black_box(&source), Path::new("include/git2/bench.h"))
                .unwrap()
        })
    });
}

fn benchmark_large_header(c: &mut Criterion) {
    let source = generate_function_header(200);
    let parser = CHeaderParser::new();

    c.bench_function("parse_large_header_200_funcs", |b| {
        b.iter(|| {
            parser
                .parse_source(black_box(&source), Path::new("include/git2/bench.h"))
                .unwrap()
        })
    });
}

fn benchmark_type_heavy(c: &mut Criterion) {
    let source = generate_type_header(50);
    let parser = CHeaderParser::new();

    c.bench_function("parse_type_heavy_50_types", |b| {
        b.iter(|| {
            parser
                .parse_source(black_box(&source), Path::new("include/git2/types.h"))
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_small_header,
    benchmark_large_header,
    benchmark_type_heavy
);
criterion_main!(benches);
