//! Benchmarks for variable substitution and document resolution.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use req::parser::parse_document;
use req::variables::{merge_layers, resolve_document, substitute, Encoding, VariableLayer};

/// Generate a layer with the given number of variables.
fn generate_layer(num_vars: usize, prefix: &str) -> VariableLayer {
    let mut layer: VariableLayer = (0..num_vars)
        .map(|i| (format!("var_{}", i), format!("{}_{}", prefix, i)))
        .collect();
    layer.set("userId", "user 123");
    layer.set("token", "bearer_token_12345");
    layer
}

/// Generate text with the given number of token references.
fn generate_template(num_refs: usize) -> String {
    let mut text = String::from("https://api.example.com/users/{userId}?q={query|all}");
    for i in 0..num_refs {
        text.push_str(&format!("&p{}={{var_{}}}", i, i % 100));
    }
    text
}

fn bench_substitute(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitute");
    let variables = merge_layers(&[&generate_layer(100, "config")]);

    for size in [1, 10, 100].iter() {
        let template = generate_template(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("uri_component", size), &template, |b, t| {
            b.iter(|| substitute(black_box(t), &variables, Encoding::UriComponent))
        });
        group.bench_with_input(BenchmarkId::new("verbatim", size), &template, |b, t| {
            b.iter(|| substitute(black_box(t), &variables, Encoding::Verbatim))
        });
    }

    group.finish();
}

fn bench_merge_layers(c: &mut Criterion) {
    let config = generate_layer(500, "config");
    let flags = generate_layer(50, "flag");
    let overlay = generate_layer(10, "overlay");

    c.bench_function("merge_three_layers", |b| {
        b.iter(|| merge_layers(black_box(&[&config, &flags, &overlay])))
    });
}

fn bench_resolve_document(c: &mut Criterion) {
    let document = parse_document(
        "POST https://api.example.com/users/{userId} HTTP/1.1\n\
         Authorization: Bearer {token}\n\
         X-Trace: {var_1}-{var_2}\n\
         \n\
         {\"name\": \"{var_3}\", \"nested\": {\"list\": [\"{var_4}\", \"{var_5|x}\"]}}\n",
    )
    .unwrap();
    let config = generate_layer(100, "config");
    let flags = generate_layer(10, "flag");

    c.bench_function("resolve_document", |b| {
        b.iter(|| resolve_document(black_box(&document), &[&config, &flags]))
    });
}

criterion_group!(benches, bench_substitute, bench_merge_layers, bench_resolve_document);
criterion_main!(benches);
