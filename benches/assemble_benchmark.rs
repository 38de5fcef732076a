//! Benchmarks for docweave assembly performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use a synthetic letter template with a dynamic table.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use docweave::{assemble, assemble_batch, placeholder, AssembleOptions, SourceRegistry, Template};

/// Creates a letter template with `paragraphs` templated paragraphs.
fn create_template(paragraphs: usize) -> Template {
    let mut children: Vec<Value> = vec![json!({
        "type": "heading", "level": 1, "text": "{cfr.plan.name}"
    })];
    for i in 0..paragraphs {
        children.push(json!({
            "type": "paragraph",
            "text": format!("Paragraph {} for {{cfr.recipient.title_and_name}} on {{user_input.letter_details.date}}.", i)
        }));
    }
    children.push(json!({
        "type": "table",
        "header": ["Fund", "Value"],
        "dynamic": {"source": "{cyc.funds}", "cells": ["{row.name}", "{row.value}"]}
    }));

    Template::from_value(json!({"sections": [{"children": children}]})).unwrap()
}

/// Creates a registry whose fund list has `funds` entries.
fn create_registry(funds: usize) -> SourceRegistry {
    let funds: Vec<Value> = (0..funds)
        .map(|i| json!({"name": format!("Fund {}", i), "value": i * 100}))
        .collect();

    SourceRegistry::new()
        .with_source(
            "cfr",
            json!({"plan": {"name": "Retirement Plan"}, "recipient": {"title_and_name": "Mr J Smith"}}),
        )
        .with_source("cyc", json!({"funds": funds}))
        .with_source("user_input", json!({"letter_details": {"date": "1 March 2025"}}))
}

/// Benchmark placeholder scanning.
fn bench_scan(c: &mut Criterion) {
    let text = "Dear {cfr.recipient.title_and_name}, your plan {cfr.plan.name} is worth {cyc.total.value} {{gross}}.";

    c.bench_function("scan_text", |b| {
        b.iter(|| placeholder::scan_all(black_box(text)).unwrap());
    });
}

/// Benchmark assembly at various sizes.
fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    let options = AssembleOptions::default();

    for size in [10, 100, 1000].iter() {
        let template = create_template(*size);
        let registry = create_registry(*size);

        group.bench_function(format!("{}_nodes", size), |b| {
            b.iter(|| assemble(black_box(&template), black_box(&registry), &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark batch assembly, sequential against parallel.
fn bench_batch(c: &mut Criterion) {
    let template = create_template(50);
    let registries: Vec<SourceRegistry> = (0..16).map(|_| create_registry(50)).collect();

    let mut group = c.benchmark_group("batch");
    for parallel in [false, true] {
        let options = AssembleOptions::default().with_parallel(parallel);
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| assemble_batch(black_box(&template), black_box(&registries), &options));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scan, bench_assembly, bench_batch);
criterion_main!(benches);
