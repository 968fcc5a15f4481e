// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the sigil-document crate. Benchmarks the full
// HTML -> blocks -> paginated PDF pipeline and the watermark planner on a
// synthetic multi-page document.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use sigil_core::types::{StyleConfig, WatermarkConfig, WatermarkRepeat};
use sigil_document::{HtmlWalker, PdfPaginator, WatermarkPlanner};

/// Synthetic document: a hundred sections of heading + paragraphs + list.
fn synthetic_html() -> String {
    let mut html = String::from("<h1>Benchmark Document</h1>");
    for i in 0..100 {
        html.push_str(&format!(
            "<h2>Section {i}</h2>\
             <p>Body copy for section {i}, long enough to wrap across several \
             lines of an A4 page at the default font size.</p>\
             <ul><li>first point</li><li>second point</li></ul>"
        ));
    }
    html
}

fn bench_pdf_pipeline(c: &mut Criterion) {
    let html = synthetic_html();
    let style = StyleConfig::default();
    let watermark = WatermarkConfig {
        repeat: WatermarkRepeat::Diagonal,
        ..WatermarkConfig::default()
    };

    c.bench_function("html_to_pdf (100 sections)", |b| {
        b.iter(|| {
            let blocks = HtmlWalker::walk(black_box(&html)).expect("walk");
            let paginator = PdfPaginator::new(&style, &watermark);
            let (bytes, pages) = paginator.render(&blocks, "bench").expect("render");
            black_box((bytes, pages));
        });
    });
}

fn bench_watermark_planner(c: &mut Criterion) {
    let cfg = WatermarkConfig {
        repeat: WatermarkRepeat::Grid,
        ..WatermarkConfig::default()
    };

    c.bench_function("watermark_plan (grid)", |b| {
        b.iter(|| {
            let plan = WatermarkPlanner::plan(black_box(&cfg), 595.28, 841.89);
            black_box(plan);
        });
    });
}

criterion_group!(benches, bench_pdf_pipeline, bench_watermark_planner);
criterion_main!(benches);
