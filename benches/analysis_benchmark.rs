//! Benchmarks for unflat analysis performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks analyze synthetic block streams shaped like a typical
//! book: running headers, numbered headings, wrapped body text and page
//! numbers.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use unflat::{AnalysisOptions, BoundingBox, SourceDocument, SourcePage, StructureAnalyzer, TextBlock};

/// Creates a synthetic document with the given number of pages.
fn create_test_document(page_count: u32) -> SourceDocument {
    let mut doc = SourceDocument::new().with_metadata("title", "Benchmark");

    for number in 1..=page_count {
        let mut page = SourcePage::letter(number);
        let mut y = 100.0;
        let mut line = |page: &mut SourcePage, text: String, family: &str, size: f32| {
            page.add_block(TextBlock::new(
                text,
                family,
                size,
                BoundingBox::new(72.0, y, 540.0, y + size),
                number,
            ));
            y += size * 1.4;
        };

        page.add_block(TextBlock::new(
            "Benchmark Book",
            "Serif-Italic",
            9.0,
            BoundingBox::new(72.0, 30.0, 540.0, 39.0),
            number,
        ));

        if number % 10 == 1 {
            line(&mut page, format!("Chapter {}", number / 10 + 1), "Serif-Bold", 20.0);
        }
        line(&mut page, format!("{}.1 Section heading", number), "Serif-Bold", 14.0);
        for i in 0..30 {
            let text = if i % 6 == 5 {
                "and this line closes the paragraph.".to_string()
            } else {
                format!("line {} of body text that wraps onto the next", i)
            };
            line(&mut page, text, "Serif", 11.0);
        }

        page.add_block(TextBlock::new(
            number.to_string(),
            "Serif",
            9.0,
            BoundingBox::new(300.0, 750.0, 320.0, 759.0),
            number,
        ));
        doc.add_page(page);
    }

    doc
}

/// Benchmark full analysis at various sizes.
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let analyzer = StructureAnalyzer::new(AnalysisOptions::default()).unwrap();

    for page_count in [1, 10, 100].iter() {
        let doc = create_test_document(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| analyzer.analyze(black_box(&doc)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the size-clustering strategy.
fn bench_size_clustering(c: &mut Criterion) {
    let analyzer =
        StructureAnalyzer::new(AnalysisOptions::new().size_clustering()).unwrap();
    let doc = create_test_document(50);

    c.bench_function("size_clustering_50_pages", |b| {
        b.iter(|| analyzer.analyze(black_box(&doc)).unwrap());
    });
}

/// Benchmark parallel batch analysis.
fn bench_batch(c: &mut Criterion) {
    let analyzer = StructureAnalyzer::new(AnalysisOptions::default()).unwrap();
    let docs: Vec<SourceDocument> = (0..8).map(|_| create_test_document(20)).collect();

    c.bench_function("batch_8x20_pages", |b| {
        b.iter(|| analyzer.analyze_batch(black_box(&docs)));
    });
}

criterion_group!(benches, bench_analysis, bench_size_clustering, bench_batch);
criterion_main!(benches);
