/// Customers-who-bought-this-also-bought over a small reading log.
/// Run with `RUST_LOG=debug cargo run --example book_recommendations` to see
/// every pipeline stage.
use log::info;
use phispace::builder::PhiSpaceBuilder;
use phispace::format::{render_space, OutputStyle};
use std::time::Instant;

const READING_LOG: &str = include_str!("datasets/books.txt");

fn main() {
    phispace::init();

    let start = Instant::now();
    let (space, matrix) = PhiSpaceBuilder::new()
        .with_top_k(2)
        .build(READING_LOG.lines())
        .expect("default parameters are valid");
    info!("Pipeline finished in {:?}", start.elapsed());

    let stats = space.index_stats();
    println!("── Input ──────────────────────────────────────────");
    println!("  lines: {}  malformed: {}  duplicates: {}", stats.lines, stats.malformed, stats.duplicates);
    println!("  users: {}  books: {}", stats.n_users, stats.n_items);
    println!(
        "  pairs: {} scored, {} undefined",
        space.pair_stats().defined,
        space.pair_stats().undefined
    );
    println!("  similarity entries: {}", matrix.nnz());

    println!("── Recommendations ────────────────────────────────");
    for line in render_space(&space, OutputStyle::Sentence, true).expect("text rendering") {
        println!("  {}", line);
    }

    println!("── With scores ────────────────────────────────────");
    for line in render_space(&space, OutputStyle::Scores, false).expect("text rendering") {
        println!("  {}", line);
    }
}
