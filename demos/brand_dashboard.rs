//! Brand summary over a scored review dataset.
//!
//! cargo run --example brand_dashboard -- analyzed_reviews.json samsung

use review_sentiment::dashboard::{BrandSearch, ReviewDataset};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| "analyzed_reviews.json".to_string());
    let query = args.collect::<Vec<_>>().join(" ");

    let dataset = ReviewDataset::load(&path)?;
    println!("Loaded {} reviews from {path}", dataset.len());

    match dataset.search(&query) {
        BrandSearch::Prompt => println!("Enter a brand name to see its reviews."),
        BrandSearch::NotFound { query } => println!("Brand '{query}' not found."),
        BrandSearch::Found(summary) => {
            println!("\n=== {} ===", summary.brand);
            println!("Positive: {}", summary.positive);
            println!("Negative: {}", summary.negative);
            if let Some(shares) = summary.sentiment_shares() {
                println!(
                    "Share: {:.1}% positive / {:.1}% negative",
                    shares.positive * 100.0,
                    shares.negative * 100.0
                );
            }

            let aspects = summary.aspects();
            if aspects.is_empty() {
                println!("\nNo aspects found for this brand.");
            } else {
                println!("\nAspects: {}", aspects.join(", "));
                println!("\n=== Reviews with aspects ===");
                for review in summary.reviews_with_aspects() {
                    println!(
                        "[{}] {}",
                        review.aspect.as_deref().unwrap_or_default(),
                        review.review
                    );
                }
            }
        }
    }

    Ok(())
}
