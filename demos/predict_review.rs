//! Classify reviews with artifacts from a local directory.
//!
//! cargo run --example predict_review -- ./artifacts "The battery lasts forever!"

use review_sentiment::sentiment::{SentimentPipelineBuilder, SentimentService};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let dir = args.next().unwrap_or_else(|| "artifacts".to_string());
    let reviews: Vec<String> = args.collect();

    println!("Loading artifacts from {dir}...");
    let service = SentimentService::start(
        SentimentPipelineBuilder::from_dir(&dir).low_confidence_threshold(0.6),
    );
    if let Some(reason) = service.startup_error() {
        anyhow::bail!("model unavailable: {reason}");
    }

    let reviews = if reviews.is_empty() {
        vec![
            "I absolutely love this phone! The camera quality is stunning.".to_string(),
            "This was a terrible purchase. The phone started lagging.".to_string(),
            "123 456 !!!".to_string(),
        ]
    } else {
        reviews
    };

    // Single review
    let output = service.infer(&reviews[0])?;
    println!("\n=== Sentiment ===");
    println!("Review: \"{}\"", reviews[0]);
    println!("Normalized: \"{}\"", output.normalized);
    println!(
        "Sentiment: {} (confidence: {:.4})",
        output.prediction.label, output.prediction.confidence
    );
    println!(
        "Completed in {:.2}ms",
        output.stats.total_time.as_secs_f64() * 1000.0
    );

    // Batch, formatted for display
    println!("\n=== Batch ===");
    let pipeline = service.pipeline()?;
    let texts: Vec<&str> = reviews.iter().map(String::as_str).collect();
    let batch = pipeline.run(&texts[..])?;
    for r in batch.results {
        match r.output {
            Ok(output) => {
                let payload = review_sentiment::sentiment::format(&output);
                let flag = if payload.low_confidence { " [low confidence]" } else { "" };
                println!("{} -> {payload}{flag}", r.text);
            }
            Err(e) => println!("{} -> error: {e}", r.text),
        }
    }
    println!(
        "{} reviews in {:.2}ms",
        batch.stats.items_processed,
        batch.stats.total_time.as_secs_f64() * 1000.0
    );

    Ok(())
}
