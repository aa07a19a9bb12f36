//! Integration tests against a published artifact repository.
//! Run with: REVIEW_SENTIMENT_HUB_REPO=owner/repo cargo test --features integration

#![cfg(feature = "integration")]

use review_sentiment::sentiment::{SentimentLabel, SentimentPipelineBuilder};

fn hub_repo() -> Option<String> {
    std::env::var("REVIEW_SENTIMENT_HUB_REPO").ok()
}

#[test]
fn hub_pipeline_basic() -> anyhow::Result<()> {
    let Some(repo) = hub_repo() else {
        eprintln!("REVIEW_SENTIMENT_HUB_REPO not set, skipping");
        return Ok(());
    };

    let pipeline = SentimentPipelineBuilder::from_hub(&repo).cpu().build()?;

    let positive = pipeline.infer("I absolutely love this phone! The camera quality is stunning.")?;
    assert_eq!(positive.prediction.label, SentimentLabel::Positive);
    assert!(positive.prediction.confidence > 0.5);

    let negative = pipeline.infer("This was a terrible purchase. The phone started lagging.")?;
    assert_eq!(negative.prediction.label, SentimentLabel::Negative);
    assert!(negative.prediction.confidence > 0.5);
    Ok(())
}

#[test]
fn hub_unknown_repo_fails() -> anyhow::Result<()> {
    let err = SentimentPipelineBuilder::from_hub("review-sentiment/does-not-exist-0000")
        .build()
        .unwrap_err();
    assert!(!err.to_string().is_empty());
    Ok(())
}
