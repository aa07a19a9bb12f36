//! Integration tests for the sentiment pipeline.

mod common;

use std::sync::Arc;

use common::{sigmoid, INTERCEPT, SCENARIO_A, SCENARIO_B, SCENARIO_C};
use review_sentiment::models::LinearSentimentClassifier;
use review_sentiment::sentiment::{
    format, InferenceWarning, SentimentLabel, SentimentPipeline, SentimentService,
};
use review_sentiment::SentimentError;

fn assert_probabilities(p: [f32; 2]) {
    assert!((p[0] + p[1] - 1.0).abs() < 1e-5, "{p:?} does not sum to one");
    assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn sentiment_positive_review() -> anyhow::Result<()> {
    let pipeline = common::pipeline();
    let output = pipeline.infer(SCENARIO_A)?;

    assert_eq!(output.prediction.label, SentimentLabel::Positive);
    assert!(output.prediction.confidence > 0.5);
    assert!(output.warnings.is_empty());

    // Five weighted terms at 1.5 and "phone" at 1.0, L2-normalized.
    let expected = sigmoid(1.5 / 3.5 * 5.1 + INTERCEPT);
    assert!((output.prediction.probabilities[1] - expected).abs() < 1e-4);
    Ok(())
}

#[test]
fn sentiment_negative_review() -> anyhow::Result<()> {
    let pipeline = common::pipeline();
    let output = pipeline.infer(SCENARIO_B)?;

    assert_eq!(output.prediction.label, SentimentLabel::Negative);
    assert!(output.prediction.confidence > 0.5);
    assert_eq!(
        output.prediction.confidence,
        output.prediction.probabilities[0]
    );
    Ok(())
}

#[test]
fn sentiment_degenerate_review_is_flagged() -> anyhow::Result<()> {
    let pipeline = common::pipeline();
    let output = pipeline.infer(SCENARIO_C)?;

    assert!(output.normalized.is_empty());
    assert!(output.is_degenerate());
    // Zero features leave only the intercept.
    let expected = sigmoid(INTERCEPT);
    assert!((output.prediction.probabilities[1] - expected).abs() < 1e-5);
    assert_eq!(output.prediction.label, SentimentLabel::Positive);
    Ok(())
}

#[test]
fn sentiment_rejects_blank_input() -> anyhow::Result<()> {
    let pipeline = common::pipeline();
    for raw in ["", "   ", "\n\t"] {
        let err = pipeline.infer(raw).unwrap_err();
        assert!(matches!(err, SentimentError::EmptyInput), "{raw:?}: {err}");
    }
    Ok(())
}

#[test]
fn sentiment_is_deterministic() -> anyhow::Result<()> {
    let pipeline = common::pipeline();
    let first = pipeline.infer(SCENARIO_A)?;
    let second = pipeline.infer(SCENARIO_A)?;

    assert_eq!(first.prediction, second.prediction);
    assert_eq!(first.normalized, second.normalized);

    let rebuilt = common::pipeline().infer(SCENARIO_A)?;
    assert_eq!(first.prediction, rebuilt.prediction);
    Ok(())
}

#[test]
fn sentiment_probability_invariant() -> anyhow::Result<()> {
    let pipeline = common::pipeline();
    for raw in [
        SCENARIO_A,
        SCENARIO_B,
        SCENARIO_C,
        "great great great phone",
        "terrible lag",
        "check it out",
    ] {
        let prediction = pipeline.infer(raw)?.prediction;
        let [p0, p1] = prediction.probabilities;
        assert_probabilities(prediction.probabilities);
        assert_eq!(prediction.label == SentimentLabel::Positive, p1 >= p0);
        assert_eq!(prediction.confidence, p0.max(p1));
    }
    Ok(())
}

#[test]
fn sentiment_batch_keeps_failures_local() -> anyhow::Result<()> {
    let pipeline = common::pipeline();
    let output = pipeline.run(&[SCENARIO_A, "  ", SCENARIO_B])?;

    assert_eq!(output.results.len(), 3);
    assert_eq!(output.stats.items_processed, 3);
    assert_eq!(output.results[1].text, "  ");
    assert!(matches!(
        output.results[1].output,
        Err(SentimentError::EmptyInput)
    ));

    let first = output.results[0].output.as_ref().map_err(|e| anyhow::anyhow!("{e}"))?;
    assert_eq!(first.prediction.label, SentimentLabel::Positive);
    let last = output.results[2].output.as_ref().map_err(|e| anyhow::anyhow!("{e}"))?;
    assert_eq!(last.prediction.label, SentimentLabel::Negative);
    Ok(())
}

#[test]
fn sentiment_run_single_matches_infer() -> anyhow::Result<()> {
    let pipeline = common::pipeline();
    let single = pipeline.run(SCENARIO_B)?;
    assert_eq!(single.prediction, pipeline.infer(SCENARIO_B)?.prediction);
    assert_eq!(single.stats.items_processed, 1);

    let reviews = vec![SCENARIO_A, SCENARIO_B];
    let batch = pipeline.run(&reviews[..])?;
    assert_eq!(batch.results.len(), 2);
    Ok(())
}

#[test]
fn sentiment_concurrent_requests() -> anyhow::Result<()> {
    let pipeline = common::pipeline();
    let expected = pipeline.infer(SCENARIO_A)?.prediction;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| pipeline.infer(SCENARIO_A)))
            .collect();
        for handle in handles {
            let output = handle.join().expect("worker panicked").expect("inference failed");
            assert_eq!(output.prediction, expected);
        }
    });
    Ok(())
}

#[test]
fn sentiment_low_confidence_warning() -> anyhow::Result<()> {
    let pipeline = common::pipeline().with_low_confidence_threshold(0.6);

    let uncertain = pipeline.infer(SCENARIO_C)?;
    assert!(uncertain.is_low_confidence());
    assert!(uncertain.warnings.contains(&InferenceWarning::DegenerateNormalization));

    let confident = pipeline.infer(SCENARIO_A)?;
    assert!(!confident.is_low_confidence());
    Ok(())
}

#[test]
fn sentiment_rejects_mismatched_classifier() -> anyhow::Result<()> {
    let classifier = LinearSentimentClassifier::logistic_regression(
        &[1.0, -1.0, 0.5],
        0.0,
        &candle_core::Device::Cpu,
    )?;
    let err = SentimentPipeline::from_parts(
        common::normalizer(),
        Arc::new(common::vectorizer()),
        Arc::new(classifier),
    )
    .unwrap_err();
    assert!(matches!(err, SentimentError::ArtifactLoad { .. }), "{err}");
    Ok(())
}

#[test]
fn sentiment_multinomial_nb() -> anyhow::Result<()> {
    let n = common::VOCABULARY.len();
    let uniform = vec![-(n as f32).ln(); n];
    let mut positive = uniform.clone();
    let mut negative = uniform.clone();
    for (term, boost) in [("love", 1.0f32), ("stunning", 1.0), ("terrible", -1.0), ("lag", -1.0)] {
        let index = common::VOCABULARY.iter().position(|t| *t == term).unwrap_or_default();
        positive[index] += boost;
        negative[index] -= boost;
    }
    let classifier = LinearSentimentClassifier::multinomial_nb(
        [negative.as_slice(), positive.as_slice()],
        [0.5f32.ln(), 0.5f32.ln()],
        &candle_core::Device::Cpu,
    )?;
    let pipeline = SentimentPipeline::from_parts(
        common::normalizer(),
        Arc::new(common::vectorizer()),
        Arc::new(classifier),
    )?;

    let positive_output = pipeline.infer(SCENARIO_A)?;
    assert_eq!(positive_output.prediction.label, SentimentLabel::Positive);
    assert_probabilities(positive_output.prediction.probabilities);

    let negative_output = pipeline.infer(SCENARIO_B)?;
    assert_eq!(negative_output.prediction.label, SentimentLabel::Negative);

    // Equal priors and no features: a coin flip, resolved toward positive.
    let degenerate = pipeline.infer(SCENARIO_C)?;
    assert!((degenerate.prediction.probabilities[1] - 0.5).abs() < 1e-6);
    assert_eq!(degenerate.prediction.label, SentimentLabel::Positive);
    Ok(())
}

#[test]
fn sentiment_service_formats_predictions() -> anyhow::Result<()> {
    let service = SentimentService::from_pipeline(Arc::new(common::pipeline()));
    assert!(service.is_ready());
    assert_eq!(service.startup_error(), None);

    let payload = service.predict(SCENARIO_A)?;
    assert_eq!(payload.label, "Positive");
    assert!(payload.confidence_percentage > 50.0 && payload.confidence_percentage <= 100.0);
    assert_eq!(
        payload.normalized_text,
        "absolutely love phone camera quality stunning"
    );

    let output = service.infer(SCENARIO_B)?;
    let payload = format(&output);
    assert_eq!(payload.label, "Negative");
    assert!(payload.to_string().starts_with("Negative ("));

    assert!(matches!(
        service.predict(" "),
        Err(SentimentError::EmptyInput)
    ));
    Ok(())
}

#[test]
fn sentiment_degenerate_payload_is_unreliable() -> anyhow::Result<()> {
    let pipeline = common::pipeline();

    let payload = format(&pipeline.infer(SCENARIO_C)?);
    assert!(payload.degenerate);
    assert!(payload.low_confidence);
    assert_eq!(payload.normalized_text, "");

    // No threshold configured: the service still reports it.
    let service = SentimentService::from_pipeline(Arc::new(pipeline));
    let payload = service.predict(SCENARIO_C)?;
    assert!(payload.low_confidence);

    let confident = service.predict(SCENARIO_A)?;
    assert!(!confident.degenerate);
    assert!(!confident.low_confidence);
    Ok(())
}
