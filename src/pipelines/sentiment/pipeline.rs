use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::model::{ClassProbabilities, FeatureVectorizer, SentimentClassifier};
use crate::error::{Result, SentimentError};
use crate::normalize::{LexicalNormalizer, NormalizedText};
use crate::pipelines::stats::PipelineStats;

// ============ Output types ============

/// Binary review sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(alias = "Negatif", alias = "negative", alias = "negatif", alias = "NEGATIVE")]
    Negative,
    #[serde(alias = "Positif", alias = "positive", alias = "positif", alias = "POSITIVE")]
    Positive,
}

impl SentimentLabel {
    /// Label for classifier class `0` or `1`.
    pub fn from_class(class: u8) -> Self {
        if class == 1 {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Positive => "Positive",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier verdict for one review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub label: SentimentLabel,
    /// `[negative, positive]`, summing to one.
    pub probabilities: [f32; 2],
    /// Probability mass of `label`.
    pub confidence: f32,
}

impl From<ClassProbabilities> for PredictionResult {
    fn from(value: ClassProbabilities) -> Self {
        Self {
            label: SentimentLabel::from_class(value.label),
            probabilities: value.probabilities,
            confidence: value.confidence(),
        }
    }
}

/// Non-fatal conditions attached to a prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InferenceWarning {
    /// No token survived normalization; the label reflects the classifier's prior only.
    DegenerateNormalization,
    /// Confidence fell below the configured threshold.
    LowConfidence { confidence: f32, threshold: f32 },
}

/// Single-text output from `infer()` and `run()`.
#[derive(Debug, Clone)]
pub struct Output {
    /// Sentiment prediction.
    pub prediction: PredictionResult,
    /// Lemma string the classifier saw.
    pub normalized: NormalizedText,
    pub warnings: Vec<InferenceWarning>,
    /// Execution statistics.
    pub stats: PipelineStats,
}

impl Output {
    pub fn is_degenerate(&self) -> bool {
        self.warnings
            .contains(&InferenceWarning::DegenerateNormalization)
    }

    pub fn is_low_confidence(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, InferenceWarning::LowConfidence { .. }))
    }
}

/// Single result in batch output.
#[derive(Debug)]
pub struct BatchResult {
    /// Input text.
    pub text: String,
    /// Output or error for this input.
    pub output: Result<Output>,
}

/// Batch output from `run()`.
#[derive(Debug)]
pub struct BatchOutput {
    /// Results for each input.
    pub results: Vec<BatchResult>,
    /// Execution statistics.
    pub stats: PipelineStats,
}

// ============ Input trait for type-based dispatch ============

#[doc(hidden)]
pub trait SentimentInput<'a> {
    /// Output type for `.run()`.
    type Output;

    #[doc(hidden)]
    fn into_texts(self) -> Vec<&'a str>;
    #[doc(hidden)]
    fn convert_output(
        texts: Vec<&'a str>,
        outputs: Vec<Result<Output>>,
        stats: PipelineStats,
    ) -> Result<Self::Output>;
}

impl<'a> SentimentInput<'a> for &'a str {
    type Output = Output;

    fn into_texts(self) -> Vec<&'a str> {
        vec![self]
    }

    fn convert_output(
        _texts: Vec<&'a str>,
        mut outputs: Vec<Result<Output>>,
        stats: PipelineStats,
    ) -> Result<Self::Output> {
        let mut output = outputs
            .pop()
            .ok_or_else(|| SentimentError::Unexpected("No output returned".into()))??;
        output.stats = stats;
        Ok(output)
    }
}

fn batch_output(texts: Vec<&str>, outputs: Vec<Result<Output>>, stats: PipelineStats) -> BatchOutput {
    let results = texts
        .into_iter()
        .zip(outputs)
        .map(|(text, output)| BatchResult {
            text: text.to_string(),
            output,
        })
        .collect();
    BatchOutput { results, stats }
}

impl<'a> SentimentInput<'a> for &'a [&'a str] {
    type Output = BatchOutput;

    fn into_texts(self) -> Vec<&'a str> {
        self.to_vec()
    }

    fn convert_output(
        texts: Vec<&'a str>,
        outputs: Vec<Result<Output>>,
        stats: PipelineStats,
    ) -> Result<Self::Output> {
        Ok(batch_output(texts, outputs, stats))
    }
}

impl<'a, const N: usize> SentimentInput<'a> for &'a [&'a str; N] {
    type Output = BatchOutput;

    fn into_texts(self) -> Vec<&'a str> {
        self.as_slice().to_vec()
    }

    fn convert_output(
        texts: Vec<&'a str>,
        outputs: Vec<Result<Output>>,
        stats: PipelineStats,
    ) -> Result<Self::Output> {
        Ok(batch_output(texts, outputs, stats))
    }
}

// ============ Pipeline ============

/// Classifies phone reviews as positive or negative.
///
/// Construct with [`SentimentPipelineBuilder`](super::SentimentPipelineBuilder), or from
/// already-loaded parts with [`SentimentPipeline::from_parts`]. All artifacts are
/// immutable and shared, so one pipeline can serve many threads.
///
/// # Examples
///
/// ```rust,no_run
/// # use review_sentiment::sentiment::SentimentPipelineBuilder;
/// # fn main() -> review_sentiment::Result<()> {
/// let pipeline = SentimentPipelineBuilder::from_dir("artifacts").build()?;
///
/// // Single text
/// let output = pipeline.run("The camera is stunning, I love it")?;
/// println!("{}: {:.2}", output.prediction.label, output.prediction.confidence);
///
/// // Batch - results include input text
/// let output = pipeline.run(&["Great phone!", "Stopped charging after a week."])?;
/// for r in output.results {
///     println!("{} → {}", r.text, r.output?.prediction.label);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SentimentPipeline {
    pub(crate) normalizer: LexicalNormalizer,
    pub(crate) vectorizer: Arc<dyn FeatureVectorizer>,
    pub(crate) classifier: Arc<dyn SentimentClassifier>,
    pub(crate) low_confidence_threshold: Option<f32>,
}

impl SentimentPipeline {
    /// Assemble a pipeline, checking that vectorizer and classifier share a feature space.
    pub fn from_parts(
        normalizer: LexicalNormalizer,
        vectorizer: Arc<dyn FeatureVectorizer>,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> Result<Self> {
        if vectorizer.dimension() != classifier.dimension() {
            return Err(SentimentError::artifact(
                "classifier",
                format!(
                    "expects {} features but the vectorizer produces {}",
                    classifier.dimension(),
                    vectorizer.dimension()
                ),
            ));
        }
        Ok(Self {
            normalizer,
            vectorizer,
            classifier,
            low_confidence_threshold: None,
        })
    }

    /// Flag predictions whose confidence is below `threshold`.
    pub fn with_low_confidence_threshold(mut self, threshold: f32) -> Self {
        self.low_confidence_threshold = Some(threshold);
        self
    }

    /// Length of the feature vectors the classifier consumes.
    pub fn feature_dimension(&self) -> usize {
        self.vectorizer.dimension()
    }

    pub fn normalizer(&self) -> &LexicalNormalizer {
        &self.normalizer
    }

    /// Normalization only, as applied by [`infer`](Self::infer).
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        self.normalizer.normalize(raw)
    }

    /// Classify one review.
    ///
    /// Blank input fails with [`SentimentError::EmptyInput`] before any stage runs.
    /// Input that normalizes to nothing is still classified and carries
    /// [`InferenceWarning::DegenerateNormalization`].
    pub fn infer(&self, raw: &str) -> Result<Output> {
        if raw.trim().is_empty() {
            return Err(SentimentError::EmptyInput);
        }

        let stats = PipelineStats::start();
        let _span = tracing::debug_span!("infer", chars = raw.len()).entered();

        let normalized = self.normalizer.normalize(raw);
        let mut warnings = Vec::new();
        if normalized.is_empty() {
            tracing::warn!("review normalized to an empty string, classifying it anyway");
            warnings.push(InferenceWarning::DegenerateNormalization);
        }

        let features = self.vectorizer.transform(&normalized)?;
        let prediction = PredictionResult::from(self.classifier.predict(&features)?);

        if let Some(threshold) = self.low_confidence_threshold {
            if prediction.confidence < threshold {
                warnings.push(InferenceWarning::LowConfidence {
                    confidence: prediction.confidence,
                    threshold,
                });
            }
        }

        tracing::debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            tokens = normalized.tokens().count(),
            features = features.nnz(),
            "classified review"
        );

        Ok(Output {
            prediction,
            normalized,
            warnings,
            stats: stats.finish(1),
        })
    }

    /// Classify reviews.
    ///
    /// Single input → [`Output`], batch → [`BatchOutput`]. A failing batch item
    /// does not affect its siblings.
    pub fn run<'a, I: SentimentInput<'a>>(&self, input: I) -> Result<I::Output> {
        let stats_builder = PipelineStats::start();
        let texts = input.into_texts();
        let item_count = texts.len();

        let outputs: Vec<Result<Output>> = texts.iter().map(|text| self.infer(text)).collect();

        I::convert_output(texts, outputs, stats_builder.finish(item_count))
    }
}

impl fmt::Debug for SentimentPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentPipeline")
            .field("features", &self.feature_dimension())
            .field("low_confidence_threshold", &self.low_confidence_threshold)
            .finish_non_exhaustive()
    }
}
