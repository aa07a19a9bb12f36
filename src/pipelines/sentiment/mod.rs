//! Review sentiment pipeline.
//!
//! Classify phone reviews as `Positive` or `Negative`.
//! Returns the predicted label, both class probabilities, the normalized text
//! the classifier saw, and any warnings raised along the way.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use review_sentiment::sentiment::{format, SentimentPipelineBuilder};
//!
//! # fn main() -> review_sentiment::Result<()> {
//! let pipeline = SentimentPipelineBuilder::from_dir("artifacts").build()?;
//!
//! let output = pipeline.infer("Absolutely love this phone, the camera quality is stunning!")?;
//! println!("{}", format(&output));
//! # Ok(())
//! # }
//! ```
//!
//! # Batch Inference
//!
//! Analyze multiple reviews at once (returns `BatchOutput`):
//!
//! ```rust,no_run
//! # use review_sentiment::sentiment::SentimentPipelineBuilder;
//! # fn main() -> review_sentiment::Result<()> {
//! # let pipeline = SentimentPipelineBuilder::from_dir("artifacts").build()?;
//! let reviews = &[
//!     "Best purchase I've ever made!",
//!     "Terrible purchase, the phone started lagging after a week.",
//!     "",
//! ];
//!
//! let output = pipeline.run(reviews)?;
//!
//! for r in output.results {
//!     match r.output {
//!         Ok(o) => println!("{}: {} ({:.2})", r.text, o.prediction.label, o.prediction.confidence),
//!         Err(e) => println!("{}: {e}", r.text),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Serving
//!
//! [`SentimentService`] wraps startup so a missing artifact turns every call into
//! [`SentimentError::ArtifactUnavailable`](crate::SentimentError::ArtifactUnavailable)
//! rather than a crash.

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod format;
pub(crate) mod model;
pub(crate) mod pipeline;
pub(crate) mod service;

// ============ Public API ============

pub use crate::pipelines::stats::PipelineStats;
pub use builder::SentimentPipelineBuilder;
pub use format::{format, DisplayPayload};
pub use model::{ClassProbabilities, FeatureVector, FeatureVectorizer, SentimentClassifier};
pub use pipeline::{
    BatchOutput, BatchResult, InferenceWarning, Output, PredictionResult, SentimentLabel,
    SentimentPipeline,
};
pub use service::SentimentService;

#[doc(hidden)]
pub use pipeline::SentimentInput;
