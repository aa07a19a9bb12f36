//! Phone-review sentiment analysis in Rust.
//!
//! Cleans and lemmatizes free-text reviews, turns them into TF-IDF features and
//! classifies them as positive or negative with a linear model evaluated on
//! [Candle](https://github.com/huggingface/candle). Fitted artifacts are read
//! from a local directory or a Hugging Face Hub repository.
//! Also includes brand-level queries over a pre-scored review dataset.

// ============ Internal API ============

pub(crate) mod pipelines;

// ============ Public API ============

pub mod dashboard;
pub mod error;
pub mod loaders;
pub mod models;
pub mod normalize;

pub use error::{Result, SentimentError};
pub use pipelines::cache::ArtifactCache;
pub use pipelines::sentiment;
pub use pipelines::stats::PipelineStats;
pub use pipelines::utils::DeviceRequest;
