// ============ Artifact-backed model implementations ============

pub mod linear;
pub mod tfidf;

pub use linear::{ClassifierKind, LinearSentimentClassifier};
pub use tfidf::{Norm, TfidfOptions, TfidfVectorizer};
