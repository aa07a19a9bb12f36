use crate::error::Result;
use crate::normalize::NormalizedText;

/// Dense feature vector. Dimension is fixed by the vectorizer that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    pub fn is_zero(&self) -> bool {
        self.nnz() == 0
    }
}

/// Binary class distribution from a classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    /// `1` when the positive class wins, ties included.
    pub label: u8,
    /// `[negative, positive]`, summing to one.
    pub probabilities: [f32; 2],
}

impl ClassProbabilities {
    pub fn new(p0: f32, p1: f32) -> Self {
        Self {
            label: u8::from(p1 >= p0),
            probabilities: [p0, p1],
        }
    }

    /// Probability mass of the predicted class.
    pub fn confidence(&self) -> f32 {
        self.probabilities[usize::from(self.label)]
    }
}

/// Maps normalized text to a fixed-length vector.
pub trait FeatureVectorizer: Send + Sync {
    fn transform(&self, text: &NormalizedText) -> Result<FeatureVector>;

    /// Length of every vector this vectorizer produces.
    fn dimension(&self) -> usize;
}

/// Binary sentiment classifier over a fixed feature space.
pub trait SentimentClassifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<ClassProbabilities>;

    /// Feature dimension the classifier was fitted on.
    fn dimension(&self) -> usize;
}
