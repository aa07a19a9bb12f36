use std::fmt;

use serde::Serialize;

use super::pipeline::Output;

/// What the UI shows for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPayload {
    /// `"Positive"` or `"Negative"`.
    pub label: String,
    /// Probability of `label`, in `0..=1`.
    pub confidence: f32,
    /// `confidence` scaled to `0..=100`.
    pub confidence_percentage: f32,
    pub normalized_text: String,
    /// Set when the prediction should not be trusted: confidence under the
    /// configured threshold, or nothing survived normalization.
    pub low_confidence: bool,
    /// Nothing survived normalization; the label is the classifier's prior.
    pub degenerate: bool,
}

impl fmt::Display for DisplayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.label, self.confidence_percentage)
    }
}

/// Render an inference output for display.
pub fn format(output: &Output) -> DisplayPayload {
    let prediction = &output.prediction;
    let confidence = prediction.confidence.clamp(0.0, 1.0);
    DisplayPayload {
        label: prediction.label.to_string(),
        confidence,
        confidence_percentage: confidence * 100.0,
        normalized_text: output.normalized.to_string(),
        low_confidence: output.is_low_confidence() || output.is_degenerate(),
        degenerate: output.is_degenerate(),
    }
}
