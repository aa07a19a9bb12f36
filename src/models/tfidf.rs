//! Frozen TF-IDF vectorizer.
//!
//! Loads the fitted state of a classic word-level TF-IDF vectorizer (vocabulary,
//! idf weights and the transform options it was fitted with) and reproduces its
//! `transform` exactly. Fitting is not supported.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, SentimentError};
use crate::normalize::NormalizedText;
use crate::pipelines::sentiment::{FeatureVector, FeatureVectorizer};

/// Vectorizer artifact format this build understands.
pub const VECTORIZER_FORMAT_VERSION: u32 = 1;

/// Default token pattern: runs of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

const ARTIFACT: &str = "vectorizer";

/// Row normalization applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Transform options recorded at fit time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TfidfOptions {
    pub lowercase: bool,
    pub token_pattern: String,
    pub ngram_range: (usize, usize),
    pub stop_words: Option<Vec<String>>,
    pub binary: bool,
    pub sublinear_tf: bool,
    pub use_idf: bool,
    /// `"l1"`, `"l2"`, or `"none"`/`null` for no normalization.
    #[serde(deserialize_with = "norm_option")]
    pub norm: Option<Norm>,
}

fn norm_option<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Norm>, D::Error> {
    #[derive(Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum RawNorm {
        L1,
        L2,
        None,
    }

    Ok(match Option::<RawNorm>::deserialize(deserializer)? {
        Some(RawNorm::L1) => Some(Norm::L1),
        Some(RawNorm::L2) => Some(Norm::L2),
        Some(RawNorm::None) | None => None,
    })
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            lowercase: true,
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            ngram_range: (1, 1),
            stop_words: None,
            binary: false,
            sublinear_tf: false,
            use_idf: true,
            norm: Some(Norm::L2),
        }
    }
}

#[derive(Deserialize)]
struct RawVectorizerArtifact {
    format_version: u32,
    vocabulary: HashMap<String, usize>,
    #[serde(default)]
    idf: Vec<f64>,
    #[serde(flatten)]
    options: TfidfOptions,
}

/// Fitted TF-IDF transform.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    options: TfidfOptions,
    token_regex: Regex,
}

impl TfidfVectorizer {
    /// Build from fitted parts. `idf` may be empty when `use_idf` is off.
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        options: TfidfOptions,
    ) -> Result<Self> {
        let n_features = vocabulary.len();
        if n_features == 0 {
            return Err(SentimentError::artifact(ARTIFACT, "vocabulary is empty"));
        }

        let mut seen = vec![false; n_features];
        for (term, &index) in &vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(SentimentError::artifact(
                        ARTIFACT,
                        format!("feature index {index} is assigned twice (at '{term}')"),
                    ))
                }
                None => {
                    return Err(SentimentError::artifact(
                        ARTIFACT,
                        format!(
                            "feature index {index} for '{term}' is out of range for {n_features} features"
                        ),
                    ))
                }
            }
        }

        if options.use_idf {
            if idf.len() != n_features {
                return Err(SentimentError::artifact(
                    ARTIFACT,
                    format!(
                        "idf has {} entries but the vocabulary has {n_features}",
                        idf.len()
                    ),
                ));
            }
            if let Some(bad) = idf.iter().position(|w| !w.is_finite()) {
                return Err(SentimentError::artifact(
                    ARTIFACT,
                    format!("idf[{bad}] is not finite"),
                ));
            }
        }

        let (min_n, max_n) = options.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SentimentError::artifact(
                ARTIFACT,
                format!("invalid ngram range ({min_n}, {max_n})"),
            ));
        }

        let token_regex = Regex::new(&options.token_pattern)
            .map_err(|e| SentimentError::artifact(ARTIFACT, format!("token pattern: {e}")))?;
        if token_regex.captures_len() > 2 {
            return Err(SentimentError::artifact(
                ARTIFACT,
                "token pattern has more than one capturing group",
            ));
        }

        Ok(Self {
            vocabulary,
            idf,
            options,
            token_regex,
        })
    }

    /// Parse a JSON vectorizer artifact.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawVectorizerArtifact =
            serde_json::from_str(json).map_err(|e| SentimentError::artifact(ARTIFACT, e))?;
        if raw.format_version != VECTORIZER_FORMAT_VERSION {
            return Err(SentimentError::artifact(
                ARTIFACT,
                format!(
                    "format version {} is not supported (expected {VECTORIZER_FORMAT_VERSION})",
                    raw.format_version
                ),
            ));
        }
        Self::new(raw.vocabulary, raw.idf, raw.options)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SentimentError::artifact(ARTIFACT, format!("{}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn options(&self) -> &TfidfOptions {
        &self.options
    }

    /// Feature index of `term`, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.options.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let mut tokens: Vec<&str> = self
            .token_regex
            .captures_iter(&text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str())
            .collect();
        if let Some(stop_words) = &self.options.stop_words {
            tokens.retain(|t| !stop_words.iter().any(|s| s.as_str() == *t));
        }

        let (min_n, max_n) = self.options.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|gram| gram.join(" ")));
        }
        terms
    }

    /// Weighted, normalized term counts for `text`. Unknown terms are ignored.
    pub fn transform_str(&self, text: &str) -> Vec<f32> {
        let mut row = vec![0.0f64; self.vocabulary.len()];
        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                row[index] += 1.0;
            }
        }

        for (index, value) in row.iter_mut().enumerate() {
            if *value == 0.0 {
                continue;
            }
            if self.options.binary {
                *value = 1.0;
            }
            if self.options.sublinear_tf {
                *value = value.ln() + 1.0;
            }
            if self.options.use_idf {
                *value *= self.idf[index];
            }
        }

        let norm = match self.options.norm {
            Some(Norm::L2) => row.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => row.iter().map(|v| v.abs()).sum::<f64>(),
            None => 0.0,
        };
        if norm > 0.0 {
            row.iter_mut().for_each(|v| *v /= norm);
        }

        row.into_iter().map(|v| v as f32).collect()
    }
}

impl FeatureVectorizer for TfidfVectorizer {
    fn transform(&self, text: &NormalizedText) -> Result<FeatureVector> {
        Ok(FeatureVector::new(self.transform_str(text.as_str())))
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }
}
