//! Brand-level queries over a pre-scored review dataset.
//!
//! Each record carries a brand, the sentiment label assigned offline, an optional
//! aspect tag and the review text. [`ReviewDataset::search`] filters by brand the
//! way the dashboard search box does and summarizes what it finds.
//!
//! ```rust,no_run
//! use review_sentiment::dashboard::{BrandSearch, ReviewDataset};
//!
//! # fn main() -> review_sentiment::Result<()> {
//! let dataset = ReviewDataset::load("analyzed_reviews.json")?;
//! if let BrandSearch::Found(summary) = dataset.search("samsung") {
//!     println!("{}: {} positive, {} negative", summary.brand, summary.positive, summary.negative);
//!     println!("aspects: {}", summary.aspects().join(", "));
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::path::Path;

use regex::RegexBuilder;
use serde::{Deserialize, Deserializer};

use crate::error::{Result, SentimentError};
use crate::sentiment::SentimentLabel;

/// One pre-scored review.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "Brand Name", deserialize_with = "brand_name")]
    pub brand: String,
    /// `None` for labels other than positive/negative.
    #[serde(rename = "Sentiment_Label", default, deserialize_with = "sentiment_label")]
    pub label: Option<SentimentLabel>,
    #[serde(rename = "Aspect", default)]
    pub aspect: Option<String>,
    #[serde(rename = "Reviews", default)]
    pub review: String,
}

fn brand_name<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

fn sentiment_label<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<SentimentLabel>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Outcome of a brand search.
#[derive(Debug, Clone, PartialEq)]
pub enum BrandSearch<'a> {
    /// The query was blank; ask for a brand.
    Prompt,
    /// No brand matched.
    NotFound { query: String },
    Found(BrandSummary<'a>),
}

/// Fraction of positive and negative reviews, for the pie chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentShares {
    pub positive: f64,
    pub negative: f64,
}

/// Reviews of the brands matching one query.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandSummary<'a> {
    /// Brand name of the first match, used as the heading.
    pub brand: &'a str,
    pub reviews: Vec<&'a ReviewRecord>,
    pub positive: usize,
    pub negative: usize,
}

impl<'a> BrandSummary<'a> {
    fn new(reviews: Vec<&'a ReviewRecord>) -> Option<Self> {
        let brand = reviews.first().copied()?.brand.as_str();
        let count = |label: SentimentLabel| reviews.iter().filter(|r| r.label == Some(label)).count();
        Some(Self {
            brand,
            positive: count(SentimentLabel::Positive),
            negative: count(SentimentLabel::Negative),
            reviews,
        })
    }

    /// Distinct aspect tags, in order of first appearance.
    pub fn aspects(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.reviews
            .iter()
            .copied()
            .filter_map(|r| r.aspect.as_deref())
            .filter(|a| seen.insert(*a))
            .collect()
    }

    /// Reviews that carry an aspect tag.
    pub fn reviews_with_aspects(&self) -> Vec<&'a ReviewRecord> {
        self.reviews
            .iter()
            .copied()
            .filter(|r| r.aspect.is_some())
            .collect()
    }

    /// `None` when there is nothing to chart.
    pub fn sentiment_shares(&self) -> Option<SentimentShares> {
        let total = self.positive + self.negative;
        if total == 0 {
            return None;
        }
        Some(SentimentShares {
            positive: self.positive as f64 / total as f64,
            negative: self.negative as f64 / total as f64,
        })
    }
}

/// Pre-scored reviews loaded once and queried many times.
#[derive(Debug, Clone, Default)]
pub struct ReviewDataset {
    records: Vec<ReviewRecord>,
}

impl ReviewDataset {
    pub fn from_records(records: Vec<ReviewRecord>) -> Self {
        Self { records }
    }

    /// Parse a JSON array of records, or one JSON record per line.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let trimmed = text.trim_start();
        let records = if trimmed.starts_with('[') {
            serde_json::from_str(trimmed)
                .map_err(|e| SentimentError::Dataset(format!("invalid review dataset: {e}")))?
        } else {
            trimmed
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(i, line)| {
                    serde_json::from_str(line).map_err(|e| {
                        SentimentError::Dataset(format!("invalid review on line {}: {e}", i + 1))
                    })
                })
                .collect::<Result<Vec<_>>>()?
        };
        Ok(Self { records })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SentimentError::Dataset(format!("failed to read '{}': {e}", path.display()))
        })?;
        let dataset = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), records = dataset.len(), "loaded review dataset");
        Ok(dataset)
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reviews whose brand contains `query`, case-insensitively.
    ///
    /// The query is a regular expression; one that does not compile is matched literally.
    /// Whitespace in the query is significant, but an all-blank query only prompts.
    pub fn search(&self, query: &str) -> BrandSearch<'_> {
        if query.trim().is_empty() {
            return BrandSearch::Prompt;
        }

        let pattern = RegexBuilder::new(query)
            .case_insensitive(true)
            .build()
            .or_else(|_| {
                RegexBuilder::new(&regex::escape(query))
                    .case_insensitive(true)
                    .build()
            });
        let matches: Vec<&ReviewRecord> = match pattern {
            Ok(re) => self.records.iter().filter(|r| re.is_match(&r.brand)).collect(),
            Err(e) => {
                tracing::warn!(query, error = %e, "unusable brand query");
                Vec::new()
            }
        };

        match BrandSummary::new(matches) {
            Some(summary) => BrandSearch::Found(summary),
            None => BrandSearch::NotFound {
                query: query.to_string(),
            },
        }
    }
}
