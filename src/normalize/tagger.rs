//! Averaged-perceptron part-of-speech tagger.
//!
//! Inference-only: weights, the frequent-word tag dictionary and the class list
//! come from a fitted artifact. Features follow the classic greedy
//! averaged-perceptron layout (suffixes, first letter, previous tags, a two-word
//! window), so weights exported from a trained tagger of that family load as-is.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SentimentError};

/// Tagger artifact format this build understands.
pub const TAGGER_FORMAT_VERSION: u32 = 1;

const ARTIFACT: &str = "tagger";
const START: [&str; 2] = ["-START-", "-START2-"];
const END: [&str; 2] = ["-END-", "-END2-"];

/// Tag inventory a tagger artifact was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSet {
    /// Penn Treebank tags (`NN`, `JJR`, `VBD`, ...).
    #[default]
    Penn,
    /// Universal dependencies tags (`NOUN`, `ADJ`, ...).
    Universal,
}

/// Word classes that carry sentiment signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoarsePos {
    Noun,
    Adjective,
    Verb,
    Adverb,
}

impl CoarsePos {
    pub(crate) fn index(self) -> usize {
        match self {
            CoarsePos::Noun => 0,
            CoarsePos::Adjective => 1,
            CoarsePos::Verb => 2,
            CoarsePos::Adverb => 3,
        }
    }
}

impl TagSet {
    /// Map a fine-grained tag onto the retained classes, `None` for everything else.
    pub fn coarse(&self, tag: &str) -> Option<CoarsePos> {
        match self {
            TagSet::Penn => match tag.as_bytes().first()? {
                b'J' => Some(CoarsePos::Adjective),
                b'V' => Some(CoarsePos::Verb),
                b'N' => Some(CoarsePos::Noun),
                b'R' => Some(CoarsePos::Adverb),
                _ => None,
            },
            TagSet::Universal => match tag {
                "NOUN" | "PROPN" => Some(CoarsePos::Noun),
                "ADJ" => Some(CoarsePos::Adjective),
                "VERB" | "AUX" => Some(CoarsePos::Verb),
                "ADV" => Some(CoarsePos::Adverb),
                _ => None,
            },
        }
    }
}

#[derive(Deserialize)]
struct RawTaggerArtifact {
    format_version: u32,
    #[serde(default)]
    tagset: TagSet,
    classes: Vec<String>,
    #[serde(default)]
    tagdict: HashMap<String, String>,
    weights: HashMap<String, HashMap<String, f64>>,
}

/// Greedy left-to-right perceptron tagger.
#[derive(Debug, Clone)]
pub struct PerceptronTagger {
    tagset: TagSet,
    /// Sorted ascending; ties resolve to the greatest label.
    classes: Vec<String>,
    tagdict: HashMap<String, usize>,
    weights: HashMap<String, Vec<(usize, f64)>>,
}

impl PerceptronTagger {
    /// Build a tagger from already-fitted parts.
    pub fn from_parts(
        tagset: TagSet,
        classes: Vec<String>,
        tagdict: HashMap<String, String>,
        weights: HashMap<String, HashMap<String, f64>>,
    ) -> Result<Self> {
        let mut classes = classes;
        classes.sort();
        classes.dedup();
        if classes.is_empty() {
            return Err(SentimentError::artifact(ARTIFACT, "class list is empty"));
        }

        let class_index = |tag: &str| -> Result<usize> {
            classes
                .binary_search_by(|c| c.as_str().cmp(tag))
                .map_err(|_| SentimentError::artifact(ARTIFACT, format!("unknown tag '{tag}'")))
        };

        let tagdict = tagdict
            .into_iter()
            .map(|(word, tag)| Ok((word, class_index(&tag)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        let weights = weights
            .into_iter()
            .map(|(feature, per_class)| {
                let mut row = per_class
                    .into_iter()
                    .map(|(tag, weight)| Ok((class_index(&tag)?, weight)))
                    .collect::<Result<Vec<_>>>()?;
                row.sort_by_key(|(class, _)| *class);
                Ok((feature, row))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            tagset,
            classes,
            tagdict,
            weights,
        })
    }

    /// Parse a JSON tagger artifact.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawTaggerArtifact =
            serde_json::from_str(json).map_err(|e| SentimentError::artifact(ARTIFACT, e))?;
        if raw.format_version != TAGGER_FORMAT_VERSION {
            return Err(SentimentError::artifact(
                ARTIFACT,
                format!(
                    "format version {} is not supported (expected {TAGGER_FORMAT_VERSION})",
                    raw.format_version
                ),
            ));
        }
        Self::from_parts(raw.tagset, raw.classes, raw.tagdict, raw.weights)
    }

    /// Read and parse a JSON tagger artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SentimentError::artifact(ARTIFACT, format!("{}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn tagset(&self) -> TagSet {
        self.tagset
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Tag a token sequence. Returns one tag per token, in order.
    pub fn tag(&self, tokens: &[String]) -> Vec<&str> {
        let mut context: Vec<String> = Vec::with_capacity(tokens.len() + 4);
        context.extend(START.iter().map(|s| s.to_string()));
        context.extend(tokens.iter().map(|t| normalize_word(t)));
        context.extend(END.iter().map(|s| s.to_string()));

        let mut prev = START[0];
        let mut prev2 = START[1];
        let mut tags = Vec::with_capacity(tokens.len());

        for (i, word) in tokens.iter().enumerate() {
            let class = match self.tagdict.get(word.as_str()) {
                Some(&class) => class,
                None => {
                    let features = features(i, word, &context, prev, prev2);
                    self.predict(&features)
                }
            };
            let tag = self.classes[class].as_str();
            tags.push(tag);
            prev2 = prev;
            prev = tag;
        }

        tags
    }

    fn predict(&self, features: &BTreeMap<String, u32>) -> usize {
        let mut scores = vec![0.0f64; self.classes.len()];
        for (feature, &count) in features {
            if let Some(row) = self.weights.get(feature) {
                for &(class, weight) in row {
                    scores[class] += f64::from(count) * weight;
                }
            }
        }

        let mut best = 0;
        for (class, &score) in scores.iter().enumerate() {
            if score >= scores[best] {
                best = class;
            }
        }
        best
    }
}

fn normalize_word(word: &str) -> String {
    let first = word.chars().next();
    if word.contains('-') && first != Some('-') {
        "!HYPHEN".to_string()
    } else if word.chars().count() == 4 && word.chars().all(|c| c.is_ascii_digit()) {
        "!YEAR".to_string()
    } else if first.is_some_and(|c| c.is_ascii_digit()) {
        "!DIGITS".to_string()
    } else {
        word.to_lowercase()
    }
}

fn suffix(word: &str, n: usize) -> &str {
    match word.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &word[idx..],
        None => word,
    }
}

fn prefix1(word: &str) -> &str {
    match word.chars().next() {
        Some(c) => &word[..c.len_utf8()],
        None => "",
    }
}

fn features(
    i: usize,
    word: &str,
    context: &[String],
    prev: &str,
    prev2: &str,
) -> BTreeMap<String, u32> {
    let mut features = BTreeMap::new();
    let mut add = |parts: &[&str]| {
        *features.entry(parts.join(" ")).or_insert(0) += 1;
    };

    let i = i + START.len();
    add(&["bias"]);
    add(&["i suffix", suffix(word, 3)]);
    add(&["i pref1", prefix1(word)]);
    add(&["i-1 tag", prev]);
    add(&["i-2 tag", prev2]);
    add(&["i tag+i-2 tag", prev, prev2]);
    add(&["i word", context[i].as_str()]);
    add(&["i-1 tag+i word", prev, context[i].as_str()]);
    add(&["i-1 word", context[i - 1].as_str()]);
    add(&["i-1 suffix", suffix(&context[i - 1], 3)]);
    add(&["i-2 word", context[i - 2].as_str()]);
    add(&["i+1 word", context[i + 1].as_str()]);
    add(&["i+1 suffix", suffix(&context[i + 1], 3)]);
    add(&["i+2 word", context[i + 2].as_str()]);
    features
}
