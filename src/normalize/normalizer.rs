use std::fmt;
use std::sync::Arc;

use super::clean::clean;
use super::lemmatizer::Lemmatizer;
use super::stopwords::StopwordSet;
use super::tagger::{CoarsePos, PerceptronTagger};
use super::tokenize::TreebankWordTokenizer;

/// Space-joined lowercase lemmas. Possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lemmas in order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedText {
    fn from(value: &str) -> Self {
        NormalizedText(value.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// What happened to one token on its way through the filter.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDecision {
    /// Token after cleaning and tokenization.
    pub surface: String,
    /// Fine-grained tag assigned by the tagger.
    pub tag: String,
    /// Retained word class, `None` when the tag is filtered out.
    pub pos: Option<CoarsePos>,
    pub stopword: bool,
    /// Lemma for kept tokens.
    pub lemma: Option<String>,
}

impl TokenDecision {
    pub fn kept(&self) -> bool {
        self.lemma.is_some()
    }
}

/// Deterministic raw text to lemma string transformation.
///
/// Holds its artifacts behind `Arc` so one normalizer can be shared across
/// threads and pipelines without copying the tagger weights.
#[derive(Debug, Clone)]
pub struct LexicalNormalizer {
    tokenizer: TreebankWordTokenizer,
    tagger: Arc<PerceptronTagger>,
    lemmatizer: Arc<Lemmatizer>,
    stopwords: Arc<StopwordSet>,
}

impl LexicalNormalizer {
    pub fn new(
        tagger: Arc<PerceptronTagger>,
        lemmatizer: Arc<Lemmatizer>,
        stopwords: Arc<StopwordSet>,
    ) -> Self {
        Self {
            tokenizer: TreebankWordTokenizer::new(),
            tagger,
            lemmatizer,
            stopwords,
        }
    }

    pub fn tagger(&self) -> &PerceptronTagger {
        &self.tagger
    }

    /// Run every stage and report the per-token outcome.
    pub fn decisions(&self, raw: &str) -> Vec<TokenDecision> {
        let cleaned = clean(raw);
        let tokens = self.tokenizer.tokenize(&cleaned);
        let tags = self.tagger.tag(&tokens);
        let tagset = self.tagger.tagset();

        tokens
            .iter()
            .zip(tags)
            .map(|(surface, tag)| {
                let stopword = self.stopwords.contains(surface);
                let pos = tagset.coarse(tag);
                let lemma = match pos {
                    Some(pos) if !stopword => Some(self.lemmatizer.lemmatize(surface, pos)),
                    _ => None,
                };
                TokenDecision {
                    surface: surface.clone(),
                    tag: tag.to_string(),
                    pos,
                    stopword,
                    lemma,
                }
            })
            .collect()
    }

    /// Normalize raw review text. Never fails; text with no surviving token yields an empty string.
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let decisions = self.decisions(raw);
        let lemmas: Vec<&str> = decisions
            .iter()
            .filter_map(|d| d.lemma.as_deref())
            .collect();

        tracing::trace!(
            tokens = decisions.len(),
            kept = lemmas.len(),
            "normalized review text"
        );

        NormalizedText(lemmas.join(" "))
    }
}
