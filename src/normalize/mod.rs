//! Lexical normalization of raw review text.
//!
//! Turns untrusted free text into the lemma string the vectorizer was fitted on.
//! The stages run in a fixed order: character cleaning, Treebank tokenization,
//! perceptron POS tagging, stopword and POS filtering, then WordNet-style
//! lemmatization.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use review_sentiment::normalize::{Lemmatizer, LexicalNormalizer, PerceptronTagger, StopwordSet};
//!
//! # fn main() -> review_sentiment::Result<()> {
//! let normalizer = LexicalNormalizer::new(
//!     Arc::new(PerceptronTagger::load("artifacts/pos_tagger.json")?),
//!     Arc::new(Lemmatizer::load("artifacts/lemmatizer.json")?),
//!     Arc::new(StopwordSet::load("artifacts/stopwords.txt")?),
//! );
//!
//! let text = normalizer.normalize("Check https://t.co/x @shop, the batteries are AMAZING!!");
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub mod clean;
pub mod lemmatizer;
pub mod normalizer;
pub mod stopwords;
pub mod tagger;
pub mod tokenize;

pub use clean::{clean, CleaningStep};
pub use lemmatizer::Lemmatizer;
pub use normalizer::{LexicalNormalizer, NormalizedText, TokenDecision};
pub use stopwords::StopwordSet;
pub use tagger::{CoarsePos, PerceptronTagger, TagSet};
pub use tokenize::TreebankWordTokenizer;
