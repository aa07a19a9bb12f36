//! WordNet-style lemmatizer.
//!
//! Implements the "morphy" lookup: check the per-class exception list, otherwise
//! peel inflectional endings with detachment rules until a form appears in the
//! lemma index. The shortest surviving candidate wins; a word with no candidate
//! is returned unchanged.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use super::tagger::CoarsePos;
use crate::error::{Result, SentimentError};

/// Lemmatizer artifact format this build understands.
pub const LEMMATIZER_FORMAT_VERSION: u32 = 1;

const ARTIFACT: &str = "lemmatizer";

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const ADJ_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

fn detachment_rules(pos: CoarsePos) -> &'static [(&'static str, &'static str)] {
    match pos {
        CoarsePos::Noun => NOUN_RULES,
        CoarsePos::Verb => VERB_RULES,
        CoarsePos::Adjective => ADJ_RULES,
        CoarsePos::Adverb => &[],
    }
}

#[derive(Deserialize, Default)]
struct PerPos<T> {
    #[serde(default)]
    noun: T,
    #[serde(default)]
    adj: T,
    #[serde(default)]
    verb: T,
    #[serde(default)]
    adv: T,
}

impl<T> PerPos<T> {
    fn into_array(self) -> [T; 4] {
        [self.noun, self.adj, self.verb, self.adv]
    }
}

#[derive(Deserialize)]
struct RawLemmatizerArtifact {
    format_version: u32,
    lemmas: PerPos<Vec<String>>,
    #[serde(default)]
    exceptions: PerPos<HashMap<String, Vec<String>>>,
}

/// Lemma index and exception lists, one table per [`CoarsePos`].
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    lemmas: [HashSet<String>; 4],
    exceptions: [HashMap<String, Vec<String>>; 4],
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register base forms for a word class.
    pub fn with_lemmas<I, S>(mut self, pos: CoarsePos, lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lemmas[pos.index()].extend(lemmas.into_iter().map(Into::into));
        self
    }

    /// Register an irregular form and its base forms.
    pub fn with_exception<S: Into<String>>(
        mut self,
        pos: CoarsePos,
        form: S,
        bases: &[&str],
    ) -> Self {
        self.exceptions[pos.index()].insert(
            form.into(),
            bases.iter().map(|b| b.to_string()).collect(),
        );
        self
    }

    /// Parse a JSON lemmatizer artifact.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawLemmatizerArtifact =
            serde_json::from_str(json).map_err(|e| SentimentError::artifact(ARTIFACT, e))?;
        if raw.format_version != LEMMATIZER_FORMAT_VERSION {
            return Err(SentimentError::artifact(
                ARTIFACT,
                format!(
                    "format version {} is not supported (expected {LEMMATIZER_FORMAT_VERSION})",
                    raw.format_version
                ),
            ));
        }

        let lemmas = raw
            .lemmas
            .into_array()
            .map(|words| words.into_iter().collect::<HashSet<_>>());
        if lemmas.iter().all(HashSet::is_empty) {
            return Err(SentimentError::artifact(ARTIFACT, "lemma index is empty"));
        }

        Ok(Self {
            lemmas,
            exceptions: raw.exceptions.into_array(),
        })
    }

    /// Read and parse a JSON lemmatizer artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SentimentError::artifact(ARTIFACT, format!("{}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    /// Base form of `word` read as `pos`, or `word` itself when nothing matches.
    pub fn lemmatize(&self, word: &str, pos: CoarsePos) -> String {
        self.morphy(word, pos)
            .into_iter()
            .min_by_key(|lemma| lemma.chars().count())
            .unwrap_or_else(|| word.to_string())
    }

    /// Every candidate base form of `form` present in the index.
    pub fn morphy(&self, form: &str, pos: CoarsePos) -> Vec<String> {
        let index = &self.lemmas[pos.index()];
        let rules = detachment_rules(pos);

        let filter_forms = |forms: &[String]| -> Vec<String> {
            let mut seen = HashSet::new();
            forms
                .iter()
                .filter(|f| index.contains(f.as_str()) && seen.insert(f.as_str()))
                .cloned()
                .collect()
        };

        if let Some(bases) = self.exceptions[pos.index()].get(form) {
            let mut forms = vec![form.to_string()];
            forms.extend(bases.iter().cloned());
            return filter_forms(&forms);
        }

        let mut forms = apply_rules(&[form.to_string()], rules);
        let mut candidates = vec![form.to_string()];
        candidates.extend(forms.iter().cloned());
        let results = filter_forms(&candidates);
        if !results.is_empty() {
            return results;
        }

        while !forms.is_empty() {
            forms = apply_rules(&forms, rules);
            let results = filter_forms(&forms);
            if !results.is_empty() {
                return results;
            }
        }

        Vec::new()
    }
}

fn apply_rules(forms: &[String], rules: &[(&str, &str)]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            rules.iter().filter_map(move |(old, new)| {
                form.strip_suffix(old).map(|stem| format!("{stem}{new}"))
            })
        })
        .collect()
}
