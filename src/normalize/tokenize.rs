//! Penn Treebank word tokenizer.
//!
//! Splits quotes, punctuation, brackets and English contractions off words the
//! same way the Treebank conventions do (`don't` -> `do n't`, `cannot` -> `can not`,
//! `gonna` -> `gon na`), then splits on whitespace.

use once_cell::sync::Lazy;
use regex::Regex;

type Rule = (Regex, &'static str);

fn rules(patterns: &[(&str, &'static str)]) -> Vec<Rule> {
    patterns
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("treebank pattern is valid"),
                *replacement,
            )
        })
        .collect()
}

static STARTING_QUOTES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (r#"^""#, "``"),
        (r"(``)", " ${1} "),
        (r#"([ (\[{<])("|'{2})"#, "${1} `` "),
    ])
});

static PUNCTUATION: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (r"([:,])([^\d])", " ${1} ${2}"),
        (r"([:,])$", " ${1} "),
        (r"\.\.\.", " ... "),
        (r"[;@#$%&]", " ${0} "),
        (r#"([^.])(\.)([\])}>"']*)\s*$"#, "${1} ${2}${3} "),
        (r"[?!]", " ${0} "),
        (r"([^'])' ", "${1} ' "),
    ])
});

static BRACKETS: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[(r"[\]\[(){}<>]", " ${0} "), (r"--", " -- ")])
});

static ENDING_QUOTES: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (r#"""#, " '' "),
        (r"(\S)('')", "${1} ${2} "),
        (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
        (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
    ])
});

static CONTRACTIONS: Lazy<Vec<Rule>> = Lazy::new(|| {
    rules(&[
        (r"(?i)\b(can)(not)\b", " ${1} ${2} "),
        (r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
        (r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
        (r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
        (r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
        (r"(?i)\b(more)('n)\b", " ${1} ${2} "),
        (r"(?i)\b(wan)(na)\s", " ${1} ${2} "),
        (r"(?i) ('t)(is)\b", " ${1} ${2} "),
        (r"(?i) ('t)(was)\b", " ${1} ${2} "),
    ])
});

/// Stateless Treebank tokenizer. Cheap to copy and safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreebankWordTokenizer;

impl TreebankWordTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize `text` into surface tokens, preserving order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut text = text.to_string();

        for rule_set in [&*STARTING_QUOTES, &*PUNCTUATION, &*BRACKETS] {
            text = apply_rules(rule_set, text);
        }

        // Padding lets the ending-quote and contraction rules see a boundary on both sides.
        text = format!(" {text} ");
        for rule_set in [&*ENDING_QUOTES, &*CONTRACTIONS] {
            text = apply_rules(rule_set, text);
        }

        text.split_whitespace().map(str::to_string).collect()
    }
}

fn apply_rules(rules: &[Rule], mut text: String) -> String {
    for (regex, replacement) in rules {
        text = regex.replace_all(&text, *replacement).into_owned();
    }
    text
}
