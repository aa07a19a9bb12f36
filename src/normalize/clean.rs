//! Character-level cleaning applied before tokenization.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http\S+|www\S+").expect("url pattern is valid"));
static MENTION_OR_HASH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\w+|#").expect("mention pattern is valid"));
static NON_LATIN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z\s]").expect("latin pattern is valid"));

/// One cleaning pass. [`CleaningStep::ORDERED`] is the only order the model accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningStep {
    /// Drop anything starting with `http`, `https` or `www` up to the next whitespace.
    StripUrls,
    /// Drop `@mention` tokens and bare `#` characters. Hashtag words stay.
    StripMentions,
    /// Drop every character that is neither an ASCII letter nor whitespace.
    StripNonLatin,
    /// Lowercase what is left.
    Lowercase,
}

impl CleaningStep {
    /// Training-time order.
    pub const ORDERED: [CleaningStep; 4] = [
        CleaningStep::StripUrls,
        CleaningStep::StripMentions,
        CleaningStep::StripNonLatin,
        CleaningStep::Lowercase,
    ];

    /// Apply this step, borrowing the input when nothing changes.
    pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match self {
            CleaningStep::StripUrls => URL_REGEX.replace_all(input, ""),
            CleaningStep::StripMentions => MENTION_OR_HASH_REGEX.replace_all(input, ""),
            CleaningStep::StripNonLatin => NON_LATIN_REGEX.replace_all(input, ""),
            CleaningStep::Lowercase => {
                if input.chars().any(char::is_uppercase) {
                    Cow::Owned(input.to_lowercase())
                } else {
                    Cow::Borrowed(input)
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CleaningStep::StripUrls => "strip_urls",
            CleaningStep::StripMentions => "strip_mentions",
            CleaningStep::StripNonLatin => "strip_non_latin",
            CleaningStep::Lowercase => "lowercase",
        }
    }
}

/// Run every [`CleaningStep`] in order.
pub fn clean(raw: &str) -> String {
    let mut text = raw.to_string();
    for step in CleaningStep::ORDERED {
        if let Cow::Owned(next) = step.apply(&text) {
            text = next;
        }
    }
    text
}
