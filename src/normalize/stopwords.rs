use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, SentimentError};

/// Fixed English stopword list, one word per line.
#[derive(Debug, Clone, Default)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Parse a word-per-line list. Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Self {
        Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SentimentError::artifact("stopwords", format!("{}: {e}", path.display()))
        })?;
        let set = Self::parse(&text);
        if set.is_empty() {
            return Err(SentimentError::artifact(
                "stopwords",
                format!("{} contains no words", path.display()),
            ));
        }
        Ok(set)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let set = StopwordSet::parse("# english\ni\n\n  the \nIs\n");
        assert_eq!(set.len(), 3);
        assert!(set.contains("the"));
        assert!(set.contains("is"));
        assert!(!set.contains("# english"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = StopwordSet::load("/definitely/not/here/stopwords.txt").unwrap_err();
        assert!(matches!(err, SentimentError::ArtifactLoad { ref artifact, .. } if artifact == "stopwords"));
    }
}
