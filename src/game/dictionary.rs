//! Dictionary sources for word validation
//!
//! A remote lookup is tried first; the embedded fallback list covers the
//! short words a remote dictionary is most likely to miss.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default remote dictionary endpoint. The word is appended as a path segment.
pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// Two-letter words accepted when the remote dictionary is unavailable.
static FALLBACK_WORDS: &[&str] = &[
    "aa", "ab", "ad", "ae", "ag", "ah", "ai", "al", "am", "an", "ar", "as", "at", "aw", "ax", "ay",
    "ba", "be", "bi", "bo", "by",
    "da", "de", "do",
    "ed", "ef", "eh", "el", "em", "en", "er", "es", "et", "ex",
    "fa", "fe",
    "go",
    "ha", "he", "hi", "ho",
    "id", "if", "in", "is", "it",
    "jo",
    "ka", "ki",
    "la", "li", "lo",
    "ma", "me", "mi", "mm", "mo", "mu", "my",
    "na", "ne", "no", "nu",
    "od", "oe", "of", "oh", "oi", "om", "on", "op", "or", "os", "ow", "ox", "oy",
    "pa", "pe", "pi",
    "qi",
    "re",
    "sh", "si", "so",
    "ta", "te", "ti", "to",
    "uh", "um", "un", "up", "us", "ut",
    "we", "wo",
    "xi", "xu",
    "ya", "ye", "yo",
    "za",
];

static FALLBACK: Lazy<HashSet<&'static str>> = Lazy::new(|| FALLBACK_WORDS.iter().copied().collect());

/// Check the embedded fallback list. Case-insensitive.
pub fn in_fallback_list(word: &str) -> bool {
    let lower = word.to_lowercase();
    FALLBACK.contains(lower.as_str())
}

/// Number of words in the fallback list.
pub fn fallback_word_count() -> usize {
    FALLBACK.len()
}

/// Why a remote lookup did not confirm a word.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("word not found")]
    NotFound,
    #[error("dictionary returned status {0}")]
    Status(u16),
    #[error("dictionary request failed: {0}")]
    Transport(String),
    #[error("remote dictionary disabled")]
    Disabled,
}

/// A dictionary capability that may live across the network.
///
/// `Ok(())` means the word was found. Every error is treated the same way
/// by the validator: fall back to the local list.
pub trait DictionaryLookup: Send + Sync {
    fn lookup(&self, word: &str) -> Result<(), LookupError>;
}

/// Dictionary backed by an HTTP endpoint answering `GET {base}/{word}`.
pub struct HttpDictionary {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpDictionary {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url_for(&self, word: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            word.to_lowercase()
        )
    }
}

impl DictionaryLookup for HttpDictionary {
    fn lookup(&self, word: &str) -> Result<(), LookupError> {
        let url = self.url_for(word);
        debug!(%url, "remote dictionary lookup");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(LookupError::NotFound)
        } else {
            Err(LookupError::Status(status.as_u16()))
        }
    }
}

/// Dictionary that never answers, so validation always uses the local list.
pub struct OfflineDictionary;

impl DictionaryLookup for OfflineDictionary {
    fn lookup(&self, _word: &str) -> Result<(), LookupError> {
        Err(LookupError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_short_words_present() {
        for word in ["qi", "za", "xu", "ox", "go"] {
            assert!(in_fallback_list(word), "{} missing", word);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert!(in_fallback_list("QI"));
        assert!(in_fallback_list("Za"));
    }

    #[test]
    fn test_unknown_words() {
        assert!(!in_fallback_list("qq"));
        assert!(!in_fallback_list(""));
        assert!(!in_fallback_list("cat"));
    }

    #[test]
    fn test_fallback_count() {
        assert_eq!(fallback_word_count(), FALLBACK_WORDS.len());
    }

    #[test]
    fn test_offline_always_fails() {
        assert_eq!(OfflineDictionary.lookup("cat"), Err(LookupError::Disabled));
    }

    #[test]
    fn test_url_building() {
        let dict = HttpDictionary::new("http://localhost:1/entries/", Duration::from_millis(10)).unwrap();
        assert_eq!(dict.url_for("QI"), "http://localhost:1/entries/qi");
    }
}
