//! Word validation
//!
//! Checks, in order:
//! - Minimum length (2 characters), before any lookup
//! - Whether the word was already validated this session
//! - Remote dictionary, falling back to the embedded list on any failure
//!
//! The remote step can run off the event thread: `precheck` decides what
//! it can synchronously and `settle` finishes once the lookup result is in.

use super::dictionary::{self, DictionaryLookup, LookupError};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Minimum word length for valid submissions
pub const MIN_WORD_LENGTH: usize = 2;

/// Which source confirmed a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Remote,
    LocalList,
}

/// Outcome of validating a word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Word is valid and newly recorded; a scoring trigger
    Valid { source: Source },
    /// Word is shorter than the minimum; no lookup was attempted
    TooShort { length: usize, minimum: usize },
    /// Neither the remote dictionary nor the local list know the word
    NotInDictionary,
    /// Word was already validated this session; not scored again
    AlreadyValidated,
}

impl ValidationResult {
    /// Returns true if the word should be scored
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    /// Returns a user-facing message for `word`
    pub fn message(&self, word: &str) -> String {
        match self {
            ValidationResult::Valid { .. } => {
                format!("The word \"{}\" is valid and has been validated!", word)
            }
            ValidationResult::TooShort { length, minimum } => format!(
                "The word must contain at least {} letters! ({} placed)",
                minimum, length
            ),
            ValidationResult::NotInDictionary => {
                format!("The word \"{}\" is not valid. Please try again.", word)
            }
            ValidationResult::AlreadyValidated => {
                format!("The word \"{}\" has already been validated.", word)
            }
        }
    }
}

/// Validates words and remembers which ones were accepted this session.
#[derive(Debug, Clone)]
pub struct Validator {
    validated: HashSet<String>,
    min_length: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(MIN_WORD_LENGTH)
    }
}

impl Validator {
    pub fn new(min_length: usize) -> Self {
        Self {
            validated: HashSet::new(),
            min_length,
        }
    }

    /// Decide without a lookup, if possible.
    ///
    /// Returns `None` when the remote dictionary has to be consulted.
    pub fn precheck(&self, word: &str) -> Option<ValidationResult> {
        let length = word.chars().count();
        if length < self.min_length {
            return Some(ValidationResult::TooShort {
                length,
                minimum: self.min_length,
            });
        }
        if self.validated.contains(word) {
            return Some(ValidationResult::AlreadyValidated);
        }
        None
    }

    /// Finish validation given the remote lookup's result.
    ///
    /// The validated set is consulted again, so a word accepted while the
    /// lookup was in flight is not accepted twice.
    pub fn settle(&mut self, word: &str, remote: Result<(), LookupError>) -> ValidationResult {
        if let Some(decided) = self.precheck(word) {
            return decided;
        }
        let source = match remote {
            Ok(()) => Source::Remote,
            Err(e) => {
                warn!(word, error = %e, "remote lookup failed, using local list");
                if !dictionary::in_fallback_list(word) {
                    return ValidationResult::NotInDictionary;
                }
                Source::LocalList
            }
        };
        self.validated.insert(word.to_string());
        debug!(word, ?source, "word validated");
        ValidationResult::Valid { source }
    }

    /// Validate `word` end to end, blocking on the lookup.
    pub fn validate(&mut self, word: &str, dictionary: &dyn DictionaryLookup) -> ValidationResult {
        if let Some(decided) = self.precheck(word) {
            return decided;
        }
        let remote = dictionary.lookup(word);
        self.settle(word, remote)
    }

    /// Forget every validated word.
    pub fn clear(&mut self) {
        self.validated.clear();
    }

    pub fn is_validated(&self, word: &str) -> bool {
        self.validated.contains(word)
    }

    pub fn validated_count(&self) -> usize {
        self.validated.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Lookup double that answers from a fixed list and counts calls.
    struct Scripted {
        known: &'static [&'static str],
        online: bool,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn online(known: &'static [&'static str]) -> Self {
            Self { known, online: true, calls: AtomicUsize::new(0) }
        }

        fn down() -> Self {
            Self { known: &[], online: false, calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DictionaryLookup for Scripted {
        fn lookup(&self, word: &str) -> Result<(), LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.online {
                return Err(LookupError::Transport("connection refused".to_string()));
            }
            if self.known.iter().any(|w| w.eq_ignore_ascii_case(word)) {
                Ok(())
            } else {
                Err(LookupError::NotFound)
            }
        }
    }

    #[test]
    fn test_too_short_skips_lookup() {
        let dict = Scripted::online(&["a"]);
        let mut validator = Validator::default();
        assert_eq!(
            validator.validate("A", &dict),
            ValidationResult::TooShort { length: 1, minimum: 2 }
        );
        assert_eq!(
            validator.validate("", &dict),
            ValidationResult::TooShort { length: 0, minimum: 2 }
        );
        assert_eq!(dict.calls(), 0);
    }

    #[test]
    fn test_remote_valid() {
        let dict = Scripted::online(&["cat"]);
        let mut validator = Validator::default();
        assert_eq!(
            validator.validate("CAT", &dict),
            ValidationResult::Valid { source: Source::Remote }
        );
        assert!(validator.is_validated("CAT"));
    }

    #[test]
    fn test_fallback_when_remote_fails() {
        let dict = Scripted::down();
        let mut validator = Validator::default();
        assert_eq!(
            validator.validate("QI", &dict),
            ValidationResult::Valid { source: Source::LocalList }
        );
        assert_eq!(dict.calls(), 1);
    }

    #[test]
    fn test_fallback_on_not_found() {
        let dict = Scripted::online(&[]);
        let mut validator = Validator::default();
        assert!(validator.validate("ZA", &dict).is_valid());
        assert_eq!(validator.validate("ZZ", &dict), ValidationResult::NotInDictionary);
        assert!(!validator.is_validated("ZZ"));
    }

    #[test]
    fn test_already_validated_short_circuits() {
        let dict = Scripted::online(&["dog"]);
        let mut validator = Validator::default();
        assert!(validator.validate("DOG", &dict).is_valid());
        assert_eq!(validator.validate("DOG", &dict), ValidationResult::AlreadyValidated);
        assert_eq!(dict.calls(), 1);
    }

    #[test]
    fn test_exact_string_memo() {
        let dict = Scripted::online(&["dog"]);
        let mut validator = Validator::default();
        assert!(validator.validate("DOG", &dict).is_valid());
        // Different string, looked up again
        assert!(validator.validate("dog", &dict).is_valid());
        assert_eq!(validator.validated_count(), 2);
    }

    #[test]
    fn test_settle_rechecks_memo() {
        let mut validator = Validator::default();
        assert!(validator.precheck("HI").is_none());
        assert!(validator.settle("HI", Ok(())).is_valid());
        assert_eq!(validator.settle("HI", Ok(())), ValidationResult::AlreadyValidated);
    }

    #[test]
    fn test_clear_forgets_words() {
        let mut validator = Validator::default();
        validator.settle("HI", Ok(()));
        validator.clear();
        assert!(!validator.is_validated("HI"));
        assert_eq!(validator.validated_count(), 0);
    }

    #[test]
    fn test_message_format() {
        assert_eq!(
            ValidationResult::AlreadyValidated.message("CAT"),
            "The word \"CAT\" has already been validated."
        );
        assert_eq!(
            ValidationResult::TooShort { length: 1, minimum: 2 }.message("A"),
            "The word must contain at least 2 letters! (1 placed)"
        );
    }
}
