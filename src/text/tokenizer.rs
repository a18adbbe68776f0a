// Tokenizer/normalizer — the first stage of every contribution computation.
//
// Turns raw document text into an ordered sequence of normalized terms:
// whitespace split, optional case folding, punctuation stripping, stop-word
// removal, and stemming. It is a pure function of (text, config), so the
// same document always produces the same terms and scores are reproducible.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

use super::stemmer::{SnowballStemmer, TermStemmer};

/// ASCII punctuation is deleted outright, so "state-of-the-art" becomes one
/// term rather than four.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[[:punct:]]+").expect("punctuation pattern is valid"));

/// Normalization options for the tokenizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Fold terms to lower case
    pub lowercase: bool,
    /// Delete punctuation inside terms and trim non-alphanumeric boundaries
    pub strip_punctuation: bool,
    /// Terms to drop, matched against the folded, unstemmed term
    pub stopwords: Option<BTreeSet<String>>,
    /// Collapse morphological variants with the English Snowball stemmer
    pub stemming: bool,
}

impl TokenizerConfig {
    /// English stop-word list from the `stop-words` crate.
    pub fn english_stopwords() -> BTreeSet<String> {
        let words: Vec<String> = get(LANGUAGE::English);
        words.into_iter().collect()
    }

    /// Whitespace split only — every option off.
    pub fn verbatim() -> Self {
        Self {
            lowercase: false,
            strip_punctuation: false,
            stopwords: None,
            stemming: false,
        }
    }
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_punctuation: true,
            stopwords: Some(Self::english_stopwords()),
            stemming: true,
        }
    }
}

/// Deterministic text → terms normalizer.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Option<Box<dyn TermStemmer>>,
}

impl Tokenizer {
    /// Build a tokenizer; `stemming: true` selects the Snowball stemmer.
    pub fn new(config: TokenizerConfig) -> Self {
        let stemmer: Option<Box<dyn TermStemmer>> = if config.stemming {
            Some(Box::new(SnowballStemmer::english()))
        } else {
            None
        };
        Self { config, stemmer }
    }

    /// Build a tokenizer that stems with a caller-supplied stemmer,
    /// regardless of `config.stemming`.
    pub fn with_stemmer(mut config: TokenizerConfig, stemmer: Box<dyn TermStemmer>) -> Self {
        config.stemming = true;
        Self {
            config,
            stemmer: Some(stemmer),
        }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Normalize `text` into its ordered term sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter_map(|raw| self.normalize_term(raw))
            .collect()
    }

    /// Normalize a single whitespace-delimited token; `None` if it is dropped.
    fn normalize_term(&self, raw: &str) -> Option<String> {
        let mut term = if self.config.lowercase {
            raw.to_lowercase()
        } else {
            raw.to_string()
        };

        if self.config.strip_punctuation {
            term = PUNCTUATION.replace_all(&term, "").into_owned();
            // Non-ASCII quotes and dashes survive the ASCII class above
            term = term
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_string();
        }

        if term.is_empty() {
            return None;
        }

        if let Some(stopwords) = &self.config.stopwords {
            if stopwords.contains(&term) {
                return None;
            }
        }

        let term = match &self.stemmer {
            Some(stemmer) => stemmer.stem(&term),
            None => term,
        };

        if term.is_empty() {
            None
        } else {
            Some(term)
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Tokenizer {
        Tokenizer::new(TokenizerConfig {
            lowercase: true,
            strip_punctuation: true,
            stopwords: None,
            stemming: false,
        })
    }

    #[test]
    fn test_folds_case_and_strips_punctuation() {
        let terms = plain().tokenize("Alpha, BETA! (gamma)");
        assert_eq!(terms, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_inner_punctuation_is_deleted() {
        let terms = plain().tokenize("state-of-the-art don't");
        assert_eq!(terms, vec!["stateoftheart", "dont"]);
    }

    #[test]
    fn test_unicode_boundary_punctuation_is_trimmed() {
        let terms = plain().tokenize("“quoted” — café");
        assert_eq!(terms, vec!["quoted", "café"]);
    }

    #[test]
    fn test_stopwords_removed() {
        let tokenizer = Tokenizer::new(TokenizerConfig {
            stemming: false,
            ..TokenizerConfig::default()
        });
        let terms = tokenizer.tokenize("The tfidf of the corpus");
        assert_eq!(terms, vec!["tfidf", "corpus"]);
    }

    #[test]
    fn test_stemming_collapses_variants() {
        let tokenizer = Tokenizer::default();
        let a = tokenizer.tokenize("citations");
        let b = tokenizer.tokenize("citation");
        assert_eq!(a, b);
    }

    #[test]
    fn test_verbatim_keeps_everything() {
        let tokenizer = Tokenizer::new(TokenizerConfig::verbatim());
        let terms = tokenizer.tokenize("The  Cat, sat.");
        assert_eq!(terms, vec!["The", "Cat,", "sat."]);
    }

    #[test]
    fn test_custom_stemmer_is_used() {
        struct Truncate;
        impl TermStemmer for Truncate {
            fn stem(&self, term: &str) -> String {
                term.chars().take(3).collect()
            }
        }

        let tokenizer = Tokenizer::with_stemmer(TokenizerConfig::verbatim(), Box::new(Truncate));
        assert_eq!(tokenizer.tokenize("vector vectors"), vec!["vec", "vec"]);
        assert!(tokenizer.config().stemming);
    }

    #[test]
    fn test_punctuation_only_text_is_empty() {
        assert!(plain().tokenize("... --- !!!").is_empty());
    }
}
