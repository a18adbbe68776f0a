// Stemmer trait — swap-ready abstraction.
//
// The tokenizer only needs "term in, root out". Keeping that behind a trait
// means the linguistic library can be replaced (or a lemmatizer plugged in)
// without touching tokenization or anything downstream of it.

use rust_stemmers::{Algorithm, Stemmer};

/// Collapses morphological variants of a term to a shared root.
pub trait TermStemmer: Send + Sync {
    /// Return the root form of an already case-folded term.
    fn stem(&self, term: &str) -> String;
}

/// English Snowball (Porter2) stemmer — the default.
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    pub fn english() -> Self {
        Self {
            inner: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::english()
    }
}

impl TermStemmer for SnowballStemmer {
    fn stem(&self, term: &str) -> String {
        self.inner.stem(term).into_owned()
    }
}
