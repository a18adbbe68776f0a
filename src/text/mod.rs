// Text normalization — raw document text into normalized term sequences.

pub mod stemmer;
pub mod tokenizer;

pub use stemmer::{SnowballStemmer, TermStemmer};
pub use tokenizer::{Tokenizer, TokenizerConfig};
