// Typed failures of the contribution engine.
//
// Each variant is raised by the stage that first sees the broken
// precondition and travels to the caller unchanged. A degenerate geometry
// (coinciding centroids) is NOT an error: the geometry engine switches
// metric and reports that through the score variant instead.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContributionError {
    /// Missing or empty target, or an empty predecessor/successor set.
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// Nothing survived tokenization across the whole corpus.
    #[error("Empty vocabulary: no usable terms remain after normalization")]
    EmptyVocabulary,

    /// Two documents in one corpus share an identifier.
    #[error("Duplicate document id: {0}")]
    DuplicateDocument(String),

    /// The pairwise contribution equation has no defined value for the input.
    #[error("Contribution is undefined: {0}")]
    UndefinedContribution(String),
}

pub type Result<T> = std::result::Result<T, ContributionError>;
