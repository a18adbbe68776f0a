// Semantic distance between two texts.
//
// Each pair gets its own two-document TF-IDF space with smoothed IDF (a term
// shared by both texts still counts), the two vectors are L2-normalized
// explicitly, and distance = 1 - cosine similarity. Weights are
// non-negative, so the result lies in [0, 1]: 0 for texts with the same
// normalized term profile, 1 for texts sharing no term.

use tracing::debug;

use crate::corpus::Role;
use crate::error::{ContributionError, Result};
use crate::text::Tokenizer;
use crate::vsm::{dot, normalized, IdfWeighting, VectorSpace};

pub struct DocumentDistance {
    tokenizer: Tokenizer,
}

impl DocumentDistance {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Distance between `a` and `b` in [0, 1].
    pub fn distance(&self, a: &str, b: &str) -> Result<f64> {
        if a.trim().is_empty() || b.trim().is_empty() {
            return Err(ContributionError::EmptyCorpus(
                "one of the texts was empty".to_string(),
            ));
        }

        // Roles are irrelevant here; the space only needs two entries
        let entries = [("a", Role::Predecessor, a), ("b", Role::Successor, b)];
        let space = VectorSpace::from_entries(&entries, &self.tokenizer, IdfWeighting::Smoothed)?;

        let va = normalized(&space.vectors()[0].weights);
        let vb = normalized(&space.vectors()[1].weights);
        let distance = (1.0 - dot(&va, &vb)).clamp(0.0, 1.0);

        debug!(terms = space.dimension(), distance, "Computed document distance");
        Ok(distance)
    }
}

impl Default for DocumentDistance {
    fn default() -> Self {
        Self::new(Tokenizer::default())
    }
}
