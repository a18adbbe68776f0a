// Contribution pipeline — one target publication, end to end.
//
// Runs the stages in order:
//   1. Assemble and validate the role-tagged corpus
//   2. Tokenize and build the shared TF-IDF space
//   3. Compute centroids and the target's displacement from the P→S line
//   4. Package the score with everything it was derived from
//
// Every stage is deterministic, so the first error is returned as is; a
// retry would only fail the same way.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::corpus::{Corpus, Role, SourceDocument};
use crate::error::{ContributionError, Result};
use crate::geometry::{self, ContributionScore, DistanceMetric, Geometry, ScoreNormalization};
use crate::text::{Tokenizer, TokenizerConfig};
use crate::vsm::VectorSpace;

/// Knobs of the geometry stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeometryOptions {
    /// Metric used when predecessor and successor centroids coincide
    pub fallback: DistanceMetric,
    /// Which projection value `ContributionReport::value` carries
    pub normalization: ScoreNormalization,
}

/// The result of one contribution computation.
#[derive(Debug, Clone, Serialize)]
pub struct ContributionReport {
    pub target_id: String,
    /// Tagged score: projection or fallback distance
    pub score: ContributionScore,
    /// `score` read under `normalization`
    pub value: f64,
    pub normalization: ScoreNormalization,
    /// True when the fallback distance was used
    pub degenerate: bool,
    pub predecessor_count: usize,
    pub successor_count: usize,
    pub space: VectorSpace,
    pub geometry: Geometry,
}

impl ContributionReport {
    /// Heaviest target terms, handy for explaining a score.
    pub fn top_target_terms(&self, n: usize) -> Vec<(&str, f64)> {
        match self.space.vector(&self.target_id) {
            Some(v) => v.top_terms(self.space.vocabulary(), n),
            None => Vec::new(),
        }
    }
}

/// Tokenizer + geometry options. Holds no per-run state, so one pipeline can
/// serve any number of independent computations, including concurrent ones.
pub struct ContributionPipeline {
    tokenizer: Tokenizer,
    options: GeometryOptions,
}

impl ContributionPipeline {
    pub fn new(tokenizer_config: TokenizerConfig, options: GeometryOptions) -> Self {
        Self::with_tokenizer(Tokenizer::new(tokenizer_config), options)
    }

    pub fn with_tokenizer(tokenizer: Tokenizer, options: GeometryOptions) -> Self {
        Self { tokenizer, options }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn options(&self) -> GeometryOptions {
        self.options
    }

    /// Score a target against identified predecessor and successor documents.
    pub fn compute(
        &self,
        target: SourceDocument,
        predecessors: Vec<SourceDocument>,
        successors: Vec<SourceDocument>,
    ) -> Result<ContributionReport> {
        let corpus = Corpus::assemble(target, predecessors, successors)?;
        self.compute_corpus(&corpus)
    }

    /// Score bare texts; ids are assigned by `Corpus::from_texts`.
    pub fn compute_texts<S: AsRef<str>>(
        &self,
        target: &str,
        predecessors: &[S],
        successors: &[S],
    ) -> Result<ContributionReport> {
        let corpus = Corpus::from_texts(target, predecessors, successors)?;
        self.compute_corpus(&corpus)
    }

    /// Score an already assembled corpus.
    pub fn compute_corpus(&self, corpus: &Corpus) -> Result<ContributionReport> {
        let target_id = corpus.target().id().to_string();
        debug!(doc = %target_id, documents = corpus.len(), "Building vector space");

        let space = VectorSpace::build(corpus, &self.tokenizer)?;

        let predecessors = space.role_set(Role::Predecessor);
        let successors = space.role_set(Role::Successor);
        let target = space
            .role_set(Role::Target)
            .into_iter()
            .next()
            .ok_or_else(|| ContributionError::EmptyCorpus("corpus has no target".to_string()))?;

        let geometry = geometry::evaluate(target, &predecessors, &successors, self.options.fallback);
        let value = geometry.score.value(self.options.normalization);
        let degenerate = geometry.score.is_degenerate();

        info!(
            doc = %target_id,
            predecessors = predecessors.len(),
            successors = successors.len(),
            terms = space.dimension(),
            mode = geometry.score.mode(),
            score = format!("{:.4}", value),
            "Computed contribution"
        );

        let predecessor_count = predecessors.len();
        let successor_count = successors.len();

        Ok(ContributionReport {
            target_id,
            score: geometry.score,
            value,
            normalization: self.options.normalization,
            degenerate,
            predecessor_count,
            successor_count,
            space,
            geometry,
        })
    }
}

impl Default for ContributionPipeline {
    fn default() -> Self {
        Self::new(TokenizerConfig::default(), GeometryOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_texts_basic() {
        let pipeline = ContributionPipeline::default();
        let report = pipeline
            .compute_texts(
                "Citation networks measure influence through semantic similarity",
                &["Citation counting measures influence"],
                &["Semantic similarity of full texts predicts influence"],
            )
            .unwrap();
        assert!(report.value.is_finite());
        assert!(report.value >= 0.0);
        assert_eq!(report.predecessor_count, 1);
        assert_eq!(report.successor_count, 1);
        assert_eq!(report.target_id, "target");
    }

    #[test]
    fn test_errors_pass_through_unchanged() {
        let pipeline = ContributionPipeline::default();
        let none: [&str; 0] = [];
        let err = pipeline.compute_texts("some text", &none, &["other"]).unwrap_err();
        assert_eq!(
            err,
            ContributionError::EmptyCorpus("no predecessor documents".to_string())
        );
    }

    #[test]
    fn test_report_serializes() {
        let pipeline = ContributionPipeline::default();
        let report = pipeline
            .compute_texts(
                "transformer attention",
                &["recurrent attention"],
                &["attention sparsity"],
            )
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["score"]["mode"].is_string());
        assert!(json["space"]["vocabulary"]["terms"].is_array());
    }
}
