// Batch scoring — contribution for many targets of one dataset.
//
// Geometric runs are independent: each target builds its own vocabulary and
// vectors, so they fan out over blocking worker tasks with no coordination.
// Pairwise runs share one distance cache across targets and therefore run in
// sequence.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::pairwise::{self, DistanceCache, DocumentDistance, PairwiseContribution};
use crate::pipeline::{ContributionPipeline, ContributionReport};

/// Geometric result for one target.
pub struct BatchOutcome {
    pub id: String,
    pub result: Result<ContributionReport>,
}

/// Pairwise result for one target.
pub struct PairwiseOutcome {
    pub id: String,
    pub result: Result<PairwiseContribution>,
}

/// Flat, serializable line of a batch report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRow {
    pub id: String,
    pub mode: Option<String>,
    pub value: Option<f64>,
    pub degenerate: Option<bool>,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn row(&self) -> BatchRow {
        match &self.result {
            Ok(report) => BatchRow {
                id: self.id.clone(),
                mode: Some(report.score.mode().to_string()),
                value: Some(report.value),
                degenerate: Some(report.degenerate),
                error: None,
            },
            Err(e) => error_row(&self.id, e),
        }
    }
}

impl PairwiseOutcome {
    pub fn row(&self) -> BatchRow {
        match &self.result {
            Ok(c) => BatchRow {
                id: self.id.clone(),
                mode: Some("pairwise".to_string()),
                value: Some(c.value),
                degenerate: None,
                error: None,
            },
            Err(e) => error_row(&self.id, e),
        }
    }
}

fn error_row(id: &str, e: &anyhow::Error) -> BatchRow {
    BatchRow {
        id: id.to_string(),
        mode: None,
        value: None,
        degenerate: None,
        error: Some(format!("{e:#}")),
    }
}

fn progress_bar(len: usize, label: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!("  {label} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})"))
            .context("Invalid progress bar template")?,
    );
    Ok(pb)
}

/// Score every id in `targets` with the geometric pipeline, `concurrency`
/// targets at a time. Failures are collected per target, not raised.
/// Outcomes come back sorted by id.
pub async fn score_all(
    dataset: Arc<Dataset>,
    pipeline: Arc<ContributionPipeline>,
    targets: Vec<String>,
    concurrency: usize,
) -> Result<Vec<BatchOutcome>> {
    let pb = progress_bar(targets.len(), "Scoring")?;

    let mut outcomes: Vec<BatchOutcome> = stream::iter(targets.into_iter().map(|id| {
        let dataset = Arc::clone(&dataset);
        let pipeline = Arc::clone(&pipeline);
        let pb = pb.clone();
        async move {
            let worker_id = id.clone();
            let joined = tokio::task::spawn_blocking(move || -> Result<ContributionReport> {
                let sources = dataset.sources(&worker_id)?;
                let report =
                    pipeline.compute(sources.target, sources.predecessors, sources.successors)?;
                Ok(report)
            })
            .await;
            pb.inc(1);

            let result = match joined {
                Ok(result) => result,
                Err(e) => Err(anyhow::Error::new(e).context("Scoring task panicked")),
            };
            BatchOutcome { id, result }
        }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect()
    .await;
    pb.finish_and_clear();

    outcomes.sort_by(|a, b| a.id.cmp(&b.id));
    log_summary(outcomes.iter().filter(|o| o.result.is_ok()).count(), outcomes.len());
    for o in &outcomes {
        if let Err(e) = &o.result {
            warn!(doc = %o.id, error = %e, "Failed to score target");
        }
    }
    Ok(outcomes)
}

/// Score every id in `targets` with the pairwise equation, reusing `cache`
/// across targets.
pub fn score_all_pairwise(
    dataset: &Dataset,
    calculator: &DocumentDistance,
    targets: &[String],
    cache: &mut DistanceCache,
) -> Result<Vec<PairwiseOutcome>> {
    let pb = progress_bar(targets.len(), "Comparing")?;
    let mut outcomes = Vec::with_capacity(targets.len());

    for id in targets {
        let result = dataset.sources(id).and_then(|sources| {
            pairwise::contribution(&sources.predecessors, &sources.successors, calculator, cache)
                .map_err(anyhow::Error::from)
        });
        if let Err(e) = &result {
            warn!(doc = %id, error = %e, "Failed to score target");
        }
        outcomes.push(PairwiseOutcome {
            id: id.clone(),
            result,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    outcomes.sort_by(|a, b| a.id.cmp(&b.id));
    log_summary(outcomes.iter().filter(|o| o.result.is_ok()).count(), outcomes.len());
    info!(cached_pairs = cache.len(), "Distance cache size");
    Ok(outcomes)
}

fn log_summary(scored: usize, total: usize) {
    info!(scored, failed = total - scored, "Batch finished");
}
