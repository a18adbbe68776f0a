// Pairwise distance contribution — the citation-distance form of the measure.
//
// Instead of locating the target in one shared space, this form compares the
// two groups around it document by document (Knoth & Herrmannova, D-Lib
// Magazine, Nov 2014):
//
//   contribution = (spread_s / spread_p) * mean_distance(P, S)
//
// where mean_distance is the mean semantic distance over all cross-group
// pairs and spread_x is the mean distance within group x. The spreads scale
// the cross-group distance by how diverse each side already is.

pub mod cache;
pub mod distance;

pub use cache::DistanceCache;
pub use distance::DocumentDistance;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::corpus::SourceDocument;
use crate::error::{ContributionError, Result};

/// Result of the pairwise contribution equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairwiseContribution {
    pub value: f64,
    /// Mean distance between predecessors and successors
    pub mean_distance: f64,
    /// Mean distance within the predecessors (1 when either side is a single document)
    pub predecessor_spread: f64,
    /// Mean distance within the successors (1 when either side is a single document)
    pub successor_spread: f64,
}

/// Mean distance over all pairs (a, b) with a from `group_a` and b from
/// `group_b`, skipping pairs of a document with itself.
///
/// Cached distances are reused and new ones are written back. Pairs whose
/// distance cannot be computed (e.g. a text that normalizes to nothing) are
/// skipped; if no pair survives the mean is undefined.
pub fn mean_distance(
    group_a: &[SourceDocument],
    group_b: &[SourceDocument],
    calculator: &DocumentDistance,
    cache: &mut DistanceCache,
) -> Result<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for a in group_a {
        for b in group_b {
            if a.id == b.id {
                continue;
            }
            if let Some(d) = cache.get(&a.id, &b.id) {
                debug!(a = %a.id, b = %b.id, distance = d, "Reusing distance");
                sum += d;
                count += 1;
                continue;
            }
            match calculator.distance(&a.text, &b.text) {
                Ok(d) => {
                    cache.insert(&a.id, &b.id, d);
                    sum += d;
                    count += 1;
                }
                Err(e) => {
                    warn!(a = %a.id, b = %b.id, error = %e, "Could not compute distance, skipping pair");
                }
            }
        }
    }

    if count == 0 {
        return Err(ContributionError::UndefinedContribution(
            "no document pair had a computable distance".to_string(),
        ));
    }
    Ok(sum / count as f64)
}

/// Contribution of a publication from the texts it cites (`predecessors`)
/// and the texts citing it (`successors`).
pub fn contribution(
    predecessors: &[SourceDocument],
    successors: &[SourceDocument],
    calculator: &DocumentDistance,
    cache: &mut DistanceCache,
) -> Result<PairwiseContribution> {
    if predecessors.is_empty() || successors.is_empty() {
        return Err(ContributionError::EmptyCorpus(
            "pairwise contribution needs predecessors and successors".to_string(),
        ));
    }

    let (predecessor_spread, successor_spread) = if predecessors.len() == 1 || successors.len() == 1 {
        debug!("Single predecessor or successor, spread adjustment fixed at 1");
        (1.0, 1.0)
    } else {
        (
            mean_distance(predecessors, predecessors, calculator, cache)?,
            mean_distance(successors, successors, calculator, cache)?,
        )
    };

    let in_unit = |x: f64| x > 0.0 && x <= 1.0;
    if !in_unit(predecessor_spread) || !in_unit(successor_spread) {
        return Err(ContributionError::UndefinedContribution(format!(
            "spread adjustment outside (0, 1]: predecessors {predecessor_spread:.4}, successors {successor_spread:.4}"
        )));
    }

    let mean = mean_distance(predecessors, successors, calculator, cache)?;
    if !(0.0..=1.0).contains(&mean) {
        return Err(ContributionError::UndefinedContribution(format!(
            "mean distance {mean:.4} outside [0, 1]"
        )));
    }

    let value = (successor_spread / predecessor_spread) * mean;
    info!(
        predecessors = predecessors.len(),
        successors = successors.len(),
        mean_distance = format!("{:.4}", mean),
        adjustment = format!("{:.4}", successor_spread / predecessor_spread),
        contribution = format!("{:.4}", value),
        "Computed pairwise contribution"
    );

    Ok(PairwiseContribution {
        value,
        mean_distance: mean,
        predecessor_spread,
        successor_spread,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{Tokenizer, TokenizerConfig};

    fn calculator() -> DocumentDistance {
        DocumentDistance::new(Tokenizer::new(TokenizerConfig {
            stopwords: None,
            stemming: false,
            ..TokenizerConfig::default()
        }))
    }

    fn docs(items: &[(&str, &str)]) -> Vec<SourceDocument> {
        items.iter().map(|(id, t)| SourceDocument::new(*id, *t)).collect()
    }

    #[test]
    fn test_self_pairs_are_skipped() {
        let group = docs(&[("1", "alpha beta"), ("2", "alpha beta")]);
        let mut cache = DistanceCache::new();
        let d = mean_distance(&group, &group, &calculator(), &mut cache).unwrap();
        assert!(d.abs() < 1e-12, "identical texts should be at distance 0, got {d}");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_single_member_sets_use_unit_adjustment() {
        let p = docs(&[("p", "alpha beta")]);
        let s = docs(&[("s1", "gamma delta"), ("s2", "epsilon zeta")]);
        let mut cache = DistanceCache::new();
        let result = contribution(&p, &s, &calculator(), &mut cache).unwrap();
        assert_eq!(result.predecessor_spread, 1.0);
        assert_eq!(result.successor_spread, 1.0);
        // No shared terms anywhere
        assert!((result.value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_spread_is_undefined() {
        let p = docs(&[("p1", "alpha beta"), ("p2", "alpha beta")]);
        let s = docs(&[("s1", "gamma"), ("s2", "delta")]);
        let mut cache = DistanceCache::new();
        let err = contribution(&p, &s, &calculator(), &mut cache).unwrap_err();
        assert!(matches!(err, ContributionError::UndefinedContribution(_)));
    }

    #[test]
    fn test_empty_groups_fail() {
        let s = docs(&[("s", "gamma")]);
        let mut cache = DistanceCache::new();
        let err = contribution(&[], &s, &calculator(), &mut cache).unwrap_err();
        assert!(matches!(err, ContributionError::EmptyCorpus(_)));
    }
}
