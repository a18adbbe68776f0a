// Geometry engine — where the target sits relative to what it cites and what
// cites it.
//
// P is the predecessor centroid, S the successor centroid, T the target.
// A target that merely interpolates between prior and later work lies on the
// line through P and S; what it adds shows up as the component of (T - P)
// orthogonal to (S - P):
//
//   λ      = (T - P)·(S - P) / ‖S - P‖²
//   raw    = ‖(T - P) - λ (S - P)‖
//   normal = raw / ‖S - P‖
//
// When P and S coincide the line is undefined and the engine falls back to a
// plain distance between T and P. The fallback is a separate score variant,
// never a silent branch.

use serde::{Deserialize, Serialize};

use crate::vsm::{dot, l2_norm, DocumentVector};

/// ‖S − P‖ at or below this is treated as coinciding centroids.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Metric used when the orthogonal decomposition is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    /// 1 − cosine similarity
    Cosine,
}

impl DistanceMetric {
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            DistanceMetric::Euclidean => euclidean_distance(a, b),
            DistanceMetric::Cosine => cosine_distance(a, b),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Cosine => "cosine",
        }
    }
}

/// Which form of the projection score callers read by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreNormalization {
    /// Orthogonal magnitude in TF-IDF units
    Raw,
    /// Orthogonal magnitude divided by ‖S − P‖ (dimensionless)
    #[default]
    Normalized,
}

/// The contribution score, tagged with how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ContributionScore {
    /// Orthogonal decomposition against the P→S line
    Projection { raw: f64, normalized: f64 },
    /// Fallback distance between T and P (centroids coincide)
    Distance { metric: DistanceMetric, value: f64 },
}

impl ContributionScore {
    /// The scalar score under the given normalization. Distance scores have
    /// a single form and ignore it.
    pub fn value(&self, normalization: ScoreNormalization) -> f64 {
        match (self, normalization) {
            (ContributionScore::Projection { raw, .. }, ScoreNormalization::Raw) => *raw,
            (ContributionScore::Projection { normalized, .. }, ScoreNormalization::Normalized) => {
                *normalized
            }
            (ContributionScore::Distance { value, .. }, _) => *value,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, ContributionScore::Distance { .. })
    }

    pub fn mode(&self) -> &'static str {
        match self {
            ContributionScore::Projection { .. } => "projection",
            ContributionScore::Distance { .. } => "distance",
        }
    }
}

/// Score plus the vectors it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    pub score: ContributionScore,
    pub target: Vec<f64>,
    pub predecessor_centroid: Vec<f64>,
    pub successor_centroid: Vec<f64>,
    /// ‖S − P‖
    pub baseline_length: f64,
    /// Position of the target's foot point on the P→S line (0 at P, 1 at S);
    /// `None` in fallback mode.
    pub projection_coefficient: Option<f64>,
}

/// Componentwise arithmetic mean. An empty set yields an empty vector.
pub fn centroid(vectors: &[&DocumentVector]) -> Vec<f64> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };
    let dim = first.weights.len();
    let mut acc = vec![0.0; dim];
    for v in vectors {
        for (a, w) in acc.iter_mut().zip(&v.weights) {
            *a += w;
        }
    }
    let n = vectors.len() as f64;
    for a in &mut acc {
        *a /= n;
    }
    acc
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// 1 − cos(a, b). A zero vector is maximally distant from anything but
/// another zero vector.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    match (norm_a == 0.0, norm_b == 0.0) {
        (true, true) => 0.0,
        (true, false) | (false, true) => 1.0,
        (false, false) => {
            let cos = (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0);
            1.0 - cos
        }
    }
}

/// Locate the target relative to the predecessor and successor centroids.
pub fn evaluate(
    target: &DocumentVector,
    predecessors: &[&DocumentVector],
    successors: &[&DocumentVector],
    fallback: DistanceMetric,
) -> Geometry {
    let p = centroid(predecessors);
    let s = centroid(successors);
    let t = target.weights.clone();

    let direction: Vec<f64> = s.iter().zip(&p).map(|(s, p)| s - p).collect();
    let offset: Vec<f64> = t.iter().zip(&p).map(|(t, p)| t - p).collect();
    let baseline_length = l2_norm(&direction);

    if baseline_length <= DEGENERATE_EPSILON {
        let value = fallback.distance(&t, &p);
        return Geometry {
            score: ContributionScore::Distance {
                metric: fallback,
                value,
            },
            target: t,
            predecessor_centroid: p,
            successor_centroid: s,
            baseline_length,
            projection_coefficient: None,
        };
    }

    let lambda = dot(&offset, &direction) / (baseline_length * baseline_length);
    let orthogonal: Vec<f64> = offset
        .iter()
        .zip(&direction)
        .map(|(o, d)| o - lambda * d)
        .collect();
    let raw = l2_norm(&orthogonal);

    Geometry {
        score: ContributionScore::Projection {
            raw,
            normalized: raw / baseline_length,
        },
        target: t,
        predecessor_centroid: p,
        successor_centroid: s,
        baseline_length,
        projection_coefficient: Some(lambda),
    }
}
