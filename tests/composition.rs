// Composition tests — the whole pipeline from raw text to score.
//
// These tests exercise the data flow between modules:
//   Tokenizer -> Corpus -> VectorSpace -> Geometry -> Report
// without any filesystem access.

use contribution::corpus::{Role, SourceDocument};
use contribution::geometry::{ContributionScore, DistanceMetric, ScoreNormalization};
use contribution::pipeline::{ContributionPipeline, GeometryOptions};
use contribution::text::{TermStemmer, Tokenizer, TokenizerConfig};
use contribution::ContributionError;

fn unstemmed() -> TokenizerConfig {
    TokenizerConfig {
        stopwords: None,
        stemming: false,
        ..TokenizerConfig::default()
    }
}

fn pipeline(normalization: ScoreNormalization) -> ContributionPipeline {
    ContributionPipeline::new(
        unstemmed(),
        GeometryOptions {
            fallback: DistanceMetric::Euclidean,
            normalization,
        },
    )
}

// ============================================================
// Worked example: "alpha beta gamma" between {alpha beta} and {gamma delta}
// ============================================================

#[test]
fn worked_example_vocabulary_and_weights() {
    let report = pipeline(ScoreNormalization::Raw)
        .compute_texts("alpha beta gamma", &["alpha beta"], &["gamma delta"])
        .unwrap();

    let vocab = report.space.vocabulary();
    assert_eq!(vocab.terms(), &["alpha", "beta", "delta", "gamma"]);

    let idx = |t: &str| vocab.index_of(t).unwrap();
    let pred = report.space.vector("predecessor-0").unwrap();
    let succ = report.space.vector("successor-0").unwrap();
    assert!(pred.weights[idx("alpha")] > 0.0);
    assert!(pred.weights[idx("beta")] > 0.0);
    assert!(succ.weights[idx("gamma")] > 0.0);
    assert!(succ.weights[idx("delta")] > 0.0);
    assert_eq!(pred.weights[idx("delta")], 0.0);
}

#[test]
fn worked_example_score_matches_closed_form() {
    let report = pipeline(ScoreNormalization::Raw)
        .compute_texts("alpha beta gamma", &["alpha beta"], &["gamma delta"])
        .unwrap();

    // alpha, beta, gamma appear in 2 of 3 documents; delta in 1
    let a = (3.0f64 / 2.0).ln();
    let b = 3.0f64.ln();
    // T - P = (0, 0, 0, a) and S - P = (-a, -a, b, a) over (alpha, beta, delta, gamma)
    let baseline_sq = 3.0 * a * a + b * b;
    let raw = (a * a - a.powi(4) / baseline_sq).sqrt();

    match report.score {
        ContributionScore::Projection {
            raw: got_raw,
            normalized,
        } => {
            assert!((got_raw - raw).abs() < 1e-9, "raw {got_raw} vs {raw}");
            assert!(
                (normalized - raw / baseline_sq.sqrt()).abs() < 1e-9,
                "normalized {normalized}"
            );
        }
        other => panic!("expected projection, got {other:?}"),
    }
    assert!((report.value - raw).abs() < 1e-9);
    assert!(!report.degenerate);

    let lambda = report.geometry.projection_coefficient.unwrap();
    assert!((lambda - a * a / baseline_sq).abs() < 1e-9);
}

#[test]
fn normalization_selects_reported_value() {
    let raw = pipeline(ScoreNormalization::Raw)
        .compute_texts("alpha beta gamma", &["alpha beta"], &["gamma delta"])
        .unwrap();
    let normalized = pipeline(ScoreNormalization::Normalized)
        .compute_texts("alpha beta gamma", &["alpha beta"], &["gamma delta"])
        .unwrap();

    assert_eq!(raw.score, normalized.score);
    assert_eq!(raw.value, raw.score.value(ScoreNormalization::Raw));
    assert_eq!(normalized.value, normalized.score.value(ScoreNormalization::Normalized));
    assert!(raw.value > normalized.value, "baseline is longer than 1 here");
}

// ============================================================
// Properties
// ============================================================

#[test]
fn target_copied_into_predecessors_scores_zero() {
    let target = "Semantic contribution replaces citation counting with text geometry";
    let report = ContributionPipeline::default()
        .compute_texts(
            target,
            &[target],
            &["Later studies apply full text similarity to research evaluation"],
        )
        .unwrap();

    assert!(!report.degenerate);
    assert!(report.value.abs() < 1e-9, "expected ~0, got {}", report.value);
}

#[test]
fn identical_single_neighbours_fall_back_to_distance() {
    let report = pipeline(ScoreNormalization::Normalized)
        .compute_texts("shared words novel", &["shared words"], &["shared words"])
        .unwrap();

    assert!(report.degenerate);
    match report.score {
        ContributionScore::Distance { metric, value } => {
            assert_eq!(metric, DistanceMetric::Euclidean);
            // Only "novel" discriminates: tf 1, df 1, N 3
            assert!((value - 3.0f64.ln()).abs() < 1e-12, "got {value}");
        }
        other => panic!("expected distance fallback, got {other:?}"),
    }
    assert_eq!(report.geometry.projection_coefficient, None);
}

#[test]
fn cosine_fallback_is_reported() {
    let pipeline = ContributionPipeline::new(
        unstemmed(),
        GeometryOptions {
            fallback: DistanceMetric::Cosine,
            normalization: ScoreNormalization::Normalized,
        },
    );
    let report = pipeline
        .compute_texts("shared words novel", &["shared words"], &["shared words"])
        .unwrap();

    // P is the zero vector: every predecessor term is ubiquitous
    assert_eq!(
        report.score,
        ContributionScore::Distance {
            metric: DistanceMetric::Cosine,
            value: 1.0
        }
    );
}

#[test]
fn scores_are_finite_and_non_negative() {
    let pipeline = ContributionPipeline::default();
    let cases: [(&str, &[&str], &[&str]); 3] = [
        (
            "Graph neural networks for molecule property prediction",
            &["Convolutional networks on graphs", "Message passing for quantum chemistry"],
            &["Benchmarking graph networks", "Molecular property prediction at scale"],
        ),
        (
            "A survey of open access repositories",
            &["Institutional repositories and their adoption"],
            &["Harvesting metadata from open repositories", "Aggregating research outputs"],
        ),
        (
            "Dark matter halo profiles",
            &["Cosmological simulations of structure"],
            &["Rotation curves of dwarf galaxies"],
        ),
    ];

    for (target, preds, succs) in cases {
        let report = pipeline.compute_texts(target, preds, succs).unwrap();
        assert!(report.value.is_finite(), "{target}: {}", report.value);
        assert!(report.value >= 0.0, "{target}: {}", report.value);
        assert_eq!(report.predecessor_count, preds.len());
        assert_eq!(report.successor_count, succs.len());
    }
}

#[test]
fn identical_inputs_give_bit_identical_results() {
    let pipeline = ContributionPipeline::default();
    let run = || {
        pipeline
            .compute_texts(
                "Topic models of scholarly full texts",
                &["Latent Dirichlet allocation", "Probabilistic topic models"],
                &["Dynamic topic models of science", "Topic evolution in citation networks"],
            )
            .unwrap()
    };
    let first = run();
    let second = run();

    assert_eq!(first.space.vocabulary().terms(), second.space.vocabulary().terms());
    assert_eq!(first.space.vectors(), second.space.vectors());
    assert_eq!(first.value.to_bits(), second.value.to_bits());
    assert_eq!(first.geometry, second.geometry);
}

#[test]
fn every_vector_has_vocabulary_dimension() {
    let report = ContributionPipeline::default()
        .compute_texts(
            "Measuring research novelty",
            &["Novelty detection in text streams", "Research evaluation metrics"],
            &["Novelty indicators for funding decisions"],
        )
        .unwrap();

    let dim = report.space.dimension();
    assert!(dim > 0);
    for v in report.space.vectors() {
        assert_eq!(v.weights.len(), dim, "vector {} has wrong dimension", v.id);
        assert!(v.weights.iter().all(|w| *w >= 0.0));
    }
    assert_eq!(report.geometry.predecessor_centroid.len(), dim);
    assert_eq!(report.geometry.successor_centroid.len(), dim);
}

#[test]
fn roles_are_preserved_in_vectors() {
    let report = ContributionPipeline::default()
        .compute(
            SourceDocument::new("27", "semantic distance between abstracts"),
            vec![
                SourceDocument::new("3", "cosine similarity of tfidf vectors"),
                SourceDocument::new("8", "stemming and stop word removal"),
            ],
            vec![SourceDocument::new("41", "contribution scores for open access papers")],
        )
        .unwrap();

    assert_eq!(report.target_id, "27");
    assert_eq!(report.space.vector("27").unwrap().role, Role::Target);
    assert_eq!(report.space.role_set(Role::Predecessor).len(), 2);
    assert_eq!(report.space.vector("41").unwrap().role, Role::Successor);
}

// ============================================================
// Failures
// ============================================================

#[test]
fn empty_predecessors_fail_with_empty_corpus() {
    let none: [&str; 0] = [];
    let err = ContributionPipeline::default()
        .compute_texts("a real target text", &none, &["a successor"])
        .unwrap_err();
    assert!(matches!(err, ContributionError::EmptyCorpus(_)), "got {err:?}");
}

#[test]
fn stopword_only_corpus_fails_with_empty_vocabulary() {
    let err = ContributionPipeline::default()
        .compute_texts("the and of", &["a the"], &["is of"])
        .unwrap_err();
    assert_eq!(err, ContributionError::EmptyVocabulary);
}

// ============================================================
// Pluggable stemming
// ============================================================

#[test]
fn custom_stemmer_merges_terms() {
    struct Prefix4;
    impl TermStemmer for Prefix4 {
        fn stem(&self, term: &str) -> String {
            term.chars().take(4).collect()
        }
    }

    let pipeline = ContributionPipeline::with_tokenizer(
        Tokenizer::with_stemmer(unstemmed(), Box::new(Prefix4)),
        GeometryOptions::default(),
    );
    let report = pipeline
        .compute_texts("citations citing", &["cited"], &["citation"])
        .unwrap();

    // Four words, three distinct prefixes
    assert_eq!(report.space.vocabulary().terms(), &["cita", "cite", "citi"]);
}
