// Vector space model — one shared TF-IDF coordinate space per corpus.
//
// Every document of the corpus is tokenized, the vocabulary is the union of
// all distinct terms, and each (document, term) pair gets the weight
//
//   weight(t, d) = tf(t, d) * idf(t)
//
// with idf(t) = ln(N / df(t)) by default. A term found in every document
// therefore weighs 0 everywhere: it cannot tell documents apart. Vectors are
// dense, share one term → index mapping, and are never normalized here;
// callers that want unit vectors normalize explicitly.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::{Corpus, Role};
use crate::error::{ContributionError, Result};
use crate::text::Tokenizer;

/// Inverse document frequency scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdfWeighting {
    /// `ln(N / df)` — ubiquitous terms weigh exactly 0
    #[default]
    Plain,
    /// `ln((1 + N) / (1 + df)) + 1` — every observed term keeps some weight
    Smoothed,
}

impl IdfWeighting {
    pub fn idf(&self, n_docs: usize, df: usize) -> f64 {
        let n = n_docs as f64;
        let df = df as f64;
        match self {
            IdfWeighting::Plain => (n / df).ln(),
            IdfWeighting::Smoothed => ((1.0 + n) / (1.0 + df)).ln() + 1.0,
        }
    }
}

/// Ordered set of distinct terms; position in the list is the vector index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build from any collection of terms; duplicates collapse and the order
    /// is lexicographic, so the mapping never depends on input order.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = terms.into_iter().map(Into::into).collect();
        let terms: Vec<String> = sorted.into_iter().collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// TF-IDF weights of one document, one component per vocabulary term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentVector {
    pub id: String,
    pub role: Role,
    pub weights: Vec<f64>,
}

impl DocumentVector {
    /// Non-zero components as `(term, weight)` pairs, heaviest first.
    pub fn top_terms<'a>(&self, vocabulary: &'a Vocabulary, n: usize) -> Vec<(&'a str, f64)> {
        let mut pairs: Vec<(&str, f64)> = self
            .weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0.0)
            .filter_map(|(i, w)| vocabulary.term(i).map(|t| (t, *w)))
            .collect();
        pairs.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        pairs.truncate(n);
        pairs
    }
}

/// The shared coordinate space of one corpus.
#[derive(Debug, Clone, Serialize)]
pub struct VectorSpace {
    vocabulary: Vocabulary,
    idf: Vec<f64>,
    vectors: Vec<DocumentVector>,
}

impl VectorSpace {
    /// Build the space with plain `ln(N / df)` weighting.
    pub fn build(corpus: &Corpus, tokenizer: &Tokenizer) -> Result<Self> {
        Self::build_with(corpus, tokenizer, IdfWeighting::Plain)
    }

    pub fn build_with(corpus: &Corpus, tokenizer: &Tokenizer, weighting: IdfWeighting) -> Result<Self> {
        let entries: Vec<(&str, Role, &str)> = corpus
            .documents()
            .iter()
            .map(|d| (d.id(), d.role(), d.text()))
            .collect();
        Self::from_entries(&entries, tokenizer, weighting)
    }

    /// Build from `(id, role, text)` triples that have not gone through
    /// corpus validation. Used for ad-hoc spaces such as pairwise distances.
    pub(crate) fn from_entries(
        entries: &[(&str, Role, &str)],
        tokenizer: &Tokenizer,
        weighting: IdfWeighting,
    ) -> Result<Self> {
        let term_counts: Vec<HashMap<String, usize>> = entries
            .iter()
            .map(|(_, _, text)| {
                let mut counts = HashMap::new();
                for term in tokenizer.tokenize(text) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let vocabulary = Vocabulary::from_terms(term_counts.iter().flat_map(|c| c.keys().cloned()));
        if vocabulary.is_empty() {
            return Err(ContributionError::EmptyVocabulary);
        }

        // Document frequency per term index
        let mut df = vec![0usize; vocabulary.len()];
        for counts in &term_counts {
            for term in counts.keys() {
                if let Some(i) = vocabulary.index_of(term) {
                    df[i] += 1;
                }
            }
        }

        let n_docs = entries.len();
        let idf: Vec<f64> = df.iter().map(|&d| weighting.idf(n_docs, d)).collect();

        let vectors = entries
            .iter()
            .zip(&term_counts)
            .map(|((id, role, _), counts)| {
                let mut weights = vec![0.0; vocabulary.len()];
                for (term, &tf) in counts {
                    if let Some(i) = vocabulary.index_of(term) {
                        weights[i] = tf as f64 * idf[i];
                    }
                }
                DocumentVector {
                    id: (*id).to_string(),
                    role: *role,
                    weights,
                }
            })
            .collect();

        debug!(
            documents = n_docs,
            terms = vocabulary.len(),
            weighting = ?weighting,
            "Built vector space"
        );

        Ok(Self {
            vocabulary,
            idf,
            vectors,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// IDF value per vocabulary index.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn vectors(&self) -> &[DocumentVector] {
        &self.vectors
    }

    pub fn vector(&self, id: &str) -> Option<&DocumentVector> {
        self.vectors.iter().find(|v| v.id == id)
    }

    /// The vectors of one role, in corpus order.
    pub fn role_set(&self, role: Role) -> Vec<&DocumentVector> {
        self.vectors.iter().filter(|v| v.role == role).collect()
    }
}

/// Dot product. Vectors of different length yield 0.0.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Unit-length copy of `v`; the zero vector stays zero.
pub fn normalized(v: &[f64]) -> Vec<f64> {
    let norm = l2_norm(v);
    if norm > 0.0 {
        v.iter().map(|x| x / norm).collect()
    } else {
        v.to_vec()
    }
}
