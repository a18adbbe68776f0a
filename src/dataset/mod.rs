// Dataset loader — extracted texts plus the citation network around them.
//
// Layout on disk:
//   <data_dir>/<id>.txt        one plain-text document per publication
//   <data_dir>/citations.tsv   one "citing<TAB>cited" pair per line
//
// This is the thin collaborator that feeds the engine; it only reads files
// and resolves which documents precede and succeed a target.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::corpus::SourceDocument;

/// Directed citation graph as adjacency lists in both directions.
///
/// Repeated rows collapse to one edge and self-citations are dropped, so a
/// neighbour list never names the same document twice or the document itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationNetwork {
    /// citing -> cited, in first-seen order
    cites: BTreeMap<String, Vec<String>>,
    /// cited -> citing, in first-seen order
    cited_by: BTreeMap<String, Vec<String>>,
    edges: usize,
}

impl CitationNetwork {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read citation network {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid citation network {}", path.display()))
    }

    /// Parse tab-separated `citing<TAB>cited` lines; blank lines are ignored.
    pub fn parse(content: &str) -> Result<Self> {
        let mut network = Self::default();
        let mut seen: BTreeSet<(&str, &str)> = BTreeSet::new();

        for (n, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('\t').map(str::trim);
            let (citing, cited) = match (fields.next(), fields.next()) {
                (Some(citing), Some(cited)) if !citing.is_empty() && !cited.is_empty() => {
                    (citing, cited)
                }
                _ => anyhow::bail!("line {}: expected 'citing<TAB>cited', got '{}'", n + 1, line),
            };

            if citing == cited {
                warn!(line = n + 1, doc = citing, "Self-citation, skipping");
                continue;
            }
            if !seen.insert((citing, cited)) {
                debug!(line = n + 1, citing, cited, "Repeated citation row");
                continue;
            }

            network
                .cites
                .entry(citing.to_string())
                .or_default()
                .push(cited.to_string());
            network
                .cited_by
                .entry(cited.to_string())
                .or_default()
                .push(citing.to_string());
            network.edges += 1;
        }
        Ok(network)
    }

    /// Ids cited by `id`, in file order.
    pub fn predecessors(&self, id: &str) -> &[String] {
        self.cites.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Ids citing `id`, in file order.
    pub fn successors(&self, id: &str) -> &[String] {
        self.cited_by.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every id mentioned in the network, sorted.
    pub fn ids(&self) -> Vec<String> {
        let ids: BTreeSet<&String> = self.cites.keys().chain(self.cited_by.keys()).collect();
        ids.into_iter().cloned().collect()
    }

    /// Number of distinct citation edges.
    pub fn len(&self) -> usize {
        self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges == 0
    }
}

/// Read every `*.txt` file in `dir`; the file stem is the document id.
pub fn load_documents(dir: &Path) -> Result<BTreeMap<String, String>> {
    let mut documents = BTreeMap::new();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read data directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read document {}", path.display()))?;
        documents.insert(id.to_string(), text);
    }

    info!(count = documents.len(), dir = %dir.display(), "Loaded documents");
    Ok(documents)
}

/// Read a target and its neighbours from individual files, as given on the
/// command line.
///
/// Ids are file stems. A stem that is already taken (the same file passed
/// twice, or two files with the same name in different directories) gets a
/// numeric suffix: `paper`, `paper-2`, `paper-3`.
pub fn load_sources(
    target: &Path,
    predecessors: &[PathBuf],
    successors: &[PathBuf],
) -> Result<TargetSources> {
    let mut taken = BTreeSet::new();
    let target = read_source(target, &mut taken)?;
    let predecessors = predecessors
        .iter()
        .map(|p| read_source(p, &mut taken))
        .collect::<Result<Vec<_>>>()?;
    let successors = successors
        .iter()
        .map(|p| read_source(p, &mut taken))
        .collect::<Result<Vec<_>>>()?;
    Ok(TargetSources {
        target,
        predecessors,
        successors,
    })
}

fn read_source(path: &Path, taken: &mut BTreeSet<String>) -> Result<SourceDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());

    let mut id = stem.clone();
    let mut n = 1;
    while taken.contains(&id) {
        n += 1;
        id = format!("{stem}-{n}");
    }
    if n > 1 {
        debug!(path = %path.display(), id = %id, "Renamed colliding document id");
    }
    taken.insert(id.clone());
    Ok(SourceDocument::new(id, text))
}

/// Texts and citation network of one collection.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub documents: BTreeMap<String, String>,
    pub network: CitationNetwork,
}

/// A target with the documents around it, ready for either scoring method.
#[derive(Debug, Clone)]
pub struct TargetSources {
    pub target: SourceDocument,
    pub predecessors: Vec<SourceDocument>,
    pub successors: Vec<SourceDocument>,
}

impl Dataset {
    /// Load `<data_dir>/*.txt` and the citation file.
    pub fn load(data_dir: &Path, citations: &Path) -> Result<Self> {
        let documents = load_documents(data_dir)?;
        let network = CitationNetwork::load(citations)?;
        info!(edges = network.len(), "Loaded citation network");
        Ok(Self { documents, network })
    }

    /// Resolve the texts for `id` and its neighbours. Neighbours without a
    /// text are dropped with a warning; a target without text is an error.
    pub fn sources(&self, id: &str) -> Result<TargetSources> {
        let text = self
            .documents
            .get(id)
            .with_context(|| format!("No text for document '{id}'"))?;

        Ok(TargetSources {
            target: SourceDocument::new(id, text.as_str()),
            predecessors: self.resolve(id, self.network.predecessors(id)),
            successors: self.resolve(id, self.network.successors(id)),
        })
    }

    /// Ids that have text and at least one predecessor and one successor.
    pub fn scorable_ids(&self) -> Vec<String> {
        self.network
            .cites
            .keys()
            .filter(|id| self.network.cited_by.contains_key(*id))
            .filter(|id| self.documents.contains_key(*id))
            .cloned()
            .collect()
    }

    fn resolve(&self, target: &str, ids: &[String]) -> Vec<SourceDocument> {
        ids.iter()
            .filter_map(|id| match self.documents.get(id) {
                Some(text) => Some(SourceDocument::new(id.as_str(), text.as_str())),
                None => {
                    warn!(doc = target, neighbour = %id, "No text for neighbour, skipping");
                    None
                }
            })
            .collect()
    }
}
