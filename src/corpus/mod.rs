// Corpus builder — assembles the documents of one contribution computation.
//
// A corpus is {target} ∪ predecessors ∪ successors, each document tagged
// with its role. Assembly is where the input preconditions are enforced:
// without predecessors there is no baseline to contribute to, and without
// successors there is no direction to contribute in.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ContributionError, Result};

/// The part a document plays relative to the target publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Target,
    /// Cited by the target
    Predecessor,
    /// Cites the target
    Successor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Target => "target",
            Role::Predecessor => "predecessor",
            Role::Successor => "successor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted text as delivered by upstream tooling, before a role is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A role-tagged document inside a corpus. Immutable once assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: String,
    text: String,
    role: Role,
}

impl Document {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Ordered, validated list of role-tagged documents: target first, then
/// predecessors, then successors, each group in input order.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Validate the three roles and assemble them into one corpus.
    pub fn assemble(
        target: SourceDocument,
        predecessors: Vec<SourceDocument>,
        successors: Vec<SourceDocument>,
    ) -> Result<Self> {
        if is_blank(&target.text) {
            return Err(ContributionError::EmptyCorpus(format!(
                "target '{}' has no text",
                target.id
            )));
        }
        check_role_set(&predecessors, Role::Predecessor)?;
        check_role_set(&successors, Role::Successor)?;

        let mut documents = Vec::with_capacity(1 + predecessors.len() + successors.len());
        documents.push(tag(target, Role::Target));
        documents.extend(predecessors.into_iter().map(|d| tag(d, Role::Predecessor)));
        documents.extend(successors.into_iter().map(|d| tag(d, Role::Successor)));

        let mut seen = HashSet::new();
        for doc in &documents {
            if !seen.insert(doc.id.as_str()) {
                return Err(ContributionError::DuplicateDocument(doc.id.clone()));
            }
        }

        Ok(Self { documents })
    }

    /// Assemble from bare texts, assigning ids `target`, `predecessor-<i>`
    /// and `successor-<i>`.
    pub fn from_texts<S: AsRef<str>>(target: &str, predecessors: &[S], successors: &[S]) -> Result<Self> {
        let numbered = |prefix: &str, texts: &[S]| -> Vec<SourceDocument> {
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| SourceDocument::new(format!("{prefix}-{i}"), t.as_ref()))
                .collect()
        };
        Self::assemble(
            SourceDocument::new("target", target),
            numbered("predecessor", predecessors),
            numbered("successor", successors),
        )
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn target(&self) -> &Document {
        // assemble() always places the target first
        &self.documents[0]
    }

    /// Documents with the given role, in corpus order.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(move |d| d.role == role)
    }
}

fn tag(source: SourceDocument, role: Role) -> Document {
    Document {
        id: source.id,
        text: source.text,
        role,
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

fn check_role_set(docs: &[SourceDocument], role: Role) -> Result<()> {
    if docs.is_empty() {
        return Err(ContributionError::EmptyCorpus(format!("no {role} documents")));
    }
    if let Some(blank) = docs.iter().find(|d| is_blank(&d.text)) {
        return Err(ContributionError::EmptyCorpus(format!(
            "{role} '{}' has no text",
            blank.id
        )));
    }
    Ok(())
}
