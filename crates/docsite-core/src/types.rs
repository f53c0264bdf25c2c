use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slug segment reserved for the corpus root's directory-representative file.
pub const HOME_SEGMENT: &str = "index";

/// File that stands in for its containing folder.
pub const DIRECTORY_INDEX_FILE: &str = "README.md";

/// Extension of documents collected from the source.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// An independent, named snapshot of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Branch(String);

impl Branch {
    /// Wrap a branch name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Branch name as configured.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Route prefix for this branch: `None` on the default branch,
    /// `Some("/<branch>")` otherwise.
    pub fn route_prefix(&self, default: &Self) -> Option<String> {
        (self != default).then(|| format!("/{}", self.0))
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True for the reserved home slug `["index"]`.
pub fn is_home_slug(slug: &[String]) -> bool {
    slug.len() == 1 && slug[0] == HOME_SEGMENT
}

/// A document as produced by the document source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Path segments without extension; unique within a branch.
    pub slug: Vec<String>,
    /// Display title derived from the file name.
    pub title: String,
    /// Raw markdown text.
    pub content: String,
    /// Repository path the content was fetched from.
    pub source_path: String,
    /// Whether this document is its folder's representative file.
    pub directory_index: bool,
}

/// Denormalized, searchable form of a [`RawDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Title shown in results.
    pub title: String,
    /// Canonical absolute route, branch-prefixed off the default branch.
    pub route: String,
    /// Sanitized plain text; searched and excerpted, never rendered.
    pub body: String,
    /// Level 1-3 heading texts in order of appearance.
    pub headings: Vec<String>,
}

/// Immutable per-branch search index. Stale indexes are replaced wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Branch the documents were loaded from.
    pub branch: Branch,
    /// Documents in corpus order.
    pub documents: Vec<IndexedDocument>,
    /// When the build finished.
    pub built_at: DateTime<Utc>,
}

impl SearchIndex {
    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when the branch has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// A single ranked hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document title.
    pub title: String,
    /// Canonical route of the document.
    pub path: String,
    /// Plain-text window around the first body match.
    pub excerpt: String,
}

/// What the query boundary hands back to callers.
///
/// Failures never escape as errors; they show up as empty `results` with
/// `error` set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Hits in rank order.
    pub results: Vec<SearchResult>,
    /// Generic failure message; absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// Successful response.
    pub const fn ok(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            error: None,
        }
    }

    /// Response for a failed search: no results.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// One entry of a directory listing returned by a document source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File or directory name.
    pub name: String,
    /// Path relative to the repository root, `/`-separated.
    pub path: String,
    /// True for directories.
    pub is_dir: bool,
}

/// Node of the assembled documentation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// File or directory name.
    pub name: String,
    /// Repository path of the node.
    pub path: String,
    /// File, or directory with children.
    pub kind: NodeKind,
}

/// Whether a [`TreeNode`] is a file or a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// A directory.
    Dir {
        /// Visible children in listing order.
        children: Vec<TreeNode>,
    },
    /// Leaf file.
    File,
}

impl TreeNode {
    /// Empty directory node.
    pub fn dir(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Dir {
                children: Vec::new(),
            },
        }
    }

    /// File node.
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
        }
    }

    /// True for directory nodes.
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Dir { .. })
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[Self] {
        match &self.kind {
            NodeKind::Dir { children } => children,
            NodeKind::File => &[],
        }
    }

    /// Number of file nodes in this subtree.
    pub fn file_count(&self) -> usize {
        match &self.kind {
            NodeKind::File => 1,
            NodeKind::Dir { children } => children.iter().map(Self::file_count).sum(),
        }
    }
}
