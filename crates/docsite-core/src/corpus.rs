//! Directory walk and document flattening.
//!
//! [`load_tree`] walks the source's documentation root with an explicit
//! worklist, so deep trees never grow the call stack and each directory
//! listing succeeds or fails on its own. [`load_documents`] turns the tree
//! into [`RawDocument`]s: folders become slug segments, `README.md` stands
//! for its folder, and the corpus root's README becomes the home slug.

use crate::source::DocumentSource;
use crate::{
    Branch, DIRECTORY_INDEX_FILE, Error, HOME_SEGMENT, MARKDOWN_EXTENSION, NodeKind, RawDocument,
    Result, TreeNode,
};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Upper bound on concurrent raw fetches while loading a corpus.
const FETCH_CONCURRENCY: usize = 8;

/// A directory that could not be listed.
#[derive(Debug)]
pub struct WalkFailure {
    /// Repository path of the directory.
    pub path: String,
    /// Why listing it failed.
    pub error: Error,
}

/// Outcome of a tree walk: whatever could be listed, plus per-node failures.
#[derive(Debug)]
pub struct TreeWalk {
    /// Root of the listed tree; failed directories are left empty.
    pub root: TreeNode,
    /// Directories that could not be listed.
    pub failures: Vec<WalkFailure>,
}

impl TreeWalk {
    /// The tree, or `SourceUnavailable` naming every directory that failed.
    pub fn into_result(self) -> Result<TreeNode> {
        if self.failures.is_empty() {
            return Ok(self.root);
        }
        let details: Vec<String> = self
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.path, f.error))
            .collect();
        Err(Error::SourceUnavailable(format!(
            "failed to list {} director{}: {}",
            self.failures.len(),
            if self.failures.len() == 1 { "y" } else { "ies" },
            details.join("; ")
        )))
    }
}

/// Names the walk and the sidebar ignore.
fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

enum Child {
    File(TreeNode),
    Dir(usize),
}

struct PendingDir {
    name: String,
    path: String,
    children: Vec<Child>,
}

/// Walk the documentation tree of `branch`, keeping directories and `.md`
/// files only.
pub async fn load_tree<S>(source: &S, branch: &Branch) -> TreeWalk
where
    S: DocumentSource + ?Sized,
{
    let root_path = source.root_path().trim_matches('/').to_string();
    let root_name = root_path
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("docs")
        .to_string();

    // Parents always precede their children in the arena.
    let mut arena = vec![PendingDir {
        name: root_name,
        path: root_path,
        children: Vec::new(),
    }];
    let mut worklist = vec![0usize];
    let mut failures = Vec::new();

    while let Some(idx) = worklist.pop() {
        let path = arena[idx].path.clone();
        let entries = match source.list_dir(&path, branch).await {
            Ok(entries) => entries,
            Err(error) => {
                warn!(%branch, path = %path, error = %error, "directory listing failed");
                failures.push(WalkFailure { path, error });
                continue;
            },
        };

        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            if is_hidden(&entry.name) {
                debug!(path = %entry.path, "skipping hidden entry");
                continue;
            }
            if entry.is_dir {
                let child_idx = arena.len();
                arena.push(PendingDir {
                    name: entry.name,
                    path: entry.path,
                    children: Vec::new(),
                });
                worklist.push(child_idx);
                children.push(Child::Dir(child_idx));
            } else if entry.name.ends_with(MARKDOWN_EXTENSION) {
                children.push(Child::File(TreeNode::file(entry.name, entry.path)));
            }
        }
        arena[idx].children = children;
    }

    let mut built: Vec<Option<TreeNode>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);
    for idx in (0..arena.len()).rev() {
        let pending = &mut arena[idx];
        let children = std::mem::take(&mut pending.children)
            .into_iter()
            .filter_map(|child| match child {
                Child::File(node) => Some(node),
                Child::Dir(child_idx) => built[child_idx].take(),
            })
            .collect();
        built[idx] = Some(TreeNode {
            name: std::mem::take(&mut pending.name),
            path: std::mem::take(&mut pending.path),
            kind: NodeKind::Dir { children },
        });
    }

    let root = built
        .first_mut()
        .and_then(Option::take)
        .unwrap_or_else(|| TreeNode::dir("docs", ""));
    TreeWalk { root, failures }
}

/// Replace `-` and `_` with spaces.
pub fn humanize(name: &str) -> String {
    name.replace(['-', '_'], " ")
}

/// A document located in the tree but not fetched yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPlan {
    /// Slug the document will be served at.
    pub slug: Vec<String>,
    /// Title derived from the file or folder name.
    pub title: String,
    /// Repository path to fetch.
    pub source_path: String,
    /// Whether the file is its folder's README.
    pub directory_index: bool,
}

/// Flatten a tree into document plans in depth-first listing order.
///
/// When two files claim the same slug the directory-representative one
/// wins and keeps the earlier position.
pub fn plan_documents(root: &TreeNode) -> Vec<DocumentPlan> {
    let mut plans: Vec<DocumentPlan> = Vec::new();
    let mut by_slug: HashMap<Vec<String>, usize> = HashMap::new();

    // (node, slug of the directory containing it)
    let mut stack: Vec<(&TreeNode, Vec<String>)> = Vec::new();
    for child in root.children().iter().rev() {
        stack.push((child, Vec::new()));
    }

    while let Some((node, parent)) = stack.pop() {
        match &node.kind {
            NodeKind::Dir { children } => {
                let mut slug = parent;
                slug.push(node.name.clone());
                for child in children.iter().rev() {
                    stack.push((child, slug.clone()));
                }
            },
            NodeKind::File => {
                let plan = plan_file(node, parent);
                match by_slug.get(&plan.slug) {
                    None => {
                        by_slug.insert(plan.slug.clone(), plans.len());
                        plans.push(plan);
                    },
                    Some(&existing) => {
                        let replace = plan.directory_index && !plans[existing].directory_index;
                        let (kept, dropped) = if replace {
                            (&plan.source_path, &plans[existing].source_path)
                        } else {
                            (&plans[existing].source_path, &plan.source_path)
                        };
                        warn!(
                            slug = %plan.slug.join("/"),
                            %kept,
                            %dropped,
                            "two documents map to the same slug"
                        );
                        if replace {
                            plans[existing] = plan;
                        }
                    },
                }
            },
        }
    }

    plans
}

fn plan_file(node: &TreeNode, parent: Vec<String>) -> DocumentPlan {
    if node.name == DIRECTORY_INDEX_FILE {
        let title = parent
            .last()
            .map_or_else(|| "Home".to_string(), |folder| humanize(folder));
        let slug = if parent.is_empty() {
            vec![HOME_SEGMENT.to_string()]
        } else {
            parent
        };
        return DocumentPlan {
            slug,
            title,
            source_path: node.path.clone(),
            directory_index: true,
        };
    }

    let stem = node
        .name
        .strip_suffix(MARKDOWN_EXTENSION)
        .unwrap_or(&node.name)
        .to_string();
    let mut slug = parent;
    slug.push(stem.clone());
    DocumentPlan {
        slug,
        title: humanize(&stem),
        source_path: node.path.clone(),
        directory_index: false,
    }
}

/// Fetch every planned document. All-or-nothing: any failed fetch fails the
/// whole load.
pub async fn fetch_documents<S>(
    source: &S,
    branch: &Branch,
    plans: Vec<DocumentPlan>,
) -> Result<Vec<RawDocument>>
where
    S: DocumentSource + ?Sized,
{
    let fetched: Vec<(DocumentPlan, Result<String>)> = stream::iter(plans)
        .map(|plan| async move {
            let content = source.fetch_raw(&plan.source_path, branch).await;
            (plan, content)
        })
        .buffered(FETCH_CONCURRENCY)
        .collect()
        .await;

    let mut documents = Vec::with_capacity(fetched.len());
    let mut failed = Vec::new();
    for (plan, content) in fetched {
        match content {
            Ok(content) => documents.push(RawDocument {
                slug: plan.slug,
                title: plan.title,
                content,
                source_path: plan.source_path,
                directory_index: plan.directory_index,
            }),
            Err(err) => failed.push(format!("{}: {err}", plan.source_path)),
        }
    }

    if failed.is_empty() {
        Ok(documents)
    } else {
        Err(Error::SourceUnavailable(format!(
            "failed to fetch {} document(s): {}",
            failed.len(),
            failed.join("; ")
        )))
    }
}

/// Load every document of `branch` from `source`.
pub async fn load_documents<S>(source: &S, branch: &Branch) -> Result<Vec<RawDocument>>
where
    S: DocumentSource + ?Sized,
{
    let tree = load_tree(source, branch).await.into_result()?;
    let plans = plan_documents(&tree);
    let documents = fetch_documents(source, branch, plans).await?;
    info!(%branch, count = documents.len(), "loaded documents");
    Ok(documents)
}

/// Exact slug lookup.
pub fn find_document<'a>(docs: &'a [RawDocument], slug: &[String]) -> Option<&'a RawDocument> {
    docs.iter().find(|doc| doc.slug == slug)
}
