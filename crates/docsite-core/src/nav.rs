//! Sidebar navigation outline built from the documentation tree.

use crate::corpus::humanize;
use crate::index::canonical_route;
use crate::{Branch, DIRECTORY_INDEX_FILE, MARKDOWN_EXTENSION, NodeKind, TreeNode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One row of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavEntry {
    /// A folder with at least one page somewhere below it.
    Folder {
        /// Directory name as listed.
        name: String,
        /// Sorted entries below this folder.
        children: Vec<NavEntry>,
    },
    /// A link to one document.
    Page {
        /// Text shown in the sidebar.
        label: String,
        /// Canonical route of the document.
        route: String,
    },
}

impl NavEntry {
    /// Folder name or page label.
    pub fn label(&self) -> &str {
        match self {
            Self::Folder { name, .. } => name,
            Self::Page { label, .. } => label,
        }
    }
}

/// Directories first, then files, each by case-insensitive name.
fn compare_nodes(a: &TreeNode, b: &TreeNode) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Build the outline for `tree`, which must be the documentation root.
///
/// The root itself is not an entry; its children are the top level.
pub fn build_nav(tree: &TreeNode, branch: &Branch, default_branch: &Branch) -> Vec<NavEntry> {
    let prefix = branch.route_prefix(default_branch);
    outline(tree.children(), &[], prefix.as_deref())
}

fn outline(nodes: &[TreeNode], parent: &[String], prefix: Option<&str>) -> Vec<NavEntry> {
    let mut sorted: Vec<&TreeNode> = nodes.iter().collect();
    sorted.sort_by(|a, b| compare_nodes(a, b));

    sorted
        .into_iter()
        .filter_map(|node| match &node.kind {
            NodeKind::Dir { children } => {
                let mut slug = parent.to_vec();
                slug.push(node.name.clone());
                let children = outline(children, &slug, prefix);
                (!children.is_empty()).then(|| NavEntry::Folder {
                    name: node.name.clone(),
                    children,
                })
            },
            NodeKind::File => Some(page_entry(node, parent, prefix)),
        })
        .collect()
}

fn page_entry(node: &TreeNode, parent: &[String], prefix: Option<&str>) -> NavEntry {
    if node.name == DIRECTORY_INDEX_FILE {
        let folder = parent.last().map_or("Overview", String::as_str);
        return NavEntry::Page {
            label: format!("{folder} (README)"),
            route: canonical_route(parent, prefix),
        };
    }

    let stem = node
        .name
        .strip_suffix(MARKDOWN_EXTENSION)
        .unwrap_or(&node.name);
    let mut slug = parent.to_vec();
    slug.push(stem.to_string());
    NavEntry::Page {
        label: humanize(stem),
        route: canonical_route(&slug, prefix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(name: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            name: name.to_string(),
            path: name.to_string(),
            kind: NodeKind::Dir { children },
        }
    }

    fn file(name: &str) -> TreeNode {
        TreeNode::file(name, name)
    }

    fn sample_tree() -> TreeNode {
        dir(
            "docs",
            vec![
                file("zeta-notes.md"),
                file("README.md"),
                dir("empty", vec![dir("nested", vec![])]),
                dir("guide", vec![file("setup.md"), file("README.md")]),
                file("Alpha_page.md"),
            ],
        )
    }

    #[test]
    fn test_directories_first_then_alphabetical() {
        let main = Branch::new("main");
        let nav = build_nav(&sample_tree(), &main, &main);

        let labels: Vec<_> = nav.iter().map(NavEntry::label).collect();
        assert_eq!(
            labels,
            vec!["guide", "Alpha page", "Overview (README)", "zeta notes"]
        );
    }

    #[test]
    fn test_readme_links_to_folder() {
        let main = Branch::new("main");
        let nav = build_nav(&sample_tree(), &main, &main);

        let NavEntry::Folder { children, .. } = &nav[0] else {
            unreachable!("guide sorts first");
        };
        assert_eq!(
            children[0],
            NavEntry::Page {
                label: "guide (README)".into(),
                route: "/guide".into()
            }
        );
        assert_eq!(
            children[1],
            NavEntry::Page {
                label: "setup".into(),
                route: "/guide/setup".into()
            }
        );
        assert_eq!(
            nav[2],
            NavEntry::Page {
                label: "Overview (README)".into(),
                route: "/".into()
            }
        );
    }

    #[test]
    fn test_routes_carry_branch_prefix() {
        let nav = build_nav(&sample_tree(), &Branch::new("dev"), &Branch::new("main"));
        let NavEntry::Page { route, .. } = &nav[2] else {
            unreachable!("root README is a page");
        };
        assert_eq!(route, "/dev");
        let NavEntry::Page { route, .. } = &nav[3] else {
            unreachable!("zeta notes is a page");
        };
        assert_eq!(route, "/dev/zeta-notes");
    }
}
