//! Command implementations, one module per subcommand.

mod index;
mod links;
mod nav;
mod search;
mod show;

pub use index::execute as index;
pub use links::execute as links;
pub use nav::execute as nav;
pub use search::execute as search;
pub use show::execute as show;

use docsite_core::{Config, HOME_SEGMENT, MARKDOWN_EXTENSION};

/// A document addressed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub branch: Option<String>,
    pub slug: Vec<String>,
}

/// Interpret a route (`/dev/guide/setup`) or slug (`guide/setup.md`).
///
/// Without `--branch`, a leading segment naming a non-default branch selects
/// that branch, mirroring how routes are prefixed. An empty route is home.
pub fn parse_target(target: &str, branch: Option<&str>, config: &Config) -> Target {
    let mut segments: Vec<String> = target
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let mut branch = branch.map(str::to_string);
    if branch.is_none() {
        let prefixed = segments.first().filter(|first| {
            **first != config.branches.default && config.branches.available.contains(first)
        });
        if let Some(first) = prefixed.cloned() {
            segments.remove(0);
            branch = Some(first);
        }
    }

    if let Some(last) = segments.last_mut() {
        if let Some(stem) = last.strip_suffix(MARKDOWN_EXTENSION) {
            *last = stem.to_string();
        }
    }
    if segments.is_empty() {
        segments.push(HOME_SEGMENT.to_string());
    }

    Target {
        branch,
        slug: segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(branch: Option<&str>, slug: &[&str]) -> Target {
        Target {
            branch: branch.map(str::to_string),
            slug: slug.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn test_routes_and_slugs() {
        let config = Config::default();

        assert_eq!(parse_target("/", None, &config), target(None, &["index"]));
        assert_eq!(
            parse_target("/guide/setup", None, &config),
            target(None, &["guide", "setup"])
        );
        assert_eq!(
            parse_target("guide/setup.md", None, &config),
            target(None, &["guide", "setup"])
        );
    }

    #[test]
    fn test_branch_prefix_selects_branch() {
        let config = Config::default();

        assert_eq!(parse_target("/dev", None, &config), target(Some("dev"), &["index"]));
        assert_eq!(
            parse_target("/dev/api", None, &config),
            target(Some("dev"), &["api"])
        );
        // The default branch is never a prefix.
        assert_eq!(parse_target("/main/api", None, &config), target(None, &["main", "api"]));
    }

    #[test]
    fn test_explicit_branch_disables_prefix_detection() {
        let config = Config::default();
        assert_eq!(
            parse_target("/dev/api", Some("main"), &config),
            target(Some("main"), &["dev", "api"])
        );
    }
}
