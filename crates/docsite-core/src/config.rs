//! Configuration management for docsite.
//!
//! Configuration is stored in TOML format and layered:
//!
//! 1. **Built-in defaults** ([`Config::default`])
//! 2. **Config file**: platform config directory (see [`Config::config_path`])
//!    or an explicit path
//! 3. **Environment variables**: `DOCSITE_*` prefix
//!
//! ## Example Configuration File
//!
//! ```toml
//! [source]
//! owner = "hyperfy-xyz"
//! repo = "hyperfy"
//! docs_path = "docs"
//!
//! [branches]
//! default = "main"
//! available = ["main", "dev"]
//!
//! [cache]
//! profile = "production"
//! raw_ttl_secs = 300
//!
//! [search]
//! limit = 10
//! ```

use crate::{Branch, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global configuration for docsite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where documents come from
    pub source: SourceConfig,
    /// Closed set of branches that may be indexed
    pub branches: BranchesConfig,
    /// Freshness windows for the index and raw-fetch caches
    pub cache: CacheConfig,
    /// Query defaults
    pub search: SearchConfig,
}

/// Document source settings.
///
/// The GitHub fields are used unless `local_root` is set, in which case
/// documents are read from `<local_root>/<branch>/<docs_path>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Repository owner on GitHub.
    pub owner: String,
    /// Repository name on GitHub.
    pub repo: String,
    /// Directory inside the repository that holds the documentation tree.
    pub docs_path: String,
    /// Base URL of the contents API.
    pub api_base: String,
    /// Base URL for raw file content.
    pub raw_base: String,
    /// Name of the environment variable holding an optional API token.
    pub token_env: String,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Read documents from this directory instead of GitHub.
    pub local_root: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            owner: "hyperfy-xyz".to_string(),
            repo: "hyperfy".to_string(),
            docs_path: "docs".to_string(),
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            timeout_secs: 30,
            local_root: None,
        }
    }
}

/// The closed set of branches and which one is the default.
///
/// The default branch is served at `/`; every other branch is served under
/// `/<branch>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchesConfig {
    /// Branch served without a route prefix.
    pub default: String,
    /// All branches that may be indexed, including the default.
    pub available: Vec<String>,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        Self {
            default: "main".to_string(),
            available: vec!["main".to_string(), "dev".to_string()],
        }
    }
}

/// Deployment profile that selects the default index freshness window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Interactive use: one hour.
    Development,
    /// Long-running service: 24 hours.
    #[default]
    Production,
}

impl Profile {
    /// Index freshness window for this profile.
    #[must_use]
    pub const fn index_ttl(self) -> Duration {
        match self {
            Self::Development => Duration::from_secs(60 * 60),
            Self::Production => Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Parse a profile name as accepted on the command line and in env vars.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(Error::Config(format!("Unknown profile '{other}'"))),
        }
    }
}

/// Cache freshness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Selects the index freshness window unless `index_ttl_secs` is set.
    pub profile: Profile,
    /// Explicit index freshness window in seconds.
    pub index_ttl_secs: Option<u64>,
    /// Freshness window for memoized listings and raw document text.
    pub raw_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            index_ttl_secs: None,
            raw_ttl_secs: 5 * 60,
        }
    }
}

impl CacheConfig {
    /// Effective index freshness window.
    #[must_use]
    pub fn index_ttl(&self) -> Duration {
        self.index_ttl_secs
            .map_or_else(|| self.profile.index_ttl(), Duration::from_secs)
    }

    /// Effective raw-fetch freshness window.
    #[must_use]
    pub const fn raw_ttl(&self) -> Duration {
        Duration::from_secs(self.raw_ttl_secs)
    }
}

/// Query defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of results returned per query.
    pub limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl Config {
    /// Load configuration from the default location, then apply `DOCSITE_*`
    /// environment overrides.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the global configuration file.
    ///
    /// - Linux: `~/.config/docsite/config.toml`
    /// - macOS: `~/Library/Application Support/dev.docsite.docsite/config.toml`
    /// - Windows: `%APPDATA%\docsite\docsite\config\config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = directories::ProjectDirs::from("dev", "docsite", "docsite")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Recognized keys: `DOCSITE_PROFILE`, `DOCSITE_OWNER`, `DOCSITE_REPO`,
    /// `DOCSITE_LOCAL_ROOT`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(profile) = lookup("DOCSITE_PROFILE") {
            self.cache.profile = Profile::parse(&profile)?;
        }
        if let Some(owner) = lookup("DOCSITE_OWNER") {
            self.source.owner = owner;
        }
        if let Some(repo) = lookup("DOCSITE_REPO") {
            self.source.repo = repo;
        }
        if let Some(root) = lookup("DOCSITE_LOCAL_ROOT") {
            self.source.local_root = Some(PathBuf::from(root));
        }
        Ok(())
    }

    /// Check cross-field constraints the type system can't express.
    pub fn validate(&self) -> Result<()> {
        if self.branches.available.is_empty() {
            return Err(Error::Config("branches.available must not be empty".into()));
        }
        if !self.branches.available.contains(&self.branches.default) {
            return Err(Error::Config(format!(
                "default branch '{}' is not listed in branches.available",
                self.branches.default
            )));
        }
        if self.search.limit == 0 {
            return Err(Error::Config("search.limit must be at least 1".into()));
        }
        Ok(())
    }

    /// The default branch.
    #[must_use]
    pub fn default_branch(&self) -> Branch {
        Branch::new(self.branches.default.clone())
    }

    /// Resolve a branch name against the configured set; `None` selects the
    /// default branch.
    pub fn branch(&self, name: Option<&str>) -> Result<Branch> {
        match name {
            None => Ok(self.default_branch()),
            Some(name) if self.branches.available.iter().any(|b| b == name) => {
                Ok(Branch::new(name))
            },
            Some(name) => Err(Error::UnknownBranch(format!(
                "'{name}' (available: {})",
                self.branches.available.join(", ")
            ))),
        }
    }
}
