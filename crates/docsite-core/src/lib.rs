//! # docsite-core
//!
//! Search and rendering for a markdown documentation tree kept in a Git
//! repository, one independent corpus per branch.
//!
//! ## Architecture
//!
//! - **Sources**: [`source::DocumentSource`] lists directories and fetches raw
//!   markdown from GitHub or a local checkout, optionally memoized
//! - **Corpus**: [`corpus`] walks the tree and maps files to slugs
//! - **Indexing**: [`index`] sanitizes documents into a [`SearchIndex`]
//! - **Ranking**: [`search`] scores documents by field containment
//! - **Links**: [`links`] rewrites file-relative hrefs to canonical routes
//! - **Caching**: [`index_cache::IndexCache`] keeps one index per branch,
//!   rebuilt single-flight when stale
//!
//! ## Quick Start
//!
//! ```rust
//! use docsite_core::{Branch, RawDocument, index::index_documents, search::search};
//!
//! let main = Branch::new("main");
//! let docs = vec![RawDocument {
//!     slug: vec!["guide".into(), "networking".into()],
//!     title: "networking".into(),
//!     content: "# Networking\n\nSockets and peers.".into(),
//!     source_path: "docs/guide/networking.md".into(),
//!     directory_index: false,
//! }];
//!
//! let index = index_documents(&main, &docs, &main);
//! let results = search(&index, "sockets", 10);
//! assert_eq!(results[0].path, "/guide/networking");
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, Error>`]. Source failures surface
//! as [`Error::SourceUnavailable`]; the query boundary
//! ([`service::DocsService::search`]) never fails and reports problems in
//! the response instead.

/// Configuration loading and environment overrides
pub mod config;
/// Directory walk and document flattening
pub mod corpus;
/// Error types and result aliases
pub mod error;
/// Search index construction
pub mod index;
/// Per-branch single-flight index cache
pub mod index_cache;
/// In-document link resolution
pub mod links;
/// Markdown rendering and front matter
pub mod markdown;
/// Navigation outline
pub mod nav;
/// Markdown to plain text for indexing
pub mod sanitize;
/// Query scoring and excerpts
pub mod search;
/// Document service facade
pub mod service;
/// Document source backends
pub mod source;
/// Core data types
pub mod types;

pub use config::{CacheConfig, Config, Profile, SourceConfig};
pub use error::{Error, Result};
pub use index_cache::IndexCache;
pub use service::DocsService;
pub use types::*;
