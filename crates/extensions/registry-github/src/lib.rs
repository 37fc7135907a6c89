//! GitHub registry backend for chainreg.
//!
//! Serves a registry from a single zip snapshot of a GitHub repository.
//! The snapshot is downloaded once per [`GithubRegistry`] instance,
//! concurrent callers share the same download, and every read is answered
//! from the in-memory [`ArchiveIndex`].

mod archive;
mod error;
mod fetcher;
mod registry;

pub use archive::ArchiveIndex;
pub use error::GithubRegistryError;
pub use fetcher::RateLimitStatus;
pub use registry::{
    GithubRegistry, GithubRegistryOptions, DEFAULT_API_URL, DEFAULT_BRANCH,
    DEFAULT_GITHUB_REGISTRY, RAW_CONTENT_URL,
};
