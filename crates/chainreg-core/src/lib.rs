//! # chainreg Core
//!
//! Backend-independent building blocks for chainreg registries.
//!
//! ## Components
//!
//! - [`RegistryCache`] - Listing/metadata/address caches shared by file-backed backends
//! - [`merge`] - Deep merge of key-value trees (later value wins)
//! - [`MergedRegistry`] - Fans reads and writes out to member registries
//! - [`PartialRegistry`] - In-memory override layer
//! - [`ReadOnlyRegistry`] - Decorator that drops writes
//! - [`yaml`] - YAML parsing and schema-header handling

pub mod cache;
pub mod merge;
pub mod merged;
pub mod partial;
pub mod readonly;
pub mod yaml;

pub use cache::RegistryCache;
pub use merge::{deep_merge, merge_all};
pub use merged::MergedRegistry;
pub use partial::{PartialRegistry, PartialRegistryParams};
pub use readonly::ReadOnlyRegistry;
