//! # chainreg Protocols
//!
//! Contract definitions for chainreg registries.
//! Contains the data model, the [`Registry`] trait and the pure path/id
//! codecs every backend shares - no backend implementations.
//!
//! ## Contents
//!
//! - [`Registry`] - Trait every backend implements
//! - [`RegistryContent`] - The listing index all reads are built from
//! - [`content_index`] - Classification of registry file paths
//! - [`warp_id`] - Warp route id codec and filters
//! - [`validation`] - Schema checks for metadata and address maps

pub mod content_index;
pub mod error;
pub mod registry;
pub mod types;
pub mod validation;
pub mod warp_id;

pub use error::RegistryError;
pub use registry::{Registry, RegistryMethod, RegistryType, UpdateChainParams};
pub use types::*;
pub use warp_id::{WarpRouteFilter, WarpRouteId};
