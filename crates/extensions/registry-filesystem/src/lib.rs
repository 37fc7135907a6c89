//! Filesystem registry backend for chainreg.
//!
//! Reads and writes a registry laid out as a directory tree:
//!
//! ```text
//! <root>/
//!   chains/
//!     ethereum/
//!       metadata.yaml
//!       addresses.yaml
//!       logo.svg
//!   deployments/
//!     warp_routes/
//!       USDT/
//!         arbitrum-ethereum-config.yaml
//!         arbitrum-ethereum-deploy.yaml
//! ```

mod error;
mod registry;

pub use error::FileSystemRegistryError;
pub use registry::FileSystemRegistry;
