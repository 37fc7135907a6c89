//! # chainreg Config
//!
//! Configuration for the chainreg CLI: which registries to stack, in which
//! order, and the inline overrides applied on top of them.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigIssue, ConfigValidator, Severity};
