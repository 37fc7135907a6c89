//! Registry data model.

mod chain;
mod content;
mod warp;

pub use chain::*;
pub use content::*;
pub use warp::*;
