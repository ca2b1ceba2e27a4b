//! Bookshelf application library
//!
//! Domain modules built on the bookshelf kernel and database crates.

pub mod modules;

/// Re-export commonly used types
pub use modules::*;
