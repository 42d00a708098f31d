//! console-core: shared infrastructure for the document console crates.
pub mod config;
pub mod error;
pub mod observability;

pub use error::{ApiError, ErrorKind};
