pub mod list;
pub mod loader;

pub use list::{DocumentListController, SelectionSet, ViewMode};
pub use loader::{DocumentDetailLoader, LoadFailure, LoadState};
