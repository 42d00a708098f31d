//! Client side of the document console: a filterable document list, a tabbed
//! viewer backed by a race-safe detail loader, and the API clients they use.

pub mod config;
pub mod controllers;
pub mod models;
pub mod services;
pub mod store;
pub mod viewer;
