//! Document loading, splitting, lookup, and live reloading

pub mod config;
pub mod current;
pub mod document;
pub mod error;
pub mod file_system;
pub mod separator;
pub mod store;
pub mod watcher;
