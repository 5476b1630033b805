//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema shared by the orchestrator and
//! both display processes, plus helpers to resolve the on-disk locations it
//! refers to.

mod load;
mod schema;

pub use load::{resolve_bookmarks_path, resolve_log_dir, resolve_runtime_dir};
pub use schema::*;
