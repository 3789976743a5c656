//! Shared helpers

pub mod paths;

pub use paths::{file_stem, path_stub, resolve_base};
