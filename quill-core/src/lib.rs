//! Core types for the quill code generation orchestrator.
//!
//! This crate holds the data every other quill crate agrees on: the
//! discovered packages and annotated types, import specifications, and the
//! filesystem write helper used when committing generated files.

mod file;
mod model;

// File operations
pub use file::write_file;
// Discovered inputs
pub use model::{ImportSpec, Package, TypeDecl};
