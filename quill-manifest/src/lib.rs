//! `quill.toml` parsing and validation.
//!
//! ```toml
//! [generate]
//! directive = "+gen"
//! source = "src"
//! generators = ["display"]
//!
//! [packages."src/models"]
//! single_file = true
//! ```
//!
//! Every section and key is optional; a missing file means defaults.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod file;
mod manifest;
mod validate;

pub use error::{Error, Result, SourceContext};
pub use file::QuillToml;
pub use manifest::{DEFAULT_DIRECTIVE, DEFAULT_SOURCE, GenerateConfig, Manifest, PackageConfig};

/// Name of the manifest file looked up in the working directory.
pub const MANIFEST_FILE: &str = "quill.toml";
