//! Rust support for the quill code generation orchestrator.
//!
//! - [`RustLanguage`] - parses generated files with `syn` and normalizes them
//!   with `prettyplease`, dropping unused imports
//! - [`Discovery`] - finds types annotated with the directive marker in doc
//!   comments
//! - [`generators`] - generators shipped with the `quill` binary

mod discover;
mod format;
pub mod generators;
mod language;

pub use discover::Discovery;
pub use format::format_source;
pub use language::RustLanguage;
