//! Generation pipeline for the quill code generation orchestrator.
//!
//! Given discovered [`Package`](quill_core::Package)s and a [`Registry`] of
//! [`Generator`]s, an [`App`] composes one in-memory buffer per output file
//! and hands the resulting [`BufferSet`] to the two-phase [`commit`]
//! pipeline, which validates every buffer before writing any of them.
//!
//! # Module Organization
//!
//! - [`generator`] - The generator plugin trait
//! - [`registry`] - Name-keyed generator registry
//! - [`imports`] - Order-stable import deduplication
//! - [`sink`] - Byte-counting writer
//! - [`compose`] - Single file composition
//! - [`buffers`] - In-memory output of a run
//! - [`app`] - Fan-out over packages, types and generators
//! - [`commit`] - Validate-then-write pipeline
//! - [`language`] - Target language seam (parser and formatter)
//! - [`testing`] - Test utilities (feature-gated)

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod app;
pub mod buffers;
pub mod commit;
pub mod compose;
mod error;
pub mod generator;
pub mod imports;
pub mod language;
pub mod registry;
pub mod sink;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use app::App;
pub use buffers::{BufferSet, GeneratedBuffer};
pub use commit::{RenderedFile, commit, render, validate_all};
pub use compose::compose;
pub use error::{BoxError, CommitError, Error, OrchestrateError, Result};
pub use generator::Generator;
pub use imports::ImportSet;
pub use language::{SourceLanguage, SyntaxError};
pub use registry::Registry;
pub use sink::CountingWriter;

/// Suffix appended to per-type filenames when the type is test-only.
pub const TEST_SUFFIX: &str = "_test";
