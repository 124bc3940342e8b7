use std::{io, path::PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::{BufferSet, SyntaxError};

/// Error type produced by generator plugins and formatters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("a generator named '{name}' is already registered")]
    #[diagnostic(
        code(quill::duplicate_generator),
        help("generator names must be unique within a registry")
    )]
    DuplicateGenerator { name: String },

    #[error("unknown generator '{name}'")]
    #[diagnostic(code(quill::unknown_generator), help("registered generators: {known}"))]
    UnknownGenerator { name: String, known: String },

    #[error("generator '{generator}' failed on '{ty}'")]
    #[diagnostic(code(quill::generator_failed))]
    Generator {
        generator: String,
        ty: String,
        #[source]
        source: BoxError,
    },

    #[error("'{filename}' is produced twice in package '{}'", .package.display())]
    #[diagnostic(
        code(quill::duplicate_output),
        help("two types whose names differ only by case map to the same file")
    )]
    DuplicateOutput { package: PathBuf, filename: String },

    #[error("failed to compose generated output")]
    #[diagnostic(code(quill::sink))]
    Sink(#[source] io::Error),

    #[error("generated file '{}' is not valid source: {message}", .path.display())]
    #[diagnostic(
        code(quill::syntax),
        help("no files were written; fix the generator producing this output")
    )]
    Syntax {
        path: PathBuf,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
    },

    #[error("failed to normalize '{}'", .path.display())]
    #[diagnostic(code(quill::normalize))]
    Normalize {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("failed to write '{}'", .path.display())]
    #[diagnostic(code(quill::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Build a syntax error pointing into the rejected buffer.
    pub fn syntax(path: PathBuf, content: &[u8], err: SyntaxError) -> Self {
        let src = String::from_utf8_lossy(content).into_owned();
        let span = err
            .offset_in(&src)
            .map(|offset| SourceSpan::from((offset, 1)));
        Error::Syntax {
            src: NamedSource::new(path.display().to_string(), src),
            path,
            message: err.message,
            span,
        }
    }
}

/// Orchestration aborted; buffers composed before the failure are kept for
/// diagnostics and are never committed.
#[derive(Debug, Error)]
#[error("generation aborted after composing {} file(s)", .partial.len())]
pub struct OrchestrateError {
    pub partial: BufferSet,
    #[source]
    pub source: Error,
}

/// Commit aborted; `written` lists the files already on disk.
#[derive(Debug, Error)]
#[error("commit aborted after writing {} file(s)", .written.len())]
pub struct CommitError {
    pub written: Vec<PathBuf>,
    #[source]
    pub source: Error,
}
