//! Two-phase commit of generated buffers.
//!
//! Phase one parses every buffer. Only when all of them parse does phase two
//! normalize and write them, one by one. Phase two is not atomic: a failed
//! write leaves the files before it on disk.

use std::path::PathBuf;

use quill_core::write_file;

use crate::{BufferSet, CommitError, Error, GeneratedBuffer, Result, SourceLanguage};

/// A validated and normalized file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// Parse every buffer, stopping at the first one that does not parse.
///
/// # Errors
///
/// Returns [`Error::Syntax`] naming the offending file.
pub fn validate_all(buffers: &BufferSet, language: &dyn SourceLanguage) -> Result<()> {
    for buffer in buffers.iter() {
        validate(&buffer, language)?;
    }
    tracing::debug!(files = buffers.len(), "validated");
    Ok(())
}

/// Validate and normalize every buffer in memory.
pub fn render(buffers: &BufferSet, language: &dyn SourceLanguage) -> Result<Vec<RenderedFile>> {
    validate_all(buffers, language)?;
    buffers
        .iter()
        .map(|buffer| -> Result<RenderedFile> {
            Ok(RenderedFile {
                path: buffer.destination(),
                content: normalize(&buffer, language)?,
            })
        })
        .collect()
}

/// Validate every buffer, then normalize and write each one.
///
/// Returns the written paths in commit order.
///
/// # Errors
///
/// A syntax error aborts before anything is written. A normalization or
/// write error aborts the remaining writes; files already written stay on
/// disk and are listed in [`CommitError::written`].
pub fn commit(
    buffers: &BufferSet,
    language: &dyn SourceLanguage,
) -> std::result::Result<Vec<PathBuf>, CommitError> {
    validate_all(buffers, language).map_err(|source| CommitError {
        written: Vec::new(),
        source,
    })?;

    let mut written = Vec::with_capacity(buffers.len());
    for buffer in buffers.iter() {
        let path = buffer.destination();
        let result = normalize(&buffer, language).and_then(|content| {
            write_file(&path, &content).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })
        });

        if let Err(source) = result {
            tracing::warn!(path = %path.display(), written = written.len(), "commit aborted");
            return Err(CommitError { written, source });
        }

        tracing::info!(path = %path.display(), "wrote");
        written.push(path);
    }

    Ok(written)
}

fn validate(buffer: &GeneratedBuffer<'_>, language: &dyn SourceLanguage) -> Result<()> {
    language
        .validate(buffer.filename, buffer.content)
        .map_err(|err| Error::syntax(buffer.destination(), buffer.content, err))
}

fn normalize(buffer: &GeneratedBuffer<'_>, language: &dyn SourceLanguage) -> Result<Vec<u8>> {
    language
        .normalize(buffer.filename, buffer.content)
        .map_err(|source| Error::Normalize {
            path: buffer.destination(),
            source,
        })
}
