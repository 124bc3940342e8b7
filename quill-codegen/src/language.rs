//! Target language seam.
//!
//! The pipeline never looks inside generated code itself. Everything that
//! depends on the target language (file extension, declarations, import
//! syntax, parsing and formatting) goes through [`SourceLanguage`].

use std::fmt;

use quill_core::ImportSpec;

use crate::BoxError;

/// A language generated files are written in.
pub trait SourceLanguage: Send + Sync {
    /// Language identifier (e.g., "rust")
    fn name(&self) -> &'static str;

    /// File extension without the dot (e.g., "rs")
    fn file_extension(&self) -> &'static str;

    /// Prefix for a single-line comment (e.g., "//")
    fn line_comment(&self) -> &'static str {
        "//"
    }

    /// Declaration naming the owning package, without a trailing newline.
    fn package_declaration(&self, package: &str) -> String;

    /// Render a non-empty import list, one line per import.
    fn render_imports(&self, imports: &[ImportSpec]) -> String;

    /// Parse `content` as a standalone source file.
    fn validate(&self, filename: &str, content: &[u8]) -> Result<(), SyntaxError>;

    /// Format validated content and drop unused imports.
    fn normalize(&self, filename: &str, content: &[u8]) -> Result<Vec<u8>, BoxError>;
}

/// A parse failure reported by [`SourceLanguage::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// 1-based line, when the parser reports a location.
    pub line: Option<usize>,
    /// 0-based column in characters.
    pub column: usize,
}

impl SyntaxError {
    /// A syntax error without a location.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: 0,
        }
    }

    /// Attach a location.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = column;
        self
    }

    /// Byte offset of the reported location within `src`.
    pub fn offset_in(&self, src: &str) -> Option<usize> {
        let line = self.line?.checked_sub(1)?;
        let mut offset = 0;
        for (i, text) in src.split_inclusive('\n').enumerate() {
            if i == line {
                let column = text
                    .char_indices()
                    .nth(self.column)
                    .map_or(text.len(), |(idx, _)| idx);
                return Some(offset + column);
            }
            offset += text.len();
        }
        None
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", line, self.column + 1, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_in() {
        let src = "fn a() {}\nfn b( {}\n";
        let err = SyntaxError::new("expected `)`").at(2, 5);
        assert_eq!(err.offset_in(src), Some(15));
    }

    #[test]
    fn test_offset_without_location() {
        assert_eq!(SyntaxError::new("bad").offset_in("x"), None);
    }

    #[test]
    fn test_offset_past_end() {
        let err = SyntaxError::new("eof").at(9, 0);
        assert_eq!(err.offset_in("one line"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SyntaxError::new("bad").at(3, 0).to_string(), "3:1: bad");
        assert_eq!(SyntaxError::new("bad").to_string(), "bad");
    }
}
