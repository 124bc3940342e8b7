use quill_codegen::{BoxError, SourceLanguage, SyntaxError};
use quill_core::ImportSpec;

use crate::format_source;

/// Rust as the target language of generated files.
///
/// The package declaration is an inner doc comment, since Rust has no
/// package statement; it survives formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustLanguage;

impl SourceLanguage for RustLanguage {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn package_declaration(&self, package: &str) -> String {
        format!("//! Package: {}", package)
    }

    fn render_imports(&self, imports: &[ImportSpec]) -> String {
        imports
            .iter()
            .map(|spec| match &spec.alias {
                Some(alias) => format!("use {} as {};\n", spec.path, alias),
                None => format!("use {};\n", spec.path),
            })
            .collect()
    }

    fn validate(&self, _filename: &str, content: &[u8]) -> Result<(), SyntaxError> {
        let src = std::str::from_utf8(content)
            .map_err(|e| SyntaxError::new(format!("invalid UTF-8: {}", e)))?;
        syn::parse_file(src)
            .map(drop)
            .map_err(|e| syntax_error(&e))
    }

    fn normalize(&self, _filename: &str, content: &[u8]) -> Result<Vec<u8>, BoxError> {
        let src = std::str::from_utf8(content)?;
        format_source(src)
            .map(String::into_bytes)
            .map_err(|e| Box::new(syntax_error(&e)) as BoxError)
    }
}

fn syntax_error(err: &syn::Error) -> SyntaxError {
    let start = err.span().start();
    let error = SyntaxError::new(err.to_string());
    // line 0 means the parser had no position, e.g. at end of input
    if start.line == 0 {
        error
    } else {
        error.at(start.line, start.column)
    }
}
