//! Test utilities for generators and languages.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{collections::HashMap, io::Write, path::Path};

use quill_core::{ImportSpec, Package, TypeDecl};

use crate::{BoxError, Generator, SourceLanguage, SyntaxError};

/// Generator with canned bodies per type name.
///
/// Types without a canned body get nothing written. Every declared import
/// is reported for every type.
#[derive(Debug, Clone)]
pub struct FixedGenerator {
    name: String,
    bodies: HashMap<String, String>,
    imports: Vec<ImportSpec>,
}

impl FixedGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bodies: HashMap::new(),
            imports: Vec::new(),
        }
    }

    /// Emit `body` for the type named `ty`.
    pub fn emit(mut self, ty: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(ty.into(), body.into());
        self
    }

    /// Report `spec` as needed for every type.
    pub fn import(mut self, spec: ImportSpec) -> Self {
        self.imports.push(spec);
        self
    }
}

impl Generator for FixedGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn imports(&self, _ty: &TypeDecl) -> Vec<ImportSpec> {
        self.imports.clone()
    }

    fn write_body(&self, out: &mut dyn Write, ty: &TypeDecl) -> Result<(), BoxError> {
        if let Some(body) = self.bodies.get(&ty.name) {
            out.write_all(body.as_bytes())?;
        }
        Ok(())
    }
}

/// Generator that fails with `"{name} failed on {type}"`.
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    name: String,
    only: Option<String>,
}

impl FailingGenerator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            only: None,
        }
    }

    /// Fail only for the type named `ty`, writing nothing for others.
    pub fn only(mut self, ty: impl Into<String>) -> Self {
        self.only = Some(ty.into());
        self
    }
}

impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn imports(&self, _ty: &TypeDecl) -> Vec<ImportSpec> {
        Vec::new()
    }

    fn write_body(&self, _out: &mut dyn Write, ty: &TypeDecl) -> Result<(), BoxError> {
        match &self.only {
            Some(only) if *only != ty.name => Ok(()),
            _ => Err(format!("{} failed on {}", self.name, ty.name).into()),
        }
    }
}

/// Line-oriented language for exercising the pipeline without a real parser.
///
/// - a line starting with `!!invalid` is a syntax error
/// - content containing `!!unformattable` fails normalization
/// - normalization strips trailing whitespace from every line
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainLanguage;

impl SourceLanguage for PlainLanguage {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn package_declaration(&self, package: &str) -> String {
        format!("package {}", package)
    }

    fn render_imports(&self, imports: &[ImportSpec]) -> String {
        imports
            .iter()
            .map(|spec| match &spec.alias {
                Some(alias) => format!("import {} \"{}\"\n", alias, spec.path),
                None => format!("import \"{}\"\n", spec.path),
            })
            .collect()
    }

    fn validate(&self, _filename: &str, content: &[u8]) -> Result<(), SyntaxError> {
        let text = std::str::from_utf8(content).map_err(|e| SyntaxError::new(e.to_string()))?;
        match text.lines().position(|line| line.starts_with("!!invalid")) {
            Some(index) => Err(SyntaxError::new("invalid line").at(index + 1, 0)),
            None => Ok(()),
        }
    }

    fn normalize(&self, _filename: &str, content: &[u8]) -> Result<Vec<u8>, BoxError> {
        let text = std::str::from_utf8(content)?;
        if text.contains("!!unformattable") {
            return Err("cannot format".into());
        }
        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

/// Create a package rooted in a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn temp_package(name: &str) -> std::io::Result<(tempfile::TempDir, Package)> {
    let temp_dir = tempfile::TempDir::new()?;
    let package = Package::new(name, temp_dir.path().join(name));
    Ok((temp_dir, package))
}

/// List the files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Assert that two strings are equal, with a line diff on failure.
pub fn assert_content_eq(expected: &str, actual: &str) {
    if expected != actual {
        let expected_lines: Vec<&str> = expected.lines().collect();
        let actual_lines: Vec<&str> = actual.lines().collect();

        let mut diff = String::new();
        let max_lines = expected_lines.len().max(actual_lines.len());

        for i in 0..max_lines {
            let exp = expected_lines.get(i).copied().unwrap_or("<missing>");
            let act = actual_lines.get(i).copied().unwrap_or("<missing>");

            if exp != act {
                diff.push_str(&format!("Line {}:\n", i + 1));
                diff.push_str(&format!("  expected: {}\n", exp));
                diff.push_str(&format!("  actual:   {}\n", act));
            }
        }

        panic!("Content mismatch:\n{}", diff);
    }
}
