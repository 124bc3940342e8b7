//! Core operations.
//!
//! This module contains the business logic for quill commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;

use std::path::PathBuf;

pub use check::check;
use eyre::{Context, Result};
pub use generate::generate;
use glob::Pattern;
use quill_codegen::{App, Registry};
use quill_codegen_rust::{Discovery, RustLanguage, generators};
use quill_manifest::QuillToml;

/// Effective settings for one run: the manifest, overridden by flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: PathBuf,
    pub directive: String,
    pub generators: Option<Vec<String>>,
    pub single_file: Vec<PathBuf>,
    pub exclude: Vec<String>,
}

impl Settings {
    /// Settings from quill.toml, with paths resolved against its directory.
    pub fn from_manifest(toml: &QuillToml) -> Self {
        let manifest = toml.manifest();
        Self {
            source: toml.resolve(&manifest.generate.source),
            directive: manifest.generate.directive.clone(),
            generators: manifest.generate.generators.clone(),
            single_file: manifest
                .single_file_dirs()
                .map(|dir| toml.resolve(dir))
                .collect(),
            exclude: manifest.generate.exclude.clone(),
        }
    }

    /// Built-in generators, narrowed to the configured selection.
    pub fn registry(&self) -> Result<Registry> {
        let builtin = generators::builtin()?;
        match &self.generators {
            Some(names) => Ok(builtin.select(names)?),
            None => Ok(builtin),
        }
    }

    /// Discover the source tree and assemble the app.
    pub fn app(&self) -> Result<App> {
        let mut discovery = self
            .single_file
            .iter()
            .fold(Discovery::new(&self.directive), |d, dir| d.single_file(dir));
        for pattern in &self.exclude {
            let pattern = Pattern::new(pattern)
                .wrap_err_with(|| format!("Invalid exclude pattern '{}'", pattern))?;
            discovery = discovery.exclude(pattern);
        }
        let packages = discovery
            .discover(&self.source)
            .wrap_err("Failed to discover annotated types")?;
        tracing::debug!(packages = packages.len(), source = %self.source.display(), "discovered");

        Ok(App::new(
            self.directive.clone(),
            packages,
            self.registry()?,
            RustLanguage,
        ))
    }
}

/// Package and type totals of an app.
pub(crate) fn counts(app: &App) -> (usize, usize) {
    let packages = app.packages().len();
    let types = app.packages().iter().map(|p| p.types().len()).sum();
    (packages, types)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_settings_resolve_against_manifest_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("quill.toml");
        fs::write(
            &path,
            "[generate]\nsource = \"lib\"\n\n[packages.\"lib/models\"]\nsingle_file = true\n",
        )
        .unwrap();

        let settings = Settings::from_manifest(&QuillToml::open(&path).unwrap());

        assert_eq!(settings.source, temp.path().join("lib"));
        assert_eq!(settings.single_file, vec![temp.path().join("lib/models")]);
        assert_eq!(settings.directive, "+gen");
        assert!(settings.exclude.is_empty());
    }

    #[test]
    fn test_exclude_skips_matching_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("user.rs"), "/// +gen\npub struct User;\n").unwrap();
        fs::write(temp.path().join("draft.rs"), "/// +gen\npub struct Draft;\n").unwrap();
        let path = temp.path().join("quill.toml");
        fs::write(&path, "[generate]\nsource = \".\"\nexclude = [\"draft.rs\"]\n").unwrap();

        let app = Settings::from_manifest(&QuillToml::open(&path).unwrap()).app().unwrap();

        let names: Vec<_> = app.packages()[0].types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["User"]);
    }

    #[test]
    fn test_invalid_exclude_flag_rejected() {
        let temp = TempDir::new().unwrap();
        let mut settings =
            Settings::from_manifest(&QuillToml::open_or_default(temp.path().join("quill.toml")).unwrap());
        settings.source = temp.path().to_path_buf();
        settings.exclude = vec!["[abc".to_string()];

        let err = settings.app().unwrap_err();
        assert!(err.to_string().contains("[abc"));
    }

    #[test]
    fn test_unknown_generator_rejected() {
        let temp = TempDir::new().unwrap();
        let mut settings =
            Settings::from_manifest(&QuillToml::open_or_default(temp.path().join("quill.toml")).unwrap());
        settings.generators = Some(vec!["nope".to_string()]);

        let err = settings.registry().unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
