use std::{collections::BTreeMap, path::PathBuf, str::FromStr};

use serde::Deserialize;

use crate::{Error, Result, SourceContext, validate};

pub const DEFAULT_DIRECTIVE: &str = "+gen";
pub const DEFAULT_SOURCE: &str = "src";

/// Root of quill.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub generate: GenerateConfig,

    /// Per-package settings keyed by directory, relative to the manifest
    #[serde(default)]
    pub packages: BTreeMap<String, PackageConfig>,
}

/// The `[generate]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    /// Marker looked for in doc comments
    #[serde(default = "default_directive")]
    pub directive: String,

    /// Discovery root, relative to the manifest
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Generators to run, in order. All built-ins when absent.
    #[serde(default)]
    pub generators: Option<Vec<String>>,

    /// Glob patterns, relative to `source`, of files and directories to skip
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            directive: default_directive(),
            source: default_source(),
            generators: None,
            exclude: Vec::new(),
        }
    }
}

fn default_directive() -> String {
    DEFAULT_DIRECTIVE.to_string()
}

fn default_source() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE)
}

/// A `[packages."<dir>"]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageConfig {
    /// One file per generator for the whole package
    #[serde(default)]
    pub single_file: bool,
}

impl Manifest {
    /// Parse a quill.toml file from the given path.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a quill.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let manifest: Manifest = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
        validate::validate_manifest(&manifest, &ctx)?;
        Ok(manifest)
    }

    /// Directories configured with `single_file = true`.
    pub fn single_file_dirs(&self) -> impl Iterator<Item = &str> {
        self.packages
            .iter()
            .filter(|(_, config)| config.single_file)
            .map(|(dir, _)| dir.as_str())
    }
}

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, crate::MANIFEST_FILE)
    }
}
