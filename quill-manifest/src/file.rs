use std::path::{Path, PathBuf};

use crate::{Manifest, Result};

/// A quill.toml on disk, or the defaults when it does not exist.
#[derive(Debug, Clone)]
pub struct QuillToml {
    path: PathBuf,
    manifest: Manifest,
    exists: bool,
}

impl QuillToml {
    /// Open and parse a quill.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let manifest = Manifest::from_file(&path)?;
        Ok(Self {
            path,
            manifest,
            exists: true,
        })
    }

    /// Open `path`, falling back to the default manifest when it is missing.
    pub fn open_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::open(path);
        }
        Ok(Self {
            path: path.to_path_buf(),
            manifest: Manifest::default(),
            exists: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Whether the manifest was read from disk.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Directory that relative paths in the manifest are resolved against.
    pub fn root(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Resolve a manifest-relative path.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(path),
            _ => path.as_ref().to_path_buf(),
        }
    }
}
