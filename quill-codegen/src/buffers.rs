//! In-memory output of one generation run.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, map::Entry};

use crate::{Error, Result};

/// Composed files keyed by package path, then filename.
///
/// Both levels keep insertion order, so iterating a set produced from the
/// same inputs always yields the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferSet {
    packages: IndexMap<PathBuf, IndexMap<String, Vec<u8>>>,
}

/// One composed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedBuffer<'a> {
    pub package: &'a Path,
    pub filename: &'a str,
    pub content: &'a [u8],
}

impl GeneratedBuffer<'_> {
    /// Where this buffer is written on commit.
    pub fn destination(&self) -> PathBuf {
        self.package.join(self.filename)
    }
}

impl BufferSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `package` appears in the set, even with no files.
    pub fn add_package(&mut self, package: &Path) {
        self.packages.entry(package.to_path_buf()).or_default();
    }

    /// Insert a composed file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateOutput`] if `filename` is already taken in
    /// `package`; the existing buffer is kept.
    pub fn insert(&mut self, package: &Path, filename: String, content: Vec<u8>) -> Result<()> {
        let files = self.packages.entry(package.to_path_buf()).or_default();
        match files.entry(filename) {
            Entry::Occupied(entry) => Err(Error::DuplicateOutput {
                package: package.to_path_buf(),
                filename: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(content);
                Ok(())
            }
        }
    }

    /// Look up a composed file.
    pub fn get(&self, package: &Path, filename: &str) -> Option<&[u8]> {
        self.packages
            .get(package)
            .and_then(|files| files.get(filename))
            .map(Vec::as_slice)
    }

    /// Filenames composed for `package`, in insertion order.
    pub fn filenames(&self, package: &Path) -> Vec<&str> {
        self.packages
            .get(package)
            .map(|files| files.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Iterate over every file, package by package.
    pub fn iter(&self) -> impl Iterator<Item = GeneratedBuffer<'_>> {
        self.packages.iter().flat_map(|(package, files)| {
            files.iter().map(move |(filename, content)| GeneratedBuffer {
                package,
                filename,
                content,
            })
        })
    }

    /// Number of files across all packages.
    pub fn len(&self) -> usize {
        self.packages.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_iterate_in_order() {
        let mut set = BufferSet::new();
        set.insert(Path::new("b"), "z.rs".into(), b"1".to_vec())
            .unwrap();
        set.insert(Path::new("a"), "y.rs".into(), b"2".to_vec())
            .unwrap();
        set.insert(Path::new("b"), "x.rs".into(), b"3".to_vec())
            .unwrap();

        let order: Vec<_> = set.iter().map(|b| b.destination()).collect();
        assert_eq!(
            order,
            vec![
                PathBuf::from("b/z.rs"),
                PathBuf::from("b/x.rs"),
                PathBuf::from("a/y.rs")
            ]
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_duplicate_filename_rejected() {
        let mut set = BufferSet::new();
        set.insert(Path::new("pkg"), "foo_demo.rs".into(), b"first".to_vec())
            .unwrap();

        let err = set
            .insert(Path::new("pkg"), "foo_demo.rs".into(), b"second".to_vec())
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateOutput { .. }));
        assert_eq!(set.get(Path::new("pkg"), "foo_demo.rs"), Some(&b"first"[..]));
    }

    #[test]
    fn test_same_filename_in_different_packages() {
        let mut set = BufferSet::new();
        set.insert(Path::new("a"), "foo_demo.rs".into(), Vec::new())
            .unwrap();
        set.insert(Path::new("b"), "foo_demo.rs".into(), Vec::new())
            .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_package_counts_nothing() {
        let mut set = BufferSet::new();
        set.add_package(Path::new("pkg"));
        assert!(set.is_empty());
        assert!(set.filenames(Path::new("pkg")).is_empty());
    }
}
