//! Import deduplication.

use indexmap::IndexSet;
use quill_core::ImportSpec;

/// Tracks the imports of one generated file and deduplicates them.
///
/// Maintains first-insertion order for deterministic output. Each buffer
/// owns its own set.
///
/// # Example
///
/// ```
/// use quill_codegen::ImportSet;
/// use quill_core::ImportSpec;
///
/// let mut imports = ImportSet::new();
/// imports.add(ImportSpec::new("std::fmt"));
/// imports.add(ImportSpec::aliased("Map", "std::collections::HashMap"));
/// imports.add(ImportSpec::new("std::fmt"));
///
/// assert_eq!(imports.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    specs: IndexSet<ImportSpec>,
}

impl ImportSet {
    /// Create a new empty import set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import. Returns `false` if it was already present.
    pub fn add(&mut self, spec: ImportSpec) -> bool {
        self.specs.insert(spec)
    }

    /// Check if an import is present.
    pub fn contains(&self, spec: &ImportSpec) -> bool {
        self.specs.contains(spec)
    }

    /// Iterate over imports in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ImportSpec> {
        self.specs.iter()
    }

    /// Imports in first-insertion order.
    pub fn to_vec(&self) -> Vec<ImportSpec> {
        self.specs.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }
}

impl Extend<ImportSpec> for ImportSet {
    fn extend<T: IntoIterator<Item = ImportSpec>>(&mut self, iter: T) {
        self.specs.extend(iter);
    }
}
