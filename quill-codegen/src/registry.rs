//! Name-keyed generator registry.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = Registry::new();
//! registry.register(DisplayGenerator)?;
//! registry.register(TypeNameGenerator)?;
//!
//! // A second generator with the same name is rejected
//! assert!(registry.register(DisplayGenerator).is_err());
//! ```

use std::sync::Arc;

use crate::{Error, Generator, Result};

/// Generators to run, in registration order.
///
/// Built once at start-up and handed to an [`App`](crate::App); there is no
/// way to remove a generator.
#[derive(Clone, Default)]
pub struct Registry {
    generators: Vec<Arc<dyn Generator>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateGenerator`] if the name is taken; the
    /// registry is left unchanged.
    pub fn register(&mut self, generator: impl Generator + 'static) -> Result<()> {
        self.register_shared(Arc::new(generator))
    }

    /// Register an already shared generator.
    pub fn register_shared(&mut self, generator: Arc<dyn Generator>) -> Result<()> {
        if self.get(generator.name()).is_some() {
            return Err(Error::DuplicateGenerator {
                name: generator.name().to_string(),
            });
        }
        tracing::debug!(generator = generator.name(), "registered generator");
        self.generators.push(generator);
        Ok(())
    }

    /// Look up a generator by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Generator>> {
        self.generators.iter().find(|g| g.name() == name)
    }

    /// Build a registry holding only `names`, in the order given.
    pub fn select<I, S>(&self, names: I) -> Result<Registry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = Registry::new();
        for name in names {
            let name = name.as_ref();
            let generator = self.get(name).ok_or_else(|| Error::UnknownGenerator {
                name: name.to_string(),
                known: self.names().join(", "),
            })?;
            selected.register_shared(Arc::clone(generator))?;
        }
        Ok(selected)
    }

    /// Iterate over generators in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.iter().map(|g| g.as_ref())
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
