//! Generation orchestrator.

use std::{path::PathBuf, sync::Arc};

use quill_core::{Package, TypeDecl};

use crate::{
    BufferSet, CommitError, Error, Generator, OrchestrateError, Registry, RenderedFile,
    SourceLanguage, TEST_SUFFIX, commit, compose, render, validate_all,
};

/// Everything one generation run needs.
///
/// Holds the directive marker, the discovered packages, the generators to
/// run and the target language. Immutable once built.
///
/// # Example
///
/// ```ignore
/// let app = App::new("+gen", packages, registry, RustLanguage);
/// let written = app.write_all()?;
/// ```
pub struct App {
    directive: String,
    program: String,
    packages: Vec<Package>,
    registry: Registry,
    language: Arc<dyn SourceLanguage>,
}

impl App {
    /// Create an app whose banner names the running executable.
    pub fn new(
        directive: impl Into<String>,
        packages: Vec<Package>,
        registry: Registry,
        language: impl SourceLanguage + 'static,
    ) -> Self {
        Self {
            directive: directive.into(),
            program: current_program(),
            packages,
            registry,
            language: Arc::new(language),
        }
    }

    /// Override the program name recorded in the banner.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn language(&self) -> &dyn SourceLanguage {
        self.language.as_ref()
    }

    /// Compose every output file in memory.
    ///
    /// Packages in single-file mode get one file per generator holding all
    /// of their types sorted by name; other packages get one file per type
    /// per generator. Generators that write nothing produce no file.
    ///
    /// # Errors
    ///
    /// Stops at the first failure. Files composed before it are returned in
    /// [`OrchestrateError::partial`].
    pub fn generate(&self) -> Result<BufferSet, OrchestrateError> {
        let mut buffers = BufferSet::new();

        for package in &self.packages {
            let _span = tracing::debug_span!("package", name = package.name()).entered();
            buffers.add_package(package.path());

            let result = if package.is_single_file() {
                self.generate_single_file(package, &mut buffers)
            } else {
                self.generate_per_type(package, &mut buffers)
            };

            if let Err(source) = result {
                tracing::warn!(package = package.name(), error = %source, "generation aborted");
                return Err(OrchestrateError {
                    partial: buffers,
                    source,
                });
            }
        }

        Ok(buffers)
    }

    fn generate_single_file(&self, package: &Package, buffers: &mut BufferSet) -> crate::Result<()> {
        // sorted so types always appear in the same order in the output file
        let mut types: Vec<&TypeDecl> = package.types().iter().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));

        for generator in self.registry.iter() {
            let filename = format!(
                "{}_{}.{}",
                package.name(),
                generator.name(),
                self.language.file_extension()
            )
            .to_lowercase();
            self.compose_into(buffers, package, &types, generator, filename)?;
        }
        Ok(())
    }

    fn generate_per_type(&self, package: &Package, buffers: &mut BufferSet) -> crate::Result<()> {
        for ty in package.types() {
            let suffix = if ty.test { TEST_SUFFIX } else { "" };
            for generator in self.registry.iter() {
                let filename = format!(
                    "{}_{}{}.{}",
                    ty.name,
                    generator.name(),
                    suffix,
                    self.language.file_extension()
                )
                .to_lowercase();
                self.compose_into(buffers, package, &[ty], generator, filename)?;
            }
        }
        Ok(())
    }

    fn compose_into(
        &self,
        buffers: &mut BufferSet,
        package: &Package,
        types: &[&TypeDecl],
        generator: &dyn Generator,
        filename: String,
    ) -> crate::Result<()> {
        let mut content = Vec::new();
        let n = compose(&mut content, self, package, types, generator)?;

        // no file when the generator had nothing to say
        if n == 0 {
            tracing::debug!(generator = generator.name(), %filename, "nothing emitted, skipping");
            return Ok(());
        }

        tracing::debug!(generator = generator.name(), %filename, bytes = n, "composed");
        buffers.insert(package.path(), filename, content)
    }

    /// Compose, validate and normalize everything without touching disk.
    pub fn preview(&self) -> Result<Vec<RenderedFile>, Error> {
        let buffers = self.generate().map_err(|e| e.source)?;
        render(&buffers, self.language())
    }

    /// Compose and validate everything without touching disk.
    ///
    /// Returns the number of files that would be written.
    pub fn check(&self) -> Result<usize, Error> {
        let buffers = self.generate().map_err(|e| e.source)?;
        validate_all(&buffers, self.language())?;
        Ok(buffers.len())
    }

    /// Compose every file, validate all of them, then write them to disk.
    ///
    /// Returns the paths written, in commit order.
    ///
    /// # Errors
    ///
    /// Nothing is written if composition or validation fails. A failure while
    /// writing leaves earlier files on disk; they are listed in
    /// [`CommitError::written`].
    pub fn write_all(&self) -> Result<Vec<PathBuf>, CommitError> {
        let buffers = self.generate().map_err(|e| CommitError {
            written: Vec::new(),
            source: e.source,
        })?;
        commit(&buffers, self.language())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("directive", &self.directive)
            .field("program", &self.program)
            .field("packages", &self.packages)
            .field("registry", &self.registry)
            .field("language", &self.language.name())
            .finish()
    }
}

fn current_program() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(std::path::Path::new)
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use quill_core::ImportSpec;

    use super::*;
    use crate::testing::{FailingGenerator, FixedGenerator, PlainLanguage};

    fn app(packages: Vec<Package>, generators: Vec<FixedGenerator>) -> App {
        let mut registry = Registry::new();
        for generator in generators {
            registry.register(generator).unwrap();
        }
        App::new("+gen", packages, registry, PlainLanguage).with_program("quill")
    }

    #[test]
    fn test_no_generators_no_files() {
        let pkg = Package::new("pkg", "pkg").with_type(TypeDecl::new("Foo"));
        let buffers = app(vec![pkg], Vec::new()).generate().unwrap();
        assert!(buffers.is_empty());
    }

    #[test]
    fn test_single_file_mode() {
        let pkg = Package::new("Pkg", "pkg")
            .single_file(true)
            .with_type(TypeDecl::new("Foo"))
            .with_type(TypeDecl::new("Bar"));
        let demo = FixedGenerator::new("Demo").emit("Foo", "X");

        let buffers = app(vec![pkg], vec![demo]).generate().unwrap();

        assert_eq!(buffers.filenames(Path::new("pkg")), vec!["pkg_demo.txt"]);
        let text =
            String::from_utf8(buffers.get(Path::new("pkg"), "pkg_demo.txt").unwrap().to_vec())
                .unwrap();
        let bar = text.find("on Bar").unwrap();
        let foo = text.find("on Foo").unwrap();
        assert!(bar < foo, "types are sorted by name");
    }

    #[test]
    fn test_single_file_sort_is_case_sensitive() {
        let pkg = Package::new("pkg", "pkg")
            .single_file(true)
            .with_type(TypeDecl::new("alpha"))
            .with_type(TypeDecl::new("Zed"));
        let demo = FixedGenerator::new("demo")
            .emit("alpha", "BODY_alpha")
            .emit("Zed", "BODY_Zed");

        let buffers = app(vec![pkg], vec![demo]).generate().unwrap();
        let text = buffers.get(Path::new("pkg"), "pkg_demo.txt").unwrap();
        let text = std::str::from_utf8(text).unwrap();

        assert!(text.find("BODY_Zed").unwrap() < text.find("BODY_alpha").unwrap());
    }

    #[test]
    fn test_per_type_mode_filenames() {
        let pkg = Package::new("pkg", "pkg")
            .with_type(TypeDecl::new("Foo"))
            .with_type(TypeDecl::new("Baz").test());
        let generator = FixedGenerator::new("gen").emit("Foo", "f").emit("Baz", "b");
        let other = FixedGenerator::new("other").emit("Foo", "o");

        let buffers = app(vec![pkg], vec![generator, other]).generate().unwrap();

        assert_eq!(
            buffers.filenames(Path::new("pkg")),
            vec!["foo_gen.txt", "foo_other.txt", "baz_gen_test.txt"]
        );
    }

    #[test]
    fn test_silent_generator_creates_no_file() {
        let pkg = Package::new("pkg", "pkg")
            .single_file(true)
            .with_type(TypeDecl::new("Foo"));
        let silent = FixedGenerator::new("silent").import(ImportSpec::new("std::fmt"));

        let buffers = app(vec![pkg], vec![silent]).generate().unwrap();
        assert!(buffers.is_empty());
    }

    #[test]
    fn test_deterministic_output() {
        let make = || {
            let pkg = Package::new("pkg", "pkg")
                .single_file(true)
                .with_type(TypeDecl::new("Zeta"))
                .with_type(TypeDecl::new("Alpha"))
                .with_type(TypeDecl::new("Mid"));
            let demo = FixedGenerator::new("demo")
                .emit("Zeta", "z")
                .emit("Alpha", "a")
                .emit("Mid", "m")
                .import(ImportSpec::new("std::io"))
                .import(ImportSpec::new("std::fmt"));
            app(vec![pkg], vec![demo]).generate().unwrap()
        };

        assert_eq!(make(), make());
    }

    #[test]
    fn test_case_collision_rejected() {
        let pkg = Package::new("pkg", "pkg")
            .with_type(TypeDecl::new("Foo"))
            .with_type(TypeDecl::new("FOO"));
        let demo = FixedGenerator::new("demo").emit("Foo", "a").emit("FOO", "b");

        let err = app(vec![pkg], vec![demo]).generate().unwrap_err();

        assert!(matches!(err.source, Error::DuplicateOutput { ref filename, .. } if filename == "foo_demo.txt"));
        assert_eq!(err.partial.len(), 1);
    }

    #[test]
    fn test_generator_error_keeps_partial_results() {
        let first = Package::new("first", "first").with_type(TypeDecl::new("Ok"));
        let second = Package::new("second", "second").with_type(TypeDecl::new("Broken"));

        let mut registry = Registry::new();
        registry
            .register(FixedGenerator::new("demo").emit("Ok", "fine"))
            .unwrap();
        registry
            .register(FailingGenerator::new("boom").only("Broken"))
            .unwrap();
        let app = App::new("+gen", vec![first, second], registry, PlainLanguage);

        let err = app.generate().unwrap_err();

        assert!(matches!(err.source, Error::Generator { ref ty, .. } if ty == "Broken"));
        assert_eq!(err.partial.filenames(Path::new("first")), vec!["ok_demo.txt"]);
    }

    #[test]
    fn test_write_all_nothing_written_on_generator_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let pkg = Package::new("pkg", temp.path()).with_type(TypeDecl::new("Foo"));

        let mut registry = Registry::new();
        registry.register(FailingGenerator::new("boom")).unwrap();
        let app = App::new("+gen", vec![pkg], registry, PlainLanguage);

        let err = app.write_all().unwrap_err();
        assert!(err.written.is_empty());
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
