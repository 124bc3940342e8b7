use std::{
    fmt,
    path::{Path, PathBuf},
};

/// A discovered source package that generated files are written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    path: PathBuf,
    types: Vec<TypeDecl>,
    single_file: bool,
}

impl Package {
    /// Create a package emitting one file per type per generator.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            types: Vec::new(),
            single_file: false,
        }
    }

    /// Collapse all types into one file per generator.
    pub fn single_file(mut self, single_file: bool) -> Self {
        self.single_file = single_file;
        self
    }

    /// Append an annotated type.
    pub fn with_type(mut self, ty: TypeDecl) -> Self {
        self.types.push(ty);
        self
    }

    /// Append an annotated type in place.
    pub fn push_type(&mut self, ty: TypeDecl) {
        self.types.push(ty);
    }

    /// Package name, used in the package declaration and single-file names.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory generated files are written to. Also the package identity.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Annotated types in discovery order.
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    /// Whether this package collapses output into one file per generator.
    pub fn is_single_file(&self) -> bool {
        self.single_file
    }
}

/// A type declaration carrying the generation directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    /// Type name as written in source.
    pub name: String,
    /// Human-readable description recorded in provenance comments.
    pub description: String,
    /// Declared in a test-only source file.
    pub test: bool,
    /// Arguments following the directive marker.
    pub tags: Vec<String>,
    /// Generic parameter list as written, e.g. `<T: Clone>`; empty if none.
    pub generics: String,
    /// Where clause as written; empty if none.
    pub where_clause: String,
}

impl TypeDecl {
    /// Create a non-test type whose description is its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            test: false,
            tags: Vec::new(),
            generics: String::new(),
            where_clause: String::new(),
        }
    }

    /// Override the provenance description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the type as coming from a test-only file.
    pub fn test(mut self) -> Self {
        self.test = true;
        self
    }

    /// Set the directive tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the generic parameters and where clause, as source text.
    pub fn with_generics(
        mut self,
        generics: impl Into<String>,
        where_clause: impl Into<String>,
    ) -> Self {
        self.generics = generics.into();
        self.where_clause = where_clause.into();
        self
    }

    /// Whether the type declares generic parameters.
    pub fn is_generic(&self) -> bool {
        !self.generics.is_empty()
    }

    /// Check whether the directive listed `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// An import needed by generated code: an optional alias and a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
}

impl ImportSpec {
    /// Import a path under its own name.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
        }
    }

    /// Import a path under an alias.
    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            path: path.into(),
        }
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} as {}", self.path, alias),
            None => f.write_str(&self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_decl_defaults() {
        let ty = TypeDecl::new("Foo");
        assert_eq!(ty.description, "Foo");
        assert!(!ty.test);
        assert!(ty.tags.is_empty());
    }

    #[test]
    fn test_type_decl_tags() {
        let ty = TypeDecl::new("Foo").with_tags(["display", "type_name"]);
        assert!(ty.has_tag("display"));
        assert!(!ty.has_tag("debug"));
    }

    #[test]
    fn test_type_decl_generics() {
        assert!(!TypeDecl::new("Foo").is_generic());
        let ty = TypeDecl::new("Wrapper").with_generics("<T>", "where T: Clone");
        assert!(ty.is_generic());
        assert_eq!(ty.where_clause, "where T: Clone");
    }

    #[test]
    fn test_package_builder() {
        let pkg = Package::new("models", "src/models")
            .single_file(true)
            .with_type(TypeDecl::new("User"))
            .with_type(TypeDecl::new("Account").test());

        assert_eq!(pkg.name(), "models");
        assert_eq!(pkg.path(), Path::new("src/models"));
        assert!(pkg.is_single_file());
        assert_eq!(pkg.types().len(), 2);
        assert!(pkg.types()[1].test);
    }

    #[test]
    fn test_import_spec_display() {
        assert_eq!(ImportSpec::new("std::fmt").to_string(), "std::fmt");
        assert_eq!(
            ImportSpec::aliased("Map", "std::collections::HashMap").to_string(),
            "std::collections::HashMap as Map"
        );
    }

    #[test]
    fn test_import_spec_identity_includes_alias() {
        assert_ne!(
            ImportSpec::new("std::fmt"),
            ImportSpec::aliased("f", "std::fmt")
        );
    }
}
