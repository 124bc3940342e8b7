//! Discovery of annotated types in Rust sources.

use std::{
    collections::BTreeMap,
    fs,
    path::{Component, Path, PathBuf},
};

use eyre::{WrapErr, bail, eyre};
use glob::Pattern;
use quill_core::{Package, TypeDecl};
use quote::ToTokens;
use syn::{Attribute, Expr, ExprLit, Generics, Item, Lit, Meta};
use walkdir::{DirEntry, WalkDir};

/// First-line marker of files written by quill; such files are not scanned.
const GENERATED_MARKER: &str = "// Generated by:";

/// Finds structs and enums whose doc comments carry the directive marker.
///
/// ```ignore
/// /// +gen display
/// pub struct User { .. }
/// ```
///
/// Every directory holding at least one annotated type becomes a
/// [`Package`].
#[derive(Debug, Clone)]
pub struct Discovery {
    directive: String,
    single_file: Vec<PathBuf>,
    exclude: Vec<Pattern>,
}

impl Discovery {
    pub fn new(directive: impl Into<String>) -> Self {
        Self {
            directive: directive.into(),
            single_file: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Put all types of the package in `dir` into one file per generator.
    ///
    /// `./src/models/` and `src/models` name the same package.
    pub fn single_file(mut self, dir: impl AsRef<Path>) -> Self {
        self.single_file.push(normalize_dir(dir.as_ref()));
        self
    }

    /// Skip files and directories whose path relative to the walked root
    /// matches `pattern`.
    pub fn exclude(mut self, pattern: Pattern) -> Self {
        self.exclude.push(pattern);
        self
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Walk `root` and collect the annotated types, grouped by directory.
    ///
    /// Packages come out ordered by path; types keep file name order, then
    /// source order.
    pub fn discover(&self, root: &Path) -> eyre::Result<Vec<Package>> {
        if !root.is_dir() {
            bail!("source directory {} does not exist", root.display());
        }

        let mut found: BTreeMap<PathBuf, Vec<TypeDecl>> = BTreeMap::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !is_skipped_dir(entry) && !self.is_excluded(root, entry.path())
            });

        for entry in walker {
            let entry = entry.wrap_err_with(|| format!("failed to walk {}", root.display()))?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "rs") {
                continue;
            }

            let content = fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            if content.lines().next().is_some_and(|l| l.starts_with(GENERATED_MARKER)) {
                tracing::debug!(path = %path.display(), "skipping generated file");
                continue;
            }

            let types = self
                .parse_source(&content, is_test_file(path))
                .map_err(|err| {
                    let start = err.span().start();
                    eyre!("{}:{}:{}: {}", path.display(), start.line, start.column + 1, err)
                })?;
            if types.is_empty() {
                continue;
            }

            tracing::debug!(path = %path.display(), types = types.len(), "found annotated types");
            let dir = path.parent().unwrap_or(root).to_path_buf();
            found.entry(dir).or_default().extend(types);
        }

        let packages: Vec<Package> = found
            .into_iter()
            .map(|(dir, types)| {
                let single_file = self.single_file.contains(&normalize_dir(&dir));
                let mut package = Package::new(package_name(&dir), dir).single_file(single_file);
                for ty in types {
                    package.push_type(ty);
                }
                package
            })
            .collect();

        for dir in &self.single_file {
            let matched = packages
                .iter()
                .any(|package| package.is_single_file() && normalize_dir(package.path()) == *dir);
            if !matched {
                tracing::warn!(
                    path = %dir.display(),
                    "single-file directory holds no annotated types"
                );
            }
        }

        Ok(packages)
    }

    fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }
        let excluded = self.exclude.iter().any(|pattern| pattern.matches_path(relative));
        if excluded {
            tracing::debug!(path = %path.display(), "excluded from discovery");
        }
        excluded
    }

    /// Extract the annotated structs and enums of one source file.
    pub fn parse_source(&self, content: &str, test: bool) -> syn::Result<Vec<TypeDecl>> {
        let file = syn::parse_file(content)?;

        let types = file
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Struct(item) => Some((&item.ident, &item.attrs, &item.generics)),
                Item::Enum(item) => Some((&item.ident, &item.attrs, &item.generics)),
                _ => None,
            })
            .filter_map(|(ident, attrs, generics)| {
                let tags = self.directive_tags(attrs)?;
                let name = ident.to_string();
                let description = std::iter::once(name.as_str())
                    .chain(tags.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(" ");
                let ty = TypeDecl::new(&name)
                    .with_description(description)
                    .with_tags(tags)
                    .with_generics(generic_params(generics), where_clause(generics));
                Some(if test { ty.test() } else { ty })
            })
            .collect();

        Ok(types)
    }

    /// Tags following the directive, or `None` when the marker is absent.
    fn directive_tags(&self, attrs: &[Attribute]) -> Option<Vec<String>> {
        doc_lines(attrs).find_map(|line| {
            let rest = line.trim().strip_prefix(self.directive.as_str())?;
            // `+generate` is not `+gen`
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                return None;
            }
            Some(rest.split_whitespace().map(str::to_string).collect())
        })
    }
}

fn doc_lines(attrs: &[Attribute]) -> impl Iterator<Item = String> + '_ {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(doc), ..
                }) => Some(doc.value()),
                _ => None,
            },
            _ => None,
        })
        .flat_map(|doc| doc.lines().map(str::to_string).collect::<Vec<_>>())
}

fn generic_params(generics: &Generics) -> String {
    if generics.params.is_empty() {
        return String::new();
    }
    // `Generics` prints only the bracketed parameters
    generics.to_token_stream().to_string()
}

fn where_clause(generics: &Generics) -> String {
    generics
        .where_clause
        .as_ref()
        .map(|clause| clause.to_token_stream().to_string())
        .unwrap_or_default()
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "target"
}

fn is_test_file(path: &Path) -> bool {
    let stem_is_test = path
        .file_stem()
        .is_some_and(|stem| stem.to_string_lossy().ends_with("_test"));
    let in_tests_dir = path
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|dir| dir == "tests");
    stem_is_test || in_tests_dir
}

/// Directory name, or the crate directory name for `src`.
fn package_name(dir: &Path) -> String {
    let name = match dir.file_name() {
        Some(name) if name == "src" => dir
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_os_string())
            .or_else(|| {
                // relative `src` has no parent component to name it
                let absolute = fs::canonicalize(dir).ok()?;
                absolute.parent()?.file_name().map(|n| n.to_os_string())
            })
            .unwrap_or_else(|| name.to_os_string()),
        Some(name) => name.to_os_string(),
        None => "crate".into(),
    };
    name.to_string_lossy()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Absolute form of an existing `dir`, otherwise `dir` without `.` components.
fn normalize_dir(dir: &Path) -> PathBuf {
    fs::canonicalize(dir).unwrap_or_else(|_| {
        dir.components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect()
    })
}
