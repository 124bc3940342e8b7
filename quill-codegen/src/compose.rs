//! Composition of a single generated file.

use std::io::Write;

use quill_core::{Package, TypeDecl};

use crate::{App, CountingWriter, Error, Generator, ImportSet, Result};

const TWO_LINES: &[u8] = b"\n\n";

/// Compose one generated file for `types` and `generator` into `out`.
///
/// Writes, in order: the provenance banner (program, generator, one directive
/// line per type), the package declaration, the deduplicated import block
/// (nothing at all when empty) and each type's body followed by a blank line.
///
/// Returns the number of bytes the generator itself wrote, excluding all
/// surrounding overhead. An empty `types` list writes nothing and never
/// calls the generator.
///
/// # Errors
///
/// Returns [`Error::Generator`] with the generator's error if it fails, or
/// [`Error::Sink`] if `out` rejects a write.
pub fn compose(
    out: &mut dyn Write,
    app: &App,
    package: &Package,
    types: &[&TypeDecl],
    generator: &dyn Generator,
) -> Result<usize> {
    if types.is_empty() {
        return Ok(0);
    }

    let language = app.language();
    let comment = language.line_comment();

    // byline so readers can trace the file back to where it came from
    write_banner(out, comment, app.program(), generator.name()).map_err(Error::Sink)?;
    for ty in types {
        writeln!(out, "{} Directive: {} on {}", comment, app.directive(), ty.description)
            .map_err(Error::Sink)?;
    }

    out.write_all(language.package_declaration(package.name()).as_bytes())
        .and_then(|()| out.write_all(TWO_LINES))
        .map_err(Error::Sink)?;

    let mut imports = ImportSet::new();
    for ty in types {
        imports.extend(generator.imports(ty));
    }
    if !imports.is_empty() {
        out.write_all(language.render_imports(&imports.to_vec()).as_bytes())
            .and_then(|()| out.write_all(b"\n"))
            .map_err(Error::Sink)?;
    }

    let mut total = 0;
    for ty in types {
        let mut counting = CountingWriter::new(&mut *out);
        generator
            .write_body(&mut counting, ty)
            .map_err(|source| Error::Generator {
                generator: generator.name().to_string(),
                ty: ty.name.clone(),
                source,
            })?;
        total += counting.count();
        out.write_all(TWO_LINES).map_err(Error::Sink)?;
    }

    Ok(total)
}

fn write_banner(
    out: &mut dyn Write,
    comment: &str,
    program: &str,
    generator: &str,
) -> std::io::Result<()> {
    writeln!(out, "{} Generated by: {}", comment, program)?;
    writeln!(out, "{} Generator: {}", comment, generator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Registry,
        testing::{FailingGenerator, FixedGenerator, PlainLanguage},
    };
    use quill_core::ImportSpec;

    fn app() -> App {
        App::new("+gen", Vec::new(), Registry::new(), PlainLanguage).with_program("quill")
    }

    fn compose_to_string(
        package: &Package,
        types: &[&TypeDecl],
        generator: &dyn Generator,
    ) -> (String, usize) {
        let mut out = Vec::new();
        let n = compose(&mut out, &app(), package, types, generator).unwrap();
        (String::from_utf8(out).unwrap(), n)
    }

    #[test]
    fn test_single_file_scenario() {
        let package = Package::new("pkg", "pkg");
        let bar = TypeDecl::new("Bar");
        let foo = TypeDecl::new("Foo");
        let demo = FixedGenerator::new("demo").emit("Foo", "X");

        let (text, n) = compose_to_string(&package, &[&bar, &foo], &demo);

        assert_eq!(n, 1);
        insta::assert_snapshot!(text, @r"
        // Generated by: quill
        // Generator: demo
        // Directive: +gen on Bar
        // Directive: +gen on Foo
        package pkg



        X
        ");
        assert!(text.ends_with("package pkg\n\n\n\nX\n\n"));
    }

    #[test]
    fn test_imports_deduplicated_across_types() {
        let package = Package::new("pkg", "pkg");
        let a = TypeDecl::new("A");
        let b = TypeDecl::new("B");
        let generator = FixedGenerator::new("demo")
            .emit("A", "a")
            .emit("B", "b")
            .import(ImportSpec::new("std::fmt"))
            .import(ImportSpec::aliased("io", "std::io"));

        let (text, n) = compose_to_string(&package, &[&a, &b], &generator);

        assert_eq!(n, 2);
        assert_eq!(
            text,
            "// Generated by: quill\n\
             // Generator: demo\n\
             // Directive: +gen on A\n\
             // Directive: +gen on B\n\
             package pkg\n\n\
             import \"std::fmt\"\n\
             import io \"std::io\"\n\n\
             a\n\nb\n\n"
        );
    }

    #[test]
    fn test_nothing_emitted() {
        let package = Package::new("pkg", "pkg");
        let foo = TypeDecl::new("Foo");
        let silent = FixedGenerator::new("silent");

        let (text, n) = compose_to_string(&package, &[&foo], &silent);

        assert_eq!(n, 0);
        assert!(text.starts_with("// Generated by: quill\n"));
    }

    #[test]
    fn test_empty_type_list_skips_generator() {
        let package = Package::new("pkg", "pkg");
        let failing = FailingGenerator::new("boom");

        let (text, n) = compose_to_string(&package, &[], &failing);

        assert_eq!(n, 0);
        assert!(text.is_empty());
    }

    #[test]
    fn test_generator_error_propagated() {
        let package = Package::new("pkg", "pkg");
        let foo = TypeDecl::new("Foo");
        let failing = FailingGenerator::new("boom");

        let mut out = Vec::new();
        let err = compose(&mut out, &app(), &package, &[&foo], &failing).unwrap_err();

        match err {
            Error::Generator {
                generator,
                ty,
                source,
            } => {
                assert_eq!(generator, "boom");
                assert_eq!(ty, "Foo");
                assert_eq!(source.to_string(), "boom failed on Foo");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_description_used_in_directive_line() {
        let package = Package::new("pkg", "pkg");
        let foo = TypeDecl::new("Foo").with_description("Foo display");
        let demo = FixedGenerator::new("demo").emit("Foo", "X");

        let (text, _) = compose_to_string(&package, &[&foo], &demo);

        assert!(text.contains("// Directive: +gen on Foo display\n"));
    }
}
