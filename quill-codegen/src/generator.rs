//! Generator plugin trait.

use std::io::Write;

use quill_core::{ImportSpec, TypeDecl};

use crate::BoxError;

/// A plugin that emits code for annotated types.
///
/// Generators are registered once into a [`Registry`](crate::Registry) and
/// shared read-only for the rest of the run. The pipeline only ever looks at
/// a generator through this trait.
///
/// # Example
///
/// ```ignore
/// struct TypeNameGenerator;
///
/// impl Generator for TypeNameGenerator {
///     fn name(&self) -> &str { "type_name" }
///
///     fn imports(&self, _ty: &TypeDecl) -> Vec<ImportSpec> { Vec::new() }
///
///     fn write_body(&self, out: &mut dyn Write, ty: &TypeDecl) -> Result<(), BoxError> {
///         writeln!(out, "impl {} {{ pub const TYPE_NAME: &str = {:?}; }}", ty.name, ty.name)?;
///         Ok(())
///     }
/// }
/// ```
pub trait Generator: Send + Sync {
    /// Unique name; also part of every output filename.
    fn name(&self) -> &str;

    /// Imports the body for `ty` needs.
    fn imports(&self, ty: &TypeDecl) -> Vec<ImportSpec>;

    /// Write the body for `ty`. Writing nothing is allowed.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole generation run.
    fn write_body(&self, out: &mut dyn Write, ty: &TypeDecl) -> Result<(), BoxError>;
}
