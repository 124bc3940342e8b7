//! Generators shipped with the `quill` binary.
//!
//! Tags after the directive gate them: an untagged type gets every
//! generator, a tagged one only the generators its tags name.
//!
//! - [`DisplayGenerator`] - `impl fmt::Display` printing the type name
//! - [`TypeNameGenerator`] - `TYPE_NAME` associated constant

mod display;
mod type_name;

pub use display::DisplayGenerator;
pub use type_name::TypeNameGenerator;

use quill_codegen::Registry;
use quill_core::TypeDecl;
use syn::{Generics, WhereClause};

/// Registry holding every built-in generator.
pub fn builtin() -> quill_codegen::Result<Registry> {
    let mut registry = Registry::new();
    registry.register(DisplayGenerator)?;
    registry.register(TypeNameGenerator)?;
    Ok(registry)
}

/// Whether the generator named `generator` should emit code for `ty`.
pub fn applies(ty: &TypeDecl, generator: &str) -> bool {
    ty.tags.is_empty() || ty.has_tag(generator)
}

/// Generic parameters and where clause of `ty`, ready for `split_for_impl`.
pub(crate) fn generics(ty: &TypeDecl) -> syn::Result<Generics> {
    let mut generics = if ty.is_generic() {
        syn::parse_str::<Generics>(&ty.generics)?
    } else {
        Generics::default()
    };
    if !ty.where_clause.is_empty() {
        generics.where_clause = Some(syn::parse_str::<WhereClause>(&ty.where_clause)?);
    }
    Ok(generics)
}
