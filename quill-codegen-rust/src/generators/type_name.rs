use std::io::Write;

use quill_codegen::{BoxError, Generator};
use quill_core::{ImportSpec, TypeDecl};
use quote::{format_ident, quote};

use super::{applies, generics};

/// Adds a `TYPE_NAME` associated constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeNameGenerator;

impl TypeNameGenerator {
    pub const NAME: &'static str = "type_name";
}

impl Generator for TypeNameGenerator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn imports(&self, _ty: &TypeDecl) -> Vec<ImportSpec> {
        Vec::new()
    }

    fn write_body(&self, out: &mut dyn Write, ty: &TypeDecl) -> Result<(), BoxError> {
        if !applies(ty, Self::NAME) {
            return Ok(());
        }

        let ident = format_ident!("{}", ty.name);
        let name = &ty.name;
        let generics = generics(ty)?;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let tokens = quote! {
            impl #impl_generics #ident #ty_generics #where_clause {
                pub const TYPE_NAME: &'static str = #name;
            }
        };
        write!(out, "{}", tokens)?;
        Ok(())
    }
}
