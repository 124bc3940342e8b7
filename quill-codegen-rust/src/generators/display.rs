use std::io::Write;

use quill_codegen::{BoxError, Generator};
use quill_core::{ImportSpec, TypeDecl};
use quote::{format_ident, quote};

use super::{applies, generics};

/// Implements `std::fmt::Display` by writing the type name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayGenerator;

impl DisplayGenerator {
    pub const NAME: &'static str = "display";
}

impl Generator for DisplayGenerator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn imports(&self, ty: &TypeDecl) -> Vec<ImportSpec> {
        if applies(ty, Self::NAME) {
            vec![ImportSpec::new("std::fmt")]
        } else {
            Vec::new()
        }
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
            impl #impl_generics fmt::Display for #ident #ty_generics #where_clause {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(#name)
                }
            }
        };
        write!(out, "{}", tokens)?;
        Ok(())
    }
}
