// #[dynparam(...)] attribute parsing
//
// Only the container form is recognised:
//
//     #[dynparam(crate = "my_reexport::dynparam")]
//
// Field-level attributes are rejected so a misplaced one doesn't silently do
// nothing.

use proc_macro2::{Span, TokenStream};
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;
use syn::{Attribute, Field, Ident, LitStr, Path, Result};

const ATTR: &str = "dynparam";

/// Options parsed from the container's `#[dynparam]` attributes
#[derive(Default)]
pub struct ContainerAttrs {
    pub krate: Option<Path>,
}

impl ContainerAttrs {
    pub fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut parsed = ContainerAttrs::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("crate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parsed.krate = Some(lit.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported dynparam attribute, expected `crate = \"...\"`"))
                }
            })?;
        }
        Ok(parsed)
    }

    /// Path to the runtime crate in the expanded code
    pub fn crate_path(&self) -> TokenStream {
        match &self.krate {
            Some(path) => quote!(#path),
            None => default_crate_path(),
        }
    }
}

/// Error on any `#[dynparam]` attribute placed on a field
pub fn reject_field_attrs(field: &Field) -> Result<()> {
    match field.attrs.iter().find(|a| a.path().is_ident(ATTR)) {
        Some(attr) => Err(syn::Error::new_spanned(
            attr,
            "dynparam attributes are only supported on the struct itself",
        )),
        None => Ok(()),
    }
}

// Resolves renamed dependencies; the crate itself re-exports under its own
// name, so `Itself` still maps to `::dynparam`.
fn default_crate_path() -> TokenStream {
    match crate_name("dynparam") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) | Err(_) => quote!(::dynparam),
    }
}
