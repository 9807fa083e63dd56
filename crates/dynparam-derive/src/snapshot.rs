// Snapshot generation
//
// Each classified field becomes one `Parameter` built by the matching
// `engine` helper. The helpers take the field by reference and produce a
// value whose current and default are both the field's present value.

use proc_macro2::TokenStream;
use quote::quote;

use crate::classify::{ElementKind, FieldKind};
use crate::expand::ClassifiedField;

/// Expression capturing `self.<field>` as a `ValueType`
pub fn capture(krate: &TokenStream, field: &ClassifiedField) -> TokenStream {
    let ident = &field.ident;
    match &field.kind {
        FieldKind::Scalar(ty) => quote! { #krate::engine::scalar::<#ty>(&self.#ident) },
        FieldKind::OptionalScalar(ty) => quote! { #krate::engine::optional::<#ty>(&self.#ident) },
        FieldKind::Array { element, ty } => match element {
            ElementKind::Scalar => quote! { #krate::engine::scalar_array::<#ty>(&self.#ident) },
            ElementKind::OptionalScalar => {
                quote! { #krate::engine::optional_array::<#ty>(&self.#ident) }
            }
            ElementKind::Struct => quote! { #krate::engine::nested_array::<#ty>(&self.#ident) },
        },
        FieldKind::Struct(ty) => quote! { #krate::engine::nested::<#ty>(&self.#ident) },
        FieldKind::OptionalStruct(ty) => {
            quote! { #krate::engine::optional_nested::<#ty>(&self.#ident) }
        }
    }
}

/// `Parameter` entry for the snapshot list
pub fn entry(krate: &TokenStream, field: &ClassifiedField) -> TokenStream {
    let key = &field.key;
    let value = capture(krate, field);
    quote! { #krate::Parameter::new(#key, #value) }
}
