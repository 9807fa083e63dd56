// Apply generation
//
// The generated `apply` walks the incoming parameters in order and matches
// each key against the classified field names. Every arm hands the field, the
// key and the value to an `engine` helper, which checks the case and records
// the outcome in the report. Keys that match no arm are recorded as unknown.

use proc_macro2::TokenStream;
use quote::quote;

use crate::classify::{ElementKind, FieldKind};
use crate::expand::ClassifiedField;

/// Match arm writing `parameter.value` into `self.<field>`
pub fn arm(krate: &TokenStream, field: &ClassifiedField) -> TokenStream {
    let ident = &field.ident;
    let key = &field.key;
    let helper = match &field.kind {
        FieldKind::Scalar(ty) => quote!(apply_scalar::<#ty>),
        FieldKind::OptionalScalar(ty) => quote!(apply_optional::<#ty>),
        FieldKind::Array { element, ty } => match element {
            ElementKind::Scalar => quote!(apply_scalar_array::<#ty>),
            ElementKind::OptionalScalar => quote!(apply_optional_array::<#ty>),
            ElementKind::Struct => quote!(apply_nested_array::<#ty>),
        },
        FieldKind::Struct(ty) => quote!(apply_nested::<#ty>),
        FieldKind::OptionalStruct(ty) => quote!(apply_optional_nested::<#ty>),
    };
    quote! {
        #key => #krate::engine::#helper(&mut self.#ident, #key, &parameter.value, &mut report),
    }
}

/// Body of the generated `apply`
pub fn body(krate: &TokenStream, fields: &[ClassifiedField]) -> TokenStream {
    let arms = fields.iter().map(|field| arm(krate, field));
    quote! {
        let mut report = #krate::ApplyReport::new();
        for parameter in parameters {
            match parameter.key.as_str() {
                #(#arms)*
                unknown => report.record_unknown(unknown),
            }
        }
        report
    }
}
