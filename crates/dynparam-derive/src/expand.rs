// #[derive(DynamicParameters)] driver
//
// Classifies every named field, then assembles the trait impl from the
// snapshot entries, the apply arms and the schema. Unclassifiable fields are
// not an error: they are left out of snapshot and apply and listed in
// `schema().skipped` with the classifier's reason.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    parse_quote, Data, DeriveInput, Field, Fields, Generics, Ident, Result, Type, WherePredicate,
};

use crate::attr::{reject_field_attrs, ContainerAttrs};
use crate::classify::{classify, ElementKind, FieldKind};
use crate::{apply, snapshot};

/// A field that takes part in snapshot and apply
pub struct ClassifiedField {
    pub ident: Ident,
    /// Parameter key: the field name without any `r#` prefix
    pub key: String,
    pub kind: FieldKind,
    pub declared_type: String,
}

struct SkippedField {
    key: String,
    declared_type: String,
    reason: &'static str,
}

pub fn expand_derive(input: &DeriveInput) -> Result<TokenStream> {
    let attrs = ContainerAttrs::parse(&input.attrs)?;
    let krate = attrs.crate_path();

    let mut classified = Vec::new();
    let mut skipped = Vec::new();
    for field in named_fields(input)? {
        reject_field_attrs(field)?;
        let Some(ident) = &field.ident else {
            continue;
        };
        let key = ident.unraw().to_string();
        let declared_type = type_text(&field.ty);
        match classify(&field.ty) {
            Ok(kind) => classified.push(ClassifiedField {
                ident: ident.clone(),
                key,
                kind,
                declared_type,
            }),
            Err(unsupported) => skipped.push(SkippedField {
                key,
                declared_type,
                reason: unsupported.reason,
            }),
        }
    }

    let name = &input.ident;
    let type_name = name.unraw().to_string();
    let generics = bound_type_params(&input.generics, &classified, &krate);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let entries = classified.iter().map(|f| snapshot::entry(&krate, f));
    let apply_body = apply::body(&krate, &classified);
    let field_schemas = classified.iter().map(|f| field_schema(&krate, f));
    let skipped_schemas = skipped.iter().map(|f| {
        let SkippedField {
            key,
            declared_type,
            reason,
        } = f;
        quote! {
            #krate::SkippedField {
                name: #key,
                declared_type: #declared_type,
                reason: #reason,
            }
        }
    });

    Ok(quote! {
        impl #impl_generics #krate::DynamicParameters for #name #ty_generics #where_clause {
            fn snapshot(&self) -> ::std::vec::Vec<#krate::Parameter> {
                ::std::vec![#(#entries),*]
            }

            fn apply(&mut self, parameters: &[#krate::Parameter]) -> #krate::ApplyReport {
                #apply_body
            }

            fn schema() -> #krate::Schema {
                #krate::Schema {
                    type_name: #type_name,
                    fields: ::std::vec![#(#field_schemas),*],
                    skipped: ::std::vec![#(#skipped_schemas),*],
                }
            }
        }
    })
}

fn named_fields(input: &DeriveInput) -> Result<Vec<&Field>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(named.named.iter().collect()),
            Fields::Unit => Ok(Vec::new()),
            Fields::Unnamed(_) => Err(syn::Error::new_spanned(
                &input.ident,
                "DynamicParameters needs named fields to use as parameter keys",
            )),
        },
        Data::Enum(data) => Err(syn::Error::new_spanned(
            data.enum_token,
            "DynamicParameters can only be derived for structs",
        )),
        Data::Union(data) => Err(syn::Error::new_spanned(
            data.union_token,
            "DynamicParameters can only be derived for structs",
        )),
    }
}

// A type parameter used directly as a struct field gets `DynamicParameters`,
// plus `Default` inside `Vec` or `Option` where elements are rebuilt.
fn bound_type_params(
    generics: &Generics,
    fields: &[ClassifiedField],
    krate: &TokenStream,
) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<Ident> = generics.type_params().map(|p| p.ident.clone()).collect();
    let is_param = |ty: &Type| match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .get_ident()
            .is_some_and(|ident| params.contains(ident)),
        _ => false,
    };

    let mut bounds: Vec<WherePredicate> = Vec::new();
    for field in fields {
        let (ty, needs_default) = match &field.kind {
            FieldKind::Struct(ty) => (ty, false),
            FieldKind::OptionalStruct(ty) => (ty, true),
            FieldKind::Array {
                element: ElementKind::Struct,
                ty,
            } => (ty, true),
            _ => continue,
        };
        if !is_param(ty) {
            continue;
        }
        bounds.push(if needs_default {
            parse_quote!(#ty: #krate::DynamicParameters + ::core::default::Default)
        } else {
            parse_quote!(#ty: #krate::DynamicParameters)
        });
    }

    if !bounds.is_empty() {
        generics.make_where_clause().predicates.extend(bounds);
    }
    generics
}

fn field_schema(krate: &TokenStream, field: &ClassifiedField) -> TokenStream {
    let scalar_kind = |ty: &Type| quote!(<#ty as #krate::Scalar>::KIND);
    let optional_kind = |ty: &Type| quote!(<#ty as #krate::Scalar>::OPTIONAL_KIND);
    let none = quote!(::core::option::Option::None);

    let (kind, element) = match &field.kind {
        FieldKind::Scalar(ty) => (scalar_kind(ty), none),
        FieldKind::OptionalScalar(ty) => (optional_kind(ty), none),
        FieldKind::Array { element, ty } => {
            let element = match element {
                ElementKind::Scalar => scalar_kind(ty),
                ElementKind::OptionalScalar => optional_kind(ty),
                ElementKind::Struct => quote!(#krate::Kind::Struct),
            };
            (
                quote!(#krate::Kind::Array),
                quote!(::core::option::Option::Some(#element)),
            )
        }
        FieldKind::Struct(_) => (quote!(#krate::Kind::Struct), none),
        FieldKind::OptionalStruct(_) => (quote!(#krate::Kind::OptionalStruct), none),
    };

    let key = &field.key;
    let declared_type = &field.declared_type;
    quote! {
        #krate::FieldSchema {
            name: #key,
            kind: #kind,
            element: #element,
            declared_type: #declared_type,
        }
    }
}

// Tightens the token spacing `to_string` produces: `Vec < String >` becomes
// `Vec<String>`, `std :: string :: String` becomes `std::string::String`.
fn type_text(ty: &Type) -> String {
    quote!(#ty)
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" <", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
}
