// dynparam-derive: derive macro for dynparam's DynamicParameters trait
//
// Generates snapshot, apply and schema for a struct with named fields:
// - classify.rs - maps each field's declared type onto a value case
// - snapshot.rs - one Parameter per classified field, in declaration order
// - apply.rs    - one match arm per classified field, keyed by field name
// - expand.rs   - assembles the impl, lists skipped fields in the schema
//
// Example:
// ```
// use dynparam::DynamicParameters;
//
// #[derive(Default, DynamicParameters)]
// struct SubRequest {
//     name: String,
//     success: bool,
// }
// ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod apply;
mod attr;
mod classify;
mod expand;
mod snapshot;

/// Derives `DynamicParameters` for a struct with named fields.
///
/// Field types are classified syntactically:
///
/// - `i8` to `i64`, `isize`, `u8` to `u32`, `f32`, `f64`, `String`, `bool` are scalars
/// - `Option<T>` of a scalar is an optional scalar
/// - `Vec<T>` of a scalar, optional scalar or struct is an array
/// - `Option<S>` of any other named type is an optional struct
/// - any other named type is a struct and must implement `DynamicParameters`
///
/// Fields whose type fits none of these (tuples, references, function
/// pointers, `u64`, nested `Vec`s, maps, sets, `Result`, types with several
/// type arguments, ...) are left untouched and reported in `schema().skipped`.
/// Struct elements of arrays and optional structs must also implement
/// `Default`. A type parameter used directly as such a field gets those
/// bounds added to the impl's where clause.
///
/// The runtime crate is found through `Cargo.toml`; override it with
/// `#[dynparam(crate = "path::to::dynparam")]` when re-exported.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, DynamicParameters)]
/// struct Request {
///     duration: i64,
///     command: String,
///     tags: Vec<String>,
///     sub_request: SubRequest,
///     on_done: Option<fn()>, // skipped
/// }
/// ```
#[proc_macro_derive(DynamicParameters, attributes(dynparam))]
pub fn derive_dynamic_parameters(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::expand_derive(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
