//! dynparam - uniform, introspectable parameters for structured types
//!
//! Gives structs a type-tagged view of their fields: `snapshot()` captures
//! every field as an ordered list of named [`ValueType`]s, and `apply()`
//! writes a matching list back onto the struct in place. Generic editors,
//! inspectors and diffing tools work against that contract instead of
//! per-type glue.
//!
//! # Example
//!
//! ```ignore
//! use dynparam::{DynamicParameters, Parameter, ValueType};
//!
//! #[derive(DynamicParameters, Default)]
//! struct SubRequest {
//!     name: String,
//!     success: bool,
//!     sub_title: Option<String>,
//! }
//!
//! #[derive(DynamicParameters)]
//! struct SampleRequest {
//!     command: String,
//!     duration: i64,
//!     tags: Vec<String>,
//!     sub_request: SubRequest,
//!     requests: Vec<SubRequest>,
//! }
//!
//! let mut request = SampleRequest { /* ... */ };
//! let parameters = request.snapshot();
//!
//! // Unknown keys and mismatched cases are skipped, never fatal
//! let report = request.apply(&[
//!     Parameter::new("duration", ValueType::scalar(30i64)),
//!     Parameter::new("retired", ValueType::scalar(true)),
//! ]);
//! assert_eq!(report.unknown(), ["retired"]);
//! ```
//!
//! # Field classification
//!
//! The derive maps each declared field type onto one case:
//!
//! - `i8`..`i64`, `isize`, `u8`..`u32` → `Int`; `f32` → `Float`;
//!   `f64` → `Double`; `String` → `String`; `bool` → `Bool`
//! - `Option<scalar>` → the optional case of that scalar
//! - `Vec<scalar>`, `Vec<Option<scalar>>`, `Vec<S>` → `Array`
//! - `Option<S>` → `OptionalStruct`
//! - any other named type `S` → `Struct`, which requires
//!   `S: DynamicParameters` (and `Default` inside `Vec` or `Option`)
//!
//! Fields whose type fits none of these (function pointers, tuples,
//! references, `u64`, nested `Vec`s, ...) are left out of both operations
//! and listed in [`Schema::skipped`].

#![warn(missing_docs)]

// Lets generated code refer to `::dynparam` from inside this crate too
extern crate self as dynparam;

pub mod convert;
pub mod diff;
pub mod editor;
pub mod engine;
pub mod error;
pub mod form;
pub mod report;
pub mod schema;
pub mod value;

pub use convert::Scalar;
pub use diff::{diff, Change};
pub use editor::Editor;
pub use engine::build;
pub use error::{ApplyIssue, EditError};
pub use form::{FormField, Widget};
pub use report::{ApplyReport, Rejected};
pub use schema::{FieldSchema, Schema, SkippedField};
pub use value::{Kind, Parameter, ParameterList, ValueType};

#[cfg(feature = "derive")]
pub use dynparam_derive::DynamicParameters;

// ============================================================================
// Type Contract
// ============================================================================

/// Snapshot/apply contract.
///
/// Usually derived. Nested and array fields rely on nothing but these
/// methods, so a hand-written impl composes with derived ones.
///
/// # Thread Safety
///
/// `apply` mutates through `&mut self`; an object shared across threads needs
/// external synchronization around a snapshot-edit-apply cycle.
pub trait DynamicParameters {
    /// Capture every parameter, in field declaration order.
    ///
    /// Each value's default is its current value at snapshot time.
    fn snapshot(&self) -> Vec<Parameter>;

    /// Write matching parameters back onto the fields.
    ///
    /// Parameters are matched by key. Unknown keys and values of the wrong
    /// case are skipped and leave their field unchanged; the returned report
    /// lists them. Never panics.
    fn apply(&mut self, parameters: &[Parameter]) -> ApplyReport;

    /// Describe the parameters this type exposes
    fn schema() -> Schema
    where
        Self: Sized;
}

impl<T: DynamicParameters> DynamicParameters for Box<T> {
    fn snapshot(&self) -> Vec<Parameter> {
        (**self).snapshot()
    }

    fn apply(&mut self, parameters: &[Parameter]) -> ApplyReport {
        (**self).apply(parameters)
    }

    fn schema() -> Schema {
        T::schema()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(all(test, feature = "derive"))]
mod tests {
    use super::*;

    #[derive(DynamicParameters, Debug, Default, Clone, PartialEq)]
    struct Inner {
        label: String,
    }

    #[derive(DynamicParameters, Debug, Clone, PartialEq)]
    struct Outer {
        count: u16,
        inner: Box<Inner>,
    }

    #[test]
    fn test_derive_inside_defining_crate() {
        let mut outer = Outer {
            count: 2,
            inner: Box::new(Inner {
                label: "a".to_string(),
            }),
        };
        let parameters = outer.snapshot();
        assert_eq!(parameters.keys(), vec!["count", "inner"]);

        let report = outer.apply(&[Parameter::new(
            "inner",
            ValueType::structure(vec![Parameter::new(
                "label",
                ValueType::scalar("b".to_string()),
            )]),
        )]);
        assert!(report.is_clean());
        assert_eq!(outer.inner.label, "b");
    }

    #[test]
    fn test_boxed_schema_delegates() {
        assert_eq!(<Box<Inner> as DynamicParameters>::schema().type_name, "Inner");
    }
}
