//! Generic snapshot/apply engine.
//!
//! A derived `DynamicParameters` impl is a per-field dispatch onto the
//! functions below: the derive classifies each field once at build time and
//! picks the matching pair. Everything about how a kind is captured and
//! written back lives here, so generated code stays a flat list of calls.
//!
//! Apply functions never fail. A parameter that doesn't fit its field is
//! recorded in the report and the field keeps its prior value; arrays are
//! replaced all-or-nothing.

use crate::convert::Scalar;
use crate::error::ApplyIssue;
use crate::report::ApplyReport;
use crate::value::{Kind, Parameter, ValueType};
use crate::DynamicParameters;

// ============================================================================
// Snapshot
// ============================================================================

/// Capture a scalar field
pub fn scalar<T: Scalar>(field: &T) -> ValueType {
    T::wrap(field.clone(), field.clone())
}

/// Capture an optional scalar field
pub fn optional<T: Scalar>(field: &Option<T>) -> ValueType {
    T::wrap_optional(field.clone(), field.clone())
}

/// Capture an array of scalars
pub fn scalar_array<T: Scalar>(field: &[T]) -> ValueType {
    ValueType::array(field.iter().map(scalar::<T>).collect())
}

/// Capture an array of optional scalars
pub fn optional_array<T: Scalar>(field: &[Option<T>]) -> ValueType {
    ValueType::array(field.iter().map(optional::<T>).collect())
}

/// Capture a nested structured field
pub fn nested<S: DynamicParameters + ?Sized>(field: &S) -> ValueType {
    ValueType::structure(field.snapshot())
}

/// Capture an optional nested structured field
pub fn optional_nested<S: DynamicParameters>(field: &Option<S>) -> ValueType {
    ValueType::optional_structure(field.as_ref().map(S::snapshot))
}

/// Capture an array of structured values
pub fn nested_array<S: DynamicParameters>(field: &[S]) -> ValueType {
    ValueType::array(field.iter().map(nested::<S>).collect())
}

// ============================================================================
// Apply
// ============================================================================

fn mismatch(expected: Kind, value: &ValueType) -> ApplyIssue {
    ApplyIssue::KindMismatch {
        expected,
        found: value.kind(),
    }
}

/// Extract every element or none, tagging mismatches with their position
fn extract_elements<T>(
    elements: &[ValueType],
    extract: impl Fn(&ValueType) -> Result<T, ApplyIssue>,
) -> Result<Vec<T>, ApplyIssue> {
    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            extract(element).map_err(|issue| match issue {
                ApplyIssue::KindMismatch { expected, found } => ApplyIssue::ElementMismatch {
                    index,
                    expected,
                    found,
                },
                other => other,
            })
        })
        .collect()
}

/// Write a scalar parameter into its field
pub fn apply_scalar<T: Scalar>(
    field: &mut T,
    key: &str,
    value: &ValueType,
    report: &mut ApplyReport,
) {
    match T::extract(value) {
        Ok(v) => {
            *field = v;
            report.record_applied(key);
        }
        Err(issue) => report.record_rejected(key, issue),
    }
}

/// Write an optional scalar parameter into its field
pub fn apply_optional<T: Scalar>(
    field: &mut Option<T>,
    key: &str,
    value: &ValueType,
    report: &mut ApplyReport,
) {
    match T::extract_optional(value) {
        Ok(v) => {
            *field = v;
            report.record_applied(key);
        }
        Err(issue) => report.record_rejected(key, issue),
    }
}

/// Replace a scalar array field with the parameter's elements
pub fn apply_scalar_array<T: Scalar>(
    field: &mut Vec<T>,
    key: &str,
    value: &ValueType,
    report: &mut ApplyReport,
) {
    let ValueType::Array { current, .. } = value else {
        report.record_rejected(key, mismatch(Kind::Array, value));
        return;
    };
    match extract_elements(current, T::extract) {
        Ok(values) => {
            *field = values;
            report.record_applied(key);
        }
        Err(issue) => report.record_rejected(key, issue),
    }
}

/// Replace an optional scalar array field with the parameter's elements
pub fn apply_optional_array<T: Scalar>(
    field: &mut Vec<Option<T>>,
    key: &str,
    value: &ValueType,
    report: &mut ApplyReport,
) {
    let ValueType::Array { current, .. } = value else {
        report.record_rejected(key, mismatch(Kind::Array, value));
        return;
    };
    match extract_elements(current, T::extract_optional) {
        Ok(values) => {
            *field = values;
            report.record_applied(key);
        }
        Err(issue) => report.record_rejected(key, issue),
    }
}

/// Apply nested parameters to a structured field in place
pub fn apply_nested<S: DynamicParameters + ?Sized>(
    field: &mut S,
    key: &str,
    value: &ValueType,
    report: &mut ApplyReport,
) {
    match value {
        ValueType::Struct { current, .. } => {
            log::trace!("applying {} nested parameters to `{key}`", current.len());
            let nested = field.apply(current);
            report.record_applied(key);
            report.absorb(key, nested);
        }
        other => report.record_rejected(key, mismatch(Kind::Struct, other)),
    }
}

/// Apply nested parameters to an optional structured field.
///
/// `None` clears the field. `Some` applies in place when the field is
/// present, otherwise builds a new value from `Default` first.
pub fn apply_optional_nested<S: DynamicParameters + Default>(
    field: &mut Option<S>,
    key: &str,
    value: &ValueType,
    report: &mut ApplyReport,
) {
    match value {
        ValueType::OptionalStruct { current: None, .. } => {
            *field = None;
            report.record_applied(key);
        }
        ValueType::OptionalStruct {
            current: Some(fields),
            ..
        } => {
            let target = field.get_or_insert_with(S::default);
            let nested = target.apply(fields);
            report.record_applied(key);
            report.absorb(key, nested);
        }
        other => report.record_rejected(key, mismatch(Kind::OptionalStruct, other)),
    }
}

/// Replace a structured array field, rebuilding every element.
///
/// Elements are built from `Default` and their own nested parameters rather
/// than updated in place, so any state an element keeps outside its
/// parameters is lost.
pub fn apply_nested_array<S: DynamicParameters + Default>(
    field: &mut Vec<S>,
    key: &str,
    value: &ValueType,
    report: &mut ApplyReport,
) {
    let ValueType::Array { current, .. } = value else {
        report.record_rejected(key, mismatch(Kind::Array, value));
        return;
    };

    let mut rebuilt = Vec::with_capacity(current.len());
    let mut nested_reports = Vec::with_capacity(current.len());
    for (index, element) in current.iter().enumerate() {
        match element {
            ValueType::Struct { current: fields, .. } => {
                let (item, nested) = build::<S>(fields);
                rebuilt.push(item);
                nested_reports.push(nested);
            }
            other => {
                report.record_rejected(
                    key,
                    ApplyIssue::ElementMismatch {
                        index,
                        expected: Kind::Struct,
                        found: other.kind(),
                    },
                );
                return;
            }
        }
    }

    *field = rebuilt;
    report.record_applied(key);
    for (index, nested) in nested_reports.into_iter().enumerate() {
        report.absorb(&format!("{key}.{index}"), nested);
    }
}

/// Build a new value from its parameters, starting from `Default`
pub fn build<S: DynamicParameters + Default>(parameters: &[Parameter]) -> (S, ApplyReport) {
    let mut value = S::default();
    let report = value.apply(parameters);
    (value, report)
}
