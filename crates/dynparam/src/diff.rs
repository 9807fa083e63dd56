//! Structural diff between two parameter lists.
//!
//! Compares current values only. Nested structs are matched by key and
//! arrays by index, down to the leaves, so a change deep inside a nested
//! value is reported at its own dotted path (`requests.1.name`) rather than
//! as a change of the whole container.

use crate::value::{Parameter, ParameterList, ValueType};

/// One difference between two parameter lists
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Present only in the second list
    Added {
        /// Dotted path
        path: String,
        /// New value
        value: ValueType,
    },
    /// Present only in the first list
    Removed {
        /// Dotted path
        path: String,
        /// Old value
        value: ValueType,
    },
    /// Present in both with different current values or cases
    Modified {
        /// Dotted path
        path: String,
        /// Old value
        before: ValueType,
        /// New value
        after: ValueType,
    },
}

impl Change {
    /// Dotted path of the changed value
    pub fn path(&self) -> &str {
        match self {
            Change::Added { path, .. } | Change::Removed { path, .. } | Change::Modified { path, .. } => {
                path
            }
        }
    }
}

/// Changes turning `before` into `after`.
///
/// Changes are ordered by `before`'s key order, followed by keys only
/// present in `after`.
pub fn diff(before: &[Parameter], after: &[Parameter]) -> Vec<Change> {
    let mut changes = Vec::new();
    diff_fields(before, after, None, &mut changes);
    changes
}

fn join(prefix: Option<&str>, segment: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{segment}"),
        None => segment.to_string(),
    }
}

fn diff_fields(
    before: &[Parameter],
    after: &[Parameter],
    prefix: Option<&str>,
    changes: &mut Vec<Change>,
) {
    for old in before {
        let path = join(prefix, &old.key);
        match after.find(&old.key) {
            Some(new) => diff_values(&old.value, &new.value, path, changes),
            None => changes.push(Change::Removed {
                path,
                value: old.value.clone(),
            }),
        }
    }
    for new in after {
        if before.find(&new.key).is_none() {
            changes.push(Change::Added {
                path: join(prefix, &new.key),
                value: new.value.clone(),
            });
        }
    }
}

fn diff_values(before: &ValueType, after: &ValueType, path: String, changes: &mut Vec<Change>) {
    match (before, after) {
        (ValueType::Struct { current: old, .. }, ValueType::Struct { current: new, .. })
        | (
            ValueType::OptionalStruct {
                current: Some(old), ..
            },
            ValueType::OptionalStruct {
                current: Some(new), ..
            },
        ) => diff_fields(old, new, Some(path.as_str()), changes),
        (ValueType::Array { current: old, .. }, ValueType::Array { current: new, .. }) => {
            for index in 0..old.len().max(new.len()) {
                let element_path = format!("{path}.{index}");
                match (old.get(index), new.get(index)) {
                    (Some(x), Some(y)) => diff_values(x, y, element_path, changes),
                    (Some(x), None) => changes.push(Change::Removed {
                        path: element_path,
                        value: x.clone(),
                    }),
                    (None, Some(y)) => changes.push(Change::Added {
                        path: element_path,
                        value: y.clone(),
                    }),
                    (None, None) => {}
                }
            }
        }
        _ if !before.current_eq(after) => changes.push(Change::Modified {
            path,
            before: before.clone(),
            after: after.clone(),
        }),
        _ => {}
    }
}
