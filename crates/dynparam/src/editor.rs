//! Path-based editing of a snapshot.
//!
//! An `Editor` owns a parameter list taken from an object, lets a UI read
//! and write individual values by dotted path, and finally commits the edited
//! list back through `apply`. Paths name struct fields by key and array
//! elements by index: `sub_request.name`, `requests.0.success`.
//!
//! Edits only touch the current side of a value, so the default captured at
//! snapshot time stays available for `reset`.

use crate::convert::Scalar;
use crate::diff::{diff, Change};
use crate::error::EditError;
use crate::form::{layout, FormField};
use crate::report::ApplyReport;
use crate::value::{Parameter, ParameterList, ValueType};
use crate::DynamicParameters;

/// Editable copy of a parameter list
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    parameters: Vec<Parameter>,
}

impl Editor {
    /// Edit an existing parameter list
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Editor { parameters }
    }

    /// Edit a fresh snapshot of `object`
    pub fn from_object<T: DynamicParameters + ?Sized>(object: &T) -> Self {
        Editor::new(object.snapshot())
    }

    /// Current parameter list
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Take the edited parameter list
    pub fn into_parameters(self) -> Vec<Parameter> {
        self.parameters
    }

    /// Get the value at `path`
    pub fn get(&self, path: &str) -> Result<&ValueType, EditError> {
        let segments = split_path(path)?;
        let (first, rest) = segments.split_first().ok_or(EditError::EmptyPath)?;
        let parameter = self
            .parameters
            .find(first)
            .ok_or_else(|| unknown_key(path))?;
        descend(&parameter.value, rest, path)
    }

    /// Replace the current side of the value at `path`.
    ///
    /// `value` must have the same case as the existing value; its default is
    /// ignored.
    pub fn set(&mut self, path: &str, value: ValueType) -> Result<(), EditError> {
        self.locate_mut(path)?
            .replace_current(value)
            .map_err(|e| e.at(path))
    }

    /// Set a scalar value at `path`
    pub fn set_scalar<T: Scalar>(&mut self, path: &str, value: T) -> Result<(), EditError> {
        self.set(path, ValueType::scalar(value))
    }

    /// Set an optional scalar value at `path`
    pub fn set_optional<T: Scalar>(
        &mut self,
        path: &str,
        value: Option<T>,
    ) -> Result<(), EditError> {
        self.set(path, ValueType::optional(value))
    }

    /// Reset the value at `path` to its default
    pub fn reset(&mut self, path: &str) -> Result<(), EditError> {
        self.locate_mut(path)?.reset();
        Ok(())
    }

    /// Reset every value to its default
    pub fn reset_all(&mut self) {
        for parameter in &mut self.parameters {
            parameter.value.reset();
        }
    }

    /// Check if any value differs from its default
    pub fn is_modified(&self) -> bool {
        self.parameters.iter().any(|p| p.value.is_modified())
    }

    /// Leaf-level changes from the defaults to the current values
    pub fn changes(&self) -> Vec<Change> {
        let defaults: Vec<Parameter> = self
            .parameters
            .iter()
            .map(|p| Parameter::new(p.key.clone(), p.value.to_default()))
            .collect();
        diff(&defaults, &self.parameters)
    }

    /// Form rows for the current parameter list
    pub fn fields(&self) -> Vec<FormField> {
        layout(&self.parameters)
    }

    /// Apply the edited parameters to `target`
    pub fn commit<T: DynamicParameters + ?Sized>(&self, target: &mut T) -> ApplyReport {
        target.apply(&self.parameters)
    }

    fn locate_mut(&mut self, path: &str) -> Result<&mut ValueType, EditError> {
        let segments = split_path(path)?;
        let (first, rest) = segments.split_first().ok_or(EditError::EmptyPath)?;
        let parameter = self
            .parameters
            .find_mut(first)
            .ok_or_else(|| unknown_key(path))?;
        descend_mut(&mut parameter.value, rest, path)
    }
}

fn split_path(path: &str) -> Result<Vec<&str>, EditError> {
    if path.is_empty() {
        return Err(EditError::EmptyPath);
    }
    Ok(path.split('.').collect())
}

fn unknown_key(path: &str) -> EditError {
    EditError::UnknownKey {
        path: path.to_string(),
    }
}

fn parse_index(segment: &str, path: &str) -> Result<usize, EditError> {
    segment.parse().map_err(|_| EditError::InvalidIndex {
        path: path.to_string(),
        segment: segment.to_string(),
    })
}

fn out_of_bounds(path: &str, index: usize, len: usize) -> EditError {
    EditError::IndexOutOfBounds {
        path: path.to_string(),
        index,
        len,
    }
}

fn descend<'a>(
    value: &'a ValueType,
    segments: &[&str],
    path: &str,
) -> Result<&'a ValueType, EditError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(value);
    };
    let next = match value {
        ValueType::Struct { current, .. }
        | ValueType::OptionalStruct {
            current: Some(current),
            ..
        } => &current.find(segment).ok_or_else(|| unknown_key(path))?.value,
        ValueType::Array { current, .. } => {
            let index = parse_index(segment, path)?;
            current
                .get(index)
                .ok_or_else(|| out_of_bounds(path, index, current.len()))?
        }
        other => {
            return Err(EditError::NotAContainer {
                path: path.to_string(),
                kind: other.kind(),
            })
        }
    };
    descend(next, rest, path)
}

fn descend_mut<'a>(
    value: &'a mut ValueType,
    segments: &[&str],
    path: &str,
) -> Result<&'a mut ValueType, EditError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(value);
    };
    let next = match value {
        ValueType::Struct { current, .. }
        | ValueType::OptionalStruct {
            current: Some(current),
            ..
        } => {
            &mut current
                .find_mut(segment)
                .ok_or_else(|| unknown_key(path))?
                .value
        }
        ValueType::Array { current, .. } => {
            let index = parse_index(segment, path)?;
            let len = current.len();
            current
                .get_mut(index)
                .ok_or_else(|| out_of_bounds(path, index, len))?
        }
        other => {
            return Err(EditError::NotAContainer {
                path: path.to_string(),
                kind: other.kind(),
            })
        }
    };
    descend_mut(next, rest, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;

    fn sample() -> Vec<Parameter> {
        let sub = |name: &str| {
            ValueType::structure(vec![
                Parameter::new("name", ValueType::scalar(name.to_string())),
                Parameter::new("sub_title", ValueType::optional::<String>(None)),
            ])
        };
        vec![
            Parameter::new("duration", ValueType::scalar(30i64)),
            Parameter::new("sub_request", sub("n")),
            Parameter::new("requests", ValueType::array(vec![sub("a"), sub("b")])),
        ]
    }

    #[test]
    fn test_get_by_path() {
        let editor = Editor::new(sample());
        assert_eq!(editor.get("duration"), Ok(&ValueType::scalar(30i64)));
        assert_eq!(
            editor.get("requests.1.name"),
            Ok(&ValueType::scalar("b".to_string()))
        );
        assert_eq!(editor.get("sub_request").unwrap().kind(), Kind::Struct);
    }

    #[test]
    fn test_path_errors() {
        let editor = Editor::new(sample());
        assert_eq!(editor.get(""), Err(EditError::EmptyPath));
        assert!(matches!(
            editor.get("nope"),
            Err(EditError::UnknownKey { .. })
        ));
        assert!(matches!(
            editor.get("sub_request.nope"),
            Err(EditError::UnknownKey { .. })
        ));
        assert!(matches!(
            editor.get("requests.first"),
            Err(EditError::InvalidIndex { .. })
        ));
        assert_eq!(
            editor.get("requests.5"),
            Err(EditError::IndexOutOfBounds {
                path: "requests.5".to_string(),
                index: 5,
                len: 2
            })
        );
        assert_eq!(
            editor.get("duration.x"),
            Err(EditError::NotAContainer {
                path: "duration.x".to_string(),
                kind: Kind::Int
            })
        );
    }

    #[test]
    fn test_set_keeps_default_and_reset_restores() {
        let mut editor = Editor::new(sample());
        assert!(!editor.is_modified());

        editor.set_scalar("requests.0.name", "z".to_string()).unwrap();
        editor.set_optional("sub_request.sub_title", Some("t".to_string())).unwrap();
        assert!(editor.is_modified());
        assert_eq!(
            editor.get("requests.0.name"),
            Ok(&ValueType::String {
                current: "z".to_string(),
                default: "a".to_string()
            })
        );

        editor.reset("requests.0.name").unwrap();
        assert_eq!(
            editor.get("requests.0.name"),
            Ok(&ValueType::scalar("a".to_string()))
        );

        editor.reset_all();
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_set_rejects_other_kind() {
        let mut editor = Editor::new(sample());
        let err = editor.set_scalar("duration", true).unwrap_err();
        assert_eq!(
            err,
            EditError::KindMismatch {
                path: "duration".to_string(),
                expected: Kind::Int,
                found: Kind::Bool
            }
        );
        assert_eq!(editor.get("duration"), Ok(&ValueType::scalar(30i64)));
    }

    #[test]
    fn test_changes_lists_edited_leaves() {
        let mut editor = Editor::new(sample());
        editor.set_scalar("duration", 45i64).unwrap();
        editor.set_scalar("requests.1.name", "c".to_string()).unwrap();

        let changes = editor.changes();
        let paths: Vec<&str> = changes.iter().map(Change::path).collect();
        assert_eq!(paths, ["duration", "requests.1.name"]);
    }

    #[test]
    fn test_fields_follow_paths() {
        let editor = Editor::new(sample());
        let rows = editor.fields();
        for row in &rows {
            assert!(editor.get(&row.path).is_ok(), "row path {} resolves", row.path);
        }
    }
}
