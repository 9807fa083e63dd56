//! Error types for dynparam

use crate::value::Kind;

/// Why a single parameter was not written to its field during `apply`.
///
/// `apply` never fails as a whole; issues are collected in an
/// [`ApplyReport`](crate::ApplyReport) and the affected field keeps its
/// prior value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplyIssue {
    /// The parameter carries a different case than the field expects
    #[error("expected {expected} value, got {found}")]
    KindMismatch {
        /// Kind the field expects
        expected: Kind,
        /// Kind the parameter carries
        found: Kind,
    },

    /// An array element carries a different case than the field's elements
    #[error("element {index}: expected {expected} value, got {found}")]
    ElementMismatch {
        /// Position of the offending element
        index: usize,
        /// Kind the field's elements expect
        expected: Kind,
        /// Kind the element carries
        found: Kind,
    },

    /// An integer does not fit the field's integer type
    #[error("{value} does not fit in {target}")]
    OutOfRange {
        /// Integer carried by the parameter
        value: i64,
        /// Name of the field's integer type
        target: &'static str,
    },
}

/// Editor operation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// Path with no segments
    #[error("empty parameter path")]
    EmptyPath,

    /// No parameter under the given key
    #[error("no parameter at `{path}`")]
    UnknownKey {
        /// Path being resolved
        path: String,
    },

    /// Segment addressing an array is not a number
    #[error("`{segment}` in `{path}` is not an array index")]
    InvalidIndex {
        /// Path being resolved
        path: String,
        /// Offending segment
        segment: String,
    },

    /// Array index past the end
    #[error("index {index} out of bounds for `{path}` (length {len})")]
    IndexOutOfBounds {
        /// Path being resolved
        path: String,
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Path continues past a value that has no nested parameters
    #[error("`{path}` continues past a {kind} value")]
    NotAContainer {
        /// Path being resolved
        path: String,
        /// Kind of the value that cannot be descended into
        kind: Kind,
    },

    /// Replacement value has a different case than the target
    #[error("`{path}` holds a {expected} value, got {found}")]
    KindMismatch {
        /// Path being edited
        path: String,
        /// Kind of the existing value
        expected: Kind,
        /// Kind of the replacement
        found: Kind,
    },

    /// Replacement array mixes element kinds
    #[error("array at `{path}` holds {expected} elements, got {found}")]
    HeterogeneousArray {
        /// Path being edited
        path: String,
        /// Element kind already established
        expected: Kind,
        /// Offending element kind
        found: Kind,
    },
}

impl EditError {
    /// Attach the path being edited to an error raised below the editor
    pub fn at(self, at: &str) -> Self {
        match self {
            EditError::KindMismatch {
                expected, found, ..
            } => EditError::KindMismatch {
                path: at.to_string(),
                expected,
                found,
            },
            EditError::HeterogeneousArray {
                expected, found, ..
            } => EditError::HeterogeneousArray {
                path: at.to_string(),
                expected,
                found,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_issue_messages() {
        let issue = ApplyIssue::KindMismatch {
            expected: Kind::Int,
            found: Kind::String,
        };
        assert_eq!(issue.to_string(), "expected int value, got string");

        let issue = ApplyIssue::OutOfRange {
            value: 300,
            target: "u8",
        };
        assert_eq!(issue.to_string(), "300 does not fit in u8");
    }

    #[test]
    fn test_edit_error_at() {
        let err = EditError::KindMismatch {
            path: String::new(),
            expected: Kind::Bool,
            found: Kind::Int,
        }
        .at("sub_request.success");
        assert_eq!(
            err.to_string(),
            "`sub_request.success` holds a bool value, got int"
        );

        let unchanged = EditError::EmptyPath.at("ignored");
        assert_eq!(unchanged, EditError::EmptyPath);
    }
}
