//! Tagged value model
//!
//! `ValueType` is the closed set of shapes a field can take once it has been
//! captured by a snapshot. Every case pairs a `current` value with a `default`
//! of the same shape. Generated snapshots fill both sides with the field's
//! value at snapshot time, so `default` means "last known value" rather than
//! a factory default.
//!
//! # Cases
//!
//! ```text
//! Int / OptionalInt          i64 / Option<i64>
//! Float / OptionalFloat      f32 / Option<f32>
//! Double / OptionalDouble    f64 / Option<f64>
//! String / OptionalString    String / Option<String>
//! Bool / OptionalBool        bool / Option<bool>
//! Array                      Vec<ValueType>, every element the same kind
//! Struct                     Vec<Parameter>, a nested snapshot
//! OptionalStruct             Option<Vec<Parameter>>
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::convert::Scalar;
use crate::error::EditError;

// ============================================================================
// Kind
// ============================================================================

/// Payload-free discriminant of a [`ValueType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    /// Integer scalar
    Int,
    /// Optional integer scalar
    OptionalInt,
    /// 32-bit float scalar
    Float,
    /// Optional 32-bit float scalar
    OptionalFloat,
    /// 64-bit float scalar
    Double,
    /// Optional 64-bit float scalar
    OptionalDouble,
    /// String scalar
    String,
    /// Optional string scalar
    OptionalString,
    /// Boolean scalar
    Bool,
    /// Optional boolean scalar
    OptionalBool,
    /// Homogeneous array of tagged values
    Array,
    /// Nested parameter list
    Struct,
    /// Nested parameter list that may be absent
    OptionalStruct,
}

impl Kind {
    /// Name used in diagnostics and `Display`
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::OptionalInt => "optional int",
            Kind::Float => "float",
            Kind::OptionalFloat => "optional float",
            Kind::Double => "double",
            Kind::OptionalDouble => "optional double",
            Kind::String => "string",
            Kind::OptionalString => "optional string",
            Kind::Bool => "bool",
            Kind::OptionalBool => "optional bool",
            Kind::Array => "array",
            Kind::Struct => "struct",
            Kind::OptionalStruct => "optional struct",
        }
    }

    /// Check if absence is representable for this kind
    pub const fn is_optional(self) -> bool {
        matches!(
            self,
            Kind::OptionalInt
                | Kind::OptionalFloat
                | Kind::OptionalDouble
                | Kind::OptionalString
                | Kind::OptionalBool
                | Kind::OptionalStruct
        )
    }

    /// Check if values of this kind hold nested values
    pub const fn is_container(self) -> bool {
        matches!(self, Kind::Array | Kind::Struct | Kind::OptionalStruct)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ValueType
// ============================================================================

/// A tagged value: exactly one case is active, and `current` and `default`
/// always have the same shape.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueType {
    /// Integer value
    Int {
        /// Current value
        current: i64,
        /// Value to reset to
        default: i64,
    },
    /// Optional integer value
    OptionalInt {
        /// Current value
        current: Option<i64>,
        /// Value to reset to
        default: Option<i64>,
    },
    /// 32-bit float value
    Float {
        /// Current value
        current: f32,
        /// Value to reset to
        default: f32,
    },
    /// Optional 32-bit float value
    OptionalFloat {
        /// Current value
        current: Option<f32>,
        /// Value to reset to
        default: Option<f32>,
    },
    /// 64-bit float value
    Double {
        /// Current value
        current: f64,
        /// Value to reset to
        default: f64,
    },
    /// Optional 64-bit float value
    OptionalDouble {
        /// Current value
        current: Option<f64>,
        /// Value to reset to
        default: Option<f64>,
    },
    /// String value
    String {
        /// Current value
        current: String,
        /// Value to reset to
        default: String,
    },
    /// Optional string value
    OptionalString {
        /// Current value
        current: Option<String>,
        /// Value to reset to
        default: Option<String>,
    },
    /// Boolean value
    Bool {
        /// Current value
        current: bool,
        /// Value to reset to
        default: bool,
    },
    /// Optional boolean value
    OptionalBool {
        /// Current value
        current: Option<bool>,
        /// Value to reset to
        default: Option<bool>,
    },
    /// Homogeneous sequence of tagged values
    Array {
        /// Current elements
        current: Vec<ValueType>,
        /// Elements to reset to
        default: Vec<ValueType>,
    },
    /// Nested snapshot of a type implementing `DynamicParameters`
    Struct {
        /// Current fields
        current: Vec<Parameter>,
        /// Fields to reset to
        default: Vec<Parameter>,
    },
    /// Nested snapshot that may be absent
    OptionalStruct {
        /// Current fields, `None` when absent
        current: Option<Vec<Parameter>>,
        /// Fields to reset to
        default: Option<Vec<Parameter>>,
    },
}

/// Expands `$body` once per case with `$current`/`$default` bound to the
/// case's two sides.
macro_rules! for_each_case {
    ($value:expr, |$current:ident, $default:ident| $body:expr) => {
        match $value {
            ValueType::Int { current: $current, default: $default } => $body,
            ValueType::OptionalInt { current: $current, default: $default } => $body,
            ValueType::Float { current: $current, default: $default } => $body,
            ValueType::OptionalFloat { current: $current, default: $default } => $body,
            ValueType::Double { current: $current, default: $default } => $body,
            ValueType::OptionalDouble { current: $current, default: $default } => $body,
            ValueType::String { current: $current, default: $default } => $body,
            ValueType::OptionalString { current: $current, default: $default } => $body,
            ValueType::Bool { current: $current, default: $default } => $body,
            ValueType::OptionalBool { current: $current, default: $default } => $body,
            ValueType::Array { current: $current, default: $default } => $body,
            ValueType::Struct { current: $current, default: $default } => $body,
            ValueType::OptionalStruct { current: $current, default: $default } => $body,
        }
    };
}

impl ValueType {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Wrap a scalar, using it as both current and default value
    pub fn scalar<T: Scalar>(value: T) -> Self {
        T::wrap(value.clone(), value)
    }

    /// Wrap an optional scalar, using it as both current and default value
    pub fn optional<T: Scalar>(value: Option<T>) -> Self {
        T::wrap_optional(value.clone(), value)
    }

    /// Build an array whose current and default elements are `elements`
    pub fn array(elements: Vec<ValueType>) -> Self {
        ValueType::Array {
            current: elements.clone(),
            default: elements,
        }
    }

    /// Build a nested value whose current and default fields are `fields`
    pub fn structure(fields: Vec<Parameter>) -> Self {
        ValueType::Struct {
            current: fields.clone(),
            default: fields,
        }
    }

    /// Build an optional nested value whose current and default are `fields`
    pub fn optional_structure(fields: Option<Vec<Parameter>>) -> Self {
        ValueType::OptionalStruct {
            current: fields.clone(),
            default: fields,
        }
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Get the case tag
    pub fn kind(&self) -> Kind {
        match self {
            ValueType::Int { .. } => Kind::Int,
            ValueType::OptionalInt { .. } => Kind::OptionalInt,
            ValueType::Float { .. } => Kind::Float,
            ValueType::OptionalFloat { .. } => Kind::OptionalFloat,
            ValueType::Double { .. } => Kind::Double,
            ValueType::OptionalDouble { .. } => Kind::OptionalDouble,
            ValueType::String { .. } => Kind::String,
            ValueType::OptionalString { .. } => Kind::OptionalString,
            ValueType::Bool { .. } => Kind::Bool,
            ValueType::OptionalBool { .. } => Kind::OptionalBool,
            ValueType::Array { .. } => Kind::Array,
            ValueType::Struct { .. } => Kind::Struct,
            ValueType::OptionalStruct { .. } => Kind::OptionalStruct,
        }
    }

    /// Kind of the array's elements.
    ///
    /// Looks at the first current element, then the first default element.
    /// Returns `None` for non-arrays and for arrays with no elements at all.
    pub fn element_kind(&self) -> Option<Kind> {
        match self {
            ValueType::Array { current, default } => {
                current.first().or(default.first()).map(ValueType::kind)
            }
            _ => None,
        }
    }

    /// Check the homogeneity invariant recursively.
    ///
    /// Every element of an array, current and default alike, must carry the
    /// same kind. Scalar cases are well formed by construction.
    pub fn is_well_formed(&self) -> bool {
        match self {
            ValueType::Array { current, default } => {
                let mut elements = current.iter().chain(default);
                match elements.next() {
                    None => true,
                    Some(first) => {
                        let kind = first.kind();
                        first.is_well_formed()
                            && elements.all(|e| e.kind() == kind && e.is_well_formed())
                    }
                }
            }
            ValueType::Struct { current, default } => current
                .iter()
                .chain(default)
                .all(|p| p.value.is_well_formed()),
            ValueType::OptionalStruct { current, default } => current
                .iter()
                .chain(default)
                .flatten()
                .all(|p| p.value.is_well_formed()),
            _ => true,
        }
    }

    /// Check if the current value differs from the default
    pub fn is_modified(&self) -> bool {
        for_each_case!(self, |current, default| current != default)
    }

    /// Compare current sides only, ignoring defaults at every depth
    pub fn current_eq(&self, other: &ValueType) -> bool {
        match (self, other) {
            (ValueType::Int { current: a, .. }, ValueType::Int { current: b, .. }) => a == b,
            (ValueType::OptionalInt { current: a, .. }, ValueType::OptionalInt { current: b, .. }) => {
                a == b
            }
            (ValueType::Float { current: a, .. }, ValueType::Float { current: b, .. }) => a == b,
            (
                ValueType::OptionalFloat { current: a, .. },
                ValueType::OptionalFloat { current: b, .. },
            ) => a == b,
            (ValueType::Double { current: a, .. }, ValueType::Double { current: b, .. }) => a == b,
            (
                ValueType::OptionalDouble { current: a, .. },
                ValueType::OptionalDouble { current: b, .. },
            ) => a == b,
            (ValueType::String { current: a, .. }, ValueType::String { current: b, .. }) => a == b,
            (
                ValueType::OptionalString { current: a, .. },
                ValueType::OptionalString { current: b, .. },
            ) => a == b,
            (ValueType::Bool { current: a, .. }, ValueType::Bool { current: b, .. }) => a == b,
            (
                ValueType::OptionalBool { current: a, .. },
                ValueType::OptionalBool { current: b, .. },
            ) => a == b,
            (ValueType::Array { current: a, .. }, ValueType::Array { current: b, .. }) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.current_eq(y))
            }
            (ValueType::Struct { current: a, .. }, ValueType::Struct { current: b, .. }) => {
                fields_current_eq(a, b)
            }
            (
                ValueType::OptionalStruct { current: a, .. },
                ValueType::OptionalStruct { current: b, .. },
            ) => match (a, b) {
                (Some(a), Some(b)) => fields_current_eq(a, b),
                (None, None) => true,
                _ => false,
            },
            _ => false,
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Overwrite the current value with a copy of the default
    pub fn reset(&mut self) {
        for_each_case!(self, |current, default| *current = default.clone())
    }

    /// Copy of this value with the current side reset to the default
    pub fn to_default(&self) -> ValueType {
        let mut value = self.clone();
        value.reset();
        value
    }

    /// Take the current side of `value`, keeping this value's default.
    ///
    /// The kinds must match. Array replacements must stay homogeneous and
    /// agree with the kind of any elements already present.
    pub fn replace_current(&mut self, value: ValueType) -> Result<(), EditError> {
        let expected = self.kind();
        let found = value.kind();
        match (self, value) {
            (ValueType::Int { current, .. }, ValueType::Int { current: new, .. }) => {
                *current = new
            }
            (ValueType::OptionalInt { current, .. }, ValueType::OptionalInt { current: new, .. }) => {
                *current = new
            }
            (ValueType::Float { current, .. }, ValueType::Float { current: new, .. }) => {
                *current = new
            }
            (
                ValueType::OptionalFloat { current, .. },
                ValueType::OptionalFloat { current: new, .. },
            ) => *current = new,
            (ValueType::Double { current, .. }, ValueType::Double { current: new, .. }) => {
                *current = new
            }
            (
                ValueType::OptionalDouble { current, .. },
                ValueType::OptionalDouble { current: new, .. },
            ) => *current = new,
            (ValueType::String { current, .. }, ValueType::String { current: new, .. }) => {
                *current = new
            }
            (
                ValueType::OptionalString { current, .. },
                ValueType::OptionalString { current: new, .. },
            ) => *current = new,
            (ValueType::Bool { current, .. }, ValueType::Bool { current: new, .. }) => {
                *current = new
            }
            (
                ValueType::OptionalBool { current, .. },
                ValueType::OptionalBool { current: new, .. },
            ) => *current = new,
            (ValueType::Array { current, default }, ValueType::Array { current: new, .. }) => {
                let element = current
                    .first()
                    .or(default.first())
                    .or(new.first())
                    .map(ValueType::kind);
                if let Some(element) = element {
                    if let Some(odd) = new.iter().find(|e| e.kind() != element) {
                        return Err(EditError::HeterogeneousArray {
                            path: String::new(),
                            expected: element,
                            found: odd.kind(),
                        });
                    }
                }
                *current = new;
            }
            (ValueType::Struct { current, .. }, ValueType::Struct { current: new, .. }) => {
                *current = new
            }
            (
                ValueType::OptionalStruct { current, .. },
                ValueType::OptionalStruct { current: new, .. },
            ) => *current = new,
            _ => {
                return Err(EditError::KindMismatch {
                    path: String::new(),
                    expected,
                    found,
                })
            }
        }
        Ok(())
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int { current, .. } => write!(f, "{current}"),
            ValueType::OptionalInt { current, .. } => write_optional(f, current),
            ValueType::Float { current, .. } => write!(f, "{current}"),
            ValueType::OptionalFloat { current, .. } => write_optional(f, current),
            ValueType::Double { current, .. } => write!(f, "{current}"),
            ValueType::OptionalDouble { current, .. } => write_optional(f, current),
            ValueType::String { current, .. } => write!(f, "{current:?}"),
            ValueType::OptionalString { current, .. } => match current {
                Some(s) => write!(f, "{s:?}"),
                None => f.write_str("none"),
            },
            ValueType::Bool { current, .. } => write!(f, "{current}"),
            ValueType::OptionalBool { current, .. } => write_optional(f, current),
            ValueType::Array { current, .. } => {
                f.write_str("[")?;
                for (i, element) in current.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            ValueType::Struct { current, .. } => write_fields(f, current),
            ValueType::OptionalStruct { current, .. } => match current {
                Some(fields) => write_fields(f, fields),
                None => f.write_str("none"),
            },
        }
    }
}

fn fields_current_eq(a: &[Parameter], b: &[Parameter]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.key == y.key && x.value.current_eq(&y.value))
}

fn write_optional<T: fmt::Display>(f: &mut fmt::Formatter<'_>, value: &Option<T>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{v}"),
        None => f.write_str("none"),
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Parameter]) -> fmt::Result {
    if fields.is_empty() {
        return f.write_str("{}");
    }
    f.write_str("{ ")?;
    for (i, parameter) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{parameter}")?;
    }
    f.write_str(" }")
}

// ============================================================================
// Parameter
// ============================================================================

/// A named tagged value, one per field of a snapshot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    /// Field name
    pub key: String,
    /// Captured value
    pub value: ValueType,
}

impl Parameter {
    /// Create a new parameter
    pub fn new(key: impl Into<String>, value: ValueType) -> Self {
        Parameter {
            key: key.into(),
            value,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// Key lookups over a parameter list.
///
/// Lists are ordered for display only; lookups go by key and return the
/// first match.
pub trait ParameterList {
    /// Find the parameter with the given key
    fn find(&self, key: &str) -> Option<&Parameter>;

    /// Find the parameter with the given key, mutably
    fn find_mut(&mut self, key: &str) -> Option<&mut Parameter>;

    /// Get the value stored under `key`
    fn value_of(&self, key: &str) -> Option<&ValueType> {
        self.find(key).map(|p| &p.value)
    }

    /// All keys, in list order
    fn keys(&self) -> Vec<&str>;
}

impl ParameterList for [Parameter] {
    fn find(&self, key: &str) -> Option<&Parameter> {
        self.iter().find(|p| p.key == key)
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Parameter> {
        self.iter_mut().find(|p| p.key == key)
    }

    fn keys(&self) -> Vec<&str> {
        self.iter().map(|p| p.key.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub_request() -> Vec<Parameter> {
        vec![
            Parameter::new("name", ValueType::scalar("n".to_string())),
            Parameter::new("success", ValueType::scalar(true)),
            Parameter::new("sub_title", ValueType::optional::<String>(None)),
        ]
    }

    #[test]
    fn test_scalar_constructor_sets_both_sides() {
        assert_eq!(
            ValueType::scalar(42i64),
            ValueType::Int {
                current: 42,
                default: 42
            }
        );
        assert_eq!(
            ValueType::optional(Some(1.5f32)),
            ValueType::OptionalFloat {
                current: Some(1.5),
                default: Some(1.5)
            }
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(ValueType::scalar(1i32).kind(), Kind::Int);
        assert_eq!(ValueType::scalar(2.0f64).kind(), Kind::Double);
        assert_eq!(ValueType::optional::<bool>(None).kind(), Kind::OptionalBool);
        assert_eq!(ValueType::structure(vec![]).kind(), Kind::Struct);
        assert_eq!(ValueType::optional_structure(None).kind(), Kind::OptionalStruct);
        assert!(Kind::OptionalStruct.is_optional());
        assert!(!Kind::Int.is_optional());
        assert!(Kind::Array.is_container());
        assert!(!Kind::String.is_container());
    }

    #[test]
    fn test_element_kind() {
        let tags = ValueType::array(vec![ValueType::scalar("a".to_string())]);
        assert_eq!(tags.element_kind(), Some(Kind::String));
        assert_eq!(ValueType::array(vec![]).element_kind(), None);
        assert_eq!(ValueType::scalar(true).element_kind(), None);

        let only_default = ValueType::Array {
            current: vec![],
            default: vec![ValueType::scalar(1i64)],
        };
        assert_eq!(only_default.element_kind(), Some(Kind::Int));
    }

    #[test]
    fn test_well_formed() {
        let good = ValueType::array(vec![ValueType::scalar(1i64), ValueType::scalar(2i64)]);
        assert!(good.is_well_formed());

        let mixed = ValueType::array(vec![
            ValueType::scalar(1i64),
            ValueType::scalar("two".to_string()),
        ]);
        assert!(!mixed.is_well_formed());

        let mixed_sides = ValueType::Array {
            current: vec![ValueType::scalar(1i64)],
            default: vec![ValueType::scalar(false)],
        };
        assert!(!mixed_sides.is_well_formed());

        let nested = ValueType::structure(vec![Parameter::new("bad", mixed)]);
        assert!(!nested.is_well_formed());
        assert!(ValueType::structure(sub_request()).is_well_formed());
    }

    #[test]
    fn test_modified_and_reset() {
        let mut value = ValueType::String {
            current: "edited".to_string(),
            default: "original".to_string(),
        };
        assert!(value.is_modified());
        assert_eq!(value.to_default(), ValueType::scalar("original".to_string()));

        value.reset();
        assert!(!value.is_modified());
        assert_eq!(value, ValueType::scalar("original".to_string()));
    }

    #[test]
    fn test_current_eq_ignores_defaults() {
        let edited = ValueType::Int {
            current: 1,
            default: 5,
        };
        assert!(edited.current_eq(&ValueType::scalar(1i64)));
        assert!(!edited.current_eq(&ValueType::scalar(5i64)));
        assert!(!edited.current_eq(&ValueType::optional(Some(1i64))));

        let nested = ValueType::structure(vec![Parameter::new("n", edited)]);
        let plain = ValueType::structure(vec![Parameter::new("n", ValueType::scalar(1i64))]);
        assert!(nested.current_eq(&plain));
        assert_ne!(nested, plain);

        let renamed = ValueType::structure(vec![Parameter::new("m", ValueType::scalar(1i64))]);
        assert!(!plain.current_eq(&renamed));
    }

    #[test]
    fn test_replace_current_keeps_default() {
        let mut value = ValueType::scalar(10i64);
        value.replace_current(ValueType::scalar(20i64)).unwrap();
        assert_eq!(
            value,
            ValueType::Int {
                current: 20,
                default: 10
            }
        );
    }

    #[test]
    fn test_replace_current_rejects_other_kind() {
        let mut value = ValueType::scalar(10i64);
        let err = value
            .replace_current(ValueType::scalar("ten".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::KindMismatch {
                expected: Kind::Int,
                found: Kind::String,
                ..
            }
        ));
        assert_eq!(value, ValueType::scalar(10i64));
    }

    #[test]
    fn test_replace_current_keeps_arrays_homogeneous() {
        let mut tags = ValueType::array(vec![ValueType::scalar("a".to_string())]);
        let err = tags
            .replace_current(ValueType::array(vec![ValueType::scalar(1i64)]))
            .unwrap_err();
        assert!(matches!(err, EditError::HeterogeneousArray { .. }));

        tags.replace_current(ValueType::array(vec![])).unwrap();
        assert!(tags.is_modified());
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueType::scalar(42i64).to_string(), "42");
        assert_eq!(ValueType::scalar("hi".to_string()).to_string(), "\"hi\"");
        assert_eq!(ValueType::optional::<i64>(None).to_string(), "none");
        assert_eq!(
            ValueType::array(vec![ValueType::scalar(true), ValueType::scalar(false)]).to_string(),
            "[true, false]"
        );
        assert_eq!(
            ValueType::structure(sub_request()).to_string(),
            "{ name: \"n\", success: true, sub_title: none }"
        );
        assert_eq!(ValueType::structure(vec![]).to_string(), "{}");
    }

    #[test]
    fn test_parameter_list_lookup() {
        let mut params = sub_request();
        assert_eq!(params.keys(), vec!["name", "success", "sub_title"]);
        assert_eq!(
            params.value_of("success"),
            Some(&ValueType::scalar(true))
        );
        assert!(params.find("missing").is_none());

        params.find_mut("name").unwrap().value = ValueType::scalar("m".to_string());
        assert_eq!(params.value_of("name"), Some(&ValueType::scalar("m".to_string())));
    }
}
