//! Form layout over a parameter list.
//!
//! Flattens a snapshot into the rows a generic editor would render: one row
//! per parameter, with nested structs and array elements following their
//! parent one level deeper. Each row's `path` is what [`Editor`](crate::Editor)
//! takes to read or write that value, so a UI binds controls to paths rather
//! than to fields of a concrete type.

use crate::value::{Kind, Parameter, ValueType};

/// Control used to edit a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// Free text input
    Text,
    /// Whole number input
    Integer,
    /// Decimal number input
    Decimal,
    /// On/off switch
    Toggle,
    /// Inner control plus a "none" state
    Optional(Box<Widget>),
    /// Header for an array; elements follow as their own rows
    List {
        /// Number of elements
        len: usize,
    },
    /// Header for a nested struct; fields follow as their own rows
    Group,
}

impl Widget {
    /// Control for a value of the given kind
    pub fn for_kind(kind: Kind, len: usize) -> Widget {
        match kind {
            Kind::Int => Widget::Integer,
            Kind::Float | Kind::Double => Widget::Decimal,
            Kind::String => Widget::Text,
            Kind::Bool => Widget::Toggle,
            Kind::OptionalInt => Widget::Optional(Box::new(Widget::Integer)),
            Kind::OptionalFloat | Kind::OptionalDouble => Widget::Optional(Box::new(Widget::Decimal)),
            Kind::OptionalString => Widget::Optional(Box::new(Widget::Text)),
            Kind::OptionalBool => Widget::Optional(Box::new(Widget::Toggle)),
            Kind::Array => Widget::List { len },
            Kind::Struct => Widget::Group,
            Kind::OptionalStruct => Widget::Optional(Box::new(Widget::Group)),
        }
    }
}

/// One row of a form
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Dotted path accepted by the editor
    pub path: String,
    /// Display label
    pub label: String,
    /// Nesting level, 0 for top-level parameters
    pub depth: usize,
    /// Control to render
    pub widget: Widget,
    /// Rendered current value; `None` for group and list headers
    pub text: Option<String>,
    /// Whether the current value differs from the default
    pub modified: bool,
}

/// Flatten `parameters` into form rows, parents before children
pub fn layout(parameters: &[Parameter]) -> Vec<FormField> {
    let mut rows = Vec::new();
    walk(parameters, None, 0, &mut rows);
    rows
}

fn walk(parameters: &[Parameter], prefix: Option<&str>, depth: usize, rows: &mut Vec<FormField>) {
    for parameter in parameters {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{}", parameter.key),
            None => parameter.key.clone(),
        };
        push(&parameter.value, path, parameter.key.clone(), depth, rows);
    }
}

fn push(value: &ValueType, path: String, label: String, depth: usize, rows: &mut Vec<FormField>) {
    let len = match value {
        ValueType::Array { current, .. } => current.len(),
        _ => 0,
    };
    let text = match value {
        ValueType::Array { .. } | ValueType::Struct { .. } => None,
        ValueType::OptionalStruct { current: Some(_), .. } => None,
        other => Some(other.to_string()),
    };
    rows.push(FormField {
        path: path.clone(),
        label: label.clone(),
        depth,
        widget: Widget::for_kind(value.kind(), len),
        text,
        modified: value.is_modified(),
    });

    match value {
        ValueType::Struct { current, .. }
        | ValueType::OptionalStruct {
            current: Some(current),
            ..
        } => walk(current, Some(path.as_str()), depth + 1, rows),
        ValueType::Array { current, .. } => {
            for (index, element) in current.iter().enumerate() {
                push(
                    element,
                    format!("{path}.{index}"),
                    format!("{label}[{index}]"),
                    depth + 1,
                    rows,
                );
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_widgets() {
        assert_eq!(Widget::for_kind(Kind::Int, 0), Widget::Integer);
        assert_eq!(Widget::for_kind(Kind::Double, 0), Widget::Decimal);
        assert_eq!(
            Widget::for_kind(Kind::OptionalString, 0),
            Widget::Optional(Box::new(Widget::Text))
        );
    }

    #[test]
    fn test_layout_flattens_nested_values() {
        let params = vec![
            Parameter::new("command", ValueType::scalar("start".to_string())),
            Parameter::new(
                "sub_request",
                ValueType::structure(vec![Parameter::new("success", ValueType::scalar(true))]),
            ),
            Parameter::new(
                "tags",
                ValueType::array(vec![ValueType::scalar("a".to_string())]),
            ),
            Parameter::new("missing", ValueType::optional_structure(None)),
        ];

        let rows = layout(&params);
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            ["command", "sub_request", "sub_request.success", "tags", "tags.0", "missing"]
        );

        assert_eq!(rows[0].text.as_deref(), Some("\"start\""));
        assert_eq!(rows[1].widget, Widget::Group);
        assert_eq!(rows[1].text, None);
        assert_eq!(rows[2].depth, 1);
        assert_eq!(rows[2].widget, Widget::Toggle);
        assert_eq!(rows[3].widget, Widget::List { len: 1 });
        assert_eq!(rows[4].label, "tags[0]");
        assert_eq!(rows[5].text.as_deref(), Some("none"));
        assert_eq!(rows[5].widget, Widget::Optional(Box::new(Widget::Group)));
    }

    #[test]
    fn test_layout_marks_modified_rows() {
        let params = vec![Parameter::new(
            "duration",
            ValueType::Int {
                current: 45,
                default: 30,
            },
        )];
        let rows = layout(&params);
        assert!(rows[0].modified);
        assert_eq!(rows[0].text.as_deref(), Some("45"));
    }
}
