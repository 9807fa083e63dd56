//! Static description of a type's parameters.
//!
//! The derive emits one `Schema` per type: the classified fields in
//! declaration order, plus every field the classifier could not map onto the
//! tagged value model. Skipped fields never appear in snapshots and cannot be
//! targeted by `apply`, so the list is the place to look when a field seems
//! to be missing.

use crate::value::Kind;

/// A field that takes part in snapshot and apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Parameter key, equal to the field name
    pub name: &'static str,
    /// Kind of the tagged value produced for this field
    pub kind: Kind,
    /// Kind of the array's elements, for array fields
    pub element: Option<Kind>,
    /// Declared Rust type, as written
    pub declared_type: &'static str,
}

/// A field left out of snapshot and apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    /// Field name
    pub name: &'static str,
    /// Declared Rust type, as written
    pub declared_type: &'static str,
    /// Why the type has no tagged value representation
    pub reason: &'static str,
}

/// Description of a type implementing `DynamicParameters`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Name of the described type
    pub type_name: &'static str,
    /// Classified fields, in declaration order
    pub fields: Vec<FieldSchema>,
    /// Fields the classifier skipped, in declaration order
    pub skipped: Vec<SkippedField>,
}

impl Schema {
    /// Create a schema with no fields
    pub fn new(type_name: &'static str) -> Self {
        Schema {
            type_name,
            fields: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Look up a classified field by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Parameter keys, in declaration order
    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Check if any field was skipped
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Log every skipped field at `warn` level.
    ///
    /// Meant to be called once when a type is registered with a consumer, so
    /// fields silently left out by the classifier show up in the logs.
    pub fn warn_skipped(&self) {
        for field in &self.skipped {
            log::warn!(
                "{}.{}: `{}` is not a parameter ({})",
                self.type_name,
                field.name,
                field.declared_type,
                field.reason
            );
        }
    }
}
