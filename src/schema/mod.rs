//! Schema module - declarative entity registry
//!
//! One `EntityDef` per entity type replaces the hand-written per-entity service
//! classes: the mutation engine, the delete guards and the constraint catalog are
//! all driven by these tables. Definitions live in [`tables`] and are fixed for
//! the lifetime of the process.

pub mod tables;

pub use tables::REGISTRY;

use serde_json::Value;

/// Scalar shape a field accepts on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Number,
    Text,
    Boolean,
    Timestamp,
}

impl ValueKind {
    /// Whether a supplied (non-null) JSON value fits this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueKind::Integer => value.as_i64().is_some(),
            ValueKind::Number => value.is_number(),
            ValueKind::Text => value.is_string(),
            ValueKind::Boolean => value.is_boolean(),
            ValueKind::Timestamp => value
                .as_str()
                .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok()),
        }
    }

    pub fn expected(&self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Number => "number",
            ValueKind::Text => "string",
            ValueKind::Boolean => "boolean",
            ValueKind::Timestamp => "RFC 3339 timestamp string",
        }
    }
}

/// One declarative validation rule for one field of one entity type.
///
/// Rules are iterated in declared order; required rules come first so that a
/// missing value is always reported as missing rather than as a failed
/// duplicate or foreign-key lookup.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: ValueKind,
    pub required_on_create: bool,
    pub required_on_update: bool,
    /// Duplicate check against the entity's own collection.
    pub unique: bool,
    /// Foreign-key existence check against the named entity.
    pub references: Option<&'static str>,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            required_on_create: true,
            required_on_update: true,
            unique: false,
            references: None,
        }
    }

    pub const fn optional(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            required_on_create: false,
            required_on_update: false,
            unique: false,
            references: None,
        }
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn references(mut self, target: &'static str) -> Self {
        self.references = Some(target);
        self
    }
}

/// "Does any other entity still reference me" rule, checked before delete.
///
/// Deletion is refused on the first rule whose count is nonzero, in declared
/// order, so the declaration order decides which child collection gets named
/// in the error.
#[derive(Debug, Clone, Copy)]
pub struct DependencyRule {
    pub child: &'static str,
    pub lookup_key: &'static str,
}

impl DependencyRule {
    pub const fn new(child: &'static str, lookup_key: &'static str) -> Self {
        Self { child, lookup_key }
    }
}

/// Declarative description of one entity type.
#[derive(Debug)]
pub struct EntityDef {
    /// Table name, also the URL path segment.
    pub name: &'static str,
    pub fields: &'static [FieldRule],
    pub dependents: &'static [DependencyRule],
    /// When set, delete marks the record hidden instead of removing it;
    /// uniqueness constraints stay in force until the row is purged.
    pub soft_delete: bool,
}

impl EntityDef {
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Not-null constraint identifier for one of this entity's fields.
    pub fn not_null_constraint(&self, field: &str) -> String {
        format!("nn_{}_{}", self.name, field)
    }

    /// Uniqueness constraint identifier for one of this entity's fields.
    pub fn unique_constraint(&self, field: &str) -> String {
        format!("uk_{}_{}", self.name, field)
    }

    /// Foreign-key constraint identifier for one of this entity's fields.
    pub fn foreign_key_constraint(&self, field: &str) -> String {
        format!("fk_{}_{}", self.name, field)
    }
}

/// Looks an entity definition up by its table / path-segment name.
pub fn def(name: &str) -> Option<&'static EntityDef> {
    REGISTRY.iter().find(|d| d.name == name)
}
