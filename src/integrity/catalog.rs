//! Constraint catalog - storage constraint names to specific error codes
//!
//! Populated once at first use from the entity registry, read-only after that.
//! Identifiers follow the schema's naming scheme: `uk_<table>_<field>`,
//! `nn_<table>_<field>`, `fk_<table>_<field>`. Lookup is exact after trim and
//! lower-case; unrecognized names intentionally resolve to nothing so the
//! classifier can fall back to the generic `DATA_INTEGRITY` code instead of
//! guessing.

use super::code::ErrorCode;
use crate::schema::REGISTRY;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref CATALOG: HashMap<String, ErrorCode> = build();
}

fn build() -> HashMap<String, ErrorCode> {
    let mut map = HashMap::new();
    for entity in REGISTRY {
        for field in entity.fields {
            if field.required_on_create {
                map.insert(
                    entity.not_null_constraint(field.name),
                    ErrorCode::required(entity.name, field.name),
                );
            }
            if field.unique {
                map.insert(
                    entity.unique_constraint(field.name),
                    ErrorCode::duplicate(entity.name, field.name),
                );
            }
            if field.references.is_some() {
                map.insert(
                    entity.foreign_key_constraint(field.name),
                    ErrorCode::fk_violation(entity.name, field.name),
                );
            }
        }
    }
    map
}

/// Resolves a raw constraint identifier to its specific error code, or `None`
/// if the identifier is absent, empty or unknown.
pub fn resolve(identifier: &str) -> Option<ErrorCode> {
    let key = identifier.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }
    CATALOG.get(&key).copied()
}
