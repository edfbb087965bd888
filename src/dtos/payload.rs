//! Payload shape check - turns a raw JSON body into a validated [`Record`]
//!
//! Unlike the precheck guard, which fails fast, the shape check walks the
//! whole body and reports every unknown field and type mismatch at once, as a
//! field-to-message map. Explicit `null` values are dropped: they read as
//! "not supplied" everywhere downstream.

use crate::integrity::DomainError;
use crate::record::{self, Record};
use crate::schema::{EntityDef, ValueKind};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Validates `body` against the entity's declared fields and the shared base
/// fields, collecting all shape problems into one `Validation` error.
pub fn into_record(def: &'static EntityDef, body: Value) -> Result<Record, DomainError> {
    let Value::Object(map) = body else {
        return Err(DomainError::InvalidValue(
            "request body must be a JSON object".to_string(),
        ));
    };

    let mut rec = Record::new();
    let mut problems: BTreeMap<String, String> = BTreeMap::new();

    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        if let Some(field) = def.field(&key) {
            if field.kind.accepts(&value) {
                rec.set(&key, value);
            } else {
                problems.insert(key, format!("expected {}", field.kind.expected()));
            }
            continue;
        }
        match base_field_kind(&key) {
            Some(kind) if kind.accepts(&value) => {
                if key == record::UUID
                    && value.as_str().is_none_or(|s| Uuid::parse_str(s).is_err())
                {
                    problems.insert(key, "expected a UUID string".to_string());
                } else {
                    rec.set(&key, value);
                }
            }
            Some(kind) => {
                problems.insert(key, format!("expected {}", kind.expected()));
            }
            None => {
                problems.insert(key, format!("unknown field for {}", def.name));
            }
        }
    }

    if problems.is_empty() {
        Ok(rec)
    } else {
        Err(DomainError::Validation(problems))
    }
}

fn base_field_kind(field: &str) -> Option<ValueKind> {
    match field {
        record::ID | record::VERSION => Some(ValueKind::Integer),
        record::UUID => Some(ValueKind::Text),
        record::CREATED_AT | record::UPDATED_AT | record::DELETED_AT => Some(ValueKind::Timestamp),
        record::DELETED => Some(ValueKind::Boolean),
        _ => None,
    }
}
