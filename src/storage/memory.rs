//! In-memory store - constraint-enforcing map-backed storage
//!
//! Enforces the same unique / foreign-key / not-null / version rules a real
//! database would and reports violations with the schema's constraint names,
//! so the storage-path classification can be exercised without a server.
//! Every table lives behind one lock, which also gives each mutating call the
//! required all-or-nothing semantics. Used by the integration tests; the
//! write-call counter lets them assert that a rejected request never reached
//! storage.

use super::{Page, StorageError};
use crate::record::{self, Record};
use crate::schema::{EntityDef, FieldRule, REGISTRY};
use chrono::Utc;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Record>,
}

pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, Table>>,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut tables = HashMap::new();
        for entity in REGISTRY {
            tables.insert(entity.name, Table::default());
        }
        Self {
            tables: Mutex::new(tables),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of mutating calls (insert/update/delete) that reached storage.
    pub fn write_calls(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<&'static str, Table>> {
        self.tables
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn violation(constraint: String, detail: &str) -> StorageError {
    StorageError::Integrity {
        message: format!("{detail}; violates constraint \"{constraint}\""),
        constraint: Some(constraint),
    }
}

/// Not-null, unique and foreign-key enforcement shared by insert and update.
fn check_constraints(
    tables: &HashMap<&'static str, Table>,
    def: &'static EntityDef,
    record: &Record,
    exclude_id: Option<i64>,
    on_create: bool,
) -> Result<(), StorageError> {
    for field in def.fields {
        let required = if on_create {
            field.required_on_create
        } else {
            field.required_on_update
        };
        if required && !record.contains(field.name) {
            return Err(violation(
                def.not_null_constraint(field.name),
                &format!("null value in column {}", field.name),
            ));
        }
    }
    for field in def.fields {
        let Some(value) = record.get(field.name) else {
            continue;
        };
        if field.unique && holds(tables, def.name, field, value, exclude_id) {
            return Err(violation(
                def.unique_constraint(field.name),
                &format!("duplicate value in column {}", field.name),
            ));
        }
        if let Some(target) = field.references {
            let present = value.as_i64().is_some_and(|key| {
                tables
                    .get(target)
                    .is_some_and(|table| table.rows.contains_key(&key))
            });
            if !present {
                return Err(violation(
                    def.foreign_key_constraint(field.name),
                    &format!("no parent row for column {}", field.name),
                ));
            }
        }
    }
    Ok(())
}

fn holds(
    tables: &HashMap<&'static str, Table>,
    entity: &str,
    field: &FieldRule,
    value: &Value,
    exclude_id: Option<i64>,
) -> bool {
    tables.get(entity).is_some_and(|table| {
        table
            .rows
            .values()
            .filter(|row| exclude_id != row.id())
            .any(|row| row.get(field.name) == Some(value))
    })
}

impl super::EntityStore for MemoryStore {
    async fn insert(
        &self,
        def: &'static EntityDef,
        mut record: Record,
    ) -> Result<Record, StorageError> {
        self.record_write();
        let mut tables = self.lock();
        check_constraints(&tables, def, &record, None, true)?;

        let now = Utc::now().to_rfc3339();
        let table = tables.entry(def.name).or_default();
        table.next_id += 1;
        let id = table.next_id;
        record.set(record::ID, json!(id));
        record.set(record::CREATED_AT, json!(now));
        record.set(record::UPDATED_AT, json!(now));
        record.set(record::VERSION, json!(0));
        if def.soft_delete {
            record.set(record::DELETED, json!(false));
        }
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        def: &'static EntityDef,
        id: i64,
        mut record: Record,
    ) -> Result<Record, StorageError> {
        self.record_write();
        let mut tables = self.lock();

        let current = tables
            .get(def.name)
            .and_then(|t| t.rows.get(&id))
            .cloned()
            .ok_or(StorageError::RowMissing {
                entity: def.name,
                id,
            })?;
        let current_version = current.version().unwrap_or(0);
        let submitted = record.version().unwrap_or(current_version);
        if submitted != current_version {
            return Err(StorageError::VersionConflict {
                entity: def.name,
                id,
                submitted,
                current: current_version,
            });
        }

        check_constraints(&tables, def, &record, Some(id), false)?;

        record.set(record::ID, json!(id));
        record.set(record::UPDATED_AT, json!(Utc::now().to_rfc3339()));
        record.set(record::VERSION, json!(current_version + 1));
        if def.soft_delete {
            record.set(record::DELETED, json!(current.is_deleted()));
            if let Some(at) = current.get(record::DELETED_AT) {
                record.set(record::DELETED_AT, at.clone());
            }
        }
        let table = tables.entry(def.name).or_default();
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(
        &self,
        def: &'static EntityDef,
        id: i64,
    ) -> Result<Option<Record>, StorageError> {
        let tables = self.lock();
        Ok(tables
            .get(def.name)
            .and_then(|t| t.rows.get(&id))
            .filter(|row| !row.is_deleted())
            .cloned())
    }

    async fn find_by_uuid(
        &self,
        def: &'static EntityDef,
        uuid: &Uuid,
    ) -> Result<Option<Record>, StorageError> {
        let tables = self.lock();
        Ok(tables.get(def.name).and_then(|t| {
            t.rows
                .values()
                .find(|row| row.uuid().as_ref() == Some(uuid) && !row.is_deleted())
                .cloned()
        }))
    }

    async fn find_all(
        &self,
        def: &'static EntityDef,
        page: Option<Page>,
    ) -> Result<Vec<Record>, StorageError> {
        let tables = self.lock();
        let visible = tables
            .get(def.name)
            .map(|t| {
                t.rows
                    .values()
                    .filter(|row| !row.is_deleted())
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(match page {
            Some(p) => visible
                .into_iter()
                .skip((p.page * p.size) as usize)
                .take(p.size as usize)
                .collect(),
            None => visible,
        })
    }

    async fn exists_by(
        &self,
        def: &'static EntityDef,
        field: &str,
        value: &Value,
        exclude_id: Option<i64>,
    ) -> Result<bool, StorageError> {
        let tables = self.lock();
        Ok(tables.get(def.name).is_some_and(|table| {
            table
                .rows
                .values()
                .filter(|row| exclude_id != row.id())
                .any(|row| row.get(field) == Some(value))
        }))
    }

    async fn count_by(
        &self,
        def: &'static EntityDef,
        field: &str,
        value: &Value,
    ) -> Result<i64, StorageError> {
        let tables = self.lock();
        Ok(tables
            .get(def.name)
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|row| !row.is_deleted())
                    .filter(|row| row.get(field) == Some(value))
                    .count() as i64
            })
            .unwrap_or(0))
    }

    async fn delete_by_id(&self, def: &'static EntityDef, id: i64) -> Result<(), StorageError> {
        self.record_write();
        let mut tables = self.lock();
        let Some(table) = tables.get_mut(def.name) else {
            return Ok(());
        };
        if def.soft_delete {
            if let Some(row) = table.rows.get_mut(&id) {
                row.set(record::DELETED, json!(true));
                row.set(record::DELETED_AT, json!(Utc::now().to_rfc3339()));
            }
        } else {
            table.rows.remove(&id);
        }
        Ok(())
    }
}
