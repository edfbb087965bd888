//! MySQL store - sqlx-backed implementation of the storage interface
//!
//! The entity registry is dynamic, so statements are built at runtime from
//! each `EntityDef` instead of the compile-time checked macros; only names
//! from the registry ever reach the SQL text, values always travel as binds.
//! Database-reported constraint violations are mapped to
//! `StorageError::Integrity`, keeping the structured constraint identifier
//! when the driver exposes one.

use super::{Page, StorageError};
use crate::record::{self, Record};
use crate::schema::{EntityDef, FieldRule, ValueKind};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use sqlx::error::ErrorKind;
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::{Query, QueryScalar};
use sqlx::{MySql, MySqlPool, Row};
use uuid::Uuid;

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn select_sql(def: &EntityDef) -> String {
        let mut cols: Vec<&str> = vec![
            record::ID,
            record::UUID,
            record::CREATED_AT,
            record::UPDATED_AT,
            record::VERSION,
        ];
        if def.soft_delete {
            cols.push(record::DELETED);
            cols.push(record::DELETED_AT);
        }
        cols.extend(def.fields.iter().map(|f| f.name));
        format!("SELECT {} FROM {}", cols.join(", "), def.name)
    }

    async fn fetch_row(
        &self,
        def: &'static EntityDef,
        id: i64,
    ) -> Result<Option<Record>, StorageError> {
        let sql = format!("{} WHERE id = ?", Self::select_sql(def));
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| decode(def, &r)).transpose()
    }
}

fn decode(def: &EntityDef, row: &MySqlRow) -> Result<Record, StorageError> {
    let mut rec = Record::new();
    rec.set(record::ID, json!(row.try_get::<i64, _>(record::ID)?));
    rec.set(record::UUID, json!(row.try_get::<String, _>(record::UUID)?));
    rec.set(
        record::CREATED_AT,
        json!(row.try_get::<DateTime<Utc>, _>(record::CREATED_AT)?.to_rfc3339()),
    );
    rec.set(
        record::UPDATED_AT,
        json!(row.try_get::<DateTime<Utc>, _>(record::UPDATED_AT)?.to_rfc3339()),
    );
    rec.set(
        record::VERSION,
        json!(row.try_get::<i64, _>(record::VERSION)?),
    );
    if def.soft_delete {
        rec.set(
            record::DELETED,
            json!(row.try_get::<bool, _>(record::DELETED)?),
        );
        if let Some(at) = row.try_get::<Option<DateTime<Utc>>, _>(record::DELETED_AT)? {
            rec.set(record::DELETED_AT, json!(at.to_rfc3339()));
        }
    }
    for field in def.fields {
        match field.kind {
            ValueKind::Integer => {
                if let Some(v) = row.try_get::<Option<i64>, _>(field.name)? {
                    rec.set(field.name, json!(v));
                }
            }
            ValueKind::Number => {
                if let Some(v) = row.try_get::<Option<f64>, _>(field.name)? {
                    rec.set(field.name, json!(v));
                }
            }
            ValueKind::Text => {
                if let Some(v) = row.try_get::<Option<String>, _>(field.name)? {
                    rec.set(field.name, json!(v));
                }
            }
            ValueKind::Boolean => {
                if let Some(v) = row.try_get::<Option<bool>, _>(field.name)? {
                    rec.set(field.name, json!(v));
                }
            }
            ValueKind::Timestamp => {
                if let Some(v) = row.try_get::<Option<DateTime<Utc>>, _>(field.name)? {
                    rec.set(field.name, json!(v.to_rfc3339()));
                }
            }
        }
    }
    Ok(rec)
}

fn bind_field<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    field: &FieldRule,
    rec: &Record,
) -> Query<'q, MySql, MySqlArguments> {
    match field.kind {
        ValueKind::Integer => query.bind(rec.get(field.name).and_then(Value::as_i64)),
        ValueKind::Number => query.bind(rec.get(field.name).and_then(Value::as_f64)),
        ValueKind::Text => query.bind(
            rec.get(field.name)
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        ValueKind::Boolean => query.bind(rec.get(field.name).and_then(Value::as_bool)),
        ValueKind::Timestamp => query.bind(rec.timestamp(field.name)),
    }
}

fn bind_scalar<'q>(
    query: QueryScalar<'q, MySql, i64, MySqlArguments>,
    value: &Value,
) -> QueryScalar<'q, MySql, i64, MySqlArguments> {
    match value {
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) if n.is_i64() => query.bind(n.as_i64()),
        Value::Number(n) => query.bind(n.as_f64()),
        Value::String(s) => query.bind(s.clone()),
        other => query.bind(other.to_string()),
    }
}

/// Maps database-enforced constraint failures to `Integrity`; everything else
/// stays a driver fault for the internal tier.
fn map_write_error(err: sqlx::Error) -> StorageError {
    match err {
        sqlx::Error::Database(dbe) => match dbe.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => StorageError::Integrity {
                constraint: dbe.constraint().map(str::to_string),
                message: dbe.message().to_string(),
            },
            _ => StorageError::Driver(sqlx::Error::Database(dbe)),
        },
        other => StorageError::Driver(other),
    }
}

impl super::EntityStore for MySqlStore {
    async fn insert(
        &self,
        def: &'static EntityDef,
        record: Record,
    ) -> Result<Record, StorageError> {
        let now = Utc::now();
        let mut cols: Vec<&str> = vec![
            record::UUID,
            record::CREATED_AT,
            record::UPDATED_AT,
            record::VERSION,
        ];
        if def.soft_delete {
            cols.push(record::DELETED);
        }
        cols.extend(def.fields.iter().map(|f| f.name));
        let placeholders = vec!["?"; cols.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            def.name,
            cols.join(", "),
            placeholders
        );

        let mut query = sqlx::query(&sql)
            .bind(record.uuid().map(|u| u.to_string()))
            .bind(now)
            .bind(now)
            .bind(0i64);
        if def.soft_delete {
            query = query.bind(false);
        }
        for field in def.fields {
            query = bind_field(query, field, &record);
        }
        let result = query.execute(&self.pool).await.map_err(map_write_error)?;

        let id = result.last_insert_id() as i64;
        self.fetch_row(def, id)
            .await?
            .ok_or(StorageError::RowMissing {
                entity: def.name,
                id,
            })
    }

    async fn update(
        &self,
        def: &'static EntityDef,
        id: i64,
        record: Record,
    ) -> Result<Record, StorageError> {
        let submitted = record.version().unwrap_or(0);
        let mut sets = vec![
            format!("{} = ?", record::UUID),
            format!("{} = ?", record::CREATED_AT),
            format!("{} = ?", record::UPDATED_AT),
            format!("{} = {} + 1", record::VERSION, record::VERSION),
        ];
        sets.extend(def.fields.iter().map(|f| format!("{} = ?", f.name)));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ? AND version = ?",
            def.name,
            sets.join(", ")
        );

        let mut query = sqlx::query(&sql)
            .bind(record.uuid().map(|u| u.to_string()))
            .bind(record.timestamp(record::CREATED_AT))
            .bind(Utc::now());
        for field in def.fields {
            query = bind_field(query, field, &record);
        }
        let result = query
            .bind(id)
            .bind(submitted)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            // Either the row vanished or the submitted version is stale.
            let version_sql = format!("SELECT version FROM {} WHERE id = ?", def.name);
            let current = sqlx::query_scalar::<_, i64>(&version_sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            return Err(match current {
                Some(current) => StorageError::VersionConflict {
                    entity: def.name,
                    id,
                    submitted,
                    current,
                },
                None => StorageError::RowMissing {
                    entity: def.name,
                    id,
                },
            });
        }

        self.fetch_row(def, id)
            .await?
            .ok_or(StorageError::RowMissing {
                entity: def.name,
                id,
            })
    }

    async fn find_by_id(
        &self,
        def: &'static EntityDef,
        id: i64,
    ) -> Result<Option<Record>, StorageError> {
        Ok(self.fetch_row(def, id).await?.filter(|r| !r.is_deleted()))
    }

    async fn find_by_uuid(
        &self,
        def: &'static EntityDef,
        uuid: &Uuid,
    ) -> Result<Option<Record>, StorageError> {
        let sql = format!("{} WHERE uuid = ?", Self::select_sql(def));
        let row = sqlx::query(&sql)
            .bind(uuid.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(|r| decode(def, &r))
            .transpose()?
            .filter(|r| !r.is_deleted()))
    }

    async fn find_all(
        &self,
        def: &'static EntityDef,
        page: Option<Page>,
    ) -> Result<Vec<Record>, StorageError> {
        let mut sql = Self::select_sql(def);
        if def.soft_delete {
            sql.push_str(" WHERE deleted = 0");
        }
        sql.push_str(" ORDER BY id");
        if page.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
        }
        let mut query = sqlx::query(&sql);
        if let Some(p) = page {
            query = query.bind(p.size as i64).bind((p.page * p.size) as i64);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(|r| decode(def, r)).collect()
    }

    async fn exists_by(
        &self,
        def: &'static EntityDef,
        field: &str,
        value: &Value,
        exclude_id: Option<i64>,
    ) -> Result<bool, StorageError> {
        let mut sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?", def.name, field);
        if exclude_id.is_some() {
            sql.push_str(" AND id <> ?");
        }
        let mut query = bind_scalar(sqlx::query_scalar::<_, i64>(&sql), value);
        if let Some(id) = exclude_id {
            query = query.bind(id);
        }
        let count = query.fetch_one(&self.pool).await?;
        Ok(count > 0)
    }

    async fn count_by(
        &self,
        def: &'static EntityDef,
        field: &str,
        value: &Value,
    ) -> Result<i64, StorageError> {
        let mut sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?", def.name, field);
        if def.soft_delete {
            sql.push_str(" AND deleted = 0");
        }
        let query = bind_scalar(sqlx::query_scalar::<_, i64>(&sql), value);
        Ok(query.fetch_one(&self.pool).await?)
    }

    async fn delete_by_id(&self, def: &'static EntityDef, id: i64) -> Result<(), StorageError> {
        if def.soft_delete {
            let sql = format!(
                "UPDATE {} SET deleted = 1, deleted_at = ? WHERE id = ?",
                def.name
            );
            sqlx::query(&sql)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_write_error)?;
        } else {
            let sql = format!("DELETE FROM {} WHERE id = ?", def.name);
            sqlx::query(&sql)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_write_error)?;
        }
        Ok(())
    }
}
