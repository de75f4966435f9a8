//! Postgres-backed record store
//!
//! Records live in a single `records` table with a JSONB payload, which keeps
//! the document-store contract while running on a relational database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use crate::models::{Collection, Record, RecordFields};
use crate::utils::errors::{ShopAdminError, Result};
use crate::utils::helpers::generate_uuid;
use super::store::RecordStore;

#[derive(Debug, FromRow)]
struct RecordRow {
    id: String,
    collection: String,
    fields: Json<RecordFields>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RecordRow> for Record {
    type Error = ShopAdminError;

    fn try_from(row: RecordRow) -> Result<Self> {
        Ok(Record {
            id: row.id,
            collection: row.collection.parse()?,
            fields: row.fields.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn write_error(collection: Collection, err: sqlx::Error) -> ShopAdminError {
    ShopAdminError::WriteFailed {
        collection: collection.to_string(),
        reason: err.to_string(),
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create_record(&self, collection: Collection, fields: RecordFields) -> Result<Record> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            INSERT INTO records (id, collection, fields, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, collection, fields, created_at, updated_at
            "#
        )
        .bind(generate_uuid())
        .bind(collection.as_str())
        .bind(Json(fields))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(collection, e))?;

        debug!(collection = %collection, record_id = %row.id, "Inserted record");
        row.try_into()
    }

    async fn update_record(&self, collection: Collection, id: &str, fields: RecordFields) -> Result<Record> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            UPDATE records
            SET fields = fields || $3,
                updated_at = $4
            WHERE collection = $1 AND id = $2
            RETURNING id, collection, fields, created_at, updated_at
            "#
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(fields))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(collection, e))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(ShopAdminError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn get_record(&self, collection: Collection, id: &str) -> Result<Option<Record>> {
        let row = sqlx::query_as::<_, RecordRow>(
            "SELECT id, collection, fields, created_at, updated_at FROM records WHERE collection = $1 AND id = $2"
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Record::try_from).transpose()
    }

    async fn list_records(&self, collection: Collection) -> Result<Vec<Record>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT id, collection, fields, created_at, updated_at
            FROM records
            WHERE collection = $1
            ORDER BY updated_at DESC
            "#
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Record::try_from).collect()
    }

    async fn delete_record(&self, collection: Collection, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(collection, e))?;

        Ok(result.rows_affected() > 0)
    }
}
