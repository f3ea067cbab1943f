use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use std::marker::PhantomData;
use tracing::info;
use uuid::Uuid;

use super::models::Document;
use super::query::{Filter, ListQuery};
use super::store::DocumentStore;
use super::DatabaseError;
use crate::types::RecordId;

/// One jsonb-backed table per collection: `(id, seq, doc, version, created_at)`
pub struct PgCollection<T> {
    pool: PgPool,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Document> PgCollection<T> {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, _phantom: PhantomData }
    }

    /// Create the table and its indexes when missing
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        let table = T::COLLECTION;
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS \"{table}\" (
                id uuid PRIMARY KEY,
                seq bigserial,
                doc jsonb NOT NULL,
                version bigint NOT NULL,
                created_at timestamptz NOT NULL
            )"
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS \"{table}_created_idx\" ON \"{table}\" (created_at DESC, seq DESC)"
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS \"{table}_doc_idx\" ON \"{table}\" USING gin (doc jsonb_path_ops)"
        ))
        .execute(&self.pool)
        .await?;

        for field in T::UNIQUE_FIELDS {
            sqlx::query(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{table}_{field}_key\" ON \"{table}\" ((doc->>'{field}'))"
            ))
            .execute(&self.pool)
            .await?;
        }

        info!("Ensured schema for collection: {}", table);
        Ok(())
    }

    fn decode((doc, version): (Value, i64)) -> Result<T, DatabaseError> {
        let mut doc: T = serde_json::from_value(doc)?;
        doc.meta_mut().version = version;
        Ok(doc)
    }

    /// Map a unique-index violation back to the field it guards
    fn translate(err: sqlx::Error) -> DatabaseError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or_default();
                let field = T::UNIQUE_FIELDS
                    .iter()
                    .find(|f| constraint.ends_with(&format!("_{}_key", f)))
                    .copied()
                    .unwrap_or("id");
                return DatabaseError::Duplicate(field);
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// OFFSET and LIMIT are bigint; anything past that range is the same as "everything"
fn sql_bound(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait]
impl<T: Document> DocumentStore<T> for PgCollection<T> {
    async fn get(&self, id: RecordId) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT doc, version FROM \"{}\" WHERE id = $1", T::COLLECTION);
        let row: Option<(Value, i64)> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::decode).transpose()
    }

    async fn get_many(&self, ids: &[RecordId]) -> Result<Vec<T>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<Uuid> = ids.iter().map(RecordId::as_uuid).collect();
        let sql = format!("SELECT doc, version FROM \"{}\" WHERE id = ANY($1)", T::COLLECTION);
        let rows: Vec<(Value, i64)> = sqlx::query_as(&sql).bind(ids).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::decode).collect()
    }

    async fn find(&self, query: &ListQuery) -> Result<Vec<T>, DatabaseError> {
        let mut params = Vec::new();
        let predicate = query.filter.to_sql(&mut params);
        let mut sql = format!(
            "SELECT doc, version FROM \"{}\" WHERE {} ORDER BY created_at DESC, seq DESC OFFSET {}",
            T::COLLECTION,
            predicate,
            sql_bound(query.skip)
        );
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", sql_bound(limit)));
        }

        let mut q = sqlx::query_as::<_, (Value, i64)>(&sql);
        for p in params.iter() {
            q = q.bind(p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::decode).collect()
    }

    async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError> {
        let mut params = Vec::new();
        let predicate = filter.to_sql(&mut params);
        let sql = format!("SELECT COUNT(*) FROM \"{}\" WHERE {}", T::COLLECTION, predicate);

        let mut q = sqlx::query_scalar::<_, i64>(&sql);
        for p in params.iter() {
            q = q.bind(p);
        }
        let count = q.fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn insert(&self, mut doc: T) -> Result<T, DatabaseError> {
        doc.meta_mut().version = 1;
        let value = serde_json::to_value(&doc)?;
        let sql = format!(
            "INSERT INTO \"{}\" (id, doc, version, created_at) VALUES ($1, $2, 1, $3)",
            T::COLLECTION
        );
        sqlx::query(&sql)
            .bind(doc.id().as_uuid())
            .bind(value)
            .bind(doc.meta().created_at)
            .execute(&self.pool)
            .await
            .map_err(Self::translate)?;
        Ok(doc)
    }

    async fn replace(&self, mut doc: T) -> Result<T, DatabaseError> {
        let expected = doc.meta().version;
        doc.meta_mut().version = expected + 1;
        doc.meta_mut().updated_at = Utc::now();
        let value = serde_json::to_value(&doc)?;

        let sql = format!(
            "UPDATE \"{}\" SET doc = $2, version = version + 1 WHERE id = $1 AND version = $3",
            T::COLLECTION
        );
        let result = sqlx::query(&sql)
            .bind(doc.id().as_uuid())
            .bind(value)
            .bind(expected)
            .execute(&self.pool)
            .await
            .map_err(Self::translate)?;

        if result.rows_affected() == 0 {
            // Either the row is gone or someone else bumped the version
            return match self.get(doc.id()).await? {
                Some(_) => Err(DatabaseError::VersionConflict),
                None => Err(DatabaseError::NotFound(format!("{} not found", T::TITLE))),
            };
        }
        Ok(doc)
    }

    async fn apply(&self, id: RecordId, change: &(dyn for<'a> Fn(&'a mut T) + Send + Sync)) -> Result<T, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Row lock holds off other writers until commit
        let select = format!(
            "SELECT doc, version FROM \"{}\" WHERE id = $1 FOR UPDATE",
            T::COLLECTION
        );
        let row: Option<(Value, i64)> = sqlx::query_as(&select)
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;
        let mut doc = match row {
            Some(row) => Self::decode(row)?,
            None => return Err(DatabaseError::NotFound(format!("{} not found", T::TITLE))),
        };

        change(&mut doc);
        let version = doc.meta().version + 1;
        doc.meta_mut().version = version;
        doc.meta_mut().updated_at = Utc::now();
        let value = serde_json::to_value(&doc)?;

        let update = format!("UPDATE \"{}\" SET doc = $2, version = $3 WHERE id = $1", T::COLLECTION);
        sqlx::query(&update)
            .bind(id.as_uuid())
            .bind(value)
            .bind(version)
            .execute(&mut *tx)
            .await
            .map_err(Self::translate)?;
        tx.commit().await?;
        Ok(doc)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", T::COLLECTION);
        let result = sqlx::query(&sql).bind(id.as_uuid()).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_bound_saturates_at_bigint() {
        assert_eq!(sql_bound(0), 0);
        assert_eq!(sql_bound(20), 20);
        assert_eq!(sql_bound(10_000_000_000_000_000_000), i64::MAX);
        assert_eq!(sql_bound(u64::MAX), i64::MAX);
    }
}
