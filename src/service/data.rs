//! Row lifecycle against PostgreSQL. Cascade and protect outcomes are produced
//! by the database constraints; this layer only executes and decodes.

use crate::error::AppError;
use crate::schema::resolved::ResolvedTable;
use crate::service::RowValidator;
use crate::sql::{delete, insert, select_by_id, select_list, PgBindValue, QueryBuf};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct PanelData;

impl PanelData {
    /// Insert one row after rule validation. Returns the created row.
    pub async fn insert(
        pool: &PgPool,
        table: &ResolvedTable,
        body: &HashMap<String, Value>,
    ) -> Result<Value, AppError> {
        RowValidator::validate(table, body)?;
        let q = insert(table, body);
        let row = Self::execute_returning_one(pool, &q)
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))?;
        Ok(row)
    }

    /// Fetch one row by primary key.
    pub async fn fetch(
        pool: &PgPool,
        table: &ResolvedTable,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let q = select_by_id(table);
        Self::query_one(pool, &q.sql, id).await
    }

    /// List rows with optional exact-match filters, limit (default 100, max 1000), offset.
    pub async fn list(
        pool: &PgPool,
        table: &ResolvedTable,
        filters: &[(String, Value)],
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Value>, AppError> {
        const DEFAULT_LIMIT: u32 = 100;
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(1000);
        let q = select_list(table, filters, Some(limit), Some(offset.unwrap_or(0)));
        Self::query_many(pool, &q).await
    }

    /// Delete one row by primary key. Returns the deleted row, or None when absent.
    /// A restrict violation surfaces as AppError::Conflict.
    pub async fn delete(
        pool: &PgPool,
        table: &ResolvedTable,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let q = delete(table);
        tracing::debug!(sql = %q.sql, id, "query");
        let row = sqlx::query(&q.sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::from_db)?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn query_one(pool: &PgPool, sql: &str, id: i64) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query(sql).bind(id).fetch_optional(pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn query_many(pool: &PgPool, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn execute_returning_one(pool: &PgPool, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let row = query
            .fetch_optional(pool)
            .await
            .map_err(AppError::from_db)?;
        Ok(row.map(|r| row_to_json(&r)))
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}
