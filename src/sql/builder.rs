//! Builds parameterized INSERT, SELECT, and DELETE from a resolved table.

use crate::schema::resolved::{ResolvedTable, PK_COLUMN};
use serde_json::Value;
use std::collections::HashMap;

/// Quote identifier for PostgreSQL (safe: only from the declared model).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// id plus every declared column, in declaration order.
fn select_column_list(table: &ResolvedTable) -> String {
    let mut cols = vec![quoted(PK_COLUMN)];
    cols.extend(table.columns.iter().map(|c| quoted(&c.name)));
    cols.join(", ")
}

/// SELECT by primary key. Caller binds id as the sole param.
pub fn select_by_id(table: &ResolvedTable) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_column_list(table),
        quoted(&table.name),
        quoted(PK_COLUMN)
    );
    q
}

/// SELECT list with optional filters (exact match per declared column),
/// ORDER BY id, optional LIMIT/OFFSET.
pub fn select_list(
    table: &ResolvedTable,
    filters: &[(String, Value)],
    limit: Option<u32>,
    offset: Option<u32>,
) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for (col, val) in filters {
        let Some(c) = table.column(col) else { continue };
        let n = q.push_param(val.clone());
        where_parts.push(format!("{} = ${}::{}", quoted(col), n, c.type_.bind_cast()));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let limit_clause = limit.map(|n| format!(" LIMIT {}", n.min(1000))).unwrap_or_default();
    let offset_clause = offset.map(|n| format!(" OFFSET {}", n)).unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}{}{}",
        select_column_list(table),
        quoted(&table.name),
        where_clause,
        quoted(PK_COLUMN),
        limit_clause,
        offset_clause
    );
    q
}

/// INSERT: declared columns present in body, with `$n::type` casts.
/// Omits columns with a DB default when the body does not provide a value.
pub fn insert(table: &ResolvedTable, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &table.columns {
        let val = body.get(&c.name).cloned();
        if val.is_none() && (c.has_default || c.nullable) {
            continue;
        }
        let n = q.push_param(val.unwrap_or(Value::Null));
        cols.push(quoted(&c.name));
        placeholders.push(format!("${}::{}", n, c.type_.bind_cast()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(&table.name),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(table)
    );
    q
}

/// DELETE by id. Caller binds id as the sole param.
pub fn delete(table: &ResolvedTable) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "DELETE FROM {} WHERE {} = $1 RETURNING {}",
        quoted(&table.name),
        quoted(PK_COLUMN),
        select_column_list(table)
    );
    q
}
