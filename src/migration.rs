//! Apply the panel model to the database: DDL for tables and foreign keys.
//! Deletion rules become ON DELETE actions (cascade -> CASCADE, protect -> RESTRICT).

use crate::error::AppError;
use crate::schema::resolved::{ResolvedPanel, ResolvedTable, PK_COLUMN};
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// CREATE TABLE IF NOT EXISTS with the implicit BIGSERIAL primary key,
/// NOT NULL/DEFAULT/UNIQUE per declaration.
pub fn table_ddl(table: &ResolvedTable) -> String {
    let mut col_defs = vec![format!("{} BIGSERIAL", quote(PK_COLUMN))];
    for c in &table.columns {
        let mut def = format!("{} {}", quote(&c.name), c.type_.as_sql());
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(d) = table.defaults.get(&c.name) {
            def.push_str(" DEFAULT ");
            def.push_str(d);
        }
        if c.unique {
            def.push_str(" UNIQUE");
        }
        col_defs.push(def);
    }
    col_defs.push(format!("PRIMARY KEY ({})", quote(PK_COLUMN)));
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote(&table.name),
        col_defs.join(",\n  ")
    )
}

/// One ALTER TABLE ... ADD CONSTRAINT per declared foreign key.
pub fn foreign_key_ddl(table: &ResolvedTable) -> Vec<String> {
    table
        .foreign_keys
        .iter()
        .map(|fk| {
            let constraint = format!("fk_{}_{}", table.name, fk.column);
            format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {}",
                quote(&table.name),
                quote(&constraint),
                quote(&fk.column),
                quote(&fk.references),
                quote(PK_COLUMN),
                fk.on_delete.as_sql()
            )
        })
        .collect()
}

/// Create all tables in declaration order, then add foreign keys.
/// Tables are idempotent (IF NOT EXISTS); FK statements are best-effort re-runs
/// since the constraint may already exist.
pub async fn apply_migrations(pool: &PgPool, model: &ResolvedPanel) -> Result<(), AppError> {
    for table in &model.tables {
        let sql = table_ddl(table);
        tracing::debug!(table = %table.name, "create table");
        sqlx::query(&sql).execute(pool).await?;
    }
    for table in &model.tables {
        for sql in foreign_key_ddl(table) {
            tracing::debug!(table = %table.name, "add foreign key");
            let _ = sqlx::query(&sql).execute(pool).await;
        }
    }
    Ok(())
}
