//! Resolved panel model: declarations validated and flattened for runtime use.

use crate::error::SchemaError;
use crate::schema::types::{ColumnType, ForeignKeyDef, PanelModel};
use crate::schema::validator::validate;
use serde::Serialize;
use std::collections::HashMap;

/// Primary key column present on every table.
pub const PK_COLUMN: &str = "id";

#[derive(Clone, Debug, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub type_: ColumnType,
    pub nullable: bool,
    pub unique: bool,
    /// Whether the column has a DB default (insert may omit it).
    pub has_default: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedTable {
    pub name: String,
    /// Domain columns, excluding the implicit `id`.
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKeyDef>,
    /// Default SQL rendering per defaulted column, keyed by column name.
    pub defaults: HashMap<String, String>,
}

impl ResolvedTable {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ResolvedPanel {
    pub tables: Vec<ResolvedTable>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl ResolvedPanel {
    pub fn table(&self, name: &str) -> Option<&ResolvedTable> {
        self.by_name.get(name).map(|&i| &self.tables[i])
    }
}

/// Build the resolved model from declarations. Validates first.
pub fn resolve(model: &PanelModel) -> Result<ResolvedPanel, SchemaError> {
    validate(model)?;

    let mut tables = Vec::with_capacity(model.tables.len());
    let mut by_name = HashMap::new();
    for t in &model.tables {
        let columns: Vec<ColumnInfo> = t
            .columns
            .iter()
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                type_: c.type_.clone(),
                nullable: c.nullable,
                unique: c.unique,
                has_default: c.default.is_some(),
            })
            .collect();
        let defaults: HashMap<String, String> = t
            .columns
            .iter()
            .filter_map(|c| c.default.as_ref().map(|d| (c.name.clone(), d.as_sql())))
            .collect();
        by_name.insert(t.name.clone(), tables.len());
        tables.push(ResolvedTable {
            name: t.name.clone(),
            columns,
            foreign_keys: t.foreign_keys.clone(),
            defaults,
        });
    }
    Ok(ResolvedPanel { tables, by_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::panel::panel_model;

    #[test]
    fn lookup_by_name() {
        let resolved = resolve(&panel_model()).unwrap();
        let websites = resolved.table("websites").unwrap();
        assert!(websites.column("domain").is_some());
        assert!(websites.column("id").is_none(), "id is implicit");
        assert!(resolved.table("no_such_table").is_none());
    }

    #[test]
    fn defaults_are_rendered() {
        let resolved = resolve(&panel_model()).unwrap();
        let websites = resolved.table("websites").unwrap();
        assert_eq!(websites.defaults.get("state").map(String::as_str), Some("1"));
        let drives = resolved.table("cloud_drives").unwrap();
        assert_eq!(
            drives.defaults.get("auth").map(String::as_str),
            Some("'Inactive'")
        );
        let logs = resolved.table("git_logs").unwrap();
        assert_eq!(logs.defaults.get("date").map(String::as_str), Some("NOW()"));
    }
}
