//! Declaration validation: referential integrity of the table definitions.

use crate::error::SchemaError;
use crate::schema::resolved::PK_COLUMN;
use crate::schema::types::{ColumnType, PanelModel};
use std::collections::HashSet;

pub fn validate(model: &PanelModel) -> Result<(), SchemaError> {
    let mut table_names = HashSet::new();
    for t in &model.tables {
        if !table_names.insert(t.name.as_str()) {
            return Err(SchemaError::DuplicateTable(t.name.clone()));
        }
    }

    for t in &model.tables {
        let mut column_names = HashSet::new();
        for c in &t.columns {
            if c.name == PK_COLUMN || !column_names.insert(c.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: t.name.clone(),
                    column: c.name.clone(),
                });
            }
        }

        for fk in &t.foreign_keys {
            let col = t.columns.iter().find(|c| c.name == fk.column).ok_or_else(|| {
                SchemaError::MissingColumn {
                    table: t.name.clone(),
                    column: fk.column.clone(),
                }
            })?;
            if col.type_ != ColumnType::BigInt {
                return Err(SchemaError::Validation(format!(
                    "foreign key column {}.{} must be BIGINT",
                    t.name, fk.column
                )));
            }
            if !table_names.contains(fk.references.as_str()) {
                return Err(SchemaError::DanglingForeignKey {
                    table: t.name.clone(),
                    column: fk.column.clone(),
                    target: fk.references.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ColumnDef, OnDelete, TableDef};

    #[test]
    fn rejects_duplicate_table() {
        let model = PanelModel {
            tables: vec![TableDef::new("websites"), TableDef::new("websites")],
        };
        assert!(matches!(
            validate(&model),
            Err(SchemaError::DuplicateTable(_))
        ));
    }

    #[test]
    fn rejects_reserved_id_column() {
        let model = PanelModel {
            tables: vec![TableDef::new("websites").column(ColumnDef::big_int("id"))],
        };
        assert!(matches!(
            validate(&model),
            Err(SchemaError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn rejects_dangling_foreign_key() {
        let model = PanelModel {
            tables: vec![TableDef::new("backups").foreign_key(
                "website_id",
                "websites",
                OnDelete::Cascade,
            )],
        };
        assert!(matches!(
            validate(&model),
            Err(SchemaError::DanglingForeignKey { .. })
        ));
    }

    #[test]
    fn rejects_non_bigint_foreign_key_column() {
        let mut table = TableDef::new("backups");
        table.columns.push(ColumnDef::integer("website_id"));
        table.foreign_keys.push(crate::schema::types::ForeignKeyDef {
            column: "website_id".into(),
            references: "websites".into(),
            on_delete: OnDelete::Cascade,
        });
        let model = PanelModel {
            tables: vec![TableDef::new("websites"), table],
        };
        assert!(matches!(validate(&model), Err(SchemaError::Validation(_))));
    }

    #[test]
    fn accepts_panel_model() {
        assert!(validate(&crate::schema::panel::panel_model()).is_ok());
    }
}
