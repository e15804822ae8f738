//! Declarative record types for the panel model: tables, columns, and
//! foreign-key relationships with their deletion rules.

use serde::{Deserialize, Serialize};

/// Deletion rule applied when the referenced row is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    /// Dependents are deleted with the parent.
    Cascade,
    /// The parent cannot be deleted while dependents reference it.
    Protect,
}

impl OnDelete {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::Protect => "RESTRICT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    BigInt,
    Integer,
    VarChar(u32),
    Text,
    TimestampTz,
}

impl ColumnType {
    /// DDL type name.
    pub fn as_sql(&self) -> String {
        match self {
            ColumnType::BigInt => "BIGINT".into(),
            ColumnType::Integer => "INTEGER".into(),
            ColumnType::VarChar(n) => format!("VARCHAR({})", n),
            ColumnType::Text => "TEXT".into(),
            ColumnType::TimestampTz => "TIMESTAMPTZ".into(),
        }
    }

    /// Postgres type name for `$n::type` bind casts.
    pub fn bind_cast(&self) -> &'static str {
        match self {
            ColumnType::BigInt => "bigint",
            ColumnType::Integer => "integer",
            ColumnType::VarChar(_) => "varchar",
            ColumnType::Text => "text",
            ColumnType::TimestampTz => "timestamptz",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDefault {
    Int(i64),
    Text(String),
    /// Raw SQL expression, e.g. NOW().
    Expression(String),
}

impl ColumnDefault {
    pub fn as_sql(&self) -> String {
        match self {
            ColumnDefault::Int(n) => n.to_string(),
            ColumnDefault::Text(s) => format!("'{}'", s.replace('\'', "''")),
            ColumnDefault::Expression(e) => e.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: ColumnType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub default: Option<ColumnDefault>,
}

impl ColumnDef {
    pub fn new(name: &str, type_: ColumnType) -> Self {
        ColumnDef {
            name: name.into(),
            type_,
            nullable: false,
            unique: false,
            default: None,
        }
    }

    pub fn varchar(name: &str, width: u32) -> Self {
        Self::new(name, ColumnType::VarChar(width))
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn big_int(name: &str) -> Self {
        Self::new(name, ColumnType::BigInt)
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn timestamp(name: &str) -> Self {
        Self::new(name, ColumnType::TimestampTz)
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_int(mut self, n: i64) -> Self {
        self.default = Some(ColumnDefault::Int(n));
        self
    }

    pub fn default_text(mut self, s: &str) -> Self {
        self.default = Some(ColumnDefault::Text(s.into()));
        self
    }

    pub fn default_expr(mut self, e: &str) -> Self {
        self.default = Some(ColumnDefault::Expression(e.into()));
        self
    }
}

/// Foreign key from `column` to the `id` of `references`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForeignKeyDef {
    pub column: String,
    pub references: String,
    pub on_delete: OnDelete,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDef>,
}

impl TableDef {
    /// Every table gets an implicit BIGSERIAL `id` primary key at resolve time;
    /// declarations list only the domain columns.
    pub fn new(name: &str) -> Self {
        TableDef {
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(mut self, c: ColumnDef) -> Self {
        self.columns.push(c);
        self
    }

    pub fn foreign_key(mut self, column: &str, references: &str, on_delete: OnDelete) -> Self {
        self.columns.push(ColumnDef::big_int(column));
        self.foreign_keys.push(ForeignKeyDef {
            column: column.into(),
            references: references.into(),
            on_delete,
        });
        self
    }
}

/// All table declarations in one struct.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PanelModel {
    pub tables: Vec<TableDef>,
}
