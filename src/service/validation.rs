//! Row validation from the declared model: presence, width, and domain shape.

use crate::error::AppError;
use crate::schema::resolved::ResolvedTable;
use crate::schema::types::ColumnType;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

/// Columns holding a DNS name, validated against a hostname pattern.
const DOMAIN_COLUMNS: &[&str] = &["domain", "alias_domain"];

const DOMAIN_PATTERN: &str = r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)+$";

pub struct RowValidator;

impl RowValidator {
    /// Validate an insert body against the table declaration. Columns without a
    /// default and not nullable must be present and non-null; varchar widths and
    /// domain-shaped columns are checked. Uniqueness stays with the database.
    pub fn validate(
        table: &ResolvedTable,
        body: &HashMap<String, Value>,
    ) -> Result<(), AppError> {
        for c in &table.columns {
            let val = body.get(&c.name);
            let absent = val.is_none() || val == Some(&Value::Null);
            if absent {
                if !c.nullable && !c.has_default {
                    return Err(AppError::Validation(format!("{} is required", c.name)));
                }
                continue;
            }
            let val = val.unwrap_or(&Value::Null);
            if let ColumnType::VarChar(width) = c.type_ {
                if let Some(s) = val.as_str() {
                    if s.len() > width as usize {
                        return Err(AppError::Validation(format!(
                            "{} must be at most {} characters",
                            c.name, width
                        )));
                    }
                }
            }
            if DOMAIN_COLUMNS.contains(&c.name.as_str()) {
                let re = Regex::new(DOMAIN_PATTERN)
                    .map_err(|_| AppError::Validation("invalid domain pattern".into()))?;
                if let Some(s) = val.as_str() {
                    if !re.is_match(s) {
                        return Err(AppError::Validation(format!(
                            "{} must be a valid domain name",
                            c.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
