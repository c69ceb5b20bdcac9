//! Serializable profile and schema configuration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dialect::{DialectProfile, SequenceOptions};
use crate::error::Result;
use crate::key::{ForeignKeyAction, Key};
use crate::schema::{Column, Table};

/// Which vendor and version a profile is built for, plus explicit
/// capability overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Vendor name or alias (`postgresql`, `mssql`, ...).
    pub vendor: String,
    /// Server version string; the vendor default when absent.
    #[serde(default)]
    pub version: Option<String>,
    /// Capability keys forced on.
    #[serde(default)]
    pub enable: Vec<String>,
    /// Capability keys forced off.
    #[serde(default)]
    pub disable: Vec<String>,
}

impl ProfileConfig {
    /// Configuration for a vendor at its default version.
    #[must_use]
    pub fn new(vendor: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            version: None,
            enable: Vec::new(),
            disable: Vec::new(),
        }
    }
}

/// A schema description: tables and standalone sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub tables: Vec<TableConfig>,
    pub sequences: Vec<SequenceOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    #[serde(default)]
    pub schema: Option<String>,
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub primary_key: Option<KeyConfig>,
    #[serde(default)]
    pub unique: Vec<KeyConfig>,
    #[serde(default)]
    pub indices: Vec<IndexConfig>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    /// Logical type.
    #[serde(rename = "type")]
    pub logical_type: String,
    /// Explicit SQL type; must be a candidate of the logical type.
    #[serde(default)]
    pub sql_type: Option<String>,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub identity: bool,
    #[serde(default)]
    pub default: Option<String>,
}

const fn default_nullable() -> bool {
    true
}

/// Primary or unique key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
    /// Referenced table.
    pub references: String,
    /// Referenced columns, in key order.
    pub referenced_columns: Vec<String>,
    #[serde(default)]
    pub on_delete: Option<ForeignKeyAction>,
    #[serde(default)]
    pub on_update: Option<ForeignKeyAction>,
}

fn build_key(
    mut key: Key,
    name: Option<&str>,
    table: &Table,
    columns: &[String],
) -> Result<Key> {
    if let Some(name) = name {
        key = key.named(name);
    }
    for column in columns {
        key.add_column(table.column(column)?.clone())?;
    }
    Ok(key)
}

impl TableConfig {
    /// Builds the runtime table, resolving column types through `profile`.
    ///
    /// # Errors
    ///
    /// Returns type-resolution errors for unknown logical or SQL types and
    /// key-model errors for keys naming unknown columns.
    pub fn to_table(&self, profile: &DialectProfile) -> Result<Table> {
        let mut table = Table::new(&self.name);
        table.schema.clone_from(&self.schema);
        for config in &self.columns {
            let type_info = profile
                .types()
                .resolve_for_column(&config.logical_type, config.sql_type.as_deref())?
                .clone();
            let mut column = Column::new(&self.name, &config.name, &config.logical_type, type_info)
                .with_length(config.length, config.scale);
            if !config.nullable {
                column = column.not_null();
            }
            if config.identity {
                column = column.identity();
            }
            if let Some(default) = &config.default {
                column = column.with_default(default);
            }
            table.add_column(column)?;
        }

        if let Some(pk) = &self.primary_key {
            table.primary_key = Some(build_key(
                Key::primary(&self.name),
                pk.name.as_deref(),
                &table,
                &pk.columns,
            )?);
        }
        for unique in &self.unique {
            let key = build_key(
                Key::candidate(&self.name),
                unique.name.as_deref(),
                &table,
                &unique.columns,
            )?;
            table.candidate_keys.push(key);
        }
        for index in &self.indices {
            let key = build_key(
                Key::index(&self.name, index.unique),
                index.name.as_deref(),
                &table,
                &index.columns,
            )?;
            table.indices.push(key);
        }
        for fk in &self.foreign_keys {
            let key = Key::foreign(&self.name, &fk.references).references(
                fk.referenced_columns.clone(),
                fk.on_delete,
                fk.on_update,
            );
            let key = build_key(key, fk.name.as_deref(), &table, &fk.columns)?;
            table.foreign_keys.push(key);
        }
        debug!(table = %self.name, columns = table.columns.len(), "built table from config");
        Ok(table)
    }
}

impl SchemaConfig {
    /// Builds every configured table.
    ///
    /// # Errors
    ///
    /// See [`TableConfig::to_table`].
    pub fn to_tables(&self, profile: &DialectProfile) -> Result<Vec<Table>> {
        self.tables
            .iter()
            .map(|table| table.to_table(profile))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Vendor, Version};
    use crate::error::CoreError;

    const SCHEMA: &str = r#"{
        "tables": [{
            "name": "INVOICE",
            "columns": [
                {"name": "ID", "type": "i64", "nullable": false, "identity": true},
                {"name": "TOTAL", "type": "decimal", "length": 12, "scale": 2},
                {"name": "NOTES", "type": "string", "sql_type": "TEXT"}
            ],
            "primary_key": {"columns": ["ID"]},
            "indices": [{"name": "INVOICE_TOTAL_IDX", "columns": ["TOTAL"]}]
        }],
        "sequences": [{"name": "INVOICE_SEQ", "start": 1}]
    }"#;

    #[test]
    fn test_schema_from_json() {
        let config: SchemaConfig = serde_json::from_str(SCHEMA).unwrap();
        let pg = DialectProfile::new(Vendor::PostgreSql, Version::new(16, 0, 0));
        let tables = config.to_tables(&pg).unwrap();
        assert_eq!(tables.len(), 1);
        let invoice = &tables[0];
        assert!(invoice.column("id").unwrap().identity);
        assert_eq!(invoice.column("NOTES").unwrap().sql_type(), "TEXT");
        assert!(invoice.is_primary_key_column("ID"));
        assert_eq!(invoice.indices[0].name(), Some("INVOICE_TOTAL_IDX"));
        assert_eq!(config.sequences[0].name.as_deref(), Some("INVOICE_SEQ"));
    }

    #[test]
    fn test_unknown_key_column() {
        let mut config: SchemaConfig = serde_json::from_str(SCHEMA).unwrap();
        config.tables[0].primary_key = Some(KeyConfig {
            name: None,
            columns: vec![String::from("MISSING")],
        });
        let pg = DialectProfile::new(Vendor::PostgreSql, Version::new(16, 0, 0));
        assert!(matches!(
            config.to_tables(&pg),
            Err(CoreError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_profile_config_defaults() {
        let config: ProfileConfig = serde_json::from_str(r#"{"vendor": "h2"}"#).unwrap();
        assert_eq!(config, ProfileConfig::new("h2"));
    }
}
