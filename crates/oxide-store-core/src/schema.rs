//! Static schema model: tables and columns.

use crate::error::{CoreError, Result};
use crate::key::Key;
use crate::types::SqlTypeInfo;

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name, as declared.
    pub name: String,
    /// Name of the owning table.
    pub table: String,
    /// Resolved SQL type.
    pub type_info: SqlTypeInfo,
    /// Logical type the column stores.
    pub logical_type: String,
    /// Declared length or precision.
    pub length: Option<u32>,
    /// Declared scale.
    pub scale: Option<u32>,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Whether the datastore generates the value.
    pub identity: bool,
    /// Default value expression, as SQL text.
    pub default: Option<String>,
}

impl Column {
    /// Creates a nullable column.
    #[must_use]
    pub fn new(
        table: impl Into<String>,
        name: impl Into<String>,
        logical_type: impl Into<String>,
        type_info: SqlTypeInfo,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            type_info,
            logical_type: logical_type.into(),
            length: None,
            scale: None,
            nullable: true,
            identity: false,
            default: None,
        }
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as datastore generated.
    #[must_use]
    pub const fn identity(mut self) -> Self {
        self.identity = true;
        self.nullable = false;
        self
    }

    /// Sets the length and scale.
    #[must_use]
    pub const fn with_length(mut self, length: Option<u32>, scale: Option<u32>) -> Self {
        self.length = length;
        self.scale = scale;
        self
    }

    /// Sets the default value expression.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Renders the SQL type with the declared length and scale.
    #[must_use]
    pub fn sql_type(&self) -> String {
        self.type_info.render(self.length, self.scale)
    }
}

/// A table with its columns and constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Optional schema qualifier.
    pub schema: Option<String>,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Primary key.
    pub primary_key: Option<Key>,
    /// Unique constraints.
    pub candidate_keys: Vec<Key>,
    /// Foreign keys.
    pub foreign_keys: Vec<Key>,
    /// Indices.
    pub indices: Vec<Key>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Vec::new(),
            primary_key: None,
            candidate_keys: Vec::new(),
            foreign_keys: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ColumnNotInTable`] if the column names another table.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        if column.table != self.name {
            return Err(CoreError::ColumnNotInTable {
                column: column.name,
                column_table: column.table,
                table: self.name.clone(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Looks a column up by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownColumn`] if there is no such column.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::UnknownColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Returns whether `column` is part of the primary key.
    #[must_use]
    pub fn is_primary_key_column(&self, column: &str) -> bool {
        self.primary_key.as_ref().is_some_and(|pk| {
            pk.columns()
                .iter()
                .flatten()
                .any(|c| c.name.eq_ignore_ascii_case(column))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SqlTypeCode;

    fn int_column(table: &str, name: &str) -> Column {
        Column::new(
            table,
            name,
            "i64",
            SqlTypeInfo::fixed("BIGINT", SqlTypeCode::BigInt),
        )
    }

    #[test]
    fn test_add_column_checks_owner() {
        let mut table = Table::new("ORDERS");
        table.add_column(int_column("ORDERS", "ID")).unwrap();
        let err = table.add_column(int_column("CUSTOMER", "ID")).unwrap_err();
        assert_eq!(
            err,
            CoreError::ColumnNotInTable {
                column: String::from("ID"),
                column_table: String::from("CUSTOMER"),
                table: String::from("ORDERS"),
            }
        );
    }

    #[test]
    fn test_column_lookup() {
        let mut table = Table::new("ORDERS");
        table.add_column(int_column("ORDERS", "ID")).unwrap();
        assert_eq!(table.column("id").unwrap().name, "ID");
        assert!(matches!(
            table.column("TOTAL"),
            Err(CoreError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_sql_type_rendering() {
        let column = Column::new(
            "ORDERS",
            "NOTE",
            "string",
            SqlTypeInfo::sized("VARCHAR", SqlTypeCode::VarChar, 255),
        )
        .with_length(Some(80), None)
        .not_null();
        assert_eq!(column.sql_type(), "VARCHAR(80)");
        assert!(!column.nullable);
    }
}
