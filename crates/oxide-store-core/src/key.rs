//! Key / Constraint Model.
//!
//! A key is an ordered column set bound to one table. Keys are built
//! incrementally: columns are appended, or placed at an explicit ordinal
//! when constraint metadata arrives out of declared order.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::schema::Column;

/// Referential action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    /// `CASCADE`.
    Cascade,
    /// `SET NULL`.
    SetNull,
    /// `SET DEFAULT`.
    SetDefault,
    /// `RESTRICT`.
    Restrict,
    /// `NO ACTION`.
    NoAction,
}

impl ForeignKeyAction {
    /// Returns the SQL keyword(s).
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// What kind of constraint a key is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Primary key.
    Primary,
    /// Unique (candidate) key.
    Candidate,
    /// Foreign key.
    Foreign {
        /// Referenced table.
        referenced_table: String,
        /// Referenced columns, in key order.
        referenced_columns: Vec<String>,
        /// `ON DELETE` action.
        on_delete: Option<ForeignKeyAction>,
        /// `ON UPDATE` action.
        on_update: Option<ForeignKeyAction>,
    },
    /// Index.
    Index {
        /// Whether the index is unique.
        unique: bool,
    },
}

impl KeyKind {
    const fn label(&self) -> &'static str {
        match self {
            Self::Primary => "PRIMARY KEY",
            Self::Candidate => "UNIQUE",
            Self::Foreign { .. } => "FOREIGN KEY",
            Self::Index { .. } => "INDEX",
        }
    }
}

/// An ordered set of columns of one table.
#[derive(Debug, Clone)]
pub struct Key {
    name: Option<String>,
    table: String,
    kind: KeyKind,
    columns: Vec<Option<Column>>,
}

impl Key {
    fn new(table: impl Into<String>, kind: KeyKind) -> Self {
        Self {
            name: None,
            table: table.into(),
            kind,
            columns: Vec::new(),
        }
    }

    /// Creates an empty primary key.
    #[must_use]
    pub fn primary(table: impl Into<String>) -> Self {
        Self::new(table, KeyKind::Primary)
    }

    /// Creates an empty candidate (unique) key.
    #[must_use]
    pub fn candidate(table: impl Into<String>) -> Self {
        Self::new(table, KeyKind::Candidate)
    }

    /// Creates an empty foreign key referencing `referenced_table`.
    #[must_use]
    pub fn foreign(table: impl Into<String>, referenced_table: impl Into<String>) -> Self {
        Self::new(
            table,
            KeyKind::Foreign {
                referenced_table: referenced_table.into(),
                referenced_columns: Vec::new(),
                on_delete: None,
                on_update: None,
            },
        )
    }

    /// Creates an empty index.
    #[must_use]
    pub fn index(table: impl Into<String>, unique: bool) -> Self {
        Self::new(table, KeyKind::Index { unique })
    }

    /// Sets the constraint name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the referenced columns and actions of a foreign key.
    ///
    /// Has no effect on other key kinds.
    #[must_use]
    pub fn references(
        mut self,
        columns: Vec<String>,
        on_delete: Option<ForeignKeyAction>,
        on_update: Option<ForeignKeyAction>,
    ) -> Self {
        if let KeyKind::Foreign {
            referenced_columns,
            on_delete: delete,
            on_update: update,
            ..
        } = &mut self.kind
        {
            *referenced_columns = columns;
            *delete = on_delete;
            *update = on_update;
        }
        self
    }

    /// Constraint name, if one was given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Owning table.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Key kind.
    #[must_use]
    pub const fn kind(&self) -> &KeyKind {
        &self.kind
    }

    /// Columns by ordinal; `None` marks an unset position.
    #[must_use]
    pub fn columns(&self) -> &[Option<Column>] {
        &self.columns
    }

    /// Number of positions (set or unset).
    #[must_use]
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    /// Returns whether every position holds a column.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.columns.is_empty() && self.columns.iter().all(Option::is_some)
    }

    fn describe(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{} on {}", self.kind.label(), self.table))
    }

    fn check_owner(&self, column: &Column) -> Result<()> {
        if column.table == self.table {
            Ok(())
        } else {
            Err(CoreError::ColumnNotInTable {
                column: column.name.clone(),
                column_table: column.table.clone(),
                table: self.table.clone(),
            })
        }
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ColumnNotInTable`] for a column of another table.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        self.check_owner(&column)?;
        self.columns.push(Some(column));
        Ok(())
    }

    /// Places a column at a zero-based ordinal, growing the key as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ColumnNotInTable`] for a column of another
    /// table and [`CoreError::DuplicateOrdinal`] if the position is taken.
    pub fn set_column(&mut self, ordinal: usize, column: Column) -> Result<()> {
        self.check_owner(&column)?;
        if self.columns.len() <= ordinal {
            self.columns.resize(ordinal + 1, None);
        }
        if self.columns[ordinal].is_some() {
            return Err(CoreError::DuplicateOrdinal {
                key: self.describe(),
                ordinal,
            });
        }
        self.columns[ordinal] = Some(column);
        Ok(())
    }

    /// Renders `(c1,c2,...)` with `?` for unset positions.
    #[must_use]
    pub fn column_list(&self) -> String {
        self.column_list_with(|column| column.name.clone())
    }

    /// Renders `(c1,c2,...)` with a custom column renderer.
    #[must_use]
    pub fn column_list_with(&self, render: impl Fn(&Column) -> String) -> String {
        let names: Vec<String> = self
            .columns
            .iter()
            .map(|column| column.as_ref().map_or_else(|| String::from("?"), &render))
            .collect();
        format!("({})", names.join(","))
    }

    /// Returns the complete column list.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IncompleteKey`] if a position is unset.
    pub fn complete_columns(&self) -> Result<Vec<&Column>> {
        if !self.is_complete() {
            return Err(CoreError::IncompleteKey(self.describe()));
        }
        Ok(self.columns.iter().flatten().collect())
    }

    fn sorted_members(&self) -> Vec<(&str, &str)> {
        let mut members: Vec<(&str, &str)> = self
            .columns
            .iter()
            .map(|column| {
                column
                    .as_ref()
                    .map_or(("", "?"), |c| (c.table.as_str(), c.name.as_str()))
            })
            .collect();
        members.sort_unstable();
        members
    }
}

/// Keys are equal when they are of the same kind family and hold the
/// same columns, irrespective of order.
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(&self.kind) == mem::discriminant(&other.kind)
            && self.columns.len() == other.columns.len()
            && self.sorted_members() == other.sorted_members()
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(&self.kind).hash(state);
        self.sorted_members().hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.column_list())
    }
}
