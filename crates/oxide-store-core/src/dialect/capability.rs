//! Named capability flags.

use core::fmt;

use crate::error::CoreError;

/// A named boolean feature switch gating SQL syntax or semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// `CREATE SEQUENCE` and sequence value expressions.
    Sequences,
    /// Auto-increment / identity columns.
    IdentityColumns,
    /// `ALTER TABLE ... ADD CONSTRAINT`.
    AlterTableAddConstraint,
    /// `ALTER TABLE ... DROP CONSTRAINT`.
    AlterTableDropConstraint,
    /// `SELECT ... FOR UPDATE`.
    SelectForUpdate,
    /// Row locking through a table hint instead of `FOR UPDATE`.
    TableLockHint,
    /// `DROP TABLE ... CASCADE`.
    DropTableCascade,
    /// `DROP TABLE IF EXISTS`.
    DropTableIfExists,
    /// `CREATE INDEX IF NOT EXISTS`.
    CreateIndexIfNotExists,
    /// Schema-qualified names in table definitions.
    SchemasInTableDefinitions,
    /// `NULLS FIRST` / `NULLS LAST` in `ORDER BY`.
    NullsOrdering,
    /// `TRUE` / `FALSE` literals.
    BooleanLiterals,
    /// `CHECK` constraints inside `CREATE TABLE`.
    CheckInCreateStatements,
    /// Deferrable constraints.
    DeferredConstraints,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY` pagination.
    OffsetFetch,
    /// The empty string is stored as NULL.
    NullEqualsEmptyString,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Sequences,
        Self::IdentityColumns,
        Self::AlterTableAddConstraint,
        Self::AlterTableDropConstraint,
        Self::SelectForUpdate,
        Self::TableLockHint,
        Self::DropTableCascade,
        Self::DropTableIfExists,
        Self::CreateIndexIfNotExists,
        Self::SchemasInTableDefinitions,
        Self::NullsOrdering,
        Self::BooleanLiterals,
        Self::CheckInCreateStatements,
        Self::DeferredConstraints,
        Self::OffsetFetch,
        Self::NullEqualsEmptyString,
    ];

    /// Returns the stable option key of this capability.
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::Sequences => "sequences",
            Self::IdentityColumns => "identity_columns",
            Self::AlterTableAddConstraint => "alter_table_add_constraint",
            Self::AlterTableDropConstraint => "alter_table_drop_constraint",
            Self::SelectForUpdate => "select_for_update",
            Self::TableLockHint => "table_lock_hint",
            Self::DropTableCascade => "drop_table_cascade",
            Self::DropTableIfExists => "drop_table_if_exists",
            Self::CreateIndexIfNotExists => "create_index_if_not_exists",
            Self::SchemasInTableDefinitions => "schemas_in_table_definitions",
            Self::NullsOrdering => "nulls_ordering",
            Self::BooleanLiterals => "boolean_literals",
            Self::CheckInCreateStatements => "check_in_create_statements",
            Self::DeferredConstraints => "deferred_constraints",
            Self::OffsetFetch => "offset_fetch",
            Self::NullEqualsEmptyString => "null_equals_empty_string",
        }
    }

    /// Looks a capability up by its option key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCapability`] for an unrecognised key.
    pub fn from_key(key: &str) -> Result<Self, CoreError> {
        Self::ALL
            .iter()
            .copied()
            .find(|cap| cap.as_key().eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| CoreError::UnknownCapability(key.to_string()))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}
