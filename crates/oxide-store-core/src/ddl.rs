//! Schema DDL generation.
//!
//! [`SchemaWriter`] renders `CREATE`/`DROP` statements for tables, keys,
//! indices and sequences against one [`DialectProfile`]. Constraint and
//! index names default to `{table}_PK`, `{table}_U{n}`, `{table}_FK{n}` and
//! `{table}_N{n}` and are truncated to the vendor's limits.

use tracing::debug;

use crate::dialect::{
    Capability, DialectProfile, IdentifierKind, IdentityPlacement, SequenceOptions, Vendor,
};
use crate::error::{CoreError, Result};
use crate::key::{Key, KeyKind};
use crate::schema::{Column, Table};

/// Renders schema DDL for one dialect profile.
#[derive(Debug, Clone)]
pub struct SchemaWriter<'a> {
    profile: &'a DialectProfile,
}

impl<'a> SchemaWriter<'a> {
    /// Creates a writer.
    #[must_use]
    pub const fn new(profile: &'a DialectProfile) -> Self {
        Self { profile }
    }

    fn vendor(&self) -> &'static str {
        self.profile.vendor().name()
    }

    fn table_name(&self, table: &Table) -> String {
        let name = self.profile.format_identifier(&table.name, IdentifierKind::Table);
        match &table.schema {
            Some(schema) if self.profile.supports(Capability::SchemasInTableDefinitions) => {
                format!(
                    "{}.{name}",
                    self.profile.format_identifier(schema, IdentifierKind::Table)
                )
            }
            _ => name,
        }
    }

    fn column_name(&self, name: &str) -> String {
        self.profile.format_identifier(name, IdentifierKind::Column)
    }

    fn column_list(&self, key: &Key) -> Result<String> {
        let names: Vec<String> = key
            .complete_columns()?
            .into_iter()
            .map(|column| self.column_name(&column.name))
            .collect();
        Ok(format!("({})", names.join(", ")))
    }

    fn key_name(&self, table: &Table, key: &Key) -> String {
        let (name, kind) = match (key.name(), key.kind()) {
            (Some(name), KeyKind::Index { .. }) => (name.to_string(), IdentifierKind::Index),
            (Some(name), _) => (name.to_string(), IdentifierKind::Constraint),
            (None, KeyKind::Primary) => (format!("{}_PK", table.name), IdentifierKind::Constraint),
            (None, KeyKind::Candidate) => (
                format!("{}_U{}", table.name, position(&table.candidate_keys, key)),
                IdentifierKind::Constraint,
            ),
            (None, KeyKind::Foreign { .. }) => (
                format!("{}_FK{}", table.name, position(&table.foreign_keys, key)),
                IdentifierKind::Constraint,
            ),
            (None, KeyKind::Index { .. }) => (
                format!("{}_N{}", table.name, position(&table.indices, key)),
                IdentifierKind::Index,
            ),
        };
        self.profile.format_identifier(&name, kind)
    }

    fn column_definition(&self, table: &Table, column: &Column) -> Result<String> {
        let name = self.column_name(&column.name);
        let mut sql = if column.identity {
            let identity = self
                .profile
                .identity()
                .ok_or_else(|| CoreError::unsupported(self.vendor(), "identity columns"))?;
            match (identity.placement, self.profile.identity_keyword(&column.logical_type)?) {
                (IdentityPlacement::ReplaceType { .. }, Some(keyword)) => {
                    format!("{name} {keyword}")
                }
                (IdentityPlacement::AfterType(_), Some(keyword)) => {
                    format!("{name} {} {keyword}", column.sql_type())
                }
                _ => {
                    let only_pk_column = table
                        .primary_key
                        .as_ref()
                        .is_some_and(|pk| pk.size() == 1)
                        && table.is_primary_key_column(&column.name);
                    if !only_pk_column {
                        return Err(CoreError::unsupported(
                            self.vendor(),
                            format!(
                                "identity column '{}' outside a single-column primary key",
                                column.name
                            ),
                        ));
                    }
                    return Ok(format!("{name} INTEGER PRIMARY KEY AUTOINCREMENT"));
                }
            }
        } else {
            format!("{name} {}", column.sql_type())
        };
        if !column.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &column.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }
        Ok(sql)
    }

    fn inline_primary_key(&self, table: &Table) -> bool {
        matches!(
            self.profile.identity().map(|identity| identity.placement),
            Some(IdentityPlacement::InlinePrimaryKey)
        ) && table
            .columns
            .iter()
            .any(|column| column.identity && table.is_primary_key_column(&column.name))
    }

    fn foreign_key_clause(&self, table: &Table, key: &Key) -> Result<String> {
        let KeyKind::Foreign {
            referenced_table,
            referenced_columns,
            on_delete,
            on_update,
        } = key.kind()
        else {
            return Err(CoreError::invalid_call(
                "add_foreign_key",
                format!("{} is not a foreign key", key.column_list()),
            ));
        };
        let referenced: Vec<String> = referenced_columns
            .iter()
            .map(|column| self.column_name(column))
            .collect();
        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY {} REFERENCES {} ({})",
            self.key_name(table, key),
            self.column_list(key)?,
            self.profile
                .format_identifier(referenced_table, IdentifierKind::Table),
            referenced.join(", "),
        );
        if let Some(action) = on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        Ok(sql)
    }

    /// Renders every statement needed to create `table`: the `CREATE TABLE`
    /// itself, then foreign keys added by `ALTER TABLE` (when the vendor
    /// supports it), then indices.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IncompleteKey`] for a partially built key and
    /// [`CoreError::Unsupported`] for identity columns the vendor cannot
    /// declare.
    pub fn create_table(&self, table: &Table) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(table.columns.len() + 4);
        for column in &table.columns {
            lines.push(self.column_definition(table, column)?);
        }

        if let Some(pk) = &table.primary_key {
            if !self.inline_primary_key(table) {
                lines.push(format!(
                    "CONSTRAINT {} PRIMARY KEY {}",
                    self.key_name(table, pk),
                    self.column_list(pk)?
                ));
            }
        }
        for key in &table.candidate_keys {
            lines.push(format!(
                "CONSTRAINT {} UNIQUE {}",
                self.key_name(table, key),
                self.column_list(key)?
            ));
        }
        let alter_foreign_keys = self.profile.supports(Capability::AlterTableAddConstraint);
        if !alter_foreign_keys {
            for key in &table.foreign_keys {
                lines.push(self.foreign_key_clause(table, key)?);
            }
        }

        let body: Vec<String> = lines.iter().map(|line| format!("    {line}")).collect();
        let mut statements = vec![format!(
            "CREATE TABLE {} (\n{}\n)",
            self.table_name(table),
            body.join(",\n")
        )];
        if alter_foreign_keys {
            for key in &table.foreign_keys {
                statements.push(self.add_foreign_key(table, key)?);
            }
        }
        for key in &table.indices {
            statements.push(self.create_index(table, key)?);
        }
        debug!(
            vendor = %self.profile.vendor(),
            table = %table.name,
            statements = statements.len(),
            "compiled table DDL"
        );
        Ok(statements)
    }

    /// Renders `DROP TABLE`, with `IF EXISTS` and cascading where supported.
    #[must_use]
    pub fn drop_table(&self, table: &Table) -> String {
        let mut sql = String::from("DROP TABLE ");
        if self.profile.supports(Capability::DropTableIfExists) {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.table_name(table));
        if self.profile.supports(Capability::DropTableCascade) {
            if self.profile.vendor() == Vendor::Oracle {
                sql.push_str(" CASCADE CONSTRAINTS");
            } else {
                sql.push_str(" CASCADE");
            }
        }
        sql
    }

    /// Renders `CREATE [UNIQUE] INDEX`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IncompleteKey`] for a partially built index.
    pub fn create_index(&self, table: &Table, key: &Key) -> Result<String> {
        let unique = match key.kind() {
            KeyKind::Index { unique } => *unique,
            KeyKind::Candidate | KeyKind::Primary => true,
            KeyKind::Foreign { .. } => false,
        };
        let mut sql = String::from("CREATE ");
        if unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX ");
        if self.profile.supports(Capability::CreateIndexIfNotExists) {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&format!(
            "{} ON {} {}",
            self.key_name(table, key),
            self.table_name(table),
            self.column_list(key)?
        ));
        Ok(sql)
    }

    /// Renders `DROP INDEX`.
    #[must_use]
    pub fn drop_index(&self, table: &Table, key: &Key) -> String {
        let name = self.key_name(table, key);
        match self.profile.vendor() {
            Vendor::MySql | Vendor::SqlServer => {
                format!("DROP INDEX {name} ON {}", self.table_name(table))
            }
            _ => format!("DROP INDEX {name}"),
        }
    }

    fn require_alter(&self, capability: Capability, operation: &str) -> Result<()> {
        if self.profile.supports(capability) {
            Ok(())
        } else {
            Err(CoreError::unsupported(self.vendor(), operation))
        }
    }

    /// Renders `ALTER TABLE .. ADD CONSTRAINT .. UNIQUE`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unsupported`] without `ALTER TABLE ADD
    /// CONSTRAINT` and [`CoreError::IncompleteKey`] for a partial key.
    pub fn add_candidate_key(&self, table: &Table, key: &Key) -> Result<String> {
        self.require_alter(Capability::AlterTableAddConstraint, "adding unique constraints")?;
        Ok(format!(
            "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE {}",
            self.table_name(table),
            self.key_name(table, key),
            self.column_list(key)?
        ))
    }

    /// Renders `ALTER TABLE .. ADD CONSTRAINT .. FOREIGN KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unsupported`] without `ALTER TABLE ADD
    /// CONSTRAINT`, and an error for incomplete or non-foreign keys.
    pub fn add_foreign_key(&self, table: &Table, key: &Key) -> Result<String> {
        self.require_alter(Capability::AlterTableAddConstraint, "adding foreign keys")?;
        Ok(format!(
            "ALTER TABLE {} ADD {}",
            self.table_name(table),
            self.foreign_key_clause(table, key)?
        ))
    }

    /// Renders the statement dropping a foreign key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unsupported`] without `ALTER TABLE DROP
    /// CONSTRAINT`.
    pub fn drop_foreign_key(&self, table: &Table, key: &Key) -> Result<String> {
        self.require_alter(Capability::AlterTableDropConstraint, "dropping foreign keys")?;
        let verb = if self.profile.vendor() == Vendor::MySql {
            "DROP FOREIGN KEY"
        } else {
            "DROP CONSTRAINT"
        };
        Ok(format!(
            "ALTER TABLE {} {verb} {}",
            self.table_name(table),
            self.key_name(table, key)
        ))
    }

    /// See [`DialectProfile::create_sequence`].
    ///
    /// # Errors
    ///
    /// Same as [`DialectProfile::create_sequence`].
    pub fn create_sequence(&self, options: &SequenceOptions) -> Result<String> {
        self.profile.create_sequence(options)
    }

    /// See [`DialectProfile::drop_sequence`].
    ///
    /// # Errors
    ///
    /// Same as [`DialectProfile::drop_sequence`].
    pub fn drop_sequence(&self, name: &str) -> Result<String> {
        self.profile.drop_sequence(name)
    }

    /// See [`DialectProfile::sequence_next_value`].
    ///
    /// # Errors
    ///
    /// Same as [`DialectProfile::sequence_next_value`].
    pub fn sequence_next_value(&self, name: &str) -> Result<String> {
        self.profile.sequence_next_value(name)
    }

    /// Statement reading the identity value last generated for the identity
    /// column of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownColumn`] when the table has no identity
    /// column, or the profile's error when the value cannot be read.
    pub fn identity_last_value(&self, table: &Table) -> Result<String> {
        let column = table
            .columns
            .iter()
            .find(|column| column.identity)
            .ok_or_else(|| CoreError::UnknownColumn {
                table: table.name.clone(),
                column: String::from("<identity>"),
            })?;
        self.profile.identity_last_value(&table.name, &column.name)
    }
}

/// 1-based position of `key` among `keys`.
fn position(keys: &[Key], key: &Key) -> usize {
    keys.iter()
        .position(|candidate| std::ptr::eq(candidate, key) || candidate == key)
        .map_or(1, |i| i + 1)
}
