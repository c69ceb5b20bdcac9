//! Subcommand implementations.
//!
//! Every command renders its output into strings so it can be checked
//! without a terminal; `main` only prints them.

use std::path::Path;

use anyhow::{Context, bail};
use oxide_store_core::dialect::{IdentifierKind, SequenceOptions};
use oxide_store_core::types::TypeMappingEntry;
use oxide_store_core::{Capability, CoreError, DialectProfile, SchemaConfig, SchemaWriter};
use serde::Serialize;
use tracing::{debug, info};

/// Row-range clause for a vendor.
pub fn paginate(profile: &DialectProfile, offset: i64, count: i64, ordered: bool) -> String {
    let clause = profile.pagination_clause(offset, count, ordered);
    if clause.is_empty() {
        info!(vendor = %profile.vendor(), offset, count, "no range clause emitted");
    }
    clause
}

/// `CREATE SEQUENCE`, optionally followed by the next-value statement.
pub fn sequence(
    profile: &DialectProfile,
    options: &SequenceOptions,
    next_value: bool,
) -> anyhow::Result<Vec<String>> {
    let mut statements = vec![profile.create_sequence(options)?];
    if next_value {
        if let Some(name) = &options.name {
            statements.push(profile.sequence_next_value(name)?);
        }
    }
    Ok(statements)
}

/// Reads a JSON schema description.
pub fn load_schema(path: &Path) -> anyhow::Result<SchemaConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading schema file {}", path.display()))?;
    let schema = serde_json::from_str(&raw)
        .with_context(|| format!("parsing schema file {}", path.display()))?;
    Ok(schema)
}

/// Creation DDL for every table and sequence of `schema`, or the drop DDL
/// in reverse order when `drop` is set.
pub fn ddl(
    profile: &DialectProfile,
    schema: &SchemaConfig,
    drop: bool,
) -> anyhow::Result<Vec<String>> {
    let tables = schema.to_tables(profile)?;
    let writer = SchemaWriter::new(profile);
    let mut statements = Vec::new();

    if drop {
        if profile.supports(Capability::AlterTableDropConstraint) {
            for table in tables.iter().rev() {
                for key in &table.foreign_keys {
                    statements.push(writer.drop_foreign_key(table, key)?);
                }
            }
        }
        for table in tables.iter().rev() {
            statements.push(writer.drop_table(table));
        }
        for options in &schema.sequences {
            let Some(name) = &options.name else {
                bail!(CoreError::MissingSequenceName);
            };
            statements.push(writer.drop_sequence(name)?);
        }
    } else {
        for options in &schema.sequences {
            statements.push(writer.create_sequence(options)?);
        }
        for table in &tables {
            statements.extend(writer.create_table(table)?);
        }
    }
    debug!(
        vendor = %profile.vendor(),
        tables = tables.len(),
        statements = statements.len(),
        drop,
        "rendered schema"
    );
    Ok(statements)
}

#[derive(Debug, Serialize)]
pub struct TypeReport {
    pub logical_type: String,
    pub default: String,
    pub candidates: Vec<String>,
}

impl TypeReport {
    fn from_entry(entry: &TypeMappingEntry) -> Self {
        let default = entry
            .default_candidate()
            .map(|info| info.render(None, None))
            .unwrap_or_default();
        Self {
            logical_type: entry.logical_type.clone(),
            default,
            candidates: entry
                .candidates
                .iter()
                .map(|candidate| candidate.info.render(None, None))
                .collect(),
        }
    }

    /// `logical  DEFAULT  [OTHER, ...]`
    pub fn line(&self) -> String {
        let others: Vec<&str> = self
            .candidates
            .iter()
            .map(String::as_str)
            .filter(|candidate| *candidate != self.default)
            .collect();
        if others.is_empty() {
            format!("{:<12} {}", self.logical_type, self.default)
        } else {
            format!(
                "{:<12} {} [{}]",
                self.logical_type,
                self.default,
                others.join(", ")
            )
        }
    }
}

/// Type mappings of the profile, all of them or a single logical type.
pub fn types(profile: &DialectProfile, logical: Option<&str>) -> anyhow::Result<Vec<TypeReport>> {
    let table = profile.types();
    match logical {
        Some(name) => {
            let entry = table
                .entry(name)
                .ok_or_else(|| CoreError::UnknownLogicalType(name.to_string()))?;
            Ok(vec![TypeReport::from_entry(entry)])
        }
        None => Ok(table.entries().map(TypeReport::from_entry).collect()),
    }
}

/// For each word: whether it is reserved and how it renders as a column.
pub fn keywords(profile: &DialectProfile, words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|word| {
            let status = if profile.is_reserved_keyword(word) {
                "reserved"
            } else {
                "not reserved"
            };
            let rendered = profile.format_identifier(word, IdentifierKind::Column);
            format!("{word}: {status}, written {rendered}")
        })
        .collect()
}
