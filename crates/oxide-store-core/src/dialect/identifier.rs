//! Identifier case folding, quoting and length limits.

use std::sync::LazyLock;

use regex::Regex;

use super::vendor::Vendor;
use super::version::Version;

/// How unquoted identifiers are folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierCase {
    /// Folded to upper case.
    Upper,
    /// Folded to lower case.
    Lower,
    /// Kept as written.
    Preserve,
}

/// The kind of schema object an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// Table name.
    Table,
    /// Column name.
    Column,
    /// Constraint name (primary, unique, foreign key).
    Constraint,
    /// Index name.
    Index,
    /// Sequence name.
    Sequence,
}

static STANDARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid identifier regex"));
static UNDERSCORE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));
static POSTGRES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("valid identifier regex"));
static MYSQL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]*[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex")
});
static SQLSERVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_@#][A-Za-z0-9_@#$]*$").expect("valid identifier regex")
});
static ORACLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_$#]*$").expect("valid identifier regex"));
static DB2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z@#$][A-Za-z0-9_@#$]*$").expect("valid identifier regex")
});

/// Vendor rules for identifiers.
#[derive(Debug, Clone)]
pub struct IdentifierPolicy {
    /// Case folding of unquoted identifiers.
    pub case: IdentifierCase,
    /// Opening quote character.
    pub quote_open: char,
    /// Closing quote character.
    pub quote_close: char,
    /// Maximum table name length.
    pub max_table: usize,
    /// Maximum column name length.
    pub max_column: usize,
    /// Maximum constraint name length.
    pub max_constraint: usize,
    /// Maximum index name length.
    pub max_index: usize,
    /// Maximum sequence name length.
    pub max_sequence: usize,
    unquoted: &'static LazyLock<Regex>,
}

impl IdentifierPolicy {
    /// Builds the identifier policy of a vendor at a version.
    #[must_use]
    pub fn for_vendor(vendor: Vendor, version: Version) -> Self {
        let (case, quotes, max, unquoted): (_, _, usize, &'static LazyLock<Regex>) = match vendor {
            Vendor::Generic => (IdentifierCase::Upper, ('"', '"'), 128, &STANDARD),
            Vendor::PostgreSql => (IdentifierCase::Lower, ('"', '"'), 63, &POSTGRES),
            Vendor::MySql => (IdentifierCase::Preserve, ('`', '`'), 64, &MYSQL),
            Vendor::Sqlite => (IdentifierCase::Preserve, ('"', '"'), 128, &UNDERSCORE_START),
            Vendor::SqlServer => (IdentifierCase::Preserve, ('[', ']'), 128, &SQLSERVER),
            Vendor::Oracle if version.at_least(12, 2) => {
                (IdentifierCase::Upper, ('"', '"'), 128, &ORACLE)
            }
            Vendor::Oracle => (IdentifierCase::Upper, ('"', '"'), 30, &ORACLE),
            Vendor::Derby => (IdentifierCase::Upper, ('"', '"'), 128, &STANDARD),
            Vendor::H2 => (IdentifierCase::Upper, ('"', '"'), 256, &UNDERSCORE_START),
            Vendor::Db2 => (IdentifierCase::Upper, ('"', '"'), 128, &DB2),
        };
        Self {
            case,
            quote_open: quotes.0,
            quote_close: quotes.1,
            max_table: max,
            max_column: max,
            max_constraint: max,
            max_index: max,
            max_sequence: max,
            unquoted,
        }
    }

    /// Returns the maximum length of an identifier kind.
    #[must_use]
    pub const fn max_length(&self, kind: IdentifierKind) -> usize {
        match kind {
            IdentifierKind::Table => self.max_table,
            IdentifierKind::Column => self.max_column,
            IdentifierKind::Constraint => self.max_constraint,
            IdentifierKind::Index => self.max_index,
            IdentifierKind::Sequence => self.max_sequence,
        }
    }

    /// Returns whether `name` may appear unquoted as far as its characters go.
    #[must_use]
    pub fn is_plain(&self, name: &str) -> bool {
        self.unquoted.is_match(name)
    }

    /// Applies the case folding rule.
    #[must_use]
    pub fn fold(&self, name: &str) -> String {
        match self.case {
            IdentifierCase::Upper => name.to_uppercase(),
            IdentifierCase::Lower => name.to_lowercase(),
            IdentifierCase::Preserve => name.to_string(),
        }
    }

    /// Wraps a name in quote characters, doubling embedded closing quotes.
    #[must_use]
    pub fn quote(&self, name: &str) -> String {
        let close = self.quote_close.to_string();
        let escaped = name.replace(self.quote_close, &format!("{close}{close}"));
        format!("{}{escaped}{}", self.quote_open, self.quote_close)
    }

    /// Shortens `name` to the limit of `kind`.
    ///
    /// Over-long names keep a prefix and gain a 4-hex-digit suffix derived
    /// from the full name, so distinct long names stay distinct.
    #[must_use]
    pub fn truncate(&self, name: &str, kind: IdentifierKind) -> String {
        truncate_to(name, self.max_length(kind))
    }
}

/// Truncates `name` to at most `max` characters with a hash suffix.
#[must_use]
pub fn truncate_to(name: &str, max: usize) -> String {
    let len = name.chars().count();
    if len <= max {
        return name.to_string();
    }
    if max <= 4 {
        return name.chars().take(max).collect();
    }
    let prefix: String = name.chars().take(max - 4).collect();
    format!("{prefix}{:04X}", name_hash(name) % 0x1_0000)
}

/// FNV-1a over the UTF-8 bytes of `name`.
fn name_hash(name: &str) -> u32 {
    name.bytes().fold(0x811c_9dc5_u32, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}
