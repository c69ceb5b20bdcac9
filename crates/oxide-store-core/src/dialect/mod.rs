//! Dialect profiles.
//!
//! A [`DialectProfile`] is built once per datastore connection target from a
//! vendor and a server version. Construction resolves the version-gated
//! capability set and derives every vendor strategy from it: identifier
//! policy, pagination, identity and sequence syntax, row locking, the type
//! mapping table and the SQL method registry. After construction the only
//! mutation is [`DialectProfile::learn_from_driver`].

mod capability;
mod identifier;
mod identity;
pub mod keywords;
mod methods;
mod pagination;
mod sequence;
mod vendor;
mod version;

use std::collections::BTreeSet;

use tracing::debug;

pub use capability::Capability;
pub use identifier::{truncate_to, IdentifierCase, IdentifierKind, IdentifierPolicy};
pub use identity::{IdentityPlacement, IdentitySyntax, IntegerWidth, LastValueForm};
pub use methods::{MethodEntry, MethodRegistry, OperationEntry, SqlMethod, SqlOperation};
pub use pagination::PaginationStyle;
pub use sequence::{NextValueForm, SequenceClause, SequenceOptions, SequenceSyntax};
pub use vendor::Vendor;
pub use version::Version;

use crate::config::ProfileConfig;
use crate::error::{CoreError, Result};
use crate::types::{DriverTypeInfo, TypeMappingTable};

/// Row-lock syntax of a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStyle {
    /// Locking is not expressible.
    None,
    /// `... FOR UPDATE`.
    ForUpdate,
    /// `... FOR UPDATE WITH RS`.
    ForUpdateWithRs,
    /// `FROM t WITH (UPDLOCK, ROWLOCK)`.
    TableHint,
}

/// Capabilities and SQL generation strategies of one vendor at one version.
#[derive(Debug, Clone)]
pub struct DialectProfile {
    vendor: Vendor,
    version: Version,
    capabilities: BTreeSet<Capability>,
    reserved: BTreeSet<String>,
    identifiers: IdentifierPolicy,
    pagination: PaginationStyle,
    identity: Option<IdentitySyntax>,
    sequences: Option<SequenceSyntax>,
    lock: LockStyle,
    types: TypeMappingTable,
    methods: MethodRegistry,
}

impl DialectProfile {
    /// Builds the profile of `vendor` at `version`.
    #[must_use]
    pub fn new(vendor: Vendor, version: Version) -> Self {
        Self::with_capabilities(vendor, version, vendor.capabilities(version))
    }

    /// Builds a profile from configuration, applying explicit capability
    /// overrides after version gating.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown vendor, an unparsable version or an
    /// unknown capability key.
    pub fn from_config(config: &ProfileConfig) -> Result<Self> {
        let vendor: Vendor = config.vendor.parse()?;
        let version = match config.version.as_deref() {
            Some(raw) => raw.parse()?,
            None => vendor.default_version(),
        };
        let mut capabilities = vendor.capabilities(version);
        for key in &config.enable {
            capabilities.insert(Capability::from_key(key)?);
        }
        for key in &config.disable {
            capabilities.remove(&Capability::from_key(key)?);
        }
        Ok(Self::with_capabilities(vendor, version, capabilities))
    }

    fn with_capabilities(
        vendor: Vendor,
        version: Version,
        capabilities: BTreeSet<Capability>,
    ) -> Self {
        let has = |cap: Capability| capabilities.contains(&cap);
        let pagination = match vendor {
            Vendor::PostgreSql => PaginationStyle::LimitOffset { unbounded: None },
            Vendor::Sqlite => PaginationStyle::LimitOffset {
                unbounded: Some("-1"),
            },
            Vendor::MySql => PaginationStyle::CommaLimit {
                unbounded: "18446744073709551615",
            },
            Vendor::H2 if !has(Capability::OffsetFetch) => {
                PaginationStyle::LimitOffset { unbounded: None }
            }
            Vendor::Db2 if !has(Capability::OffsetFetch) => PaginationStyle::FetchFirst,
            Vendor::SqlServer if has(Capability::OffsetFetch) => PaginationStyle::OffsetFetch {
                require_offset: true,
                require_ordering: true,
            },
            _ if has(Capability::OffsetFetch) => PaginationStyle::OffsetFetch {
                require_offset: false,
                require_ordering: false,
            },
            _ => PaginationStyle::Unsupported,
        };
        let identity = has(Capability::IdentityColumns).then(|| IdentitySyntax::for_vendor(vendor));
        let sequences = if has(Capability::Sequences) {
            SequenceSyntax::for_vendor(vendor)
        } else {
            None
        };
        let lock = if has(Capability::TableLockHint) {
            LockStyle::TableHint
        } else if has(Capability::SelectForUpdate) {
            match vendor {
                Vendor::Derby | Vendor::Db2 => LockStyle::ForUpdateWithRs,
                _ => LockStyle::ForUpdate,
            }
        } else {
            LockStyle::None
        };
        debug!(
            vendor = %vendor,
            version = %version,
            capabilities = capabilities.len(),
            "built dialect profile"
        );
        Self {
            vendor,
            version,
            reserved: keywords::reserved_words(vendor),
            identifiers: IdentifierPolicy::for_vendor(vendor, version),
            pagination,
            identity,
            sequences,
            lock,
            types: TypeMappingTable::for_vendor(vendor, version),
            methods: MethodRegistry::for_vendor(vendor),
            capabilities,
        }
    }

    #[must_use]
    pub const fn vendor(&self) -> Vendor {
        self.vendor
    }

    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Resolved capability set.
    #[must_use]
    pub const fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    /// Returns whether a capability is enabled.
    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Looks a capability up by its string key.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownCapability`] for an unknown key.
    pub fn supports_option(&self, key: &str) -> Result<bool> {
        Ok(self.supports(Capability::from_key(key)?))
    }

    /// Returns whether `word` is reserved, ignoring case.
    #[must_use]
    pub fn is_reserved_keyword(&self, word: &str) -> bool {
        self.reserved.contains(&word.to_uppercase())
    }

    /// Reserved words of this vendor, upper case.
    #[must_use]
    pub const fn reserved_words(&self) -> &BTreeSet<String> {
        &self.reserved
    }

    #[must_use]
    pub const fn identifier_policy(&self) -> &IdentifierPolicy {
        &self.identifiers
    }

    /// Formats a schema object name for SQL text: truncated to the kind's
    /// limit, case folded, and quoted when reserved or not plain.
    #[must_use]
    pub fn format_identifier(&self, name: &str, kind: IdentifierKind) -> String {
        let name = self.identifiers.fold(&self.identifiers.truncate(name, kind));
        if self.is_reserved_keyword(&name) || !self.identifiers.is_plain(&name) {
            self.identifiers.quote(&name)
        } else {
            name
        }
    }

    /// Quotes `name` unconditionally.
    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        self.identifiers.quote(name)
    }

    /// Shortens `name` to the limit of `kind`.
    #[must_use]
    pub fn truncate_identifier(&self, name: &str, kind: IdentifierKind) -> String {
        self.identifiers.truncate(name, kind)
    }

    #[must_use]
    pub const fn pagination(&self) -> PaginationStyle {
        self.pagination
    }

    /// Renders the row-range clause; empty when nothing is restricted or
    /// the vendor cannot express it.
    #[must_use]
    pub fn pagination_clause(&self, offset: i64, count: i64, has_ordering: bool) -> String {
        self.pagination.clause(offset, count, has_ordering)
    }

    #[must_use]
    pub const fn lock_style(&self) -> LockStyle {
        self.lock
    }

    /// Identity column syntax, if identity columns are supported.
    #[must_use]
    pub const fn identity(&self) -> Option<&IdentitySyntax> {
        self.identity.as_ref()
    }

    /// Identity keyword for a column of `logical_type`. `None` means the
    /// column is declared inline as `INTEGER PRIMARY KEY AUTOINCREMENT`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unsupported`] without identity columns.
    pub fn identity_keyword(&self, logical_type: &str) -> Result<Option<&'static str>> {
        let identity = self
            .identity
            .ok_or_else(|| CoreError::unsupported(self.vendor.name(), "identity columns"))?;
        Ok(identity.keyword(IntegerWidth::from_logical(logical_type)))
    }

    /// Statement reading the identity value last generated for
    /// `table.column`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unsupported`] when the vendor offers no way to
    /// read it.
    pub fn identity_last_value(&self, table: &str, column: &str) -> Result<String> {
        let unsupported =
            || CoreError::unsupported(self.vendor.name(), "reading the last identity value");
        match self.identity.ok_or_else(unsupported)?.last_value {
            LastValueForm::Fixed(sql) => Ok(sql.to_string()),
            LastValueForm::SerialSequence => Ok(format!(
                "SELECT currval(pg_get_serial_sequence('{}','{}'))",
                self.format_identifier(table, IdentifierKind::Table),
                self.format_identifier(column, IdentifierKind::Column),
            )),
            LastValueForm::Unavailable => Err(unsupported()),
        }
    }

    fn sequence_syntax(&self, name: Option<&str>) -> Result<(SequenceSyntax, String)> {
        let name = name
            .filter(|name| !name.trim().is_empty())
            .ok_or(CoreError::MissingSequenceName)?;
        let syntax = self
            .sequences
            .ok_or_else(|| CoreError::unsupported(self.vendor.name(), "sequences"))?;
        Ok((syntax, self.format_identifier(name, IdentifierKind::Sequence)))
    }

    /// Renders `CREATE SEQUENCE`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingSequenceName`] without a name, and
    /// [`CoreError::Unsupported`] without sequence support or for options
    /// the vendor rejects.
    pub fn create_sequence(&self, options: &SequenceOptions) -> Result<String> {
        let (syntax, name) = self.sequence_syntax(options.name.as_deref())?;
        let sql = syntax.create(self.vendor, &name, options)?;
        debug!(vendor = %self.vendor, sql = %sql, "compiled sequence DDL");
        Ok(sql)
    }

    /// Renders `DROP SEQUENCE`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::create_sequence`].
    pub fn drop_sequence(&self, name: &str) -> Result<String> {
        let (syntax, name) = self.sequence_syntax(Some(name))?;
        Ok(syntax.drop(&name))
    }

    /// Renders a statement reading the next value of a sequence.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::create_sequence`].
    pub fn sequence_next_value(&self, name: &str) -> Result<String> {
        let (syntax, name) = self.sequence_syntax(Some(name))?;
        Ok(syntax.next_value_statement(&name))
    }

    /// Type mapping table.
    #[must_use]
    pub const fn types(&self) -> &TypeMappingTable {
        &self.types
    }

    /// SQL method registry.
    #[must_use]
    pub const fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    /// Augments the type mapping table with driver-reported types and
    /// returns the number of candidates added.
    pub fn learn_from_driver(&mut self, reported: Vec<DriverTypeInfo>) -> usize {
        self.types.learn_from_driver(reported)
    }

    /// Returns whether a vendor error means the statement was cancelled or
    /// timed out.
    #[must_use]
    pub fn is_statement_cancel(&self, code: Option<&str>, sql_state: Option<&str>) -> bool {
        if matches!(sql_state, Some("57014" | "HY008" | "XCL52")) {
            return true;
        }
        let Some(code) = code.map(str::trim) else {
            return false;
        };
        match self.vendor {
            Vendor::MySql => matches!(code, "1317" | "3024"),
            Vendor::Oracle => matches!(code, "1013" | "ORA-01013"),
            Vendor::Sqlite => code == "9",
            Vendor::H2 => code == "57014",
            _ => false,
        }
    }
}
