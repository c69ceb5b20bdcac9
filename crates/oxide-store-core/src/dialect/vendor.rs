//! Database vendors and their version-gated base capabilities.

use core::fmt;
use core::str::FromStr;
use std::collections::BTreeSet;

use super::capability::Capability;
use super::version::Version;
use crate::error::CoreError;

/// A database product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vendor {
    /// Plain SQL-92 without vendor extensions.
    #[default]
    Generic,
    /// PostgreSQL.
    PostgreSql,
    /// MySQL and MariaDB.
    MySql,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    SqlServer,
    /// Oracle Database.
    Oracle,
    /// Apache Derby.
    Derby,
    /// H2.
    H2,
    /// IBM DB2.
    Db2,
}

use Capability::{
    AlterTableAddConstraint, AlterTableDropConstraint, BooleanLiterals, CheckInCreateStatements,
    CreateIndexIfNotExists, DeferredConstraints, DropTableCascade, DropTableIfExists,
    IdentityColumns, NullEqualsEmptyString, NullsOrdering, OffsetFetch, SchemasInTableDefinitions,
    SelectForUpdate, Sequences, TableLockHint,
};

/// Capabilities a vendor has in every supported version.
const BASE: &[(Vendor, &[Capability])] = &[
    (
        Vendor::Generic,
        &[
            AlterTableAddConstraint,
            AlterTableDropConstraint,
            SelectForUpdate,
            CheckInCreateStatements,
            BooleanLiterals,
        ],
    ),
    (
        Vendor::PostgreSql,
        &[
            Sequences,
            IdentityColumns,
            AlterTableAddConstraint,
            AlterTableDropConstraint,
            SelectForUpdate,
            DropTableCascade,
            DropTableIfExists,
            SchemasInTableDefinitions,
            NullsOrdering,
            BooleanLiterals,
            CheckInCreateStatements,
            DeferredConstraints,
        ],
    ),
    (
        Vendor::MySql,
        &[
            IdentityColumns,
            AlterTableAddConstraint,
            AlterTableDropConstraint,
            SelectForUpdate,
            DropTableIfExists,
            SchemasInTableDefinitions,
            BooleanLiterals,
        ],
    ),
    (
        Vendor::Sqlite,
        &[
            IdentityColumns,
            DropTableIfExists,
            CreateIndexIfNotExists,
            CheckInCreateStatements,
            DeferredConstraints,
        ],
    ),
    (
        Vendor::SqlServer,
        &[
            IdentityColumns,
            AlterTableAddConstraint,
            AlterTableDropConstraint,
            TableLockHint,
            SchemasInTableDefinitions,
            CheckInCreateStatements,
        ],
    ),
    (
        Vendor::Oracle,
        &[
            Sequences,
            AlterTableAddConstraint,
            AlterTableDropConstraint,
            SelectForUpdate,
            DropTableCascade,
            SchemasInTableDefinitions,
            NullsOrdering,
            CheckInCreateStatements,
            DeferredConstraints,
            NullEqualsEmptyString,
        ],
    ),
    (
        Vendor::Derby,
        &[
            IdentityColumns,
            AlterTableAddConstraint,
            AlterTableDropConstraint,
            SelectForUpdate,
            SchemasInTableDefinitions,
            CheckInCreateStatements,
        ],
    ),
    (
        Vendor::H2,
        &[
            Sequences,
            IdentityColumns,
            AlterTableAddConstraint,
            AlterTableDropConstraint,
            SelectForUpdate,
            DropTableCascade,
            DropTableIfExists,
            CreateIndexIfNotExists,
            SchemasInTableDefinitions,
            NullsOrdering,
            BooleanLiterals,
            CheckInCreateStatements,
        ],
    ),
    (
        Vendor::Db2,
        &[
            Sequences,
            IdentityColumns,
            AlterTableAddConstraint,
            AlterTableDropConstraint,
            SelectForUpdate,
            SchemasInTableDefinitions,
            CheckInCreateStatements,
        ],
    ),
];

/// Capabilities gained from a minimum version onward.
const GATES: &[(Vendor, Capability, Version)] = &[
    (Vendor::PostgreSql, CreateIndexIfNotExists, Version::new(9, 5, 0)),
    (Vendor::MySql, CheckInCreateStatements, Version::new(8, 0, 16)),
    (Vendor::Sqlite, NullsOrdering, Version::new(3, 30, 0)),
    (Vendor::Sqlite, BooleanLiterals, Version::new(3, 23, 0)),
    (Vendor::SqlServer, Sequences, Version::new(11, 0, 0)),
    (Vendor::SqlServer, OffsetFetch, Version::new(11, 0, 0)),
    (Vendor::SqlServer, DropTableIfExists, Version::new(13, 0, 0)),
    (Vendor::Oracle, IdentityColumns, Version::new(12, 1, 0)),
    (Vendor::Oracle, OffsetFetch, Version::new(12, 1, 0)),
    (Vendor::Derby, NullsOrdering, Version::new(10, 4, 0)),
    (Vendor::Derby, OffsetFetch, Version::new(10, 5, 0)),
    (Vendor::Derby, Sequences, Version::new(10, 6, 0)),
    (Vendor::Derby, BooleanLiterals, Version::new(10, 7, 0)),
    (Vendor::H2, OffsetFetch, Version::new(2, 0, 0)),
    (Vendor::Db2, OffsetFetch, Version::new(11, 1, 0)),
];

impl Vendor {
    /// Every vendor.
    pub const ALL: [Self; 9] = [
        Self::Generic,
        Self::PostgreSql,
        Self::MySql,
        Self::Sqlite,
        Self::SqlServer,
        Self::Oracle,
        Self::Derby,
        Self::H2,
        Self::Db2,
    ];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::PostgreSql => "postgresql",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
            Self::SqlServer => "sqlserver",
            Self::Oracle => "oracle",
            Self::Derby => "derby",
            Self::H2 => "h2",
            Self::Db2 => "db2",
        }
    }

    /// Version assumed when none is read from a live connection.
    #[must_use]
    pub const fn default_version(self) -> Version {
        match self {
            Self::Generic => Version::new(0, 0, 0),
            Self::PostgreSql => Version::new(16, 0, 0),
            Self::MySql => Version::new(8, 0, 36),
            Self::Sqlite => Version::new(3, 45, 0),
            Self::SqlServer => Version::new(16, 0, 0),
            Self::Oracle => Version::new(19, 0, 0),
            Self::Derby => Version::new(10, 16, 1),
            Self::H2 => Version::new(2, 2, 224),
            Self::Db2 => Version::new(11, 5, 0),
        }
    }

    /// Returns the capabilities of this vendor at `version`.
    #[must_use]
    pub fn capabilities(self, version: Version) -> BTreeSet<Capability> {
        let mut caps: BTreeSet<Capability> = BASE
            .iter()
            .filter(|(vendor, _)| *vendor == self)
            .flat_map(|(_, caps)| caps.iter().copied())
            .collect();
        for (vendor, cap, since) in GATES {
            if *vendor == self && version >= *since {
                caps.insert(*cap);
            }
        }
        caps
    }
}

impl FromStr for Vendor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "sql92" | "ansi" => Ok(Self::Generic),
            "postgresql" | "postgres" | "pg" | "pgsql" => Ok(Self::PostgreSql),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "sqlserver" | "mssql" | "microsoft sql server" => Ok(Self::SqlServer),
            "oracle" => Ok(Self::Oracle),
            "derby" | "apache derby" => Ok(Self::Derby),
            "h2" => Ok(Self::H2),
            "db2" | "ibm db2" => Ok(Self::Db2),
            _ => Err(CoreError::UnknownVendor(s.to_string())),
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("Postgres".parse::<Vendor>().unwrap(), Vendor::PostgreSql);
        assert_eq!("MSSQL".parse::<Vendor>().unwrap(), Vendor::SqlServer);
        assert_eq!("mariadb".parse::<Vendor>().unwrap(), Vendor::MySql);
        assert!(matches!(
            "dbase".parse::<Vendor>(),
            Err(CoreError::UnknownVendor(_))
        ));
        for vendor in Vendor::ALL {
            assert_eq!(vendor.name().parse::<Vendor>().unwrap(), vendor);
        }
    }

    #[test]
    fn test_sql_server_gates() {
        let old = Vendor::SqlServer.capabilities(Version::new(10, 50, 0));
        assert!(!old.contains(&Sequences));
        assert!(!old.contains(&OffsetFetch));
        let new = Vendor::SqlServer.capabilities(Version::new(11, 0, 0));
        assert!(new.contains(&Sequences));
        assert!(new.contains(&OffsetFetch));
    }

    #[test]
    fn test_oracle_and_mysql_gates() {
        assert!(!Vendor::Oracle
            .capabilities(Version::new(11, 2, 0))
            .contains(&IdentityColumns));
        assert!(Vendor::Oracle
            .capabilities(Version::new(12, 1, 0))
            .contains(&IdentityColumns));
        assert!(!Vendor::MySql
            .capabilities(Version::new(8, 0, 15))
            .contains(&CheckInCreateStatements));
        assert!(Vendor::MySql
            .capabilities(Version::new(8, 0, 16))
            .contains(&CheckInCreateStatements));
    }
}
