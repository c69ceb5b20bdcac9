//! Reserved words: the SQL-92 base list plus vendor additions.

use std::collections::BTreeSet;

use super::vendor::Vendor;

/// SQL-92 reserved words.
pub const SQL92_RESERVED: &[&str] = &[
    "ABSOLUTE", "ACTION", "ADD", "ALL", "ALLOCATE", "ALTER", "AND", "ANY", "ARE", "AS", "ASC",
    "ASSERTION", "AT", "AUTHORIZATION", "AVG", "BEGIN", "BETWEEN", "BIT", "BIT_LENGTH", "BOTH",
    "BY", "CASCADE", "CASCADED", "CASE", "CAST", "CATALOG", "CHAR", "CHARACTER", "CHAR_LENGTH",
    "CHARACTER_LENGTH", "CHECK", "CLOSE", "COALESCE", "COLLATE", "COLLATION", "COLUMN", "COMMIT",
    "CONNECT", "CONNECTION", "CONSTRAINT", "CONSTRAINTS", "CONTINUE", "CONVERT", "CORRESPONDING",
    "COUNT", "CREATE", "CROSS", "CURRENT", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP",
    "CURRENT_USER", "CURSOR", "DATE", "DAY", "DEALLOCATE", "DEC", "DECIMAL", "DECLARE",
    "DEFAULT", "DEFERRABLE", "DEFERRED", "DELETE", "DESC", "DESCRIBE", "DESCRIPTOR",
    "DIAGNOSTICS", "DISCONNECT", "DISTINCT", "DOMAIN", "DOUBLE", "DROP", "ELSE", "END",
    "END-EXEC", "ESCAPE", "EXCEPT", "EXCEPTION", "EXEC", "EXECUTE", "EXISTS", "EXTERNAL",
    "EXTRACT", "FALSE", "FETCH", "FIRST", "FLOAT", "FOR", "FOREIGN", "FOUND", "FROM", "FULL",
    "GET", "GLOBAL", "GO", "GOTO", "GRANT", "GROUP", "HAVING", "HOUR", "IDENTITY", "IMMEDIATE",
    "IN", "INDICATOR", "INITIALLY", "INNER", "INPUT", "INSENSITIVE", "INSERT", "INT", "INTEGER",
    "INTERSECT", "INTERVAL", "INTO", "IS", "ISOLATION", "JOIN", "KEY", "LANGUAGE", "LAST",
    "LEADING", "LEFT", "LEVEL", "LIKE", "LOCAL", "LOWER", "MATCH", "MAX", "MIN", "MINUTE",
    "MODULE", "MONTH", "NAMES", "NATIONAL", "NATURAL", "NCHAR", "NEXT", "NO", "NOT", "NULL",
    "NULLIF", "NUMERIC", "OCTET_LENGTH", "OF", "ON", "ONLY", "OPEN", "OPTION", "OR", "ORDER",
    "OUTER", "OUTPUT", "OVERLAPS", "PAD", "PARTIAL", "POSITION", "PRECISION", "PREPARE",
    "PRESERVE", "PRIMARY", "PRIOR", "PRIVILEGES", "PROCEDURE", "PUBLIC", "READ", "REAL",
    "REFERENCES", "RELATIVE", "RESTRICT", "REVOKE", "RIGHT", "ROLLBACK", "ROWS", "SCHEMA",
    "SCROLL", "SECOND", "SECTION", "SELECT", "SESSION", "SESSION_USER", "SET", "SIZE",
    "SMALLINT", "SOME", "SPACE", "SQL", "SQLCODE", "SQLERROR", "SQLSTATE", "SUBSTRING", "SUM",
    "SYSTEM_USER", "TABLE", "TEMPORARY", "THEN", "TIME", "TIMESTAMP", "TIMEZONE_HOUR",
    "TIMEZONE_MINUTE", "TO", "TRAILING", "TRANSACTION", "TRANSLATE", "TRANSLATION", "TRIM",
    "TRUE", "UNION", "UNIQUE", "UNKNOWN", "UPDATE", "UPPER", "USAGE", "USER", "USING", "VALUE",
    "VALUES", "VARCHAR", "VARYING", "VIEW", "WHEN", "WHENEVER", "WHERE", "WITH", "WORK",
    "WRITE", "YEAR", "ZONE",
];

const POSTGRESQL_RESERVED: &[&str] = &[
    "ANALYSE", "ANALYZE", "ARRAY", "ASYMMETRIC", "CONCURRENTLY", "CURRENT_ROLE", "DO", "FREEZE",
    "ILIKE", "ISNULL", "LATERAL", "LIMIT", "LOCALTIME", "LOCALTIMESTAMP", "NOTNULL", "OFFSET",
    "PLACING", "RETURNING", "SIMILAR", "SYMMETRIC", "TABLESAMPLE", "VARIADIC", "VERBOSE",
    "WINDOW",
];

const MYSQL_RESERVED: &[&str] = &[
    "ACCESSIBLE", "BIGINT", "BINARY", "BLOB", "CHANGE", "DATABASE", "DATABASES", "DAY_HOUR",
    "DELAYED", "DIV", "DUAL", "ENCLOSED", "ESCAPED", "EXPLAIN", "FORCE", "FULLTEXT", "GROUPS",
    "HIGH_PRIORITY", "IF", "IGNORE", "INDEX", "INFILE", "KEYS", "KILL", "LIMIT", "LINES", "LOAD",
    "LOCK", "LONG", "LONGBLOB", "LONGTEXT", "LOOP", "MEDIUMINT", "MOD", "OPTIMIZE", "OPTIONALLY",
    "OUTFILE", "PURGE", "RANGE", "RANK", "REGEXP", "RENAME", "REPLACE", "REQUIRE", "RLIKE",
    "ROW", "SCHEMAS", "SEPARATOR", "SHOW", "SPATIAL", "STARTING", "STRAIGHT_JOIN", "TERMINATED",
    "TINYINT", "UNLOCK", "UNSIGNED", "USE", "ZEROFILL",
];

const SQLITE_RESERVED: &[&str] = &[
    "ABORT", "AUTOINCREMENT", "CONFLICT", "FAIL", "GLOB", "IF", "INDEX", "INDEXED", "ISNULL",
    "LIMIT", "NOTNULL", "OFFSET", "PLAN", "PRAGMA", "QUERY", "RAISE", "RECURSIVE", "REGEXP",
    "REINDEX", "RENAME", "REPLACE", "ROWID", "VACUUM", "VIRTUAL",
];

const SQLSERVER_RESERVED: &[&str] = &[
    "BACKUP", "BREAK", "BROWSE", "BULK", "CHECKPOINT", "CLUSTERED", "COMPUTE", "CONTAINS",
    "CONTAINSTABLE", "DATABASE", "DBCC", "DENY", "DISK", "DISTRIBUTED", "DUMP", "ERRLVL",
    "EXIT", "FILE", "FILLFACTOR", "FREETEXT", "HOLDLOCK", "IDENTITY_INSERT", "IDENTITYCOL",
    "IF", "INDEX", "KILL", "LINENO", "LOAD", "MERGE", "NOCHECK", "NONCLUSTERED", "OFF",
    "OFFSETS", "OPENDATASOURCE", "OPENQUERY", "OPENROWSET", "OPENXML", "OVER", "PERCENT",
    "PIVOT", "PLAN", "PRINT", "PROC", "RAISERROR", "READTEXT", "RECONFIGURE", "REPLICATION",
    "RETURN", "ROWCOUNT", "ROWGUIDCOL", "RULE", "SAVE", "SETUSER", "SHUTDOWN", "STATISTICS",
    "TEXTSIZE", "TOP", "TRAN", "TRIGGER", "TRUNCATE", "TSEQUAL", "UNPIVOT", "UPDATETEXT",
    "WAITFOR", "WHILE", "WRITETEXT",
];

const ORACLE_RESERVED: &[&str] = &[
    "ACCESS", "AUDIT", "CLUSTER", "COMMENT", "COMPRESS", "EXCLUSIVE", "FILE", "IDENTIFIED",
    "INCREMENT", "INDEX", "INITIAL", "LOCK", "LONG", "MAXEXTENTS", "MINUS", "MLSLABEL", "MODE",
    "MODIFY", "NOAUDIT", "NOCOMPRESS", "NOWAIT", "NUMBER", "OFFLINE", "ONLINE", "PCTFREE",
    "RAW", "RENAME", "RESOURCE", "ROW", "ROWID", "ROWNUM", "SHARE", "START", "SUCCESSFUL",
    "SYNONYM", "SYSDATE", "TRIGGER", "UID", "VALIDATE", "VARCHAR2",
];

const DERBY_RESERVED: &[&str] = &[
    "BIGINT", "BLOB", "BOOLEAN", "CALL", "CLOB", "CURRENT_ROLE", "EXPLAIN", "GROUPS", "LTRIM",
    "NONE", "OFFSET", "OVER", "RTRIM", "XML", "XMLEXISTS", "XMLPARSE", "XMLQUERY",
    "XMLSERIALIZE",
];

const H2_RESERVED: &[&str] = &[
    "ARRAY", "CURRENT_CATALOG", "CURRENT_SCHEMA", "GROUPS", "IF", "ILIKE", "LIMIT",
    "LOCALTIME", "LOCALTIMESTAMP", "MINUS", "OFFSET", "QUALIFY", "REGEXP", "ROW", "ROWNUM",
    "SYSDATE", "SYSTIME", "SYSTIMESTAMP", "TODAY", "TOP", "_ROWID_",
];

const DB2_RESERVED: &[&str] = &[
    "AFTER", "ALIAS", "BUFFERPOOL", "CALL", "CAPTURE", "CCSID", "CLUSTER", "COLLECTION",
    "COLLID", "CONCAT", "DATABASE", "DAYS", "DB2SQL", "EDITPROC", "ERASE", "EXPLAIN",
    "FENCED", "FIELDPROC", "HOURS", "IMPLICITLY", "INHERIT", "LOCKSIZE", "MICROSECONDS",
    "MINUTES", "MONTHS", "NUMPARTS", "OBID", "OPTIMIZATION", "PACKAGE", "PART", "PIECESIZE",
    "PLAN", "PRIQTY", "PROGRAM", "PSID", "QUERYNO", "SECONDS", "SECQTY", "STOGROUP", "SUBPAGES",
    "VALIDPROC", "VOLUMES", "WLM", "YEARS",
];

/// Returns the vendor-specific additions to the SQL-92 reserved words.
#[must_use]
pub const fn vendor_reserved(vendor: Vendor) -> &'static [&'static str] {
    match vendor {
        Vendor::Generic => &[],
        Vendor::PostgreSql => POSTGRESQL_RESERVED,
        Vendor::MySql => MYSQL_RESERVED,
        Vendor::Sqlite => SQLITE_RESERVED,
        Vendor::SqlServer => SQLSERVER_RESERVED,
        Vendor::Oracle => ORACLE_RESERVED,
        Vendor::Derby => DERBY_RESERVED,
        Vendor::H2 => H2_RESERVED,
        Vendor::Db2 => DB2_RESERVED,
    }
}

/// Builds the full upper-cased reserved-word set of a vendor.
#[must_use]
pub fn reserved_words(vendor: Vendor) -> BTreeSet<String> {
    SQL92_RESERVED
        .iter()
        .chain(vendor_reserved(vendor))
        .map(|word| word.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_words_everywhere() {
        for vendor in Vendor::ALL {
            let words = reserved_words(vendor);
            assert!(words.contains("SELECT"));
            assert!(words.contains("ORDER"));
        }
    }

    #[test]
    fn test_vendor_additions() {
        assert!(reserved_words(Vendor::MySql).contains("LIMIT"));
        assert!(!reserved_words(Vendor::Generic).contains("LIMIT"));
        assert!(reserved_words(Vendor::Oracle).contains("NUMBER"));
        assert!(reserved_words(Vendor::SqlServer).contains("TOP"));
    }
}
