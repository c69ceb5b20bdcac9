//! Sequence DDL and next-value expressions.

use serde::{Deserialize, Serialize};

use super::vendor::Vendor;
use crate::error::{CoreError, Result};

/// Options of a `CREATE SEQUENCE` statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceOptions {
    /// Sequence name; mandatory.
    pub name: Option<String>,
    /// Minimum value.
    pub min: Option<i64>,
    /// Maximum value.
    pub max: Option<i64>,
    /// Start value.
    pub start: Option<i64>,
    /// Increment.
    pub increment: Option<i64>,
    /// Number of values cached by the server.
    pub cache: Option<i64>,
}

impl SequenceOptions {
    /// Creates options for a named sequence.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One clause of a `CREATE SEQUENCE` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceClause {
    /// `MINVALUE n`.
    Min,
    /// `MAXVALUE n`.
    Max,
    /// `START WITH n`.
    Start,
    /// `INCREMENT BY n`.
    Increment,
    /// `CACHE n`.
    Cache,
}

/// How the next value of a sequence is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextValueForm {
    /// `nextval('seq')`.
    NextvalFunction,
    /// `seq.NEXTVAL`.
    Pseudocolumn,
    /// `NEXT VALUE FOR seq`.
    NextValueFor,
}

/// Vendor sequence syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSyntax {
    /// Data type clause placed after the name.
    pub data_type: Option<&'static str>,
    /// Order in which clauses are emitted.
    pub order: &'static [SequenceClause],
    /// Emitted when no minimum is given; silent when `None`.
    pub no_min: Option<&'static str>,
    /// Emitted when no maximum is given; silent when `None`.
    pub no_max: Option<&'static str>,
    /// Emitted when no cache size is given; silent when `None`.
    pub no_cache: Option<&'static str>,
    /// Whether an explicit cache size is accepted.
    pub cache_allowed: bool,
    /// Appended to `DROP SEQUENCE name`.
    pub drop_suffix: Option<&'static str>,
    /// Next-value form.
    pub next_value: NextValueForm,
    /// Text placed before and after the next-value expression to read it
    /// as a standalone statement.
    pub next_value_query: (&'static str, &'static str),
}

use SequenceClause::{Cache, Increment, Max, Min, Start};

const POSTGRESQL: SequenceSyntax = SequenceSyntax {
    data_type: None,
    order: &[Increment, Min, Max, Start, Cache],
    no_min: None,
    no_max: None,
    no_cache: None,
    cache_allowed: true,
    drop_suffix: None,
    next_value: NextValueForm::NextvalFunction,
    next_value_query: ("SELECT ", ""),
};

const ORACLE: SequenceSyntax = SequenceSyntax {
    data_type: None,
    order: &[Start, Increment, Min, Max, Cache],
    no_min: Some("NOMINVALUE"),
    no_max: Some("NOMAXVALUE"),
    no_cache: Some("NOCACHE"),
    cache_allowed: true,
    drop_suffix: None,
    next_value: NextValueForm::Pseudocolumn,
    next_value_query: ("SELECT ", " FROM DUAL"),
};

const DB2: SequenceSyntax = SequenceSyntax {
    data_type: None,
    order: &[Start, Increment, Min, Max, Cache],
    no_min: Some("NO MINVALUE"),
    no_max: Some("NO MAXVALUE"),
    no_cache: Some("NO CACHE"),
    cache_allowed: true,
    drop_suffix: None,
    next_value: NextValueForm::NextValueFor,
    next_value_query: ("VALUES ", ""),
};

const DERBY: SequenceSyntax = SequenceSyntax {
    data_type: Some("AS BIGINT"),
    order: &[Start, Increment, Max, Min],
    no_min: None,
    no_max: None,
    no_cache: None,
    cache_allowed: false,
    drop_suffix: Some("RESTRICT"),
    next_value: NextValueForm::NextValueFor,
    next_value_query: ("VALUES ", ""),
};

const SQLSERVER: SequenceSyntax = SequenceSyntax {
    data_type: Some("AS BIGINT"),
    order: &[Start, Increment, Min, Max, Cache],
    no_min: Some("NO MINVALUE"),
    no_max: Some("NO MAXVALUE"),
    no_cache: Some("NO CACHE"),
    cache_allowed: true,
    drop_suffix: None,
    next_value: NextValueForm::NextValueFor,
    next_value_query: ("SELECT ", ""),
};

const H2: SequenceSyntax = SequenceSyntax {
    data_type: None,
    order: &[Start, Increment, Min, Max, Cache],
    no_min: None,
    no_max: None,
    no_cache: None,
    cache_allowed: true,
    drop_suffix: None,
    next_value: NextValueForm::NextValueFor,
    next_value_query: ("SELECT ", ""),
};

const STANDARD: SequenceSyntax = SequenceSyntax {
    data_type: None,
    order: &[Start, Increment, Min, Max],
    no_min: Some("NO MINVALUE"),
    no_max: Some("NO MAXVALUE"),
    no_cache: None,
    cache_allowed: false,
    drop_suffix: Some("RESTRICT"),
    next_value: NextValueForm::NextValueFor,
    next_value_query: ("VALUES ", ""),
};

impl SequenceSyntax {
    /// Returns the sequence syntax of a vendor, if it has one.
    #[must_use]
    pub const fn for_vendor(vendor: Vendor) -> Option<Self> {
        match vendor {
            Vendor::PostgreSql => Some(POSTGRESQL),
            Vendor::Oracle => Some(ORACLE),
            Vendor::Db2 => Some(DB2),
            Vendor::Derby => Some(DERBY),
            Vendor::SqlServer => Some(SQLSERVER),
            Vendor::H2 => Some(H2),
            Vendor::Generic => Some(STANDARD),
            Vendor::MySql | Vendor::Sqlite => None,
        }
    }

    /// Renders `CREATE SEQUENCE` for an already formatted name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unsupported`] when a cache size is given to a
    /// vendor that rejects one.
    pub fn create(&self, vendor: Vendor, name: &str, options: &SequenceOptions) -> Result<String> {
        let mut sql = format!("CREATE SEQUENCE {name}");
        if let Some(data_type) = self.data_type {
            sql.push(' ');
            sql.push_str(data_type);
        }
        for clause in self.order {
            let rendered = match clause {
                Start => options.start.map(|n| format!("START WITH {n}")),
                Increment => options.increment.map(|n| format!("INCREMENT BY {n}")),
                Min => options
                    .min
                    .map(|n| format!("MINVALUE {n}"))
                    .or_else(|| self.no_min.map(String::from)),
                Max => options
                    .max
                    .map(|n| format!("MAXVALUE {n}"))
                    .or_else(|| self.no_max.map(String::from)),
                Cache => match options.cache {
                    Some(n) if self.cache_allowed => Some(format!("CACHE {n}")),
                    Some(_) => {
                        return Err(CoreError::unsupported(vendor.name(), "sequence CACHE size"))
                    }
                    None => self.no_cache.map(String::from),
                },
            };
            if let Some(rendered) = rendered {
                sql.push(' ');
                sql.push_str(&rendered);
            }
        }
        if options.cache.is_some() && !self.order.contains(&Cache) {
            return Err(CoreError::unsupported(vendor.name(), "sequence CACHE size"));
        }
        Ok(sql)
    }

    /// Renders `DROP SEQUENCE` for an already formatted name.
    #[must_use]
    pub fn drop(&self, name: &str) -> String {
        self.drop_suffix.map_or_else(
            || format!("DROP SEQUENCE {name}"),
            |suffix| format!("DROP SEQUENCE {name} {suffix}"),
        )
    }

    /// Renders the next-value expression for an already formatted name.
    #[must_use]
    pub fn next_value_expression(&self, name: &str) -> String {
        match self.next_value {
            NextValueForm::NextvalFunction => format!("nextval('{}')", name.replace('\'', "''")),
            NextValueForm::Pseudocolumn => format!("{name}.NEXTVAL"),
            NextValueForm::NextValueFor => format!("NEXT VALUE FOR {name}"),
        }
    }

    /// Renders a standalone statement reading the next value.
    #[must_use]
    pub fn next_value_statement(&self, name: &str) -> String {
        let (before, after) = self.next_value_query;
        format!("{before}{}{after}", self.next_value_expression(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> SequenceOptions {
        SequenceOptions {
            name: Some(String::from("ORDER_SEQ")),
            min: Some(1),
            max: Some(1000),
            start: Some(10),
            increment: Some(5),
            cache: Some(20),
        }
    }

    #[test]
    fn test_postgres_order() {
        let sql = POSTGRESQL
            .create(Vendor::PostgreSql, "order_seq", &full())
            .unwrap();
        assert_eq!(
            sql,
            "CREATE SEQUENCE order_seq INCREMENT BY 5 MINVALUE 1 MAXVALUE 1000 START WITH 10 CACHE 20"
        );
    }

    #[test]
    fn test_missing_bounds_defaulting() {
        let opts = SequenceOptions::named("S");
        assert_eq!(
            ORACLE.create(Vendor::Oracle, "S", &opts).unwrap(),
            "CREATE SEQUENCE S NOMINVALUE NOMAXVALUE NOCACHE"
        );
        assert_eq!(
            DB2.create(Vendor::Db2, "S", &opts).unwrap(),
            "CREATE SEQUENCE S NO MINVALUE NO MAXVALUE NO CACHE"
        );
        assert_eq!(
            POSTGRESQL.create(Vendor::PostgreSql, "s", &opts).unwrap(),
            "CREATE SEQUENCE s"
        );
    }

    #[test]
    fn test_derby_rejects_cache() {
        let err = DERBY.create(Vendor::Derby, "S", &full()).unwrap_err();
        assert!(matches!(err, CoreError::Unsupported { vendor: "derby", .. }));
        let mut opts = full();
        opts.cache = None;
        assert_eq!(
            DERBY.create(Vendor::Derby, "S", &opts).unwrap(),
            "CREATE SEQUENCE S AS BIGINT START WITH 10 INCREMENT BY 5 MAXVALUE 1000 MINVALUE 1"
        );
        assert_eq!(DERBY.drop("S"), "DROP SEQUENCE S RESTRICT");
    }

    #[test]
    fn test_next_value_forms() {
        assert_eq!(
            POSTGRESQL.next_value_statement("order_seq"),
            "SELECT nextval('order_seq')"
        );
        assert_eq!(ORACLE.next_value_statement("S"), "SELECT S.NEXTVAL FROM DUAL");
        assert_eq!(SQLSERVER.next_value_expression("S"), "NEXT VALUE FOR S");
        assert!(SequenceSyntax::for_vendor(Vendor::MySql).is_none());
    }
}
