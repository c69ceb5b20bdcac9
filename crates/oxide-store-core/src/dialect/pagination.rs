//! Row-range (pagination) clause rendering.

/// How a vendor expresses a row range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// No row-range syntax; the clause is always empty.
    Unsupported,
    /// `LIMIT n OFFSET m`.
    LimitOffset {
        /// Count substituted when only an offset is given; `None` emits a
        /// bare `OFFSET m`.
        unbounded: Option<&'static str>,
    },
    /// `LIMIT m,n`.
    CommaLimit {
        /// Count substituted when only an offset is given.
        unbounded: &'static str,
    },
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`.
    OffsetFetch {
        /// A count without an offset still needs `OFFSET 0 ROWS`.
        require_offset: bool,
        /// The clause is only valid after an `ORDER BY`.
        require_ordering: bool,
    },
    /// `FETCH FIRST n ROWS ONLY`; offsets cannot be expressed.
    FetchFirst,
}

impl PaginationStyle {
    /// Renders the clause for `offset` and `count`.
    ///
    /// Non-positive values mean "not given". The returned clause has no
    /// leading space and is empty when nothing needs to be emitted.
    #[must_use]
    pub fn clause(&self, offset: i64, count: i64, has_ordering: bool) -> String {
        let offset = offset.max(0);
        let count = count.max(0);
        if offset == 0 && count == 0 {
            return String::new();
        }
        match self {
            Self::Unsupported => String::new(),
            Self::LimitOffset { unbounded } => match (offset > 0, count > 0) {
                (true, true) => format!("LIMIT {count} OFFSET {offset}"),
                (false, _) => format!("LIMIT {count}"),
                (true, false) => unbounded.map_or_else(
                    || format!("OFFSET {offset}"),
                    |all| format!("LIMIT {all} OFFSET {offset}"),
                ),
            },
            Self::CommaLimit { unbounded } => match (offset > 0, count > 0) {
                (true, true) => format!("LIMIT {offset},{count}"),
                (false, _) => format!("LIMIT {count}"),
                (true, false) => format!("LIMIT {offset},{unbounded}"),
            },
            Self::OffsetFetch {
                require_offset,
                require_ordering,
            } => {
                let body = match (offset > 0, count > 0) {
                    (true, true) => {
                        format!("OFFSET {offset} ROWS FETCH NEXT {count} ROWS ONLY")
                    }
                    (false, _) if *require_offset => {
                        format!("OFFSET 0 ROWS FETCH NEXT {count} ROWS ONLY")
                    }
                    (false, _) => format!("FETCH FIRST {count} ROWS ONLY"),
                    (true, false) => format!("OFFSET {offset} ROWS"),
                };
                if *require_ordering && !has_ordering {
                    format!("ORDER BY (SELECT NULL) {body}")
                } else {
                    body
                }
            }
            Self::FetchFirst => {
                if offset == 0 {
                    format!("FETCH FIRST {count} ROWS ONLY")
                } else {
                    String::new()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTGRES: PaginationStyle = PaginationStyle::LimitOffset { unbounded: None };
    const SQLITE: PaginationStyle = PaginationStyle::LimitOffset {
        unbounded: Some("-1"),
    };
    const MYSQL: PaginationStyle = PaginationStyle::CommaLimit {
        unbounded: "18446744073709551615",
    };
    const MSSQL: PaginationStyle = PaginationStyle::OffsetFetch {
        require_offset: true,
        require_ordering: true,
    };
    const ORACLE: PaginationStyle = PaginationStyle::OffsetFetch {
        require_offset: false,
        require_ordering: false,
    };

    #[test]
    fn test_offset_and_count() {
        assert_eq!(POSTGRES.clause(10, 5, true), "LIMIT 5 OFFSET 10");
        assert_eq!(MYSQL.clause(10, 5, true), "LIMIT 10,5");
        assert_eq!(
            ORACLE.clause(10, 5, true),
            "OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn test_count_only() {
        assert_eq!(POSTGRES.clause(0, 5, false), "LIMIT 5");
        assert_eq!(ORACLE.clause(-1, 5, false), "FETCH FIRST 5 ROWS ONLY");
        assert_eq!(
            MSSQL.clause(0, 5, true),
            "OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
        );
        assert_eq!(PaginationStyle::FetchFirst.clause(0, 3, false), "FETCH FIRST 3 ROWS ONLY");
    }

    #[test]
    fn test_offset_only_uses_unbounded_count() {
        assert_eq!(SQLITE.clause(10, 0, false), "LIMIT -1 OFFSET 10");
        assert_eq!(POSTGRES.clause(10, -1, false), "OFFSET 10");
        assert_eq!(MYSQL.clause(10, 0, false), "LIMIT 10,18446744073709551615");
        assert_eq!(ORACLE.clause(10, 0, false), "OFFSET 10 ROWS");
        assert_eq!(PaginationStyle::FetchFirst.clause(10, 0, false), "");
    }

    #[test]
    fn test_ordering_requirement() {
        assert_eq!(
            MSSQL.clause(10, 5, false),
            "ORDER BY (SELECT NULL) OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn test_nothing_requested_is_empty() {
        for style in [POSTGRES, SQLITE, MYSQL, MSSQL, ORACLE, PaginationStyle::FetchFirst] {
            assert_eq!(style.clause(0, 0, false), "");
            assert_eq!(style.clause(-3, -1, true), "");
        }
        assert_eq!(PaginationStyle::Unsupported.clause(10, 5, true), "");
    }
}
