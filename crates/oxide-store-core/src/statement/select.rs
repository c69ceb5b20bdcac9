//! SELECT statement assembly.
//!
//! A [`SelectStatement`] keeps typed expressions and renders them against a
//! [`DialectProfile`] on demand, so the same statement yields both the
//! locked and the unlocked SQL text for a fetch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SqlText;
use crate::dialect::{Capability, DialectProfile, IdentifierKind, LockStyle};
use crate::error::{CoreError, Result};
use crate::expr::{render_condition, ExprCategory, SqlExpression};

/// A table reference with its alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlTable {
    /// Table name as declared.
    pub name: String,
    /// Alias used in the statement.
    pub alias: String,
}

impl SqlTable {
    /// Creates a table reference.
    #[must_use]
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }
}

/// Join flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    LeftOuter,
}

impl JoinType {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
        }
    }
}

/// A joined table and its ON conjunction.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinType,
    pub table: SqlTable,
    pub on: Vec<SqlExpression>,
}

/// Placement of NULLs in an ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    First,
    Last,
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expr: SqlExpression,
    pub descending: bool,
    pub nulls: Option<NullOrdering>,
}

/// A SELECT over a primary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    table: SqlTable,
    joins: Vec<Join>,
    distinct: bool,
    projection: Vec<SqlExpression>,
    conditions: Vec<SqlExpression>,
    group_by: Vec<SqlExpression>,
    having: Vec<SqlExpression>,
    ordering: Vec<OrderItem>,
    offset: i64,
    count: i64,
    next_alias: usize,
}

impl SelectStatement {
    /// Creates a statement over `table`, aliased `A0`.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self::from_table(SqlTable::new(table, "A0"))
    }

    /// Creates a statement over an already aliased table.
    #[must_use]
    pub const fn from_table(table: SqlTable) -> Self {
        Self {
            table,
            joins: Vec::new(),
            distinct: false,
            projection: Vec::new(),
            conditions: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            ordering: Vec::new(),
            offset: 0,
            count: 0,
            next_alias: 1,
        }
    }

    /// Primary table.
    #[must_use]
    pub const fn table(&self) -> &SqlTable {
        &self.table
    }

    /// Allocates a fresh alias for `name` without joining it.
    pub fn new_table_alias(&mut self, name: impl Into<String>) -> SqlTable {
        let alias = format!("A{}", self.next_alias);
        self.next_alias += 1;
        SqlTable::new(name, alias)
    }

    /// Joins `table` on the conjunction of `on`.
    pub fn join(&mut self, kind: JoinType, table: SqlTable, on: Vec<SqlExpression>) {
        self.joins.push(Join { kind, table, on });
    }

    /// Returns the first joined reference to `name`.
    #[must_use]
    pub fn joined(&self, name: &str) -> Option<&SqlTable> {
        self.joins
            .iter()
            .map(|join| &join.table)
            .find(|table| table.name.eq_ignore_ascii_case(name))
    }

    /// Sets `SELECT DISTINCT`.
    pub fn set_distinct(&mut self, distinct: bool) {
        self.distinct = distinct;
    }

    /// Adds `expr` to the projection and returns its 1-based result
    /// position. Selecting an expression twice returns the first position.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMethodCall`] for map-valued expressions,
    /// which have no single result column.
    pub fn select(&mut self, expr: SqlExpression) -> Result<usize> {
        if expr.category == ExprCategory::Map {
            return Err(CoreError::invalid_call(
                "select",
                "map members cannot be projected",
            ));
        }
        if let Some(existing) = self.projection.iter().position(|p| *p == expr) {
            return Ok(existing + 1);
        }
        self.projection.push(expr);
        Ok(self.projection.len())
    }

    /// Number of projected expressions.
    #[must_use]
    pub fn projection_len(&self) -> usize {
        self.projection.len()
    }

    /// ANDs `condition` into the WHERE clause.
    pub fn where_and(&mut self, condition: SqlExpression) {
        self.conditions.push(condition);
    }

    pub fn group_by(&mut self, expr: SqlExpression) {
        self.group_by.push(expr);
    }

    /// ANDs `condition` into the HAVING clause.
    pub fn having(&mut self, condition: SqlExpression) {
        self.having.push(condition);
    }

    /// Appends an ORDER BY item.
    pub fn order_by(&mut self, expr: SqlExpression, descending: bool, nulls: Option<NullOrdering>) {
        self.ordering.push(OrderItem {
            expr,
            descending,
            nulls,
        });
    }

    /// Restricts the result to `count` rows after skipping `offset`.
    /// Non-positive values mean "no bound".
    pub fn set_range(&mut self, offset: i64, count: i64) {
        self.offset = offset;
        self.count = count;
    }

    #[must_use]
    pub fn has_ordering(&self) -> bool {
        !self.ordering.is_empty()
    }

    /// Renders the statement, with row locking when `locked`.
    #[must_use]
    pub fn render(&self, profile: &DialectProfile, locked: bool) -> SqlText {
        let mut out = SqlText::new();
        self.render_into(profile, locked, &mut out);
        debug!(vendor = %profile.vendor(), locked, sql = %out.sql, "rendered select");
        out
    }

    /// Renders the statement into `out`.
    pub fn render_into(&self, profile: &DialectProfile, locked: bool, out: &mut SqlText) {
        let lock = if locked { profile.lock_style() } else { LockStyle::None };

        out.push_str("SELECT ");
        if self.distinct {
            out.push_str("DISTINCT ");
        }
        if self.projection.is_empty() {
            out.push_str("1");
        }
        for (i, expr) in self.projection.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            expr.render(profile, out);
        }

        out.push_str(" FROM ");
        push_table(&self.table, profile, out);
        if lock == LockStyle::TableHint {
            out.push_str(" WITH (UPDLOCK, ROWLOCK)");
        }

        for join in &self.joins {
            out.push_str(" ");
            out.push_str(join.kind.as_sql());
            out.push_str(" ");
            push_table(&join.table, profile, out);
            if !join.on.is_empty() {
                out.push_str(" ON ");
                push_conjunction(&join.on, profile, out);
            }
        }

        if !self.conditions.is_empty() {
            out.push_str(" WHERE ");
            push_conjunction(&self.conditions, profile, out);
        }

        if !self.group_by.is_empty() {
            out.push_str(" GROUP BY ");
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                expr.render(profile, out);
            }
        }

        if !self.having.is_empty() {
            out.push_str(" HAVING ");
            push_conjunction(&self.having, profile, out);
        }

        if !self.ordering.is_empty() {
            out.push_str(" ORDER BY ");
            let nulls_ordering = profile.supports(Capability::NullsOrdering);
            for (i, item) in self.ordering.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                item.expr.render(profile, out);
                if item.descending {
                    out.push_str(" DESC");
                }
                match item.nulls {
                    Some(NullOrdering::First) if nulls_ordering => out.push_str(" NULLS FIRST"),
                    Some(NullOrdering::Last) if nulls_ordering => out.push_str(" NULLS LAST"),
                    _ => {}
                }
            }
        }

        let range = profile.pagination_clause(self.offset, self.count, self.has_ordering());
        if !range.is_empty() {
            out.push_str(" ");
            out.push_str(&range);
        }

        match lock {
            LockStyle::ForUpdate => out.push_str(" FOR UPDATE"),
            LockStyle::ForUpdateWithRs => out.push_str(" FOR UPDATE WITH RS"),
            LockStyle::TableHint | LockStyle::None => {}
        }
    }
}

fn push_table(table: &SqlTable, profile: &DialectProfile, out: &mut SqlText) {
    out.push_str(&profile.format_identifier(&table.name, IdentifierKind::Table));
    out.push_str(" ");
    out.push_str(&table.alias);
}

fn push_conjunction(conditions: &[SqlExpression], profile: &DialectProfile, out: &mut SqlText) {
    for (i, condition) in conditions.iter().enumerate() {
        if i > 0 {
            out.push_str(" AND ");
        }
        render_condition(condition, profile, out);
    }
}
