//! Typed SQL expression tree.
//!
//! Expressions carry a category, a logical type and the table they read
//! from. SQL text is produced lazily by [`SqlExpression::render`] against a
//! dialect profile, so one expression tree can be rendered for any vendor.
//! Composite expressions (string functions, aggregates, map predicates)
//! are built by invoking a named method through the profile's
//! [`MethodRegistry`](crate::dialect::MethodRegistry).

mod aggregate;
mod context;
mod functions;
mod map;

use core::fmt;

pub use aggregate::{AggregateMethod, AggregateResult};
pub use context::{ClauseKind, CompileContext};
pub use functions::{LengthMethod, LikeMethod, TemplateMethod, TemplateOperation};
pub use map::{MapBinding, MapContainsKey, MapIsEmpty, MapSize};

pub(crate) use functions::{base_methods, base_operations, vendor_methods, vendor_operations};

use crate::dialect::{Capability, DialectProfile, IdentifierKind};
use crate::error::{CoreError, Result};
use crate::statement::{BoundParameter, MappingKey, SelectStatement, SqlTable, SqlText};
use crate::value::{SqlValue, ToSqlValue};

/// Broad type family of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExprCategory {
    /// Integer, floating point and decimal values.
    Numeric,
    /// Character data.
    String,
    /// Dates, times and timestamps.
    Temporal,
    /// Boolean values and predicates.
    Boolean,
    /// Map-valued members stored in a join table.
    Map,
    /// Anything else (binary, uuid, json, references).
    Object,
}

impl ExprCategory {
    /// Returns the category of a logical type.
    #[must_use]
    pub fn for_logical_type(logical_type: &str) -> Self {
        match logical_type {
            "bool" => Self::Boolean,
            "i8" | "i16" | "i32" | "i64" | "f32" | "f64" | "decimal" => Self::Numeric,
            "string" | "char" | "text" => Self::String,
            "date" | "time" | "timestamp" => Self::Temporal,
            "map" => Self::Map,
            _ => Self::Object,
        }
    }

    /// Returns a lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::String => "string",
            Self::Temporal => "temporal",
            Self::Boolean => "boolean",
            Self::Map => "map",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ExprCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Like,
}

impl BinaryOp {
    /// Returns the SQL operator.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Like => "LIKE",
        }
    }

    const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::Like => 3,
            Self::Add | Self::Sub => 4,
            Self::Mul | Self::Div => 5,
        }
    }

    const fn is_associative(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Column of the expression's table.
    Column(String),
    /// Inlined literal.
    Literal(SqlValue),
    /// NULL literal.
    Null,
    /// `?` placeholder.
    Parameter(BoundParameter),
    /// `NAME(arg, ...)`.
    Function {
        /// Function name.
        name: String,
        /// Arguments.
        args: Vec<SqlExpression>,
    },
    /// Text with `{n}` slots filled by rendered arguments.
    Template {
        /// Template text.
        template: &'static str,
        /// Arguments by slot number.
        args: Vec<SqlExpression>,
    },
    /// `left op right`.
    Binary {
        /// Left operand.
        left: Box<SqlExpression>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<SqlExpression>,
    },
    /// `NOT (expr)`.
    Not(Box<SqlExpression>),
    /// `expr IS [NOT] NULL`.
    IsNull {
        /// Tested expression.
        operand: Box<SqlExpression>,
        /// `IS NOT NULL` when set.
        negated: bool,
    },
    /// `expr [NOT] IN (...)`.
    InList {
        /// Tested expression.
        operand: Box<SqlExpression>,
        /// Candidate values.
        list: Vec<SqlExpression>,
        /// `NOT IN` when set.
        negated: bool,
    },
    /// `FUNC(arg)` aggregate.
    Aggregate {
        /// Aggregate function name.
        function: &'static str,
        /// Aggregated expression.
        arg: Box<SqlExpression>,
    },
    /// Scalar subquery.
    Subquery(Box<SelectStatement>),
    /// `[NOT] EXISTS (subquery)`.
    Exists {
        /// Subquery.
        query: Box<SelectStatement>,
        /// `NOT EXISTS` when set.
        negated: bool,
    },
    /// Verbatim SQL.
    Raw(String),
    /// Map member stored in a join table.
    Map(MapBinding),
}

/// A typed SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlExpression {
    /// Type family.
    pub category: ExprCategory,
    /// Logical type of the value.
    pub logical_type: String,
    /// Table (and alias) the expression reads from.
    pub table: Option<SqlTable>,
    /// Node kind.
    pub kind: ExprKind,
}

impl SqlExpression {
    fn typed(category: ExprCategory, logical_type: impl Into<String>, kind: ExprKind) -> Self {
        Self {
            category,
            logical_type: logical_type.into(),
            table: None,
            kind,
        }
    }

    /// A column of `table`.
    #[must_use]
    pub fn column(table: &SqlTable, name: impl Into<String>, logical_type: &str) -> Self {
        Self {
            category: ExprCategory::for_logical_type(logical_type),
            logical_type: logical_type.to_string(),
            table: Some(table.clone()),
            kind: ExprKind::Column(name.into()),
        }
    }

    /// An inlined literal.
    #[must_use]
    pub fn literal(value: impl ToSqlValue) -> Self {
        let value = value.to_sql_value();
        let logical_type = match &value {
            SqlValue::Null => return Self::null(),
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "i64",
            SqlValue::Float(_) => "f64",
            SqlValue::Text(_) => "string",
            SqlValue::Blob(_) => "bytes",
            SqlValue::Date(_) => "date",
            SqlValue::Timestamp(_) => "timestamp",
            SqlValue::Uuid(_) => "uuid",
        };
        Self::typed(
            ExprCategory::for_logical_type(logical_type),
            logical_type,
            ExprKind::Literal(value),
        )
    }

    /// The NULL literal.
    #[must_use]
    pub fn null() -> Self {
        Self::typed(ExprCategory::Object, "", ExprKind::Null)
    }

    /// A placeholder whose value is supplied per execution.
    #[must_use]
    pub fn parameter(key: MappingKey, column: usize, logical_type: &str) -> Self {
        Self::typed(
            ExprCategory::for_logical_type(logical_type),
            logical_type,
            ExprKind::Parameter(BoundParameter::deferred(key, column)),
        )
    }

    /// A placeholder with a value fixed at compile time.
    #[must_use]
    pub fn fixed_parameter(key: MappingKey, value: impl ToSqlValue) -> Self {
        let literal = Self::literal(value);
        let Self {
            category,
            logical_type,
            kind,
            ..
        } = literal;
        let value = match kind {
            ExprKind::Literal(value) => value,
            _ => SqlValue::Null,
        };
        Self::typed(
            category,
            logical_type,
            ExprKind::Parameter(BoundParameter::fixed(key, value)),
        )
    }

    /// Verbatim SQL.
    #[must_use]
    pub fn raw(sql: impl Into<String>, logical_type: &str) -> Self {
        Self::typed(
            ExprCategory::for_logical_type(logical_type),
            logical_type,
            ExprKind::Raw(sql.into()),
        )
    }

    /// `NAME(args)`.
    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Self>, logical_type: &str) -> Self {
        Self::typed(
            ExprCategory::for_logical_type(logical_type),
            logical_type,
            ExprKind::Function {
                name: name.into(),
                args,
            },
        )
    }

    /// A template with `{n}` argument slots.
    #[must_use]
    pub fn template(
        template: &'static str,
        args: Vec<Self>,
        category: ExprCategory,
        logical_type: &str,
    ) -> Self {
        let table = args.iter().find_map(|arg| arg.table.clone());
        Self {
            table,
            ..Self::typed(category, logical_type, ExprKind::Template { template, args })
        }
    }

    /// A map member.
    #[must_use]
    pub fn map(binding: MapBinding) -> Self {
        Self {
            table: Some(binding.owner.clone()),
            ..Self::typed(ExprCategory::Map, "map", ExprKind::Map(binding))
        }
    }

    /// A scalar subquery.
    #[must_use]
    pub fn subquery(query: SelectStatement, category: ExprCategory, logical_type: &str) -> Self {
        Self::typed(category, logical_type, ExprKind::Subquery(Box::new(query)))
    }

    /// `EXISTS (query)`, or `NOT EXISTS` when `negated`.
    #[must_use]
    pub fn exists(query: SelectStatement, negated: bool) -> Self {
        Self::typed(
            ExprCategory::Boolean,
            "bool",
            ExprKind::Exists {
                query: Box::new(query),
                negated,
            },
        )
    }

    /// Returns whether this is the NULL literal.
    #[must_use]
    pub const fn is_null_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Null | ExprKind::Literal(SqlValue::Null))
    }

    fn binary(self, op: BinaryOp, right: Self, category: ExprCategory, logical_type: &str) -> Self {
        let table = self.table.clone().or_else(|| right.table.clone());
        Self {
            table,
            ..Self::typed(
                category,
                logical_type,
                ExprKind::Binary {
                    left: Box::new(self),
                    op,
                    right: Box::new(right),
                },
            )
        }
    }

    fn invalid_comparison(&self, op: BinaryOp, other: &Self) -> CoreError {
        CoreError::InvalidComparison {
            left: self.category.to_string(),
            op: op.as_sql(),
            right: other.category.to_string(),
        }
    }

    fn comparable(&self, other: &Self) -> bool {
        let loose = |e: &Self| {
            e.category == ExprCategory::Object
                || matches!(e.kind, ExprKind::Parameter(_) | ExprKind::Null)
        };
        self.category == other.category || loose(self) || loose(other)
    }

    fn compare(self, op: BinaryOp, other: Self, ctx: &CompileContext<'_>) -> Result<Self> {
        if self.category == ExprCategory::Map || other.category == ExprCategory::Map {
            let (map, rhs) = if self.category == ExprCategory::Map {
                (self, other)
            } else {
                (other, self)
            };
            if rhs.is_null_literal() {
                match op {
                    BinaryOp::Eq => return map.invoke(ctx, "isEmpty", Vec::new()),
                    BinaryOp::Ne => return Ok(map.invoke(ctx, "isEmpty", Vec::new())?.negate()),
                    _ => {}
                }
            }
            return Err(map.invalid_comparison(op, &rhs));
        }
        let (left, right) = if self.is_null_literal() && !other.is_null_literal() {
            (other, self)
        } else {
            (self, other)
        };
        if right.is_null_literal() {
            return match op {
                BinaryOp::Eq => Ok(left.is_null()),
                BinaryOp::Ne => Ok(left.is_not_null()),
                _ => Err(left.invalid_comparison(op, &right)),
            };
        }
        if !left.comparable(&right) {
            return Err(left.invalid_comparison(op, &right));
        }
        Ok(left.binary(op, right, ExprCategory::Boolean, "bool"))
    }

    /// `self = other`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidComparison`] for incompatible operands.
    pub fn eq(self, other: Self, ctx: &CompileContext<'_>) -> Result<Self> {
        self.compare(BinaryOp::Eq, other, ctx)
    }

    /// `self <> other`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidComparison`] for incompatible operands.
    pub fn ne(self, other: Self, ctx: &CompileContext<'_>) -> Result<Self> {
        self.compare(BinaryOp::Ne, other, ctx)
    }

    /// `self < other`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidComparison`] for incompatible operands.
    pub fn lt(self, other: Self, ctx: &CompileContext<'_>) -> Result<Self> {
        self.compare(BinaryOp::Lt, other, ctx)
    }

    /// `self <= other`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidComparison`] for incompatible operands.
    pub fn le(self, other: Self, ctx: &CompileContext<'_>) -> Result<Self> {
        self.compare(BinaryOp::Le, other, ctx)
    }

    /// `self > other`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidComparison`] for incompatible operands.
    pub fn gt(self, other: Self, ctx: &CompileContext<'_>) -> Result<Self> {
        self.compare(BinaryOp::Gt, other, ctx)
    }

    /// `self >= other`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidComparison`] for incompatible operands.
    pub fn ge(self, other: Self, ctx: &CompileContext<'_>) -> Result<Self> {
        self.compare(BinaryOp::Ge, other, ctx)
    }

    /// `self LIKE pattern`.
    #[must_use]
    pub fn like(self, pattern: Self) -> Self {
        self.binary(BinaryOp::Like, pattern, ExprCategory::Boolean, "bool")
    }

    /// Arithmetic on two numeric expressions.
    #[must_use]
    pub fn arithmetic(self, op: BinaryOp, other: Self) -> Self {
        let logical = self.logical_type.clone();
        self.binary(op, other, ExprCategory::Numeric, &logical)
    }

    /// `self AND other`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.binary(BinaryOp::And, other, ExprCategory::Boolean, "bool")
    }

    /// `self OR other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        self.binary(BinaryOp::Or, other, ExprCategory::Boolean, "bool")
    }

    /// Logical negation. Negating `EXISTS` or `IS NULL` flips the node.
    #[must_use]
    pub fn negate(self) -> Self {
        let table = self.table.clone();
        let kind = match self.kind {
            ExprKind::Exists { query, negated } => ExprKind::Exists {
                query,
                negated: !negated,
            },
            ExprKind::IsNull { operand, negated } => ExprKind::IsNull {
                operand,
                negated: !negated,
            },
            ExprKind::InList {
                operand,
                list,
                negated,
            } => ExprKind::InList {
                operand,
                list,
                negated: !negated,
            },
            ExprKind::Not(inner) => return *inner,
            kind => ExprKind::Not(Box::new(Self { kind, ..self })),
        };
        Self {
            table,
            ..Self::typed(ExprCategory::Boolean, "bool", kind)
        }
    }

    /// `self IS NULL`.
    #[must_use]
    pub fn is_null(self) -> Self {
        let table = self.table.clone();
        Self {
            table,
            ..Self::typed(
                ExprCategory::Boolean,
                "bool",
                ExprKind::IsNull {
                    operand: Box::new(self),
                    negated: false,
                },
            )
        }
    }

    /// `self IS NOT NULL`.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        self.is_null().negate()
    }

    /// `self IN (list)`.
    #[must_use]
    pub fn in_list(self, list: Vec<Self>) -> Self {
        let table = self.table.clone();
        Self {
            table,
            ..Self::typed(
                ExprCategory::Boolean,
                "bool",
                ExprKind::InList {
                    operand: Box::new(self),
                    list,
                    negated: false,
                },
            )
        }
    }

    /// Invokes a method on this expression through the profile's
    /// method registry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownMethod`] if nothing is registered for the
    /// receiver category, or the method's own usage error.
    pub fn invoke(self, ctx: &CompileContext<'_>, method: &str, args: Vec<Self>) -> Result<Self> {
        let resolved = ctx
            .profile
            .methods()
            .resolve_method(Some(self.category), method)?;
        resolved.invoke(ctx, Some(self), args)
    }

    /// Invokes a receiver-less method (aggregates).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownMethod`] if nothing is registered, or the
    /// method's own usage error.
    pub fn invoke_static(ctx: &CompileContext<'_>, method: &str, args: Vec<Self>) -> Result<Self> {
        let resolved = ctx.profile.methods().resolve_method(None, method)?;
        resolved.invoke(ctx, None, args)
    }

    /// Applies a named operation (`concat`, `mod`, `string_length`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownMethod`] for an unknown operation or the
    /// operation's own usage error.
    pub fn operation(ctx: &CompileContext<'_>, name: &str, args: Vec<Self>) -> Result<Self> {
        let resolved = ctx.profile.methods().resolve_operation(name)?;
        resolved.apply(ctx, args)
    }

    /// Renders this expression, appending SQL and parameters to `out`.
    pub fn render(&self, profile: &DialectProfile, out: &mut SqlText) {
        match &self.kind {
            ExprKind::Column(name) => {
                if let Some(table) = &self.table {
                    out.push_str(&table.alias);
                    out.push_str(".");
                }
                out.push_str(&profile.format_identifier(name, IdentifierKind::Column));
            }
            ExprKind::Literal(value) => {
                out.push_str(&value.to_sql_inline(profile.supports(Capability::BooleanLiterals)));
            }
            ExprKind::Null => out.push_str("NULL"),
            ExprKind::Parameter(param) => out.push_param(param.clone()),
            ExprKind::Function { name, args } => {
                out.push_str(name);
                out.push_str("(");
                render_list(args, profile, out);
                out.push_str(")");
            }
            ExprKind::Template { template, args } => render_template(template, args, profile, out),
            ExprKind::Binary { left, op, right } => {
                render_operand(left, *op, false, profile, out);
                out.push_str(" ");
                out.push_str(op.as_sql());
                out.push_str(" ");
                render_operand(right, *op, true, profile, out);
            }
            ExprKind::Not(inner) => {
                out.push_str("NOT (");
                inner.render(profile, out);
                out.push_str(")");
            }
            ExprKind::IsNull { operand, negated } => {
                render_wrapped(operand, profile, out);
                out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            ExprKind::InList {
                operand,
                list,
                negated,
            } => {
                if list.is_empty() {
                    out.push_str(if *negated { "1 = 1" } else { "1 = 0" });
                    return;
                }
                render_wrapped(operand, profile, out);
                out.push_str(if *negated { " NOT IN (" } else { " IN (" });
                render_list(list, profile, out);
                out.push_str(")");
            }
            ExprKind::Aggregate { function, arg } => {
                out.push_str(function);
                out.push_str("(");
                arg.render(profile, out);
                out.push_str(")");
            }
            ExprKind::Subquery(query) => {
                out.push_str("(");
                query.render_into(profile, false, out);
                out.push_str(")");
            }
            ExprKind::Exists { query, negated } => {
                out.push_str(if *negated { "NOT EXISTS (" } else { "EXISTS (" });
                query.render_into(profile, false, out);
                out.push_str(")");
            }
            ExprKind::Raw(sql) => out.push_str(sql),
            ExprKind::Map(binding) => {
                out.push_str(&binding.owner.alias);
                out.push_str(".");
                out.push_str(
                    &profile.format_identifier(&binding.owner_id_column, IdentifierKind::Column),
                );
            }
        }
    }

    /// Renders this expression alone.
    #[must_use]
    pub fn to_sql(&self, profile: &DialectProfile) -> SqlText {
        let mut out = SqlText::new();
        self.render(profile, &mut out);
        out
    }
}

fn render_list(items: &[SqlExpression], profile: &DialectProfile, out: &mut SqlText) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.render(profile, out);
    }
}

fn render_wrapped(expr: &SqlExpression, profile: &DialectProfile, out: &mut SqlText) {
    if matches!(expr.kind, ExprKind::Binary { .. }) {
        out.push_str("(");
        expr.render(profile, out);
        out.push_str(")");
    } else {
        expr.render(profile, out);
    }
}

fn render_operand(
    expr: &SqlExpression,
    parent: BinaryOp,
    right_side: bool,
    profile: &DialectProfile,
    out: &mut SqlText,
) {
    let needs_parens = match &expr.kind {
        ExprKind::Binary { op, .. } => {
            op.precedence() < parent.precedence()
                || (right_side
                    && op.precedence() == parent.precedence()
                    && !parent.is_associative())
        }
        _ => false,
    };
    if needs_parens {
        out.push_str("(");
        expr.render(profile, out);
        out.push_str(")");
    } else {
        expr.render(profile, out);
    }
}

/// Renders a condition for a conjunction (`WHERE`, `HAVING`, `ON`).
pub(crate) fn render_condition(expr: &SqlExpression, profile: &DialectProfile, out: &mut SqlText) {
    render_operand(expr, BinaryOp::And, false, profile, out);
}

fn render_template(
    template: &str,
    args: &[SqlExpression],
    profile: &DialectProfile,
    out: &mut SqlText,
) {
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return;
        };
        match after[..close].parse::<usize>().ok().and_then(|i| args.get(i)) {
            Some(arg) => arg.render(profile, out),
            None => out.push_str(&rest[open..=open + close + 1]),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Vendor, Version};

    fn profile(vendor: Vendor) -> DialectProfile {
        DialectProfile::new(vendor, vendor.default_version())
    }

    fn orders() -> SqlTable {
        SqlTable::new("ORDERS", "A0")
    }

    #[test]
    fn test_comparison_renders_with_parameter() {
        let pg = profile(Vendor::PostgreSql);
        let ctx = CompileContext::new(&pg, ClauseKind::Where);
        let cond = SqlExpression::column(&orders(), "ID", "i64")
            .eq(SqlExpression::parameter(MappingKey::DatastoreId, 0, "i64"), &ctx)
            .unwrap();
        let text = cond.to_sql(&pg);
        assert_eq!(text.sql, "A0.id = ?");
        assert_eq!(text.params.len(), 1);
    }

    #[test]
    fn test_scalar_null_comparison_uses_is_null() {
        let pg = profile(Vendor::PostgreSql);
        let ctx = CompileContext::new(&pg, ClauseKind::Where);
        let cond = SqlExpression::null()
            .ne(SqlExpression::column(&orders(), "NOTE", "string"), &ctx)
            .unwrap();
        assert_eq!(cond.to_sql(&pg).sql, "A0.note IS NOT NULL");
    }

    #[test]
    fn test_incompatible_comparison() {
        let pg = profile(Vendor::PostgreSql);
        let ctx = CompileContext::new(&pg, ClauseKind::Where);
        let err = SqlExpression::column(&orders(), "PLACED", "timestamp")
            .lt(SqlExpression::literal(true), &ctx)
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidComparison {
                left: String::from("temporal"),
                op: "<",
                right: String::from("boolean"),
            }
        );
    }

    #[test]
    fn test_precedence_parentheses() {
        let pg = profile(Vendor::PostgreSql);
        let ctx = CompileContext::new(&pg, ClauseKind::Where);
        let a = SqlExpression::column(&orders(), "A", "i32")
            .eq(SqlExpression::literal(1), &ctx)
            .unwrap();
        let b = SqlExpression::column(&orders(), "B", "i32")
            .eq(SqlExpression::literal(2), &ctx)
            .unwrap();
        let c = SqlExpression::column(&orders(), "C", "i32")
            .eq(SqlExpression::literal(3), &ctx)
            .unwrap();
        let expr = a.or(b).and(c);
        assert_eq!(expr.to_sql(&pg).sql, "(A0.a = 1 OR A0.b = 2) AND A0.c = 3");
    }

    #[test]
    fn test_boolean_literal_style() {
        let mssql = DialectProfile::new(Vendor::SqlServer, Version::new(16, 0, 0));
        assert_eq!(SqlExpression::literal(true).to_sql(&mssql).sql, "1");
        let pg = profile(Vendor::PostgreSql);
        assert_eq!(SqlExpression::literal(true).to_sql(&pg).sql, "TRUE");
    }

    #[test]
    fn test_not_flips_in_place() {
        let pg = profile(Vendor::PostgreSql);
        let expr = SqlExpression::column(&orders(), "NOTE", "string").is_null().negate();
        assert_eq!(expr.to_sql(&pg).sql, "A0.note IS NOT NULL");
        let list = SqlExpression::column(&orders(), "STATUS", "string")
            .in_list(vec![SqlExpression::literal("a"), SqlExpression::literal("b")])
            .negate();
        assert_eq!(list.to_sql(&pg).sql, "A0.status NOT IN ('a', 'b')");
    }

    #[test]
    fn test_template_slots_render_in_text_order() {
        let pg = profile(Vendor::PostgreSql);
        let expr = SqlExpression::template(
            "LOCATE({1}, {0})",
            vec![
                SqlExpression::parameter(MappingKey::Member(0), 0, "string"),
                SqlExpression::parameter(MappingKey::Member(1), 0, "string"),
            ],
            ExprCategory::Numeric,
            "i32",
        );
        let text = expr.to_sql(&pg);
        assert_eq!(text.sql, "LOCATE(?, ?)");
        assert_eq!(text.params[0].key, MappingKey::Member(1));
        assert_eq!(text.params[1].key, MappingKey::Member(0));
    }
}
