//! Aggregate methods (`count`, `sum`, `avg`, `min`, `max`).

use super::{CompileContext, ExprCategory, ExprKind, SqlExpression};
use crate::dialect::SqlMethod;
use crate::error::{CoreError, Result};
use crate::statement::SelectStatement;

/// How an aggregate derives its result type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateResult {
    /// Always a 64-bit integer.
    Count,
    /// Always a double; requires a numeric argument.
    Average,
    /// Numeric, typed as the argument.
    Sum,
    /// Typed as the argument (temporal, string or numeric).
    Argument,
}

/// A receiver-less aggregate function.
///
/// Inside a projection or `HAVING` clause it renders as `FUNC(arg)`;
/// anywhere else it becomes the scalar subquery
/// `(SELECT FUNC(arg) FROM <arg table>)`.
#[derive(Debug)]
pub struct AggregateMethod {
    function: &'static str,
    result: AggregateResult,
}

impl AggregateMethod {
    /// Creates an aggregate for the SQL function `function`.
    #[must_use]
    pub const fn new(function: &'static str, result: AggregateResult) -> Self {
        Self { function, result }
    }

    /// SQL function name.
    #[must_use]
    pub const fn function(&self) -> &'static str {
        self.function
    }

    fn result_type(&self, arg: &SqlExpression) -> Result<(ExprCategory, String)> {
        match self.result {
            AggregateResult::Count => Ok((ExprCategory::Numeric, String::from("i64"))),
            AggregateResult::Average | AggregateResult::Sum
                if arg.category != ExprCategory::Numeric =>
            {
                Err(CoreError::invalid_call(
                    self.function,
                    format!("requires a numeric argument, got {}", arg.category),
                ))
            }
            AggregateResult::Average => Ok((ExprCategory::Numeric, String::from("f64"))),
            AggregateResult::Sum | AggregateResult::Argument => {
                Ok((arg.category, arg.logical_type.clone()))
            }
        }
    }
}

impl SqlMethod for AggregateMethod {
    fn invoke(
        &self,
        ctx: &CompileContext<'_>,
        receiver: Option<SqlExpression>,
        mut args: Vec<SqlExpression>,
    ) -> Result<SqlExpression> {
        if receiver.is_some() {
            return Err(CoreError::invalid_call(
                self.function,
                "aggregates take no receiver",
            ));
        }
        if args.len() != 1 {
            return Err(CoreError::invalid_call(
                self.function,
                format!("expects exactly one argument, got {}", args.len()),
            ));
        }
        let arg = args.remove(0);
        let (category, logical_type) = self.result_type(&arg)?;
        let table = arg.table.clone();
        let aggregate = SqlExpression {
            category,
            logical_type: logical_type.clone(),
            table: table.clone(),
            kind: ExprKind::Aggregate {
                function: self.function,
                arg: Box::new(arg),
            },
        };
        if ctx.allows_aggregates() {
            return Ok(aggregate);
        }
        let table = table.ok_or_else(|| {
            CoreError::invalid_call(self.function, "argument has no source table for a subquery")
        })?;
        let mut query = SelectStatement::from_table(table);
        query.select(aggregate)?;
        Ok(SqlExpression::subquery(query, category, &logical_type))
    }
}
