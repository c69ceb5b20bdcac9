//! Map-valued members stored in a join table.

use serde::{Deserialize, Serialize};

use super::{BinaryOp, CompileContext, ExprCategory, ExprKind, SqlExpression};
use crate::dialect::SqlMethod;
use crate::error::{CoreError, Result};
use crate::statement::{SelectStatement, SqlTable};

/// Where a map member's entries live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBinding {
    /// Table (and alias) of the owning object.
    pub owner: SqlTable,
    /// Identity column of the owner table.
    pub owner_id_column: String,
    /// Join table holding the entries.
    pub join_table: String,
    /// Join-table column referencing the owner.
    pub owner_column: String,
    /// Join-table key column.
    pub key_column: String,
    /// Join-table value column, if values are stored inline.
    pub value_column: Option<String>,
    /// Logical type of the keys.
    pub key_logical_type: String,
}

impl MapBinding {
    /// Correlated `SELECT .. FROM <join table> WHERE owner = <owner id>`.
    fn entries(&self) -> SelectStatement {
        let entries = SqlTable::new(&self.join_table, format!("{}M", self.owner.alias));
        let owner_ref = SqlExpression::column(&entries, &self.owner_column, "object");
        let owner_id = SqlExpression::column(&self.owner, &self.owner_id_column, "object");
        let mut query = SelectStatement::from_table(entries);
        query.where_and(owner_ref.binary(BinaryOp::Eq, owner_id, ExprCategory::Boolean, "bool"));
        query
    }

    fn key(&self) -> SqlExpression {
        let entries = SqlTable::new(&self.join_table, format!("{}M", self.owner.alias));
        SqlExpression::column(&entries, &self.key_column, &self.key_logical_type)
    }
}

fn binding<'e>(
    method: &'static str,
    receiver: Option<&'e SqlExpression>,
) -> Result<&'e MapBinding> {
    match receiver.map(|r| &r.kind) {
        Some(ExprKind::Map(binding)) => Ok(binding),
        _ => Err(CoreError::invalid_call(method, "receiver must be a map member")),
    }
}

/// `map.isEmpty()` as `NOT EXISTS (..)`.
#[derive(Debug)]
pub struct MapIsEmpty;

impl SqlMethod for MapIsEmpty {
    fn invoke(
        &self,
        _ctx: &CompileContext<'_>,
        receiver: Option<SqlExpression>,
        args: Vec<SqlExpression>,
    ) -> Result<SqlExpression> {
        let binding = binding("isEmpty", receiver.as_ref())?;
        if !args.is_empty() {
            return Err(CoreError::invalid_call("isEmpty", "takes no arguments"));
        }
        Ok(SqlExpression::exists(binding.entries(), true))
    }
}

/// `map.size()` as a correlated `COUNT(*)` subquery.
#[derive(Debug)]
pub struct MapSize;

impl SqlMethod for MapSize {
    fn invoke(
        &self,
        _ctx: &CompileContext<'_>,
        receiver: Option<SqlExpression>,
        args: Vec<SqlExpression>,
    ) -> Result<SqlExpression> {
        let binding = binding("size", receiver.as_ref())?;
        if !args.is_empty() {
            return Err(CoreError::invalid_call("size", "takes no arguments"));
        }
        let mut query = binding.entries();
        query.select(SqlExpression::raw("COUNT(*)", "i64"))?;
        Ok(SqlExpression::subquery(query, ExprCategory::Numeric, "i64"))
    }
}

/// `map.containsKey(k)` as `EXISTS (.. AND key = k)`.
#[derive(Debug)]
pub struct MapContainsKey;

impl SqlMethod for MapContainsKey {
    fn invoke(
        &self,
        ctx: &CompileContext<'_>,
        receiver: Option<SqlExpression>,
        mut args: Vec<SqlExpression>,
    ) -> Result<SqlExpression> {
        let binding = binding("containsKey", receiver.as_ref())?;
        if args.len() != 1 {
            return Err(CoreError::invalid_call("containsKey", "expects exactly one argument"));
        }
        let mut query = binding.entries();
        query.where_and(binding.key().eq(args.remove(0), ctx)?);
        Ok(SqlExpression::exists(query, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{DialectProfile, Vendor};
    use crate::expr::ClauseKind;
    use crate::statement::MappingKey;

    fn attributes() -> SqlExpression {
        SqlExpression::map(MapBinding {
            owner: SqlTable::new("PRODUCT", "A0"),
            owner_id_column: String::from("ID"),
            join_table: String::from("PRODUCT_ATTRS"),
            owner_column: String::from("PRODUCT_ID"),
            key_column: String::from("ATTR_KEY"),
            value_column: Some(String::from("ATTR_VALUE")),
            key_logical_type: String::from("string"),
        })
    }

    fn profile() -> DialectProfile {
        DialectProfile::new(Vendor::H2, Vendor::H2.default_version())
    }

    #[test]
    fn test_null_comparison_becomes_is_empty() {
        let profile = profile();
        let ctx = CompileContext::new(&profile, ClauseKind::Where);
        let empty = attributes().eq(SqlExpression::null(), &ctx).unwrap();
        assert_eq!(
            empty.to_sql(&profile).sql,
            "NOT EXISTS (SELECT 1 FROM PRODUCT_ATTRS A0M WHERE A0M.PRODUCT_ID = A0.ID)"
        );
        let present = attributes().ne(SqlExpression::null(), &ctx).unwrap();
        assert_eq!(
            present.to_sql(&profile).sql,
            "EXISTS (SELECT 1 FROM PRODUCT_ATTRS A0M WHERE A0M.PRODUCT_ID = A0.ID)"
        );
    }

    #[test]
    fn test_other_map_comparisons_fail() {
        let profile = profile();
        let ctx = CompileContext::new(&profile, ClauseKind::Where);
        let err = attributes()
            .eq(SqlExpression::literal("x"), &ctx)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidComparison { .. }));
    }

    #[test]
    fn test_size_and_contains_key() {
        let profile = profile();
        let ctx = CompileContext::new(&profile, ClauseKind::Where);
        let size = attributes().invoke(&ctx, "size", vec![]).unwrap();
        assert_eq!(
            size.to_sql(&profile).sql,
            "(SELECT COUNT(*) FROM PRODUCT_ATTRS A0M WHERE A0M.PRODUCT_ID = A0.ID)"
        );
        let contains = attributes()
            .invoke(
                &ctx,
                "containsKey",
                vec![SqlExpression::parameter(MappingKey::Member(3), 0, "string")],
            )
            .unwrap();
        let text = contains.to_sql(&profile);
        assert_eq!(
            text.sql,
            "EXISTS (SELECT 1 FROM PRODUCT_ATTRS A0M WHERE A0M.PRODUCT_ID = A0.ID AND A0M.ATTR_KEY = ?)"
        );
        assert_eq!(text.placeholder_count(), 1);
    }
}
