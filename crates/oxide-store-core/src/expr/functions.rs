//! Built-in string, temporal and numeric methods and the shared operations.

use super::aggregate::{AggregateMethod, AggregateResult};
use super::map::{MapContainsKey, MapIsEmpty, MapSize};
use super::ExprCategory::{Map, Numeric, String as Str, Temporal};
use super::{CompileContext, ExprCategory, ExprKind, SqlExpression};
use crate::dialect::{MethodEntry, OperationEntry, SqlMethod, SqlOperation, Vendor};
use crate::error::{CoreError, Result};
use crate::value::SqlValue;

/// A method rendered from a template chosen by argument count.
///
/// Slot `{0}` is the receiver, `{1}`.. the arguments.
#[derive(Debug)]
pub struct TemplateMethod {
    /// Method name, for error messages.
    pub name: &'static str,
    /// Templates indexed by argument count; `None` rejects that count.
    pub templates: &'static [Option<&'static str>],
    /// Result category.
    pub category: ExprCategory,
    /// Result logical type.
    pub logical_type: &'static str,
}

macro_rules! template_method {
    ($name:expr, $templates:expr, $category:expr, $logical:expr $(,)?) => {
        TemplateMethod {
            name: $name,
            templates: $templates,
            category: $category,
            logical_type: $logical,
        }
    };
}

impl SqlMethod for TemplateMethod {
    fn invoke(
        &self,
        _ctx: &CompileContext<'_>,
        receiver: Option<SqlExpression>,
        args: Vec<SqlExpression>,
    ) -> Result<SqlExpression> {
        let receiver =
            receiver.ok_or_else(|| CoreError::invalid_call(self.name, "a receiver is required"))?;
        let template = self
            .templates
            .get(args.len())
            .copied()
            .flatten()
            .ok_or_else(|| {
                CoreError::invalid_call(
                    self.name,
                    format!("cannot take {} argument(s)", args.len()),
                )
            })?;
        let mut slots = Vec::with_capacity(args.len() + 1);
        slots.push(receiver);
        slots.extend(args);
        Ok(SqlExpression::template(
            template,
            slots,
            self.category,
            self.logical_type,
        ))
    }
}

/// `startsWith` / `endsWith` as a `LIKE` predicate.
#[derive(Debug)]
pub struct LikeMethod {
    /// Method name.
    pub name: &'static str,
    /// Whether the argument is the prefix (`true`) or the suffix.
    pub prefix: bool,
}

impl SqlMethod for LikeMethod {
    fn invoke(
        &self,
        ctx: &CompileContext<'_>,
        receiver: Option<SqlExpression>,
        mut args: Vec<SqlExpression>,
    ) -> Result<SqlExpression> {
        let receiver =
            receiver.ok_or_else(|| CoreError::invalid_call(self.name, "a receiver is required"))?;
        if args.len() != 1 {
            return Err(CoreError::invalid_call(self.name, "expects exactly one argument"));
        }
        let arg = args.remove(0);
        let pattern = if let ExprKind::Literal(SqlValue::Text(text)) = &arg.kind {
            let escaped = text.replace('%', "\\%").replace('_', "\\_");
            let pattern = if self.prefix {
                format!("{escaped}%")
            } else {
                format!("%{escaped}")
            };
            SqlExpression::literal(pattern)
        } else {
            let wildcard = SqlExpression::literal("%");
            let parts = if self.prefix {
                vec![arg, wildcard]
            } else {
                vec![wildcard, arg]
            };
            SqlExpression::operation(ctx, "concat", parts)?
        };
        Ok(receiver.like(pattern))
    }
}

/// `length()`, delegating to the `string_length` operation.
#[derive(Debug)]
pub struct LengthMethod;

impl SqlMethod for LengthMethod {
    fn invoke(
        &self,
        ctx: &CompileContext<'_>,
        receiver: Option<SqlExpression>,
        args: Vec<SqlExpression>,
    ) -> Result<SqlExpression> {
        let receiver =
            receiver.ok_or_else(|| CoreError::invalid_call("length", "a receiver is required"))?;
        if !args.is_empty() {
            return Err(CoreError::invalid_call("length", "takes no arguments"));
        }
        SqlExpression::operation(ctx, "string_length", vec![receiver])
    }
}

/// An operation rendered from a fixed-arity template.
#[derive(Debug)]
pub struct TemplateOperation {
    /// Operation name.
    pub name: &'static str,
    /// Template with `{n}` slots.
    pub template: &'static str,
    /// Required number of arguments.
    pub arity: usize,
    /// Result category.
    pub category: ExprCategory,
    /// Result logical type; `None` inherits the first argument's.
    pub logical_type: Option<&'static str>,
}

impl SqlOperation for TemplateOperation {
    fn apply(&self, _ctx: &CompileContext<'_>, args: Vec<SqlExpression>) -> Result<SqlExpression> {
        if args.len() != self.arity {
            return Err(CoreError::invalid_call(
                self.name,
                format!("expects {} argument(s), got {}", self.arity, args.len()),
            ));
        }
        let logical = self
            .logical_type
            .map_or_else(|| args[0].logical_type.clone(), String::from);
        Ok(SqlExpression::template(
            self.template,
            args,
            self.category,
            &logical,
        ))
    }
}

static COUNT: AggregateMethod = AggregateMethod::new("COUNT", AggregateResult::Count);
static SUM: AggregateMethod = AggregateMethod::new("SUM", AggregateResult::Sum);
static AVG: AggregateMethod = AggregateMethod::new("AVG", AggregateResult::Average);
static MIN: AggregateMethod = AggregateMethod::new("MIN", AggregateResult::Argument);
static MAX: AggregateMethod = AggregateMethod::new("MAX", AggregateResult::Argument);

static TO_UPPER: TemplateMethod =
    template_method!("toUpperCase", &[Some("UPPER({0})")], Str, "string");
static TO_LOWER: TemplateMethod =
    template_method!("toLowerCase", &[Some("LOWER({0})")], Str, "string");
static TRIM: TemplateMethod = template_method!("trim", &[Some("TRIM({0})")], Str, "string");
static SUBSTRING: TemplateMethod = template_method!(
    "substring",
    &[
        None,
        Some("SUBSTRING({0} FROM {1} + 1)"),
        Some("SUBSTRING({0} FROM {1} + 1 FOR {2} - {1})"),
    ],
    Str,
    "string",
);
static INDEX_OF: TemplateMethod =
    template_method!("indexOf", &[None, Some("POSITION({1} IN {0}) - 1")], Numeric, "i32");
static STARTS_WITH: LikeMethod = LikeMethod {
    name: "startsWith",
    prefix: true,
};
static ENDS_WITH: LikeMethod = LikeMethod {
    name: "endsWith",
    prefix: false,
};
static LENGTH: LengthMethod = LengthMethod;
static GET_YEAR: TemplateMethod =
    template_method!("getYear", &[Some("EXTRACT(YEAR FROM {0})")], Numeric, "i32");
static GET_MONTH: TemplateMethod =
    template_method!("getMonth", &[Some("EXTRACT(MONTH FROM {0})")], Numeric, "i32");
static GET_DAY: TemplateMethod =
    template_method!("getDay", &[Some("EXTRACT(DAY FROM {0})")], Numeric, "i32");
static ABS: TemplateMethod = template_method!("abs", &[Some("ABS({0})")], Numeric, "f64");
static SQRT: TemplateMethod = template_method!("sqrt", &[Some("SQRT({0})")], Numeric, "f64");
static IS_EMPTY: MapIsEmpty = MapIsEmpty;
static SIZE: MapSize = MapSize;
static CONTAINS_KEY: MapContainsKey = MapContainsKey;

static BASE_METHODS: &[MethodEntry] = &[
    MethodEntry::new(None, "count", &COUNT),
    MethodEntry::new(None, "sum", &SUM),
    MethodEntry::new(None, "avg", &AVG),
    MethodEntry::new(None, "min", &MIN),
    MethodEntry::new(None, "max", &MAX),
    MethodEntry::new(Some(Str), "toUpperCase", &TO_UPPER),
    MethodEntry::new(Some(Str), "toLowerCase", &TO_LOWER),
    MethodEntry::new(Some(Str), "length", &LENGTH),
    MethodEntry::new(Some(Str), "trim", &TRIM),
    MethodEntry::new(Some(Str), "substring", &SUBSTRING),
    MethodEntry::new(Some(Str), "indexOf", &INDEX_OF),
    MethodEntry::new(Some(Str), "startsWith", &STARTS_WITH),
    MethodEntry::new(Some(Str), "endsWith", &ENDS_WITH),
    MethodEntry::new(Some(Temporal), "getYear", &GET_YEAR),
    MethodEntry::new(Some(Temporal), "getMonth", &GET_MONTH),
    MethodEntry::new(Some(Temporal), "getDay", &GET_DAY),
    MethodEntry::new(Some(Numeric), "abs", &ABS),
    MethodEntry::new(Some(Numeric), "sqrt", &SQRT),
    MethodEntry::new(Some(Map), "isEmpty", &IS_EMPTY),
    MethodEntry::new(Some(Map), "size", &SIZE),
    MethodEntry::new(Some(Map), "containsKey", &CONTAINS_KEY),
];

static SUBSTR: TemplateMethod = template_method!(
    "substring",
    &[
        None,
        Some("SUBSTR({0}, {1} + 1)"),
        Some("SUBSTR({0}, {1} + 1, {2} - {1})"),
    ],
    Str,
    "string",
);
static INSTR: TemplateMethod =
    template_method!("indexOf", &[None, Some("INSTR({0}, {1}) - 1")], Numeric, "i32");
static LOCATE: TemplateMethod =
    template_method!("indexOf", &[None, Some("LOCATE({1}, {0}) - 1")], Numeric, "i32");

static POSTGRESQL_METHODS: &[MethodEntry] = &[MethodEntry::new(
    Some(Str),
    "indexOf",
    &template_method!("indexOf", &[None, Some("STRPOS({0}, {1}) - 1")], Numeric, "i32"),
)];

static MYSQL_METHODS: &[MethodEntry] = &[MethodEntry::new(Some(Str), "indexOf", &LOCATE)];

static SQLITE_METHODS: &[MethodEntry] = &[
    MethodEntry::new(Some(Str), "substring", &SUBSTR),
    MethodEntry::new(Some(Str), "indexOf", &INSTR),
    MethodEntry::new(
        Some(Temporal),
        "getYear",
        &template_method!(
            "getYear",
            &[Some("CAST(strftime('%Y', {0}) AS INTEGER)")],
            Numeric,
            "i32",
        ),
    ),
    MethodEntry::new(
        Some(Temporal),
        "getMonth",
        &template_method!(
            "getMonth",
            &[Some("CAST(strftime('%m', {0}) AS INTEGER)")],
            Numeric,
            "i32",
        ),
    ),
    MethodEntry::new(
        Some(Temporal),
        "getDay",
        &template_method!(
            "getDay",
            &[Some("CAST(strftime('%d', {0}) AS INTEGER)")],
            Numeric,
            "i32",
        ),
    ),
];

static SQLSERVER_METHODS: &[MethodEntry] = &[
    MethodEntry::new(
        Some(Str),
        "substring",
        &template_method!(
            "substring",
            &[
                None,
                Some("SUBSTRING({0}, {1} + 1, LEN({0}))"),
                Some("SUBSTRING({0}, {1} + 1, {2} - {1})"),
            ],
            Str,
            "string",
        ),
    ),
    MethodEntry::new(
        Some(Str),
        "indexOf",
        &template_method!("indexOf", &[None, Some("CHARINDEX({1}, {0}) - 1")], Numeric, "i32"),
    ),
    MethodEntry::new(
        Some(Str),
        "trim",
        &template_method!("trim", &[Some("LTRIM(RTRIM({0}))")], Str, "string"),
    ),
    MethodEntry::new(
        Some(Temporal),
        "getYear",
        &template_method!("getYear", &[Some("DATEPART(YEAR, {0})")], Numeric, "i32"),
    ),
    MethodEntry::new(
        Some(Temporal),
        "getMonth",
        &template_method!("getMonth", &[Some("DATEPART(MONTH, {0})")], Numeric, "i32"),
    ),
    MethodEntry::new(
        Some(Temporal),
        "getDay",
        &template_method!("getDay", &[Some("DATEPART(DAY, {0})")], Numeric, "i32"),
    ),
];

static ORACLE_METHODS: &[MethodEntry] = &[
    MethodEntry::new(Some(Str), "substring", &SUBSTR),
    MethodEntry::new(Some(Str), "indexOf", &INSTR),
];

static DERBY_METHODS: &[MethodEntry] = &[
    MethodEntry::new(Some(Str), "substring", &SUBSTR),
    MethodEntry::new(Some(Str), "indexOf", &LOCATE),
    MethodEntry::new(
        Some(Temporal),
        "getYear",
        &template_method!("getYear", &[Some("YEAR({0})")], Numeric, "i32"),
    ),
    MethodEntry::new(
        Some(Temporal),
        "getMonth",
        &template_method!("getMonth", &[Some("MONTH({0})")], Numeric, "i32"),
    ),
    MethodEntry::new(
        Some(Temporal),
        "getDay",
        &template_method!("getDay", &[Some("DAY({0})")], Numeric, "i32"),
    ),
];

static H2_METHODS: &[MethodEntry] = &[MethodEntry::new(Some(Str), "indexOf", &LOCATE)];

static DB2_METHODS: &[MethodEntry] = &[
    MethodEntry::new(Some(Str), "substring", &SUBSTR),
    MethodEntry::new(Some(Str), "indexOf", &LOCATE),
];

static BASE_OPERATIONS: &[OperationEntry] = &[
    OperationEntry::new(
        "concat",
        &TemplateOperation {
            name: "concat",
            template: "({0} || {1})",
            arity: 2,
            category: Str,
            logical_type: Some("string"),
        },
    ),
    OperationEntry::new(
        "mod",
        &TemplateOperation {
            name: "mod",
            template: "MOD({0}, {1})",
            arity: 2,
            category: Numeric,
            logical_type: None,
        },
    ),
    OperationEntry::new(
        "string_length",
        &TemplateOperation {
            name: "string_length",
            template: "CHAR_LENGTH({0})",
            arity: 1,
            category: Numeric,
            logical_type: Some("i32"),
        },
    ),
];

static LENGTH_FUNCTION: TemplateOperation = TemplateOperation {
    name: "string_length",
    template: "LENGTH({0})",
    arity: 1,
    category: Numeric,
    logical_type: Some("i32"),
};

static PERCENT_MOD: TemplateOperation = TemplateOperation {
    name: "mod",
    template: "({0} % {1})",
    arity: 2,
    category: Numeric,
    logical_type: None,
};

static MYSQL_OPERATIONS: &[OperationEntry] = &[OperationEntry::new(
    "concat",
    &TemplateOperation {
        name: "concat",
        template: "CONCAT({0}, {1})",
        arity: 2,
        category: Str,
        logical_type: Some("string"),
    },
)];

static SQLITE_OPERATIONS: &[OperationEntry] = &[
    OperationEntry::new("mod", &PERCENT_MOD),
    OperationEntry::new("string_length", &LENGTH_FUNCTION),
];

static SQLSERVER_OPERATIONS: &[OperationEntry] = &[
    OperationEntry::new(
        "concat",
        &TemplateOperation {
            name: "concat",
            template: "({0} + {1})",
            arity: 2,
            category: Str,
            logical_type: Some("string"),
        },
    ),
    OperationEntry::new("mod", &PERCENT_MOD),
    OperationEntry::new(
        "string_length",
        &TemplateOperation {
            name: "string_length",
            template: "LEN({0})",
            arity: 1,
            category: Numeric,
            logical_type: Some("i32"),
        },
    ),
];

static LENGTH_ONLY_OPERATIONS: &[OperationEntry] =
    &[OperationEntry::new("string_length", &LENGTH_FUNCTION)];

/// Methods shared by every vendor.
pub(crate) const fn base_methods() -> &'static [MethodEntry] {
    BASE_METHODS
}

/// Operations shared by every vendor.
pub(crate) const fn base_operations() -> &'static [OperationEntry] {
    BASE_OPERATIONS
}

/// Vendor method overrides.
pub(crate) const fn vendor_methods(vendor: Vendor) -> &'static [MethodEntry] {
    match vendor {
        Vendor::Generic => &[],
        Vendor::PostgreSql => POSTGRESQL_METHODS,
        Vendor::MySql => MYSQL_METHODS,
        Vendor::Sqlite => SQLITE_METHODS,
        Vendor::SqlServer => SQLSERVER_METHODS,
        Vendor::Oracle => ORACLE_METHODS,
        Vendor::Derby => DERBY_METHODS,
        Vendor::H2 => H2_METHODS,
        Vendor::Db2 => DB2_METHODS,
    }
}

/// Vendor operation overrides.
pub(crate) const fn vendor_operations(vendor: Vendor) -> &'static [OperationEntry] {
    match vendor {
        Vendor::Generic | Vendor::PostgreSql => &[],
        Vendor::MySql => MYSQL_OPERATIONS,
        Vendor::Sqlite => SQLITE_OPERATIONS,
        Vendor::SqlServer => SQLSERVER_OPERATIONS,
        Vendor::Oracle | Vendor::Derby | Vendor::H2 | Vendor::Db2 => LENGTH_ONLY_OPERATIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectProfile;
    use crate::expr::ClauseKind;
    use crate::statement::{MappingKey, SqlTable};

    fn name_column() -> SqlExpression {
        SqlExpression::column(&SqlTable::new("PERSON", "A0"), "NAME", "string")
    }

    fn render(vendor: Vendor, expr: &SqlExpression) -> String {
        let profile = DialectProfile::new(vendor, vendor.default_version());
        expr.to_sql(&profile).sql
    }

    fn invoke(vendor: Vendor, method: &str, args: Vec<SqlExpression>) -> String {
        let profile = DialectProfile::new(vendor, vendor.default_version());
        let ctx = CompileContext::new(&profile, ClauseKind::Where);
        let expr = name_column().invoke(&ctx, method, args).unwrap();
        expr.to_sql(&profile).sql
    }

    #[test]
    fn test_vendor_override_before_base() {
        assert_eq!(invoke(Vendor::Generic, "length", vec![]), "CHAR_LENGTH(A0.NAME)");
        assert_eq!(invoke(Vendor::SqlServer, "length", vec![]), "LEN(A0.NAME)");
        assert_eq!(invoke(Vendor::Oracle, "length", vec![]), "LENGTH(A0.NAME)");
        assert_eq!(
            invoke(Vendor::SqlServer, "indexOf", vec![SqlExpression::literal("x")]),
            "CHARINDEX('x', A0.NAME) - 1"
        );
        assert_eq!(
            invoke(Vendor::Oracle, "substring", vec![SqlExpression::literal(2)]),
            "SUBSTR(A0.NAME, 2 + 1)"
        );
    }

    #[test]
    fn test_base_methods() {
        assert_eq!(invoke(Vendor::H2, "toUpperCase", vec![]), "UPPER(A0.NAME)");
        assert_eq!(
            invoke(
                Vendor::Generic,
                "substring",
                vec![SqlExpression::literal(1), SqlExpression::literal(3)]
            ),
            "SUBSTRING(A0.NAME FROM 1 + 1 FOR 3 - 1)"
        );
    }

    #[test]
    fn test_starts_with() {
        assert_eq!(
            invoke(Vendor::Generic, "startsWith", vec![SqlExpression::literal("ab_")]),
            "A0.NAME LIKE 'ab\\_%'"
        );
        let param = SqlExpression::parameter(MappingKey::Member(1), 0, "string");
        assert_eq!(
            invoke(Vendor::MySql, "endsWith", vec![param.clone()]),
            "A0.NAME LIKE CONCAT('%', ?)"
        );
        assert_eq!(
            invoke(Vendor::PostgreSql, "startsWith", vec![param]),
            "A0.name LIKE (? || '%')"
        );
    }

    #[test]
    fn test_wrong_arity_is_usage_error() {
        let profile = DialectProfile::new(Vendor::Generic, Vendor::Generic.default_version());
        let ctx = CompileContext::new(&profile, ClauseKind::Where);
        assert!(matches!(
            name_column().invoke(&ctx, "substring", vec![]),
            Err(CoreError::InvalidMethodCall { .. })
        ));
        assert!(matches!(
            SqlExpression::operation(&ctx, "mod", vec![SqlExpression::literal(1)]),
            Err(CoreError::InvalidMethodCall { .. })
        ));
    }

    #[test]
    fn test_temporal_overrides() {
        let profile = DialectProfile::new(Vendor::Sqlite, Vendor::Sqlite.default_version());
        let ctx = CompileContext::new(&profile, ClauseKind::Where);
        let placed = SqlExpression::column(&SqlTable::new("ORDERS", "A0"), "PLACED", "timestamp");
        let year = placed.invoke(&ctx, "getYear", vec![]).unwrap();
        assert_eq!(
            render(Vendor::Sqlite, &year),
            "CAST(strftime('%Y', A0.PLACED) AS INTEGER)"
        );
    }
}
