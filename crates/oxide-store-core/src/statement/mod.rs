//! Compiled statements: SELECT assembly, SQL text with bound parameters,
//! and the result/parameter layout of a compiled statement.

mod mapping;
mod select;
mod text;

pub use mapping::{MappingKey, StatementClassMapping, StatementMapping, StatementMappingIndex};
pub use select::{Join, JoinType, NullOrdering, OrderItem, SelectStatement, SqlTable};
pub use text::{BoundParameter, SqlText};
