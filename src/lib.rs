//! halo-query：流式 SELECT 查询构建器，渲染为 `@name` 参数化 SQL 与参数表。

pub mod clause;
pub mod error;
pub mod flavor;
pub mod interpolate;
pub mod macros;
pub mod params;
pub mod query;
#[cfg(test)]
mod query_tests;
pub mod statement;
mod string_builder;
pub mod value;

pub use crate::clause::{Connector, Direction, JoinFragment, JoinKind, Predicate};
pub use crate::error::QueryError;
pub use crate::flavor::{
    DefaultFlavorGuard, Flavor, InterpolateError, default_flavor, set_default_flavor,
    set_default_flavor_scoped,
};
pub use crate::macros::IntoStrings;
pub use crate::params::Params;
pub use crate::query::QueryBuilder;
pub use crate::statement::{BoundStatement, Executor, Statement};
pub use crate::value::{SqlDateTime, SqlValue};
