//! 错误类型：构建期错误在出错的调用处立即返回，不会延迟到渲染阶段。

use std::convert::Infallible;

/// QueryBuilder / Statement 的错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// 枚举型选择器（join 类型、排序方向、provider 名称）不在可识别集合内。
    #[error("builder invalid {what}: {value:?}")]
    InvalidArgument { what: &'static str, value: String },

    /// 子句顺序违规（WHERE 之前 AND/OR、重复 WHERE、GROUP BY 之前 HAVING）。
    #[error("builder invalid state: {0}")]
    InvalidState(&'static str),

    #[error("builder table is required before rendering")]
    MissingTable,

    /// SQL 中出现了 `@name`，但参数表里没有对应值。
    #[error("builder unbound parameter {0}")]
    UnboundParameter(String),
}

impl QueryError {
    pub(crate) fn invalid_argument(what: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            what,
            value: value.into(),
        }
    }
}

// 让 `JoinKind`/`Direction` 本身也能走 `TryInto` 路径。
impl From<Infallible> for QueryError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

pub type Result<T, E = QueryError> = std::result::Result<T, E>;
