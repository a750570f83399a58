//! QueryBuilder：按调用顺序累积 SELECT 子句片段，渲染为 `@name` 参数化的 SQL。
//!
//! 子句顺序固定为 SELECT、FROM、JOIN、WHERE、GROUP BY、HAVING、ORDER BY、LIMIT。
//! 所有参数错误与顺序错误都在出错的那一次调用上立即返回，失败的调用不会改动已有状态。
//!
//! ```
//! use halo_query::{Direction, JoinKind, QueryBuilder};
//!
//! let mut qb = QueryBuilder::new();
//! qb.select(["id", "name"])
//!     .from("customers")
//!     .join(JoinKind::Inner, "orders", "id", "customers", "order_id")?
//!     .where_("status", "active")?
//!     .and("region", 3)?
//!     .order_by("name", Direction::Descending)?
//!     .limit(10);
//!
//! let stmt = qb.render()?;
//! assert_eq!(
//!     stmt.sql(),
//!     "SELECT id, name FROM customers INNER JOIN orders.id = customers.order_id \
//!      WHERE status = @status AND region = @region ORDER BY name DESC LIMIT 10"
//! );
//! assert_eq!(stmt.params().len(), 2);
//! # Ok::<(), halo_query::QueryError>(())
//! ```

use crate::clause::{Connector, Direction, JoinFragment, JoinKind, Limit, OrderBy, Predicate};
use crate::error::{QueryError, Result};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::params::Params;
use crate::statement::Statement;
use crate::string_builder::StringBuilder;
use crate::value::SqlValue;

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    select_cols: Vec<String>,
    table: Option<String>,
    joins: Vec<JoinFragment>,
    filters: Vec<Predicate>,
    group_by: Option<String>,
    havings: Vec<Predicate>,
    order_by: Option<OrderBy>,
    limit: Option<Limit>,
    params: Params,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已有参数表开始构建；预置的参数名不会被覆盖，派生参数名会避开它们。
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// 替换 SELECT 列表；为空时渲染为 `*`。
    pub fn select<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.select_cols = collect_into_strings(cols);
        self
    }

    pub fn select_more<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.select_cols.extend(collect_into_strings(cols));
        self
    }

    /// 设置主表，重复调用以最后一次为准。
    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    /// 追加 `<KIND> JOIN <left_table>.<left_column> = <right_table>.<right_column>`。
    ///
    /// `kind` 可以是 [`JoinKind`]，也可以是 `"inner"`/`"left"`/`"right"` 这样的文本；
    /// 无法识别的文本返回 [`QueryError::InvalidArgument`]。
    pub fn join<K>(
        &mut self,
        kind: K,
        left_table: impl Into<String>,
        left_column: impl Into<String>,
        right_table: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Result<&mut Self>
    where
        K: TryInto<JoinKind>,
        QueryError: From<K::Error>,
    {
        let kind = kind.try_into()?;
        self.joins.push(JoinFragment {
            kind,
            left_table: left_table.into(),
            left_column: left_column.into(),
            right_table: right_table.into(),
            right_column: right_column.into(),
        });
        Ok(self)
    }

    /// 打开 WHERE 链：`WHERE <key> = @<key>`。每个查询只能调用一次。
    ///
    /// `key` 原样写入 SQL，不能包含 `@`（参数名会把 `@` 替换为 `_`，绑定时就对不上了）。
    pub fn where_(
        &mut self,
        key: impl Into<String>,
        value: impl Into<SqlValue>,
    ) -> Result<&mut Self> {
        if self.has_where() {
            return Err(rejected("WHERE clause already provided once"));
        }
        self.push_filter(Connector::Where, key.into(), value.into());
        Ok(self)
    }

    pub fn and(&mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Result<&mut Self> {
        self.chain_filter(Connector::And, key.into(), value.into())
    }

    pub fn or(&mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Result<&mut Self> {
        self.chain_filter(Connector::Or, key.into(), value.into())
    }

    fn chain_filter(
        &mut self,
        connector: Connector,
        key: String,
        value: SqlValue,
    ) -> Result<&mut Self> {
        if !self.has_where() {
            return Err(rejected("WHERE clause not provided"));
        }
        self.push_filter(connector, key, value);
        Ok(self)
    }

    fn push_filter(&mut self, connector: Connector, key: String, value: SqlValue) {
        debug_assert!(!key.contains('@'), "column key must not contain '@': {key}");
        let param = self.params.bind(&key, value);
        self.filters.push(Predicate {
            connector,
            key,
            param,
        });
    }

    /// 追加 HAVING 谓词：第一次打开 `HAVING`，之后以 AND 连接。
    ///
    /// 需要先调用 [`QueryBuilder::group_by`]，否则返回 [`QueryError::InvalidState`]。
    /// `key` 的约束同 [`QueryBuilder::where_`]。
    pub fn having(
        &mut self,
        key: impl Into<String>,
        value: impl Into<SqlValue>,
    ) -> Result<&mut Self> {
        let connector = if self.has_having() {
            Connector::And
        } else {
            Connector::Having
        };
        self.push_having(connector, key.into(), value.into())
    }

    /// 以 OR 连接一个 HAVING 谓词，要求 HAVING 已经打开。
    pub fn or_having(
        &mut self,
        key: impl Into<String>,
        value: impl Into<SqlValue>,
    ) -> Result<&mut Self> {
        if self.group_by.is_some() && !self.has_having() {
            return Err(rejected("HAVING clause not provided"));
        }
        self.push_having(Connector::Or, key.into(), value.into())
    }

    fn push_having(
        &mut self,
        connector: Connector,
        key: String,
        value: SqlValue,
    ) -> Result<&mut Self> {
        if self.group_by.is_none() {
            return Err(rejected("HAVING requires GROUP BY"));
        }
        debug_assert!(!key.contains('@'), "column key must not contain '@': {key}");
        let param = self.params.bind(&key, value);
        self.havings.push(Predicate {
            connector,
            key,
            param,
        });
        Ok(self)
    }

    /// 只支持单列分组，重复调用以最后一次为准。
    pub fn group_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.group_by = Some(column.into());
        self
    }

    /// 设置排序列与方向，重复调用以最后一次为准。
    ///
    /// 无法识别的方向文本返回 [`QueryError::InvalidArgument`]，已有排序保持不变。
    pub fn order_by<D>(&mut self, column: impl Into<String>, direction: D) -> Result<&mut Self>
    where
        D: TryInto<Direction>,
        QueryError: From<D::Error>,
    {
        let direction = direction.try_into()?;
        self.order_by = Some(OrderBy {
            column: column.into(),
            direction,
        });
        Ok(self)
    }

    pub fn order_by_asc(&mut self, column: impl Into<String>) -> &mut Self {
        self.order_by = Some(OrderBy {
            column: column.into(),
            direction: Direction::Ascending,
        });
        self
    }

    pub fn order_by_desc(&mut self, column: impl Into<String>) -> &mut Self {
        self.order_by = Some(OrderBy {
            column: column.into(),
            direction: Direction::Descending,
        });
        self
    }

    /// `LIMIT <count>`。`limit(0)` 照样渲染 `LIMIT 0`。
    pub fn limit(&mut self, count: u64) -> &mut Self {
        self.limit_offset(count, 0)
    }

    /// `LIMIT <count>, <offset>`；`offset` 为 0 时省略。
    pub fn limit_offset(&mut self, count: u64, offset: u64) -> &mut Self {
        self.limit = Some(Limit { count, offset });
        self
    }

    pub fn has_where(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn has_having(&self) -> bool {
        !self.havings.is_empty()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// 渲染为 [`Statement`]。不修改 builder，多次调用结果一致。
    pub fn render(&self) -> Result<Statement> {
        let table = self.table.as_deref().ok_or(QueryError::MissingTable)?;

        let mut buf = StringBuilder::with_capacity(64);
        buf.write_leading("SELECT ");
        if self.select_cols.is_empty() {
            buf.write_str("*");
        } else {
            buf.write_str(&self.select_cols.join(", "));
        }

        buf.write_leading("FROM ");
        buf.write_str(table);

        for join in &self.joins {
            buf.write_display(join);
        }
        for filter in &self.filters {
            buf.write_display(filter);
        }

        if let Some(col) = &self.group_by {
            buf.write_leading("GROUP BY ");
            buf.write_str(col);
        }
        for having in &self.havings {
            buf.write_display(having);
        }

        if let Some(order) = &self.order_by {
            buf.write_leading("ORDER BY ");
            buf.write_str(&order.column);
            buf.write_str(" ");
            buf.write_str(order.direction.as_str());
        }

        if let Some(limit) = &self.limit {
            buf.write_display(limit);
        }

        let sql = buf.into_string();
        tracing::debug!(sql = %sql, params = self.params.len(), "query rendered");
        Ok(Statement::new(sql, self.params.clone()))
    }
}

fn rejected(reason: &'static str) -> QueryError {
    tracing::warn!(reason, "query builder call rejected");
    QueryError::InvalidState(reason)
}
