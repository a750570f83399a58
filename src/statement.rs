//! Statement：渲染结果（SQL + 参数表），以及按 flavor 绑定参数、交给执行器的边界。

use crate::error::{QueryError, Result};
use crate::flavor::{Flavor, default_flavor};
use crate::params::{PARAM_PREFIX, Params, is_name_char};
use crate::value::SqlValue;
use std::collections::HashMap;

/// 渲染后的语句：SQL 中的 `@name` 与 `params` 的键一一对应（区分大小写）。
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Params,
}

/// 绑定后的语句：占位符已改写为驱动风格，参数按出现顺序排列。
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub flavor: Flavor,
    pub sql: String,
    pub args: Vec<SqlValue>,
}

/// 语句执行器：持有连接、超时与重试策略，builder 本身从不做 I/O。
pub trait Executor {
    type Output;
    type Error;

    fn execute(&mut self, stmt: &Statement) -> Result<Self::Output, Self::Error>;
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Params) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_parts(self) -> (String, Params) {
        (self.sql, self.params)
    }

    /// 把 `@name` 改写为 `flavor` 的位置占位符。
    ///
    /// 带序号的 flavor 中同名参数复用同一个序号；MySQL 的 `?` 每次出现都追加一次值。
    /// SQL 中引用了参数表里不存在的名字时返回 [`QueryError::UnboundParameter`]。
    pub fn bind(&self, flavor: Flavor) -> Result<BoundStatement> {
        let mut args: Vec<SqlValue> = Vec::with_capacity(self.params.len());
        let mut positions: HashMap<&str, usize> = HashMap::new();

        let sql = rewrite_params(&self.sql, |name, out| -> Result<()> {
            let (key, value) = self
                .params
                .get_key_value(name)
                .ok_or_else(|| QueryError::UnboundParameter(name.to_string()))?;

            let idx = match positions.get(key) {
                Some(&idx) if flavor.is_numbered() => idx,
                _ => {
                    args.push(value.clone());
                    positions.insert(key, args.len());
                    args.len()
                }
            };
            flavor.write_placeholder(idx, out);
            Ok(())
        })?;

        tracing::debug!(%flavor, args = args.len(), "statement bound");
        Ok(BoundStatement { flavor, sql, args })
    }

    /// 使用进程级默认 flavor 绑定。
    pub fn bind_default(&self) -> Result<BoundStatement> {
        self.bind(default_flavor())
    }

    pub fn execute_with<E: Executor>(&self, executor: &mut E) -> Result<E::Output, E::Error> {
        tracing::debug!(sql = %self.sql, "executing statement");
        executor.execute(self)
    }
}

/// 扫描 SQL，把引号外的每个 `@name` 交给 `on_param` 改写；`@@name` 原样保留。
pub(crate) fn rewrite_params<E>(
    sql: &str,
    mut on_param: impl FnMut(&str, &mut String) -> Result<(), E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(sql.len() + 16);
    let mut quote: Option<char> = None;
    let mut escaping = false;
    let mut chars = sql.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if escaping {
            out.push(c);
            escaping = false;
            continue;
        }

        match c {
            '\\' if quote.is_some() => {
                out.push(c);
                escaping = true;
            }
            '\'' | '"' | '`' => {
                if quote == Some(c) {
                    quote = None;
                } else if quote.is_none() {
                    quote = Some(c);
                }
                out.push(c);
            }
            PARAM_PREFIX if quote.is_none() => {
                let start = i + c.len_utf8();
                let system_var = matches!(chars.peek(), Some(&(_, PARAM_PREFIX)));
                if system_var {
                    chars.next();
                    out.push_str("@@");
                    continue;
                }

                let mut end = start;
                while let Some(&(j, n)) = chars.peek() {
                    if !is_name_char(n) {
                        break;
                    }
                    end = j + n.len_utf8();
                    chars.next();
                }

                if end == start {
                    out.push(c);
                } else {
                    on_param(&sql[i..end], &mut out)?;
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
