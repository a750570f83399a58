//! Flavor（驱动约定）：决定绑定时的占位符形式与插值时的字面量写法。
//!
//! 渲染出来的 SQL 统一使用 `@name`，由 [`crate::Statement::bind`] 按 flavor 改写。

use crate::error::QueryError;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    #[default]
    MySQL,
    PostgreSQL,
    SQLite,
    SQLServer,
}

static DEFAULT_FLAVOR: AtomicU8 = AtomicU8::new(Flavor::MySQL as u8);
static DEFAULT_FLAVOR_LOCK: Mutex<()> = Mutex::new(());

impl Flavor {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::PostgreSQL,
            2 => Self::SQLite,
            3 => Self::SQLServer,
            _ => Self::MySQL,
        }
    }

    /// 位置占位符是否带序号（`$1`、`?1`、`@p1`）；带序号时同名参数可复用同一位置。
    pub fn is_numbered(self) -> bool {
        !matches!(self, Self::MySQL)
    }

    /// 写入第 `index_1_based` 个位置参数的占位符。
    pub(crate) fn write_placeholder(self, index_1_based: usize, out: &mut String) {
        match self {
            Self::MySQL => out.push('?'),
            Self::PostgreSQL => {
                out.push('$');
                out.push_str(&index_1_based.to_string());
            }
            Self::SQLite => {
                out.push('?');
                out.push_str(&index_1_based.to_string());
            }
            Self::SQLServer => {
                out.push_str("@p");
                out.push_str(&index_1_based.to_string());
            }
        }
    }
}

/// 当前进程级默认 Flavor。
pub fn default_flavor() -> Flavor {
    Flavor::from_u8(DEFAULT_FLAVOR.load(Ordering::Relaxed))
}

/// 设置进程级默认 Flavor，返回旧值。
pub fn set_default_flavor(flavor: Flavor) -> Flavor {
    let old = DEFAULT_FLAVOR.swap(flavor as u8, Ordering::Relaxed);
    Flavor::from_u8(old)
}

/// 作用域内的默认 Flavor；持有全局锁，drop 时恢复旧值。
pub struct DefaultFlavorGuard {
    _lock: MutexGuard<'static, ()>,
    old: Flavor,
}

impl Drop for DefaultFlavorGuard {
    fn drop(&mut self) {
        set_default_flavor(self.old);
    }
}

pub fn set_default_flavor_scoped(flavor: Flavor) -> DefaultFlavorGuard {
    let lock = DEFAULT_FLAVOR_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let old = set_default_flavor(flavor);
    DefaultFlavorGuard { _lock: lock, old }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MySQL => "MySQL",
            Self::PostgreSQL => "PostgreSQL",
            Self::SQLite => "SQLite",
            Self::SQLServer => "SQLServer",
        };
        f.write_str(s)
    }
}

/// 按 provider 名称选择 flavor（大小写不敏感）。
impl FromStr for Flavor {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySQL),
            "postgres" | "postgresql" => Ok(Self::PostgreSQL),
            "sqlite" => Ok(Self::SQLite),
            "mssql" | "sqlserver" => Ok(Self::SQLServer),
            _ => Err(QueryError::invalid_argument("provider", s)),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InterpolateError {
    #[error("builder missing value for {0} when interpolating")]
    MissingArgs(String),
    #[error("builder unsupported args when interpolating")]
    UnsupportedArgs,
}
