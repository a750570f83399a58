//! Params：`@name` → 值 的参数表，按插入顺序保存，键唯一。

use crate::value::SqlValue;
use std::collections::HashMap;

pub const PARAM_PREFIX: char = '@';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, SqlValue)>,
    index: HashMap<String, usize>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接写入一个参数；`name` 没有 `@` 前缀时会自动补上。已存在时替换并返回旧值。
    pub fn insert(
        &mut self,
        name: impl AsRef<str>,
        value: impl Into<SqlValue>,
    ) -> Option<SqlValue> {
        let name = with_prefix(name.as_ref());
        let value = value.into();
        if let Some(&i) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[i].1, value));
        }
        self.push(name, value);
        None
    }

    /// 为列名 `key` 派生一个未占用的参数名并绑定 `value`，返回带 `@` 的参数名。
    ///
    /// 派生规则：`[A-Za-z0-9_]` 以外的字符替换为 `_`；重名时依次尝试 `_1`、`_2`……
    pub fn bind(&mut self, key: &str, value: impl Into<SqlValue>) -> String {
        let value = value.into();
        let base = with_prefix(&sanitize(key));
        let mut name = base.clone();
        let mut n = 0usize;
        while self.index.contains_key(&name) {
            n += 1;
            name = format!("{base}_{n}");
        }
        if n > 0 {
            tracing::trace!(
                key,
                param = %name,
                kind = value.kind(),
                "parameter name disambiguated"
            );
        }
        self.push(name.clone(), value);
        name
    }

    fn push(&mut self, name: String, value: SqlValue) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
    }

    /// 按参数名取值；接受带或不带 `@` 的写法。
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.get_key_value(name).map(|(_, v)| v)
    }

    /// 同 [`Params::get`]，同时返回参数表中保存的完整参数名。
    pub fn get_key_value(&self, name: &str) -> Option<(&str, &SqlValue)> {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => *self.index.get(&with_prefix(name))?,
        };
        self.entries.get(i).map(|(k, v)| (k.as_str(), v))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: AsRef<str>, V: Into<SqlValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

pub(crate) fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn sanitize(key: &str) -> String {
    let s: String = key
        .trim()
        .chars()
        .map(|c| if is_name_char(c) { c } else { '_' })
        .collect();
    if s.is_empty() { "p".to_string() } else { s }
}

fn with_prefix(name: &str) -> String {
    if name.starts_with(PARAM_PREFIX) {
        name.to_string()
    } else {
        format!("{PARAM_PREFIX}{name}")
    }
}
