//! SQL 文本拼接：子句之间以单个空格分隔。

#[derive(Debug, Default, Clone)]
pub(crate) struct StringBuilder {
    buf: String,
}

impl StringBuilder {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            buf: String::with_capacity(n),
        }
    }

    /// 写入 `s`；如果不是首次写入，会先写入一个空格。
    pub(crate) fn write_leading(&mut self, s: &str) {
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }
        self.buf.push_str(s);
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// 以 `write_leading` 语义写入任意 `Display` 片段。
    pub(crate) fn write_display(&mut self, v: &impl std::fmt::Display) {
        use std::fmt::Write;
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }
        let _ = write!(self.buf, "{v}");
    }

    pub(crate) fn into_string(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::StringBuilder;

    #[test]
    fn leading_space_only_between_writes() {
        let mut b = StringBuilder::with_capacity(16);
        b.write_leading("SELECT");
        b.write_str(" *");
        b.write_leading("FROM t");
        b.write_display(&42);
        assert_eq!(b.into_string(), "SELECT * FROM t 42");
    }
}
