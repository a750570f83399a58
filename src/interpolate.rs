//! 插值：把 `@name` 直接替换为字面量，得到可读的 SQL。
//!
//! 安全警告：插值永远不如参数绑定安全；仅用于日志与排查问题，不要拿去执行。

use crate::flavor::{Flavor, InterpolateError};
use crate::statement::{Statement, rewrite_params};
use crate::value::{SqlDateTime, SqlValue};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DT_MICROS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]");
const DT_MILLIS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");
const DT_OFFSET: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

impl Statement {
    pub fn interpolate(&self, flavor: Flavor) -> Result<String, InterpolateError> {
        rewrite_params(self.sql(), |name, out| -> Result<(), InterpolateError> {
            let v = self
                .params()
                .get(name)
                .ok_or_else(|| InterpolateError::MissingArgs(name.to_string()))?;
            encode_value(out, v, flavor)
        })
    }
}

fn encode_value(out: &mut String, v: &SqlValue, flavor: Flavor) -> Result<(), InterpolateError> {
    match v {
        SqlValue::Null => out.push_str("NULL"),
        SqlValue::Bool(b) => match flavor {
            Flavor::SQLServer => out.push_str(if *b { "1" } else { "0" }),
            _ => out.push_str(if *b { "TRUE" } else { "FALSE" }),
        },
        SqlValue::I64(n) => out.push_str(&n.to_string()),
        SqlValue::U64(n) => out.push_str(&n.to_string()),
        SqlValue::F64(n) if n.is_finite() => out.push_str(&n.to_string()),
        SqlValue::F64(_) => return Err(InterpolateError::UnsupportedArgs),
        SqlValue::Text(s) => quote_string(out, s, flavor),
        SqlValue::Bytes(b) => encode_bytes(out, b, flavor),
        SqlValue::DateTime(dt) => encode_datetime(out, dt, flavor)?,
    }
    Ok(())
}

fn encode_bytes(out: &mut String, data: &[u8], flavor: Flavor) {
    if data.is_empty() {
        out.push_str("NULL");
        return;
    }

    match flavor {
        Flavor::MySQL | Flavor::SQLite => {
            out.push_str("X'");
            push_hex(out, data);
            out.push('\'');
        }
        Flavor::PostgreSQL => {
            out.push_str("E'\\\\x");
            push_hex(out, data);
            out.push_str("'::bytea");
        }
        Flavor::SQLServer => {
            out.push_str("0x");
            push_hex(out, data);
        }
    }
}

fn push_hex(out: &mut String, data: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    for &b in data {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0xF) as usize] as char);
    }
}

fn quote_string(out: &mut String, s: &str, flavor: Flavor) {
    match flavor {
        Flavor::PostgreSQL => out.push('E'),
        Flavor::SQLServer => out.push('N'),
        _ => {}
    }

    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\u{0000}' => out.push_str("\\0"),
            '\u{0008}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{001a}' => out.push_str("\\Z"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
}

fn encode_datetime(
    out: &mut String,
    v: &SqlDateTime,
    flavor: Flavor,
) -> Result<(), InterpolateError> {
    // 四舍五入到微秒；接近上限时不再进位
    let dt = v
        .dt
        .checked_add(time::Duration::nanoseconds(500))
        .unwrap_or(v.dt);
    let fmt = |items: &[BorrowedFormatItem<'_>]| {
        dt.format(items)
            .map_err(|_| InterpolateError::UnsupportedArgs)
    };

    out.push('\'');
    match flavor {
        Flavor::MySQL => out.push_str(&fmt(DT_MICROS)?),
        Flavor::SQLite => out.push_str(&fmt(DT_MILLIS)?),
        Flavor::PostgreSQL => {
            out.push_str(&fmt(DT_MICROS)?);
            out.push(' ');
            match &v.tz_abbr {
                Some(abbr) => out.push_str(abbr),
                None => out.push_str(&fmt(DT_OFFSET)?),
            }
        }
        Flavor::SQLServer => {
            out.push_str(&fmt(DT_MICROS)?);
            out.push(' ');
            out.push_str(&fmt(DT_OFFSET)?);
        }
    }
    out.push('\'');
    Ok(())
}
