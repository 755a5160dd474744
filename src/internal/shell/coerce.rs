//! Argument coercion: raw string token → typed [`Value`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use super::{
    error::{ShellError, ShellResult},
    kind::{ParamKind, Value},
    registry::Param,
};

/// Date/time layouts accepted besides RFC 3339, tried in order.
const DATE_TIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, interpreted as midnight.
const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Convert `raw` into a value of `param`'s kind.
///
/// `position` is the zero-based argument position, used in the error.
pub fn coerce(param: &Param, position: usize, raw: &str) -> ShellResult<Value> {
    let kind = param.kind();
    let failed = || ShellError::Coercion {
        argument: param.name().to_string(),
        position,
        kind,
        value: raw.to_string(),
    };

    let value = match kind {
        ParamKind::String => Value::String(raw.to_string()),
        ParamKind::Int16 => Value::Int16(parse(raw).ok_or_else(failed)?),
        ParamKind::Int32 => Value::Int32(parse(raw).ok_or_else(failed)?),
        ParamKind::Int64 => Value::Int64(parse(raw).ok_or_else(failed)?),
        ParamKind::UInt16 => Value::UInt16(parse(raw).ok_or_else(failed)?),
        ParamKind::UInt32 => Value::UInt32(parse(raw).ok_or_else(failed)?),
        ParamKind::UInt64 => Value::UInt64(parse(raw).ok_or_else(failed)?),
        ParamKind::Byte => Value::Byte(parse(raw).ok_or_else(failed)?),
        ParamKind::Single => Value::Single(parse(raw).ok_or_else(failed)?),
        ParamKind::Double => Value::Double(parse(raw).ok_or_else(failed)?),
        ParamKind::Decimal => Value::Decimal(parse_decimal(raw).ok_or_else(failed)?),
        ParamKind::Boolean => Value::Boolean(parse_bool(raw).ok_or_else(failed)?),
        ParamKind::Char => Value::Char(parse_char(raw).ok_or_else(failed)?),
        ParamKind::DateTime => Value::DateTime(parse_date_time(raw).ok_or_else(failed)?),
        ParamKind::Opaque(_) => {
            return Err(ShellError::UnsupportedKind {
                argument: param.name().to_string(),
                kind,
            });
        }
    };

    Ok(value)
}

fn parse<T: FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok()
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_char(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.naive_utc());
    }

    DATE_TIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(trimmed, layout).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
