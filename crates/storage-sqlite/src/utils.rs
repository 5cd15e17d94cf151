//! Helpers shared by the SQLite repositories.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a decimal stored as TEXT.
///
/// Rows written by older builds may hold float notation (`1e3`). Anything
/// that cannot be read at all is logged and treated as zero so that one bad
/// row does not make a whole list unreadable.
pub fn parse_decimal_tolerant(value: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value) {
        Ok(d) => d,
        Err(e_decimal) => match f64::from_str(value) {
            Ok(f) => Decimal::from_f64(f).unwrap_or_else(|| {
                log::error!(
                    "Failed to convert {} '{}' (parsed as f64: {}) to Decimal.",
                    field_name,
                    value,
                    f
                );
                Decimal::ZERO
            }),
            Err(e_f64) => {
                log::error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as f64 (err: {}). Falling back to ZERO.",
                    field_name, value, e_decimal, e_f64
                );
                Decimal::ZERO
            }
        },
    }
}

pub fn parse_optional_decimal_tolerant(value: Option<&str>, field_name: &str) -> Option<Decimal> {
    value.map(|v| parse_decimal_tolerant(v, field_name))
}

/// Normalized TEXT form used for stored amounts.
pub fn decimal_to_db(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Builds a `%query%` LIKE pattern, escaping `%`, `_` and `\` with `\`.
pub fn like_contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
