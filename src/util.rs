// Utility helpers for field typing and number formatting.
//
// This module centralizes the "dirty" CSV handling so the rest of the code
// can work with typed cells and plain `f64` scores.
use crate::types::Cell;
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("numeric pattern is valid")
});

/// Type a raw CSV field the way a spreadsheet export expects:
///
/// - blank (after trimming) becomes `Cell::Empty`,
/// - integer/decimal text, optionally signed, becomes `Cell::Number`,
/// - everything else stays text, untrimmed.
pub fn coerce_field(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    if NUMERIC_FIELD.is_match(trimmed) {
        if let Ok(value) = trimmed.parse::<f64>() {
            return Cell::Number {
                value,
                raw: trimmed.to_string(),
            };
        }
    }
    Cell::Text(raw.to_string())
}

/// `part / whole * 100`, rounded half up; 0 when `whole` is 0.
pub fn rounded_percent(part: usize, whole: usize) -> i64 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0 + 0.5).floor() as i64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus thousands separators (e.g. `1,234.50`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Scores are usually whole minutes; print them without decimals when they are.
pub fn format_score(n: f64) -> String {
    if n.fract() == 0.0 {
        format_number(n, 0)
    } else {
        format_number(n, 2)
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
