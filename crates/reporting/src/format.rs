//! Number formatting for cards, chart labels and table cells (en-US
//! grouping with `,`).

use serde::Serialize;

/// Formatter applied to a numeric value before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// `$1,235`
    Currency,
    /// `1,234.568` (up to three fraction digits)
    Number,
    /// `1,235` (rounded, no symbol)
    Whole,
    /// `12.34%`
    Percent,
    /// `2.50x`
    Roas,
}

impl ValueFormat {
    pub fn apply(self, value: f64) -> String {
        match self {
            ValueFormat::Currency => format_currency(value),
            ValueFormat::Number => format_number(value, 3),
            ValueFormat::Whole => format_number(value, 0),
            ValueFormat::Percent => format_percent(value),
            ValueFormat::Roas => format_roas(value),
        }
    }
}

/// Round to at most `max_fraction_digits`, drop trailing zeros and group
/// the integer part by thousands.
pub fn format_number(value: f64, max_fraction_digits: usize) -> String {
    let fixed = format!("{:.*}", max_fraction_digits, value);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, frac.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let grouped = group_thousands(digits);
    // -0.0001 rounds to "-0"
    let sign = if grouped == "0" && frac_part.is_empty() { "" } else { sign };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

pub fn format_currency(value: f64) -> String {
    format!("${}", format_number(value, 0))
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn format_roas(value: f64) -> String {
    format!("{value:.2}x")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
