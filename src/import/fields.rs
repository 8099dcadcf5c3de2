//! Field-level parsing shared by the statement formats

use chrono::NaiveDate;

use crate::models::Money;

/// Date formats tried in order: ISO, US, EU, dotted, then spelled-out months
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d.%m.%y",
    "%Y%m%d",
    "%b %d, %Y",
    "%d %b %Y",
];

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Parse a bank-formatted amount
///
/// Accepts currency symbols, thousands separators (either convention),
/// accounting parentheses, and a trailing `-`, `CR` or `DR` marker. More
/// than two decimal places is an error rather than a silent truncation.
pub fn parse_amount(s: &str) -> Result<Money, String> {
    let original = s.trim();
    if original.is_empty() {
        return Err("empty amount".to_string());
    }
    let invalid = || format!("Could not parse amount '{}'", original);

    let mut negative = false;
    let upper = original.to_uppercase();
    let body = if let Some(rest) = upper.strip_suffix("DR") {
        negative = true;
        rest
    } else {
        upper.strip_suffix("CR").unwrap_or(upper.as_str())
    };

    // Symbols and spaces go first so `$(42.10)` and `(42.10) €` both count as accounting negatives
    let mut s: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+' | '(' | ')'))
        .collect();

    if let Some(rest) = s.strip_prefix('-') {
        negative = !negative;
        s = rest.to_string();
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest.to_string();
    }
    if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
        negative = !negative;
        s = s[1..s.len() - 1].to_string();
    }
    if let Some(rest) = s.strip_suffix('-') {
        negative = !negative;
        s = rest.to_string();
    }

    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(invalid());
    }

    let normalized = normalize_separators(&s).ok_or_else(invalid)?;
    let value = Money::parse(&normalized).map_err(|_| invalid())?;

    Ok(if negative { -value } else { value })
}

/// Reduce `1.234,56` / `1,234.56` / `12,50` / `1.234` to a plain `1234.56` form
///
/// Returns `None` when the decimal part has more than two digits.
fn normalize_separators(s: &str) -> Option<String> {
    let decimal = match (s.rfind(','), s.rfind('.')) {
        (Some(c), Some(d)) => Some(if c > d { ',' } else { '.' }),
        (Some(_), None) => decimal_separator(s, ','),
        (None, Some(_)) => decimal_separator(s, '.'),
        (None, None) => None,
    };

    let (whole, frac) = match decimal {
        Some(sep) => s.rsplit_once(sep)?,
        None => (s, ""),
    };

    let whole: String = whole.chars().filter(|c| c.is_ascii_digit()).collect();
    let grouping = s.len() - frac.len() - decimal.map_or(0, |_| 1);
    if decimal.is_some_and(|sep| s[..grouping].contains(sep)) || frac.len() > 2 {
        return None;
    }

    let whole = if whole.is_empty() { "0".to_string() } else { whole };
    Some(if frac.is_empty() {
        whole
    } else {
        format!("{}.{}", whole, frac)
    })
}

/// With only one kind of separator: a lone one followed by exactly three
/// digits, or several of them, group thousands; anything else is decimal
fn decimal_separator(s: &str, sep: char) -> Option<char> {
    let groups: Vec<&str> = s.split(sep).collect();
    let thousands = match groups.as_slice() {
        [lead, tail] => {
            tail.len() == 3 && !lead.is_empty() && lead.len() <= 3 && !lead.starts_with('0')
        }
        [_, ..] => true,
        [] => false,
    };
    if thousands {
        None
    } else {
        Some(sep)
    }
}
