//! Plain-text bank statement extraction
//!
//! Matches lines of the form `DD/MM/YYYY  description  amount [balance]`.
//! Headers, page footers and anything else that does not match are ignored.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::fields::parse_amount;
use super::{ParsedRow, RowResult};

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(\d{2}/\d{2}/\d{4})\s+(.+?)\s+(\(?-?[\d,]+\.\d{2}\)?(?:\s?(?:CR|DR))?)(?:\s+(\(?-?[\d,]+\.\d{2}\)?(?:\s?(?:CR|DR))?))?\s*$",
        )
        .expect("statement pattern is valid")
    })
}

/// Whether any line of `content` looks like a statement row
pub fn looks_like_statement(content: &str) -> bool {
    content.lines().any(|line| line_pattern().is_match(line))
}

pub fn parse(content: &str) -> Vec<RowResult> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let caps = line_pattern().captures(line)?;
            let row_number = idx + 1;
            Some(parse_captures(&caps, row_number))
        })
        .collect()
}

fn parse_captures(caps: &regex::Captures<'_>, row_number: usize) -> RowResult {
    let date_str = &caps[1];
    let date = NaiveDate::parse_from_str(date_str, "%d/%m/%Y")
        .map_err(|_| (row_number, format!("Invalid date '{}'", date_str)))?;
    let amount = parse_amount(&caps[3]).map_err(|e| (row_number, e))?;

    Ok(ParsedRow {
        date,
        amount,
        description: caps[2].trim().to_string(),
        memo: String::new(),
        category: None,
        external_id: None,
        row_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
FIRST EXAMPLE BANK            Statement of account
Date        Description                     Amount      Balance
03/01/2025  OPENING BALANCE CARRIED         0.00        1,000.00
05/01/2025  CARD PURCHASE GROCER #114       -45.20      954.80
07/01/2025  SALARY ACME LTD                 2,150.00    3,104.80
09/01/2025  DIRECT DEBIT GYM                19.99 DR
Page 1 of 1
";

    #[test]
    fn test_extracts_rows_and_ignores_noise() {
        let rows = parse(SAMPLE);
        assert_eq!(rows.len(), 4);

        let purchase = rows[1].as_ref().unwrap();
        assert_eq!(purchase.date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert_eq!(purchase.description, "CARD PURCHASE GROCER #114");
        assert_eq!(purchase.amount.cents(), -4_520);
        assert_eq!(purchase.row_number, 4);

        assert_eq!(rows[2].as_ref().unwrap().amount.cents(), 215_000);
        assert_eq!(rows[3].as_ref().unwrap().amount.cents(), -1_999);
    }

    #[test]
    fn test_parenthesized_balance_stays_out_of_the_amount() {
        let rows = parse("12/03/2025  PURCHASE  10.00  (5.00)\n");
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.description, "PURCHASE");
        assert_eq!(row.amount.cents(), 1_000);
    }

    #[test]
    fn test_invalid_calendar_date_is_an_error_row() {
        let rows = parse("31/02/2025  NOT A DAY  10.00\n");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_err());
    }

    #[test]
    fn test_detection() {
        assert!(looks_like_statement(SAMPLE));
        assert!(!looks_like_statement("Date,Amount\n2025-01-01,1.00"));
    }
}
