//! OFX/QFX statement extraction
//!
//! Handles both SGML-style files (leaf tags left unclosed) and XML-style
//! files by reading each field up to the next tag or line break.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::fields::parse_amount;
use super::{ParsedRow, RowResult};

fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<STMTTRN>(.*?)</STMTTRN>").expect("invalid STMTTRN regex")
    })
}

/// Transaction fields read from each block
const FIELD_TAGS: &[&str] = &["DTPOSTED", "TRNAMT", "NAME", "PAYEE", "MEMO", "FITID"];

fn field_patterns() -> &'static HashMap<&'static str, Regex> {
    static PATTERNS: OnceLock<HashMap<&'static str, Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        FIELD_TAGS
            .iter()
            .filter_map(|tag| {
                let pattern = format!(r"(?i)<{}>\s*([^<\r\n]*)", regex::escape(tag));
                Regex::new(&pattern).ok().map(|re| (*tag, re))
            })
            .collect()
    })
}

fn field(block: &str, tag: &str) -> Option<String> {
    field_patterns()
        .get(tag)?
        .captures(block)
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn looks_like_ofx(content: &str) -> bool {
    let head: String = content.chars().take(2048).collect::<String>().to_uppercase();
    head.contains("OFXHEADER") || head.contains("<OFX>")
}

/// `20250115120000.000[-5:EST]` → 2025-01-15
fn parse_ofx_date(s: &str) -> Option<NaiveDate> {
    let digits: String = s.chars().take(8).collect();
    NaiveDate::parse_from_str(&digits, "%Y%m%d").ok()
}

pub fn parse(content: &str) -> Vec<RowResult> {
    block_pattern()
        .captures_iter(content)
        .enumerate()
        .map(|(idx, caps)| parse_block(&caps[1], idx + 1))
        .collect()
}

fn parse_block(block: &str, row_number: usize) -> RowResult {
    let posted = field(block, "DTPOSTED")
        .ok_or_else(|| (row_number, "Transaction has no DTPOSTED".to_string()))?;
    let date = parse_ofx_date(&posted)
        .ok_or_else(|| (row_number, format!("Invalid DTPOSTED '{}'", posted)))?;

    let amount = field(block, "TRNAMT")
        .ok_or_else(|| (row_number, "Transaction has no TRNAMT".to_string()))?;
    let amount = parse_amount(&amount).map_err(|e| (row_number, e))?;

    let name = field(block, "NAME").or_else(|| field(block, "PAYEE"));
    let memo = field(block, "MEMO");
    let (description, memo) = match (name, memo) {
        (Some(name), memo) => (name, memo.unwrap_or_default()),
        (None, Some(memo)) => (memo, String::new()),
        (None, None) => (String::new(), String::new()),
    };

    Ok(ParsedRow {
        date,
        amount,
        description,
        memo,
        category: None,
        external_id: field(block, "FITID"),
        row_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SGML: &str = "\
OFXHEADER:100
DATA:OFXSGML
VERSION:102

<OFX>
<BANKMSGSRSV1><STMTTRNRS><STMTRS>
<BANKTRANLIST>
<STMTTRN>
<TRNTYPE>DEBIT
<DTPOSTED>20250115120000[-5:EST]
<TRNAMT>-42.50
<FITID>2025011501
<NAME>CORNER MARKET
<MEMO>POS PURCHASE
</STMTTRN>
<STMTTRN>
<TRNTYPE>CREDIT
<DTPOSTED>20250116
<TRNAMT>1500.00
<FITID>2025011602
<MEMO>PAYROLL DEPOSIT
</STMTTRN>
</BANKTRANLIST>
</STMTRS></STMTTRNRS></BANKMSGSRSV1>
</OFX>
";

    const XML: &str = r#"<?xml version="1.0"?>
<OFX><BANKTRANLIST>
<STMTTRN><TRNTYPE>DEBIT</TRNTYPE><DTPOSTED>20250201</DTPOSTED><TRNAMT>-9.99</TRNAMT><FITID>X1</FITID><NAME>STREAMING CO</NAME></STMTTRN>
</BANKTRANLIST></OFX>"#;

    #[test]
    fn test_field_patterns_cover_every_tag() {
        assert_eq!(field_patterns().len(), FIELD_TAGS.len());
        assert_eq!(field("<TRNAMT>-1.00\n", "TRNAMT").as_deref(), Some("-1.00"));
        assert_eq!(field("<TRNAMT>-1.00\n", "CHECKNUM"), None);
    }

    #[test]
    fn test_sgml_blocks() {
        assert!(looks_like_ofx(SGML));
        let rows = parse(SGML);
        assert_eq!(rows.len(), 2);

        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(first.amount.cents(), -4_250);
        assert_eq!(first.description, "CORNER MARKET");
        assert_eq!(first.memo, "POS PURCHASE");
        assert_eq!(first.external_id.as_deref(), Some("2025011501"));

        // No NAME: the memo becomes the description
        let second = rows[1].as_ref().unwrap();
        assert_eq!(second.description, "PAYROLL DEPOSIT");
        assert_eq!(second.amount.cents(), 150_000);
    }

    #[test]
    fn test_xml_blocks() {
        assert!(looks_like_ofx(XML));
        let rows = parse(XML);
        assert_eq!(rows.len(), 1);
        let row = rows[0].as_ref().unwrap();
        assert_eq!(row.description, "STREAMING CO");
        assert_eq!(row.external_id.as_deref(), Some("X1"));
    }

    #[test]
    fn test_missing_amount_is_an_error_row() {
        let rows = parse("<STMTTRN><DTPOSTED>20250101</STMTTRN>");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].as_ref().unwrap_err().1.contains("TRNAMT"));
    }
}
