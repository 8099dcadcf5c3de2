//! Spreadsheet (CSV/TSV) statement parsing with column guessing

use csv::{ReaderBuilder, StringRecord};

use super::fields::{parse_amount, parse_date};
use super::{ParsedRow, RowResult};

/// Column positions for one CSV layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: Option<usize>,
    /// Signed amount column
    pub amount: Option<usize>,
    /// Money out, as a positive number
    pub debit: Option<usize>,
    /// Money in, as a positive number
    pub credit: Option<usize>,
    pub description: Option<usize>,
    pub memo: Option<usize>,
    pub category: Option<usize>,
    pub has_header: bool,
}

impl ColumnMapping {
    /// Headerless `date, description, amount`
    pub fn positional() -> Self {
        Self {
            date: Some(0),
            description: Some(1),
            amount: Some(2),
            has_header: false,
            ..Self::default()
        }
    }

    /// Guess columns from header names, case-insensitively
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut mapping = Self {
            has_header: true,
            ..Self::default()
        };

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();
            let has = |words: &[&str]| words.iter().any(|w| h.contains(w));

            if has(&["debit", "withdrawal", "outflow"]) {
                mapping.debit.get_or_insert(idx);
            } else if has(&["credit", "deposit", "inflow"]) {
                mapping.credit.get_or_insert(idx);
            } else if has(&["date", "posted"]) {
                mapping.date.get_or_insert(idx);
            } else if has(&["amount"]) {
                mapping.amount.get_or_insert(idx);
            } else if has(&["description", "payee", "merchant", "name", "details"]) {
                mapping.description.get_or_insert(idx);
            } else if has(&["memo", "note", "reference"]) {
                mapping.memo.get_or_insert(idx);
            } else if has(&["category"]) {
                mapping.category.get_or_insert(idx);
            }
        }

        mapping
    }

    fn is_usable(&self) -> bool {
        self.date.is_some() && (self.amount.is_some() || self.debit.is_some() || self.credit.is_some())
    }
}

/// Pick the delimiter that appears most often in the first line
pub fn sniff_delimiter(content: &str) -> u8 {
    let first_line = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    [b',', b';', b'\t']
        .into_iter()
        .max_by_key(|d| first_line.matches(*d as char).count())
        .filter(|d| first_line.contains(*d as char))
        .unwrap_or(b',')
}

/// A first row whose leading field is a date is data, not a header
fn looks_like_data_row(record: &StringRecord) -> bool {
    record.get(0).and_then(parse_date).is_some()
}

/// Detect the layout from the first record
pub fn detect_mapping(first: &StringRecord) -> ColumnMapping {
    if looks_like_data_row(first) {
        ColumnMapping::positional()
    } else {
        ColumnMapping::from_headers(first)
    }
}

pub fn parse(content: &str) -> Result<Vec<RowResult>, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(sniff_delimiter(content))
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let first = match records.next() {
        Some(record) => record.map_err(|e| format!("Error reading CSV: {}", e))?,
        None => return Ok(Vec::new()),
    };

    let mapping = detect_mapping(&first);
    if !mapping.is_usable() {
        return Err(
            "Could not find date and amount columns in the CSV header".to_string(),
        );
    }

    let mut rows = Vec::new();
    if !mapping.has_header {
        rows.push(parse_record(&first, &mapping, 1));
    }

    for (idx, result) in records.enumerate() {
        // Row numbers are 1-based over the whole file
        let row_number = idx + 2;
        match result {
            Ok(record) => {
                if record.iter().all(|f| f.is_empty()) {
                    continue;
                }
                rows.push(parse_record(&record, &mapping, row_number));
            }
            Err(e) => rows.push(Err((row_number, format!("Error reading CSV record: {}", e)))),
        }
    }

    Ok(rows)
}

fn parse_record(record: &StringRecord, mapping: &ColumnMapping, row_number: usize) -> RowResult {
    let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").trim();

    let date_str = field(mapping.date);
    let date = parse_date(date_str)
        .ok_or_else(|| (row_number, format!("Could not parse date '{}'", date_str)))?;

    let amount = if mapping.amount.is_some() && !field(mapping.amount).is_empty() {
        parse_amount(field(mapping.amount)).map_err(|e| (row_number, e))?
    } else {
        let debit = field(mapping.debit);
        let credit = field(mapping.credit);
        if debit.is_empty() && credit.is_empty() {
            return Err((row_number, "Row has no amount".to_string()));
        }
        let debit = if debit.is_empty() {
            Default::default()
        } else {
            parse_amount(debit).map_err(|e| (row_number, e))?.abs()
        };
        let credit = if credit.is_empty() {
            Default::default()
        } else {
            parse_amount(credit).map_err(|e| (row_number, e))?.abs()
        };
        credit - debit
    };

    let category = field(mapping.category);
    Ok(ParsedRow {
        date,
        amount,
        description: field(mapping.description).to_string(),
        memo: field(mapping.memo).to_string(),
        category: (!category.is_empty()).then(|| category.to_string()),
        external_id: None,
        row_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_header_guessing() {
        let headers = StringRecord::from(vec![
            "Posted Date",
            "Merchant Name",
            "Category",
            "Amount",
            "Reference",
        ]);
        let mapping = ColumnMapping::from_headers(&headers);
        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.description, Some(1));
        assert_eq!(mapping.category, Some(2));
        assert_eq!(mapping.amount, Some(3));
        assert_eq!(mapping.memo, Some(4));
    }

    #[test]
    fn test_signed_amount_csv() {
        let content = "Date,Description,Amount,Category\n\
                       2025-01-15,Test Store,-50.00,Groceries\n\
                       2025-01-16,Paycheck,\"2,500.00\",\n";
        let rows = parse(content).unwrap();
        assert_eq!(rows.len(), 2);

        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.date, date(2025, 1, 15));
        assert_eq!(first.amount.cents(), -5_000);
        assert_eq!(first.category.as_deref(), Some("Groceries"));
        assert_eq!(first.row_number, 2);

        let second = rows[1].as_ref().unwrap();
        assert_eq!(second.amount.cents(), 250_000);
        assert!(second.category.is_none());
    }

    #[test]
    fn test_debit_credit_semicolon() {
        let content = "Date;Omschrijving;Debit;Credit\n\
                       15.01.2025;Bakery;4,20;\n\
                       16.01.2025;Refund;;12,00\n";
        // "Omschrijving" is not a known description header; the row still parses
        let rows = parse(content).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_ref().unwrap().amount.cents(), -420);
        assert_eq!(rows[1].as_ref().unwrap().amount.cents(), 1_200);
    }

    #[test]
    fn test_headerless_positional() {
        let content = "01/15/2025,Coffee,-3.50\n01/16/2025,Lunch,(12.00)\n";
        let rows = parse(content).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_ref().unwrap().row_number, 1);
        assert_eq!(rows[0].as_ref().unwrap().description, "Coffee");
        assert_eq!(rows[1].as_ref().unwrap().amount.cents(), -1_200);
    }

    #[test]
    fn test_bad_rows_reported() {
        let content = "Date,Description,Amount\nnot a date,X,1.00\n2025-01-01,Y,abc\n";
        let rows = parse(content).unwrap();
        assert_eq!(rows[0].as_ref().unwrap_err().0, 2);
        assert!(rows[1].as_ref().unwrap_err().1.contains("abc"));
    }

    #[test]
    fn test_unusable_header() {
        assert!(parse("Foo,Bar\n1,2\n").is_err());
    }

    #[test]
    fn test_tab_delimiter() {
        assert_eq!(sniff_delimiter("Date\tAmount\tPayee"), b'\t');
        assert_eq!(sniff_delimiter("just text"), b',');
    }
}
