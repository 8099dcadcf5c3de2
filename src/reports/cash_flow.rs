//! Cash Flow Report
//!
//! Income, expense and net per calendar month for the trailing months.

use crate::error::{FintrackError, FintrackResult};
use crate::models::{BudgetPeriod, Money};
use crate::storage::Storage;
use chrono::NaiveDate;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashFlowMonth {
    pub period: BudgetPeriod,
    pub income: Money,
    /// Positive amount spent
    pub expense: Money,
}

impl CashFlowMonth {
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

#[derive(Debug, Clone)]
pub struct CashFlowReport {
    /// Oldest month first, ending with the month containing `today`
    pub months: Vec<CashFlowMonth>,
}

impl CashFlowReport {
    pub fn generate(storage: &Storage, today: NaiveDate, months: usize) -> FintrackResult<Self> {
        let months = months.max(1);
        let mut period = BudgetPeriod::month_of(today);
        let mut periods = Vec::with_capacity(months);
        for _ in 0..months {
            periods.push(period);
            period = period.prev();
        }
        periods.reverse();

        let mut rows = Vec::with_capacity(months);
        for period in periods {
            let transactions = storage
                .transactions
                .get_by_date_range(period.start_date(), period.end_date())?;

            let mut row = CashFlowMonth {
                period,
                income: Money::zero(),
                expense: Money::zero(),
            };
            for txn in transactions {
                if txn.amount.is_positive() {
                    row.income += txn.amount;
                } else {
                    row.expense += -txn.amount;
                }
            }
            rows.push(row);
        }

        Ok(Self { months: rows })
    }

    pub fn total_income(&self) -> Money {
        self.months.iter().map(|m| m.income).sum()
    }

    pub fn total_expense(&self) -> Money {
        self.months.iter().map(|m| m.expense).sum()
    }

    pub fn net(&self) -> Money {
        self.total_income() - self.total_expense()
    }

    /// Largest income or expense figure, for chart scaling
    pub fn peak(&self) -> Money {
        self.months
            .iter()
            .map(|m| m.income.max(m.expense))
            .max()
            .unwrap_or_default()
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str("Cash Flow\n");
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>13} {:>13} {:>13}  {}\n",
            "Month", "Income", "Expense", "Net", ""
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        let peak = self.peak().as_f64();
        for month in &self.months {
            let net = month.net();
            output.push_str(&format!(
                "{:<10} {:>13} {:>13} {:>13}  {}\n",
                month.period.to_string(),
                month.income,
                month.expense,
                net,
                crate::display::format_bar(net.abs().as_f64(), peak, 10),
            ));
        }

        output.push_str(&"-".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>13} {:>13} {:>13}\n",
            "TOTAL",
            self.total_income(),
            self.total_expense(),
            self.net()
        ));
        output
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> FintrackResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["Month", "Income", "Expense", "Net"])?;
        for month in &self.months {
            csv_writer.write_record([
                month.period.to_string(),
                month.income.to_decimal_string(),
                month.expense.to_decimal_string(),
                month.net().to_decimal_string(),
            ])?;
        }
        csv_writer
            .flush()
            .map_err(|e| FintrackError::Export(e.to_string()))?;
        Ok(())
    }
}
