//! Budget period representation
//!
//! Budgets are set per calendar month (`2025-01`) or per ISO week (`2025-W03`).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum BudgetPeriod {
    /// Monthly period (e.g., "2025-01")
    Monthly { year: i32, month: u32 },

    /// ISO week period (e.g., "2025-W03")
    Weekly { year: i32, week: u32 },
}

impl BudgetPeriod {
    pub fn monthly(year: i32, month: u32) -> Self {
        Self::Monthly { year, month }
    }

    pub fn weekly(year: i32, week: u32) -> Self {
        Self::Weekly { year, week }
    }

    /// The monthly period containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        Self::Monthly {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The ISO week containing `date`
    pub fn week_of(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self::Weekly {
            year: iso.year(),
            week: iso.week(),
        }
    }

    pub fn current_month() -> Self {
        Self::month_of(chrono::Local::now().date_naive())
    }

    pub fn is_weekly(&self) -> bool {
        matches!(self, Self::Weekly { .. })
    }

    /// Get the start date of this period
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Self::Monthly { year, month } => NaiveDate::from_ymd_opt(*year, *month, 1),
            Self::Weekly { year, week } => NaiveDate::from_isoywd_opt(*year, *week, Weekday::Mon),
        }
        .unwrap_or(NaiveDate::MIN)
    }

    /// Get the end date of this period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        match self {
            Self::Monthly { .. } => self.next().start_date() - Duration::days(1),
            Self::Weekly { .. } => self.start_date() + Duration::days(6),
        }
    }

    /// Check if a date falls within this period
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// Get the next period
    pub fn next(&self) -> Self {
        match self {
            Self::Monthly { year, month } => {
                if *month == 12 {
                    Self::Monthly {
                        year: *year + 1,
                        month: 1,
                    }
                } else {
                    Self::Monthly {
                        year: *year,
                        month: *month + 1,
                    }
                }
            }
            Self::Weekly { .. } => Self::week_of(self.start_date() + Duration::days(7)),
        }
    }

    /// Get the previous period
    pub fn prev(&self) -> Self {
        match self {
            Self::Monthly { year, month } => {
                if *month == 1 {
                    Self::Monthly {
                        year: *year - 1,
                        month: 12,
                    }
                } else {
                    Self::Monthly {
                        year: *year,
                        month: *month - 1,
                    }
                }
            }
            Self::Weekly { .. } => Self::week_of(self.start_date() - Duration::days(7)),
        }
    }

    /// Parse a period string
    ///
    /// Formats:
    /// - Monthly: "2025-01"
    /// - Weekly: "2025-W03"
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        if let Some((year, week)) = s.split_once("-W") {
            let year: i32 = year
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
            let week: u32 = week
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
            if NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).is_none() {
                return Err(PeriodParseError::InvalidWeek(week));
            }
            return Ok(Self::Weekly { year, week });
        }

        if let Some((year, month)) = s.split_once('-') {
            let year: i32 = year
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
            let month: u32 = month
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

            if !(1..=12).contains(&month) {
                return Err(PeriodParseError::InvalidMonth(month));
            }

            return Ok(Self::Monthly { year, month });
        }

        Err(PeriodParseError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Weekly { year, week } => write!(f, "{:04}-W{:02}", year, week),
        }
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
    InvalidWeek(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => {
                write!(f, "Invalid period '{}', expected YYYY-MM or YYYY-Www", s)
            }
            Self::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
            Self::InvalidWeek(w) => write!(f, "Invalid ISO week: {}", w),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_bounds() {
        let period = BudgetPeriod::monthly(2024, 2);
        assert_eq!(period.start_date(), date(2024, 2, 1));
        assert_eq!(period.end_date(), date(2024, 2, 29));
        assert!(period.contains(date(2024, 2, 15)));
        assert!(!period.contains(date(2024, 3, 1)));

        let december = BudgetPeriod::monthly(2024, 12);
        assert_eq!(december.end_date(), date(2024, 12, 31));
    }

    #[test]
    fn test_weekly_bounds() {
        let period = BudgetPeriod::weekly(2025, 1);
        assert_eq!(period.start_date(), date(2024, 12, 30));
        assert_eq!(period.end_date(), date(2025, 1, 5));
    }

    #[test]
    fn test_navigation() {
        assert_eq!(
            BudgetPeriod::monthly(2024, 12).next(),
            BudgetPeriod::monthly(2025, 1)
        );
        assert_eq!(
            BudgetPeriod::monthly(2025, 1).prev(),
            BudgetPeriod::monthly(2024, 12)
        );
        // 2020 has 53 ISO weeks
        assert_eq!(
            BudgetPeriod::weekly(2020, 53).next(),
            BudgetPeriod::weekly(2021, 1)
        );
        assert_eq!(
            BudgetPeriod::weekly(2021, 1).prev(),
            BudgetPeriod::weekly(2020, 53)
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(
            BudgetPeriod::parse("2025-01").unwrap(),
            BudgetPeriod::monthly(2025, 1)
        );
        assert_eq!(
            BudgetPeriod::parse("2025-W03").unwrap(),
            BudgetPeriod::weekly(2025, 3)
        );
        assert_eq!(BudgetPeriod::weekly(2025, 3).to_string(), "2025-W03");
        assert_eq!(BudgetPeriod::monthly(2025, 1).to_string(), "2025-01");

        assert_eq!(
            BudgetPeriod::parse("2025-13"),
            Err(PeriodParseError::InvalidMonth(13))
        );
        assert_eq!(
            BudgetPeriod::parse("2025-W60"),
            Err(PeriodParseError::InvalidWeek(60))
        );
        assert!(BudgetPeriod::parse("soon").is_err());
    }

    #[test]
    fn test_week_of() {
        assert_eq!(
            BudgetPeriod::week_of(date(2025, 1, 15)),
            BudgetPeriod::weekly(2025, 3)
        );
    }
}
