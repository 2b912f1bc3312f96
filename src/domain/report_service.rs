//! Period reports over the transaction log.
//!
//! A report runs over an inclusive calendar-date window derived from a
//! reference "now" in the user's local calendar. Like the dashboard sums,
//! everything here is a pure fold over the mirrored snapshot.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::models::{Transaction, TransactionKind, ValidationError};

/// An inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Reporting period selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Today,
    /// Current week; weeks start on Sunday.
    Week,
    /// Current month, from the 1st.
    Month,
    /// Current year, from January 1st.
    Year,
    /// User-supplied range. Both endpoints are required; a missing endpoint
    /// is rejected rather than guessed.
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl ReportPeriod {
    /// Resolve the period to a concrete window ending at `now`.
    pub fn window(&self, now: NaiveDate) -> Result<DateWindow, ValidationError> {
        let from = match self {
            ReportPeriod::Today => now,
            ReportPeriod::Week => {
                now - Duration::days(i64::from(now.weekday().num_days_from_sunday()))
            }
            ReportPeriod::Month => NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap(),
            ReportPeriod::Year => NaiveDate::from_ymd_opt(now.year(), 1, 1).unwrap(),
            ReportPeriod::Custom {
                from: Some(from),
                to: Some(to),
            } => {
                return Ok(DateWindow {
                    from: *from,
                    to: *to,
                })
            }
            ReportPeriod::Custom { .. } => return Err(ValidationError::MissingDateRange),
        };
        Ok(DateWindow { from, to: now })
    }
}

/// Per-category income/expense totals within a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub category: String,
    pub income: f64,
    pub expense: f64,
}

/// Totals and per-category breakdown for an inclusive date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeReport {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_profit: f64,
    pub breakdown: Vec<CategoryTotals>,
}

/// Stateless calculation service for period reports.
#[derive(Debug, Clone, Default)]
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    /// Group the window's transactions by category, in first-seen order,
    /// with income and expense sub-totals per category.
    pub fn category_breakdown(
        &self,
        transactions: &[Transaction],
        window: DateWindow,
    ) -> Vec<CategoryTotals> {
        let mut groups: Vec<CategoryTotals> = Vec::new();
        for transaction in transactions.iter().filter(|t| window.contains(t.date)) {
            let entry = match groups
                .iter_mut()
                .find(|group| group.category == transaction.category)
            {
                Some(existing) => existing,
                None => {
                    groups.push(CategoryTotals {
                        category: transaction.category.clone(),
                        income: 0.0,
                        expense: 0.0,
                    });
                    groups.last_mut().unwrap()
                }
            };
            match transaction.kind {
                TransactionKind::Income => entry.income += transaction.amount,
                TransactionKind::Expense => entry.expense += transaction.amount,
            }
        }
        groups
    }

    /// Totals and breakdown over the inclusive window.
    pub fn range_report(&self, transactions: &[Transaction], window: DateWindow) -> RangeReport {
        let mut total_income = 0.0;
        let mut total_expense = 0.0;
        for transaction in transactions.iter().filter(|t| window.contains(t.date)) {
            match transaction.kind {
                TransactionKind::Income => total_income += transaction.amount,
                TransactionKind::Expense => total_expense += transaction.amount,
            }
        }
        RangeReport {
            total_income,
            total_expense,
            net_profit: total_income - total_expense,
            breakdown: self.category_breakdown(transactions, window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TransactionRecord;

    fn transaction(kind: TransactionKind, date: &str, category: &str, amount: f64) -> Transaction {
        Transaction::from_record(
            format!("txn-{}-{}", date, amount),
            TransactionRecord {
                kind,
                date: date.parse().unwrap(),
                category: category.to_string(),
                amount,
                description: String::new(),
            },
        )
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_today_window() {
        let window = ReportPeriod::Today.window(date("2024-05-15")).unwrap();
        assert_eq!(window.from, date("2024-05-15"));
        assert_eq!(window.to, date("2024-05-15"));
    }

    #[test]
    fn test_week_window_starts_on_sunday() {
        // 2024-05-15 is a Wednesday; the week began Sunday the 12th.
        let window = ReportPeriod::Week.window(date("2024-05-15")).unwrap();
        assert_eq!(window.from, date("2024-05-12"));
        assert_eq!(window.to, date("2024-05-15"));

        // A Sunday is its own week start.
        let sunday = ReportPeriod::Week.window(date("2024-05-12")).unwrap();
        assert_eq!(sunday.from, date("2024-05-12"));
    }

    #[test]
    fn test_month_and_year_windows() {
        let month = ReportPeriod::Month.window(date("2024-05-15")).unwrap();
        assert_eq!(month.from, date("2024-05-01"));
        assert_eq!(month.to, date("2024-05-15"));

        let year = ReportPeriod::Year.window(date("2024-05-15")).unwrap();
        assert_eq!(year.from, date("2024-01-01"));
    }

    #[test]
    fn test_custom_window_requires_both_endpoints() {
        let period = ReportPeriod::Custom {
            from: Some(date("2024-05-01")),
            to: None,
        };
        assert_eq!(
            period.window(date("2024-05-15")),
            Err(ValidationError::MissingDateRange)
        );

        let full = ReportPeriod::Custom {
            from: Some(date("2024-04-01")),
            to: Some(date("2024-04-30")),
        };
        assert_eq!(
            full.window(date("2024-05-15")).unwrap(),
            DateWindow {
                from: date("2024-04-01"),
                to: date("2024-04-30"),
            }
        );
    }

    #[test]
    fn test_window_is_inclusive_on_both_ends() {
        let window = DateWindow {
            from: date("2024-05-01"),
            to: date("2024-05-31"),
        };
        assert!(window.contains(date("2024-05-01")));
        assert!(window.contains(date("2024-05-31")));
        assert!(!window.contains(date("2024-04-30")));
        assert!(!window.contains(date("2024-06-01")));
    }

    #[test]
    fn test_category_breakdown_merges_same_category() {
        let transactions = vec![
            transaction(TransactionKind::Expense, "2024-05-01", "ค่าวัตถุดิบ", 100.0),
            transaction(TransactionKind::Expense, "2024-05-02", "ค่าวัตถุดิบ", 50.0),
        ];
        let window = DateWindow {
            from: date("2024-05-01"),
            to: date("2024-05-31"),
        };
        let breakdown = ReportService::new().category_breakdown(&transactions, window);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].category, "ค่าวัตถุดิบ");
        assert_eq!(breakdown[0].expense, 150.0);
        assert_eq!(breakdown[0].income, 0.0);
    }

    #[test]
    fn test_category_breakdown_keeps_first_seen_order() {
        let transactions = vec![
            transaction(TransactionKind::Income, "2024-05-01", "ขายอาหาร", 200.0),
            transaction(TransactionKind::Expense, "2024-05-01", "ค่าแก๊ส", 80.0),
            transaction(TransactionKind::Income, "2024-05-02", "ขายอาหาร", 300.0),
        ];
        let window = DateWindow {
            from: date("2024-05-01"),
            to: date("2024-05-31"),
        };
        let breakdown = ReportService::new().category_breakdown(&transactions, window);
        let categories: Vec<&str> = breakdown.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, ["ขายอาหาร", "ค่าแก๊ส"]);
        assert_eq!(breakdown[0].income, 500.0);
    }

    #[test]
    fn test_range_report_totals() {
        let transactions = vec![
            transaction(TransactionKind::Income, "2024-05-01", "ขายอาหาร", 1000.0),
            transaction(TransactionKind::Expense, "2024-05-01", "ค่าวัตถุดิบ", 300.0),
            transaction(TransactionKind::Income, "2024-06-01", "ขายอาหาร", 999.0),
        ];
        let window = DateWindow {
            from: date("2024-05-01"),
            to: date("2024-05-31"),
        };
        let report = ReportService::new().range_report(&transactions, window);
        assert_eq!(report.total_income, 1000.0);
        assert_eq!(report.total_expense, 300.0);
        assert_eq!(report.net_profit, 700.0);
        assert_eq!(report.breakdown.len(), 2);
    }

    #[test]
    fn test_range_report_on_empty_log() {
        let window = DateWindow {
            from: date("2024-05-01"),
            to: date("2024-05-31"),
        };
        let report = ReportService::new().range_report(&[], window);
        assert_eq!(report.total_income, 0.0);
        assert_eq!(report.total_expense, 0.0);
        assert_eq!(report.net_profit, 0.0);
        assert!(report.breakdown.is_empty());
    }
}
