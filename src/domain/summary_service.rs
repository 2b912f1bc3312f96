//! Dashboard aggregation over the transaction log.
//!
//! Pure calculations over an immutable snapshot of the mirrored state:
//! nothing here touches the store. Sums fold every matching transaction,
//! duplicates included, and an empty match always yields zero.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::models::{Budget, Transaction, TransactionKind};

/// Income, expense and profit for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
}

/// Month-to-date totals and budget standing for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
    /// Expense budget minus monthly expense. Goes negative when the budget
    /// is exceeded; that is a reportable state, not an error.
    pub remaining_budget: f64,
    /// Profit against the monthly profit target, as a whole percent in
    /// `0..=100`. Zero when no target is set.
    pub profit_progress: u8,
}

/// Progress of a current value against a monthly target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetProgress {
    /// Whole percent, clamped to `0..=100`.
    pub percent: u8,
    /// Whether the current value passed the target. Independent of the
    /// clamping above, so an over-spent budget still reads `exceeded` at
    /// 100%.
    pub exceeded: bool,
}

/// Stateless calculation service for the dashboard cards.
#[derive(Debug, Clone, Default)]
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Sum the amounts of every transaction of `kind` whose date satisfies
    /// the predicate.
    pub fn sum_for_kind<F>(
        &self,
        transactions: &[Transaction],
        kind: TransactionKind,
        matches: F,
    ) -> f64
    where
        F: Fn(NaiveDate) -> bool,
    {
        transactions
            .iter()
            .filter(|t| t.kind == kind && matches(t.date))
            .map(|t| t.amount)
            .sum()
    }

    /// Totals for the exact calendar day `today`.
    pub fn daily_summary(&self, transactions: &[Transaction], today: NaiveDate) -> DailySummary {
        let income = self.sum_for_kind(transactions, TransactionKind::Income, |date| date == today);
        let expense =
            self.sum_for_kind(transactions, TransactionKind::Expense, |date| date == today);
        DailySummary {
            income,
            expense,
            profit: income - expense,
        }
    }

    /// Totals and budget standing for the calendar month containing `now`.
    pub fn monthly_summary(
        &self,
        transactions: &[Transaction],
        budget: &Budget,
        now: NaiveDate,
    ) -> MonthlySummary {
        let in_month = |date: NaiveDate| date.year() == now.year() && date.month() == now.month();
        let income = self.sum_for_kind(transactions, TransactionKind::Income, in_month);
        let expense = self.sum_for_kind(transactions, TransactionKind::Expense, in_month);
        let profit = income - expense;
        MonthlySummary {
            income,
            expense,
            profit,
            remaining_budget: budget.monthly_expense_budget - expense,
            profit_progress: self
                .budget_progress(profit, budget.monthly_profit_target)
                .percent,
        }
    }

    /// The `limit` transactions with the latest date first. Equal dates keep
    /// their insertion order (stable sort).
    pub fn recent_transactions(
        &self,
        transactions: &[Transaction],
        limit: usize,
    ) -> Vec<Transaction> {
        let mut recent = transactions.to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(limit);
        recent
    }

    /// Progress of `current` against `target`, the one primitive behind the
    /// income, expense and profit progress bars.
    ///
    /// A target of zero (or less) reads as 0% rather than dividing by zero.
    pub fn budget_progress(&self, current: f64, target: f64) -> BudgetProgress {
        let percent = if target > 0.0 {
            (100.0 * current / target).clamp(0.0, 100.0).round() as u8
        } else {
            0
        };
        BudgetProgress {
            percent,
            exceeded: current > target,
        }
    }
}
