//! Domain model for the monthly budget record.

use serde::{Deserialize, Serialize};

/// Monthly targets and limits. One record per deployment, overwritten whole
/// on every update; absent fields read as zero.
///
/// Wire names are camelCase, matching the store layout
/// `/budget/{monthlyIncomeTarget, monthlyExpenseBudget, monthlyProfitTarget,
/// materialBudget}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Budget {
    pub monthly_income_target: f64,
    pub monthly_expense_budget: f64,
    pub monthly_profit_target: f64,
    /// Budget earmarked for raw materials.
    pub material_budget: f64,
}
