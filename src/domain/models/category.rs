//! Category taxonomy for transaction forms.
//!
//! Income uses a flat list of labels; expenses use a two-level grouping
//! (recurring vs. non-recurring costs). Both are carried behind one tagged
//! type so form population consumes them uniformly.

use serde::{Deserialize, Serialize};

use super::TransactionKind;

/// A named group of expense categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub categories: Vec<String>,
}

/// The category choices offered for one transaction kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CategorySource {
    /// Ungrouped labels (income).
    Flat(Vec<String>),
    /// Labels under named groups (expense).
    Grouped(Vec<CategoryGroup>),
}

impl CategorySource {
    /// Every selectable label, flattened across groups.
    pub fn names(&self) -> Vec<&str> {
        match self {
            CategorySource::Flat(labels) => labels.iter().map(String::as_str).collect(),
            CategorySource::Grouped(groups) => groups
                .iter()
                .flat_map(|group| group.categories.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Whether the label is one of the selectable choices.
    pub fn contains(&self, label: &str) -> bool {
        self.names().iter().any(|name| *name == label)
    }
}

impl TransactionKind {
    /// The default taxonomy offered for this kind.
    pub fn category_source(&self) -> CategorySource {
        match self {
            TransactionKind::Income => income_categories(),
            TransactionKind::Expense => expense_categories(),
        }
    }
}

/// Default income categories.
pub fn income_categories() -> CategorySource {
    CategorySource::Flat(
        ["ขายอาหาร", "ขายเครื่องดื่ม", "ของหวาน", "เดลิเวอรี่", "อื่นๆ"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

/// Default expense categories, grouped into recurring and non-recurring
/// costs.
pub fn expense_categories() -> CategorySource {
    let group = |name: &str, categories: &[&str]| CategoryGroup {
        name: name.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
    };
    CategorySource::Grouped(vec![
        group(
            "รายจ่ายประจำ",
            &[
                "ค่าวัตถุดิบ",
                "ค่าแรงพนักงาน",
                "ค่าแก๊ส",
                "ค่าไฟฟ้า",
                "ค่าเช่า",
                "ค่าน้ำประปา",
            ],
        ),
        group(
            "รายจ่ายไม่ประจำ",
            &["ซ่อมแซม", "อุปกรณ์เพิ่มเติม", "โปรโมชั่น", "การตลาด", "อื่นๆ"],
        ),
    ])
}
