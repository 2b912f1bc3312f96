//! Domain model for a transaction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Kind of money movement a transaction represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (food sales, drinks, delivery, ...).
    Income,
    /// Money going out (ingredients, wages, utilities, ...).
    Expense,
}

impl TransactionKind {
    /// The lowercase wire name, as stored under `/transactions/<id>/kind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

/// The persisted fields of a transaction, without the store-assigned id.
///
/// This shape is both the input to `create_transaction` and the value type
/// of the snapshot/backup maps, mirroring the store layout
/// `/transactions/<id>/{kind, date, category, amount, description}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub kind: TransactionKind,
    /// Calendar date of the movement (`YYYY-MM-DD`, the user's local day).
    pub date: NaiveDate,
    /// Category label, drawn from the taxonomy for this kind.
    pub category: String,
    /// Amount in currency units. Must be finite and greater than zero.
    pub amount: f64,
    /// Optional free text, empty when not provided.
    #[serde(default)]
    pub description: String,
}

impl TransactionRecord {
    /// Validate user input before it reaches the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::AmountNotPositive);
        }
        Ok(())
    }
}

/// A stored transaction: the persisted fields plus the store-assigned id.
///
/// The id is opaque and immutable; by convention it sorts by creation time,
/// but uniqueness is the only guarantee the store makes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    /// Materialize a stored record under its store id.
    pub fn from_record(id: String, record: TransactionRecord) -> Self {
        Self {
            id,
            kind: record.kind,
            date: record.date,
            category: record.category,
            amount: record.amount,
            description: record.description,
        }
    }

    /// The id-less persisted fields, as written to the store.
    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            kind: self.kind,
            date: self.date,
            category: self.category.clone(),
            amount: self.amount,
            description: self.description.clone(),
        }
    }
}

/// Parse a `YYYY-MM-DD` form field into a calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: f64, category: &str) -> TransactionRecord {
        TransactionRecord {
            kind: TransactionKind::Expense,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            category: category.to_string(),
            amount,
            description: String::new(),
        }
    }

    #[test]
    fn test_validate_accepts_positive_amount() {
        assert!(record(100.0, "ค่าวัตถุดิบ").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_and_negative_amounts() {
        assert_eq!(
            record(0.0, "ค่าวัตถุดิบ").validate(),
            Err(ValidationError::AmountNotPositive)
        );
        assert_eq!(
            record(-50.0, "ค่าวัตถุดิบ").validate(),
            Err(ValidationError::AmountNotPositive)
        );
        assert_eq!(
            record(f64::NAN, "ค่าวัตถุดิบ").validate(),
            Err(ValidationError::AmountNotPositive)
        );
    }

    #[test]
    fn test_validate_rejects_missing_category() {
        assert_eq!(
            record(100.0, "  ").validate(),
            Err(ValidationError::MissingCategory)
        );
    }

    #[test]
    fn test_record_wire_format() {
        let json = serde_json::to_value(record(150.0, "ขายอาหาร")).unwrap();
        assert_eq!(json["kind"], "expense");
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["amount"], 150.0);
        assert_eq!(json["description"], "");
    }

    #[test]
    fn test_record_description_defaults_to_empty() {
        let parsed: TransactionRecord = serde_json::from_str(
            r#"{"kind":"income","date":"2024-05-02","category":"ขายอาหาร","amount":500}"#,
        )
        .unwrap();
        assert_eq!(parsed.description, "");
        assert_eq!(parsed.kind, TransactionKind::Income);
    }

    #[test]
    fn test_round_trip_through_record() {
        let transaction = Transaction::from_record("txn-1-a".to_string(), record(42.5, "ค่าแก๊ส"));
        assert_eq!(
            Transaction::from_record("txn-1-a".to_string(), transaction.to_record()),
            transaction
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
        assert_eq!(
            parse_date("01/05/2024"),
            Err(ValidationError::InvalidDate("01/05/2024".to_string()))
        );
    }
}
