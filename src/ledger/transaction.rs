use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{category::TransactionType, period::PeriodKey};

/// Largest amount accepted at the write boundary (10^12).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// A single income or expense entry owned by one user.
///
/// `amount` is always a positive magnitude; direction lives in
/// `transaction_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub transaction_type: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDateTime,
}

impl Transaction {
    pub fn new(
        owner_id: Uuid,
        amount: Decimal,
        category: impl Into<String>,
        transaction_type: TransactionType,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            amount,
            category: category.into(),
            transaction_type,
            description: None,
            date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn period(&self) -> PeriodKey {
        PeriodKey::of(&self.date)
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Amount with the direction applied: income positive, expense negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Caller-supplied fields for a new transaction, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub amount: Decimal,
    pub category: String,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to the caller's clock when absent.
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
}

impl TransactionDraft {
    pub fn new(amount: Decimal, category: impl Into<String>, transaction_type: TransactionType) -> Self {
        Self {
            amount,
            category: category.into(),
            transaction_type,
            description: None,
            date: None,
        }
    }

    pub fn on(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update. `id` and `owner_id` are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<TransactionType>,
    /// `Some(None)` clears the description.
    #[serde(default)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.transaction_type.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    /// Returns a copy of `base` with the patch applied.
    pub fn apply_to(&self, base: &Transaction) -> Transaction {
        let mut updated = base.clone();
        if let Some(amount) = self.amount {
            updated.amount = amount;
        }
        if let Some(category) = &self.category {
            updated.category = category.clone();
        }
        if let Some(kind) = self.transaction_type {
            updated.transaction_type = kind;
        }
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        if let Some(date) = self.date {
            updated.date = date;
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample() -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Transaction::new(Uuid::new_v4(), dec!(42.50), "Food", TransactionType::Expense, date)
    }

    #[test]
    fn signed_amount_follows_type() {
        let mut txn = sample();
        assert_eq!(txn.signed_amount(), dec!(-42.50));
        txn.transaction_type = TransactionType::Income;
        assert_eq!(txn.signed_amount(), dec!(42.50));
    }

    #[test]
    fn patch_keeps_identity_and_clears_description() {
        let txn = sample().with_description("lunch");
        let patch = TransactionPatch {
            amount: Some(dec!(10)),
            description: Some(None),
            ..TransactionPatch::default()
        };
        let updated = patch.apply_to(&txn);
        assert_eq!(updated.id, txn.id);
        assert_eq!(updated.owner_id, txn.owner_id);
        assert_eq!(updated.amount, dec!(10));
        assert_eq!(updated.description, None);
        assert_eq!(updated.category, "Food");
    }

    #[test]
    fn max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_i64));
    }

    #[test]
    fn period_is_derived_from_date() {
        assert_eq!(sample().period().to_string(), "2024-01");
    }
}
