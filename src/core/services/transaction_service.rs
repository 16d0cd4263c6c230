//! Business logic helpers for managing transactions.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::{
    CategoryCatalog, Transaction, TransactionDraft, TransactionPatch, MAX_AMOUNT,
};
use crate::storage::{LedgerStore, TransactionQuery};

use super::{ServiceError, ServiceResult};

/// Validated CRUD helpers. This is the write boundary: nothing unvalidated
/// reaches the store through here.
pub struct TransactionService;

impl TransactionService {
    /// Validates `draft` and stores it for `owner_id`. `now` fills a missing date.
    pub fn add(
        store: &dyn LedgerStore,
        owner_id: Uuid,
        draft: TransactionDraft,
        catalog: &CategoryCatalog,
        now: NaiveDateTime,
    ) -> ServiceResult<Transaction> {
        let mut txn = Transaction::new(
            owner_id,
            draft.amount,
            draft.category,
            draft.transaction_type,
            draft.date.unwrap_or(now),
        );
        txn.description = draft.description;
        let txn = Self::validated(txn, catalog)?;
        let stored = store.insert_transaction(txn)?;
        tracing::info!(
            transaction_id = %stored.id,
            kind = %stored.transaction_type,
            category = %stored.category,
            "transaction added"
        );
        Ok(stored)
    }

    /// Applies `patch` to the owner's transaction `id` and re-validates the result.
    pub fn update(
        store: &dyn LedgerStore,
        owner_id: Uuid,
        id: Uuid,
        patch: &TransactionPatch,
        catalog: &CategoryCatalog,
    ) -> ServiceResult<Transaction> {
        let existing = store
            .get_transaction(owner_id, id)?
            .ok_or_else(|| ServiceError::NotFound {
                kind: "Transaction",
                id: id.to_string(),
            })?;
        if patch.is_empty() {
            return Ok(existing);
        }
        let merged = Self::validated(patch.apply_to(&existing), catalog)?;
        let stored = store.update_transaction(merged)?;
        tracing::info!(transaction_id = %stored.id, "transaction updated");
        Ok(stored)
    }

    /// Removes the owner's transaction `id`, returning the removed instance.
    pub fn remove(store: &dyn LedgerStore, owner_id: Uuid, id: Uuid) -> ServiceResult<Transaction> {
        let removed = store.delete_transaction(owner_id, id)?;
        tracing::info!(transaction_id = %id, "transaction removed");
        Ok(removed)
    }

    pub fn list(store: &dyn LedgerStore, query: &TransactionQuery) -> ServiceResult<Vec<Transaction>> {
        Ok(store.query_transactions(query)?)
    }

    fn validated(mut txn: Transaction, catalog: &CategoryCatalog) -> ServiceResult<Transaction> {
        if txn.amount <= Decimal::ZERO {
            return Err(ServiceError::Invalid(
                "amount must be greater than zero".into(),
            ));
        }
        if txn.amount > MAX_AMOUNT {
            return Err(ServiceError::Invalid(format!(
                "amount must not exceed {}",
                MAX_AMOUNT
            )));
        }
        txn.category = catalog.validate(txn.transaction_type, &txn.category)?;
        txn.description = txn
            .description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Ok(txn)
    }
}
