use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::LedgerError;
use crate::core::services::{
    BudgetService, BudgetThresholds, CategoryService, ServiceResult, SummaryService,
    TransactionService,
};
use crate::ledger::{
    Budget, BudgetDraft, BudgetOverview, BudgetStatus, CategoryBreakdown, CategoryCatalog,
    PeriodKey, Summary, Transaction, TransactionDraft, TransactionPatch, TransactionType,
};
use crate::storage::{LedgerStore, TransactionQuery};

/// The authenticated owner on whose behalf a call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerContext {
    pub owner_id: Uuid,
}

impl OwnerContext {
    pub fn new(owner_id: Uuid) -> Self {
        Self { owner_id }
    }
}

/// Facade that scopes every read and write to one owner.
///
/// Nothing is cached between calls: each report pulls a fresh snapshot from
/// the store, so it always reflects the latest writes.
pub struct LedgerManager {
    storage: Box<dyn LedgerStore>,
    catalog: CategoryCatalog,
    thresholds: BudgetThresholds,
    page_size: usize,
}

impl LedgerManager {
    /// Fails when `config` does not pass [`Config::validate`].
    pub fn new(storage: Box<dyn LedgerStore>, config: Config) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self {
            storage,
            catalog: config.catalog(),
            thresholds: config.thresholds(),
            page_size: config.default_page_size,
        })
    }

    pub fn storage(&self) -> &dyn LedgerStore {
        self.storage.as_ref()
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn thresholds(&self) -> &BudgetThresholds {
        &self.thresholds
    }

    /// Labels accepted for `kind` at the write boundary.
    pub fn categories(&self, kind: TransactionType) -> Vec<&str> {
        CategoryService::list(&self.catalog, kind)
    }

    pub fn monthly_summary(
        &self,
        ctx: &OwnerContext,
        period: Option<PeriodKey>,
    ) -> ServiceResult<Summary> {
        let snapshot = self.snapshot(ctx)?;
        Ok(SummaryService::compute_summary(&snapshot, period))
    }

    pub fn category_breakdown(
        &self,
        ctx: &OwnerContext,
        period: Option<PeriodKey>,
        kind: TransactionType,
    ) -> ServiceResult<CategoryBreakdown> {
        let snapshot = self.snapshot(ctx)?;
        Ok(SummaryService::compute_category_breakdown(
            &snapshot, period, kind,
        ))
    }

    /// Progress for the owner's budgets, restricted to `period` when given.
    pub fn budget_overview(
        &self,
        ctx: &OwnerContext,
        period: Option<PeriodKey>,
    ) -> ServiceResult<BudgetOverview> {
        let budgets = self.storage.list_budgets(ctx.owner_id, period)?;
        let snapshot = self.snapshot(ctx)?;
        let overview = BudgetService::aggregate_all_budgets(&budgets, &snapshot, &self.thresholds);
        for row in overview
            .rows_with_status(BudgetStatus::Over)
            .filter(|row| row.is_over_limit())
        {
            tracing::warn!(
                owner_id = %ctx.owner_id,
                category = %row.category,
                period = %row.period,
                percent_used = %row.percent_used.round_dp(2),
                "budget exceeded"
            );
        }
        Ok(overview)
    }

    pub fn monthly_trend(
        &self,
        ctx: &OwnerContext,
        from: PeriodKey,
        to: PeriodKey,
    ) -> ServiceResult<Vec<Summary>> {
        let snapshot = self.snapshot(ctx)?;
        Ok(SummaryService::monthly_trend(&snapshot, from, to))
    }

    pub fn add_transaction(
        &self,
        ctx: &OwnerContext,
        draft: TransactionDraft,
    ) -> ServiceResult<Transaction> {
        self.add_transaction_at(ctx, draft, Utc::now().naive_utc())
    }

    /// Like [`add_transaction`](Self::add_transaction) with an explicit clock.
    pub fn add_transaction_at(
        &self,
        ctx: &OwnerContext,
        draft: TransactionDraft,
        now: NaiveDateTime,
    ) -> ServiceResult<Transaction> {
        TransactionService::add(self.storage(), ctx.owner_id, draft, &self.catalog, now)
    }

    pub fn update_transaction(
        &self,
        ctx: &OwnerContext,
        id: Uuid,
        patch: &TransactionPatch,
    ) -> ServiceResult<Transaction> {
        TransactionService::update(self.storage(), ctx.owner_id, id, patch, &self.catalog)
    }

    pub fn remove_transaction(&self, ctx: &OwnerContext, id: Uuid) -> ServiceResult<Transaction> {
        TransactionService::remove(self.storage(), ctx.owner_id, id)
    }

    pub fn add_budget(&self, ctx: &OwnerContext, draft: BudgetDraft) -> ServiceResult<Budget> {
        BudgetService::add(self.storage(), ctx.owner_id, draft, &self.catalog)
    }

    pub fn remove_budget(&self, ctx: &OwnerContext, id: Uuid) -> ServiceResult<Budget> {
        BudgetService::remove(self.storage(), ctx.owner_id, id)
    }

    pub fn budgets(&self, ctx: &OwnerContext, period: Option<PeriodKey>) -> ServiceResult<Vec<Budget>> {
        Ok(self.storage.list_budgets(ctx.owner_id, period)?)
    }

    /// Lists transactions. The owner always comes from `ctx`, never from the query.
    pub fn transactions(
        &self,
        ctx: &OwnerContext,
        query: TransactionQuery,
    ) -> ServiceResult<Vec<Transaction>> {
        let query = TransactionQuery {
            owner_id: ctx.owner_id,
            ..query
        };
        TransactionService::list(self.storage(), &query)
    }

    /// First page of the owner's transactions, newest first, sized from config.
    pub fn recent_transactions(&self, ctx: &OwnerContext) -> ServiceResult<Vec<Transaction>> {
        let query = TransactionQuery::for_owner(ctx.owner_id).page(0, self.page_size);
        TransactionService::list(self.storage(), &query)
    }

    fn snapshot(&self, ctx: &OwnerContext) -> ServiceResult<Vec<Transaction>> {
        Ok(self
            .storage
            .query_transactions(&TransactionQuery::snapshot(ctx.owner_id))?)
    }
}
