//! Aggregation over an owner's transaction snapshot: period summaries,
//! category breakdowns and month-by-month trends.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::ledger::{
    CategoryBreakdown, CategoryTotal, PeriodKey, Summary, Transaction, TransactionType,
};

/// Stateless aggregation helpers. Inputs are assumed to belong to one owner.
pub struct SummaryService;

impl SummaryService {
    /// Income, expense and balance for `period`, or for all time when `None`.
    ///
    /// An empty selection yields an all-zero summary.
    pub fn compute_summary(transactions: &[Transaction], period: Option<PeriodKey>) -> Summary {
        let mut acc = Accumulator::default();
        for txn in in_period(transactions, period) {
            acc.add(txn);
        }
        let summary = acc.finish(period);
        tracing::debug!(
            period = %display_period(period),
            income = %summary.income_total,
            expense = %summary.expense_total,
            count = summary.transaction_count,
            "computed summary"
        );
        summary
    }

    /// Totals per category for transactions of `kind`, optionally within `period`.
    ///
    /// Categories without activity are omitted. Row order is not part of the
    /// contract.
    pub fn compute_category_breakdown(
        transactions: &[Transaction],
        period: Option<PeriodKey>,
        kind: TransactionType,
    ) -> CategoryBreakdown {
        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for txn in in_period(transactions, period).filter(|txn| txn.transaction_type == kind) {
            let total = totals.entry(txn.category.as_str()).or_default();
            *total = total.saturating_add(magnitude(txn));
        }
        CategoryBreakdown {
            period,
            kind,
            rows: totals
                .into_iter()
                .map(|(category, total)| CategoryTotal {
                    category: category.to_string(),
                    total,
                })
                .collect(),
        }
    }

    /// One summary per month in `[from, to]`, zero-filled for quiet months.
    pub fn monthly_trend(
        transactions: &[Transaction],
        from: PeriodKey,
        to: PeriodKey,
    ) -> Vec<Summary> {
        let mut buckets: BTreeMap<PeriodKey, Accumulator> = PeriodKey::range_inclusive(from, to)
            .into_iter()
            .map(|period| (period, Accumulator::default()))
            .collect();
        for txn in transactions {
            if let Some(acc) = buckets.get_mut(&txn.period()) {
                acc.add(txn);
            }
        }
        buckets
            .into_iter()
            .map(|(period, acc)| acc.finish(Some(period)))
            .collect()
    }

    /// Earliest and latest period with any activity.
    pub fn trend_bounds(transactions: &[Transaction]) -> Option<(PeriodKey, PeriodKey)> {
        let mut periods = transactions.iter().map(Transaction::period);
        let first = periods.next()?;
        Some(periods.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

fn in_period(
    transactions: &[Transaction],
    period: Option<PeriodKey>,
) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(move |txn| period.map_or(true, |p| txn.period() == p))
}

// Direction comes from transaction_type; the amount is only ever a magnitude.
// Totals saturate at Decimal::MAX rather than overflow.
fn magnitude(txn: &Transaction) -> Decimal {
    txn.amount.abs()
}

fn display_period(period: Option<PeriodKey>) -> String {
    period.map_or_else(|| "all".to_string(), |p| p.to_string())
}

#[derive(Default)]
struct Accumulator {
    income: Decimal,
    expense: Decimal,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, txn: &Transaction) {
        match txn.transaction_type {
            TransactionType::Income => {
                self.income = self.income.saturating_add(magnitude(txn));
            }
            TransactionType::Expense => {
                self.expense = self.expense.saturating_add(magnitude(txn));
            }
        }
        self.count += 1;
    }

    fn finish(self, period: Option<PeriodKey>) -> Summary {
        Summary {
            period,
            income_total: self.income,
            expense_total: self.expense,
            balance: self.income.saturating_sub(self.expense),
            transaction_count: self.count,
        }
    }
}
