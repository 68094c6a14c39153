use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::Transaction;

/// How many transactions the recent activity feed shows
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Dashboard figures derived from the whole transaction log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    /// Sum of all buy totals, ignoring sells
    pub total_invested: Decimal,
    /// Distinct symbols ever traded, including closed positions
    pub symbols_traded: usize,
    pub transaction_count: usize,
    pub recent: Vec<Transaction>,
}

pub fn summarize_activity(transactions: &[Transaction]) -> ActivitySummary {
    let total_invested = transactions
        .iter()
        .filter(|tx| tx.is_buy())
        .fold(Decimal::ZERO, |sum, tx| sum.saturating_add(tx.total));

    let symbols_traded = transactions.iter().map(|tx| tx.symbol.as_str()).unique().count();

    // Newest trade date first; same-day trades show the latest append first
    let recent = transactions
        .iter()
        .rev()
        .sorted_by(|a, b| b.trade_date.cmp(&a.trade_date))
        .take(RECENT_ACTIVITY_LIMIT)
        .cloned()
        .collect();

    ActivitySummary {
        total_invested,
        symbols_traded,
        transaction_count: transactions.len(),
        recent,
    }
}
