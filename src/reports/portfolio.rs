use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::db::{Transaction, TransactionType};
use crate::market::QuoteSource;

/// Summary of a single position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSummary {
    pub symbol: String,
    pub quantity: i64,
    pub buy_value: Decimal,
    pub sell_value: Decimal,
    pub current_price: Decimal,
    pub current_value: Decimal,
    pub avg_buy_price: Decimal,
    pub profit: Decimal,
    pub profit_percent: Decimal,
}

impl PositionSummary {
    /// Money still committed to the position (`avg_buy_price * quantity`)
    pub fn cost_basis(&self) -> Decimal {
        self.buy_value.saturating_sub(self.sell_value)
    }
}

/// Complete portfolio report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub positions: Vec<PositionSummary>,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub total_profit_percent: Decimal,
}

impl PortfolioReport {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Running totals for one symbol
#[derive(Debug)]
struct PositionAccumulator {
    symbol: String,
    quantity: i64,
    buy_value: Decimal,
    sell_value: Decimal,
}

impl PositionAccumulator {
    fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            quantity: 0,
            buy_value: Decimal::ZERO,
            sell_value: Decimal::ZERO,
        }
    }

    // Saturating: an oversized ledger must still produce a report
    fn apply(&mut self, tx: &Transaction) {
        match tx.transaction_type {
            TransactionType::Buy => {
                self.quantity = self.quantity.saturating_add(tx.quantity);
                self.buy_value = self.buy_value.saturating_add(tx.total);
            }
            TransactionType::Sell => {
                self.quantity = self.quantity.saturating_sub(tx.quantity);
                self.sell_value = self.sell_value.saturating_add(tx.total);
            }
        }
    }

    fn into_summary(self, current_price: Decimal) -> PositionSummary {
        let quantity = Decimal::from(self.quantity);
        let cost_basis = self.buy_value.saturating_sub(self.sell_value);
        let current_value = quantity.saturating_mul(current_price);

        PositionSummary {
            avg_buy_price: cost_basis / quantity,
            profit: current_value.saturating_sub(cost_basis),
            profit_percent: return_percent(current_value, cost_basis),
            symbol: self.symbol,
            quantity: self.quantity,
            buy_value: self.buy_value,
            sell_value: self.sell_value,
            current_price,
            current_value,
        }
    }
}

/// `(value / cost - 1) * 100`, defined as zero when nothing is at cost
fn return_percent(value: Decimal, cost: Decimal) -> Decimal {
    if cost.is_zero() {
        return Decimal::ZERO;
    }
    match value.checked_div(cost) {
        Some(ratio) => ratio
            .saturating_sub(Decimal::ONE)
            .saturating_mul(Decimal::ONE_HUNDRED),
        None if value.is_sign_negative() == cost.is_sign_negative() => Decimal::MAX,
        None => Decimal::MIN,
    }
}

/// Net shares owned of one symbol (buys minus sells)
pub fn owned_quantity(transactions: &[Transaction], symbol: &str) -> i64 {
    let mut acc = PositionAccumulator::new(symbol);
    transactions
        .iter()
        .filter(|tx| tx.symbol == symbol)
        .for_each(|tx| acc.apply(tx));
    acc.quantity
}

/// Value the open positions of a transaction log.
///
/// Symbols whose net quantity is not positive are left out. Unquoted symbols
/// are valued at zero. Positions come back largest `current_value` first,
/// with ties kept in order of the symbol's first appearance in the log.
pub fn calculate_portfolio(
    transactions: &[Transaction],
    quotes: &(impl QuoteSource + ?Sized),
) -> PortfolioReport {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut accumulators: Vec<PositionAccumulator> = Vec::new();

    for tx in transactions {
        let slot = *index.entry(tx.symbol.as_str()).or_insert_with(|| {
            accumulators.push(PositionAccumulator::new(&tx.symbol));
            accumulators.len() - 1
        });
        accumulators[slot].apply(tx);
    }

    let mut positions: Vec<PositionSummary> = accumulators
        .into_iter()
        .filter(|acc| acc.quantity > 0)
        .map(|acc| {
            let price = quotes.latest_price(&acc.symbol).unwrap_or(Decimal::ZERO);
            acc.into_summary(price)
        })
        .collect();

    // Vec::sort_by is stable
    positions.sort_by(|a, b| b.current_value.cmp(&a.current_value));

    let total_value = positions
        .iter()
        .fold(Decimal::ZERO, |sum, p| sum.saturating_add(p.current_value));
    let total_cost = positions
        .iter()
        .fold(Decimal::ZERO, |sum, p| sum.saturating_add(p.cost_basis()));

    PortfolioReport {
        total_profit: total_value.saturating_sub(total_cost),
        total_profit_percent: return_percent(total_value, total_cost),
        positions,
        total_value,
        total_cost,
    }
}
