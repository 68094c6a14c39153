//! Buy/sell validation and portfolio queries against an account ledger.

use anyhow::anyhow;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::db::{normalize_symbol, AccountId, Transaction, TransactionType};
use crate::error::TradeError;
use crate::latency::{Latency, Operation};
use crate::market::QuoteSource;
use crate::reports::{calculate_portfolio, owned_quantity, summarize_activity};
use crate::reports::{ActivitySummary, PortfolioReport};
use crate::store::Ledger;

pub struct TradeService {
    ledger: Arc<dyn Ledger>,
    quotes: Arc<dyn QuoteSource>,
    latency: Latency,
    // One writer per account: holdings check and append happen under it
    account_locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl TradeService {
    pub fn new(ledger: Arc<dyn Ledger>, quotes: Arc<dyn QuoteSource>, latency: Latency) -> Self {
        Self {
            ledger,
            quotes,
            latency,
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    fn account_lock(&self, account_id: AccountId) -> Result<Arc<Mutex<()>>, TradeError> {
        let mut locks = self
            .account_locks
            .lock()
            .map_err(|_| anyhow!("account lock table poisoned"))?;
        Ok(locks.entry(account_id).or_default().clone())
    }

    pub async fn buy(
        &self,
        account_id: AccountId,
        symbol: &str,
        quantity: i64,
        price: Decimal,
    ) -> Result<Transaction, TradeError> {
        self.latency.simulate(Operation::Trade).await;

        let symbol = normalize_symbol(symbol);
        validate_order(quantity, price)?;
        if self.quotes.latest_price(&symbol).is_none() {
            return Err(TradeError::UnknownSymbol(symbol));
        }

        let lock = self.account_lock(account_id)?;
        let _guard = lock.lock().map_err(|_| anyhow!("account lock poisoned"))?;

        let owned = owned_quantity(&self.ledger.list_all(account_id)?, &symbol);
        if owned.checked_add(quantity).is_none() {
            warn!(
                "Rejected buy of {} {} for account {}: holding would overflow",
                quantity, symbol, account_id
            );
            return Err(TradeError::Overflow {
                symbol,
                quantity,
                price,
            });
        }

        self.record(account_id, &symbol, TransactionType::Buy, quantity, price)
    }

    pub async fn sell(
        &self,
        account_id: AccountId,
        symbol: &str,
        quantity: i64,
        price: Decimal,
    ) -> Result<Transaction, TradeError> {
        self.latency.simulate(Operation::Trade).await;

        let symbol = normalize_symbol(symbol);
        validate_order(quantity, price)?;

        let lock = self.account_lock(account_id)?;
        let _guard = lock.lock().map_err(|_| anyhow!("account lock poisoned"))?;

        let owned = owned_quantity(&self.ledger.list_all(account_id)?, &symbol);
        if owned < quantity {
            warn!(
                "Rejected sell of {} {} for account {}: only {} owned",
                quantity, symbol, account_id, owned
            );
            return Err(TradeError::InsufficientHoldings {
                symbol,
                owned,
                requested: quantity,
            });
        }

        self.record(account_id, &symbol, TransactionType::Sell, quantity, price)
    }

    fn record(
        &self,
        account_id: AccountId,
        symbol: &str,
        transaction_type: TransactionType,
        quantity: i64,
        price: Decimal,
    ) -> Result<Transaction, TradeError> {
        if Transaction::checked_total(quantity, price).is_none() {
            warn!(
                "Rejected {} of {} {} @ {}: total overflows",
                transaction_type.as_str(),
                quantity,
                symbol,
                price
            );
            return Err(TradeError::Overflow {
                symbol: symbol.to_string(),
                quantity,
                price,
            });
        }

        let today = Utc::now().date_naive();
        let mut tx = Transaction::new(symbol, transaction_type, quantity, price, today);
        tx.id = Some(self.ledger.append(account_id, &tx)?);

        info!(
            "Recorded {} of {} {} @ {} for account {}",
            transaction_type.as_str(),
            quantity,
            symbol,
            price,
            account_id
        );
        Ok(tx)
    }

    /// Net shares of `symbol` the account holds
    pub fn holdings(&self, account_id: AccountId, symbol: &str) -> Result<i64, TradeError> {
        let transactions = self.ledger.list_all(account_id)?;
        Ok(owned_quantity(&transactions, &normalize_symbol(symbol)))
    }

    pub async fn transactions(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, TradeError> {
        self.latency.simulate(Operation::Portfolio).await;
        Ok(self.ledger.list_all(account_id)?)
    }

    pub async fn get_portfolio(
        &self,
        account_id: AccountId,
    ) -> Result<PortfolioReport, TradeError> {
        let transactions = self.transactions(account_id).await?;
        Ok(calculate_portfolio(&transactions, self.quotes.as_ref()))
    }

    pub async fn summary(&self, account_id: AccountId) -> Result<ActivitySummary, TradeError> {
        let transactions = self.transactions(account_id).await?;
        Ok(summarize_activity(&transactions))
    }
}

fn validate_order(quantity: i64, price: Decimal) -> Result<(), TradeError> {
    if quantity <= 0 {
        return Err(TradeError::InvalidQuantity(quantity));
    }
    if price <= Decimal::ZERO {
        return Err(TradeError::InvalidPrice(price));
    }
    Ok(())
}
