use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Account identifier. Every user owns exactly one trading account and the
/// account id is the user id.
pub type AccountId = i64;

/// Transaction type (buy or sell)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" | "B" => Ok(TransactionType::Buy),
            "SELL" | "S" => Ok(TransactionType::Sell),
            _ => Err(()),
        }
    }
}

/// A buy or sell of a stock. Never edited once appended to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<i64>,
    pub symbol: String,
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub price: Decimal,
    pub total: Decimal,
    pub trade_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Build an unsaved transaction; `total` is always `quantity * price`.
    ///
    /// # Panics
    ///
    /// Panics when the total overflows; see [`Transaction::checked_total`].
    pub fn new(
        symbol: &str,
        transaction_type: TransactionType,
        quantity: i64,
        price: Decimal,
        trade_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            symbol: symbol.to_string(),
            transaction_type,
            quantity,
            price,
            total: Decimal::from(quantity) * price,
            trade_date,
            created_at: Utc::now(),
        }
    }

    /// `quantity * price`, `None` when it does not fit in a `Decimal`
    pub fn checked_total(quantity: i64, price: Decimal) -> Option<Decimal> {
        Decimal::from(quantity).checked_mul(price)
    }

    pub fn is_buy(&self) -> bool {
        self.transaction_type == TransactionType::Buy
    }
}

/// Registered user as held by a user store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// User without credentials, safe to hand to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// User about to be inserted; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Point on a stock's price history chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    pub date: NaiveDate,
    pub price: Decimal,
}

/// Catalog entry with the latest quote and company facts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub volume: u64,
    pub market_cap: u64,
    pub pe: Decimal,
    pub dividend: Decimal,
    pub sector: String,
    pub description: String,
    #[serde(default)]
    pub historical_data: Vec<HistoricalDataPoint>,
}

/// Normalise a ticker symbol for lookup and storage
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}
