// Market module - stock catalog, quotes and the market data service

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::db::{normalize_symbol, Stock};
use crate::error::TradeError;
use crate::latency::{Latency, Operation};

/// Built-in catalog, parsed once per process
static BUILTIN_STOCKS: OnceCell<Vec<Stock>> = OnceCell::new();

/// Latest price per symbol.
pub trait QuoteSource: Send + Sync {
    /// `None` when the symbol is not quoted
    fn latest_price(&self, symbol: &str) -> Option<Decimal>;
}

impl QuoteSource for HashMap<String, Decimal> {
    fn latest_price(&self, symbol: &str) -> Option<Decimal> {
        self.get(symbol).copied()
    }
}

/// Static set of listed stocks, kept in listing order
#[derive(Debug, Clone)]
pub struct MarketCatalog {
    stocks: Vec<Stock>,
}

impl MarketCatalog {
    /// The six demo stocks shipped with the crate
    pub fn builtin() -> Result<Self> {
        let stocks = BUILTIN_STOCKS
            .get_or_try_init(|| serde_json::from_str(include_str!("stocks.json")))
            .context("Failed to parse built-in stock catalog")?;
        Ok(Self::new(stocks.clone()))
    }

    /// Load a catalog from a JSON array of stocks
    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Loading stock catalog from {:?}", path);
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stock catalog {:?}", path))?;
        let stocks: Vec<Stock> = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid stock catalog {:?}", path))?;
        Ok(Self::new(stocks))
    }

    pub fn new(stocks: Vec<Stock>) -> Self {
        let stocks = stocks
            .into_iter()
            .map(|mut s| {
                s.symbol = normalize_symbol(&s.symbol);
                s
            })
            .collect();
        Self { stocks }
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn find(&self, symbol: &str) -> Option<&Stock> {
        let symbol = normalize_symbol(symbol);
        self.stocks.iter().find(|s| s.symbol == symbol)
    }
}

impl QuoteSource for MarketCatalog {
    fn latest_price(&self, symbol: &str) -> Option<Decimal> {
        self.find(symbol).map(|s| s.price)
    }
}

/// Async facade over the catalog, shaped like a remote market data API
#[derive(Debug, Clone)]
pub struct MarketService {
    catalog: Arc<MarketCatalog>,
    latency: Latency,
}

impl MarketService {
    pub fn new(catalog: Arc<MarketCatalog>, latency: Latency) -> Self {
        Self { catalog, latency }
    }

    pub async fn get_trending_stocks(&self) -> Vec<Stock> {
        self.latency.simulate(Operation::TrendingStocks).await;
        self.catalog.stocks().to_vec()
    }

    pub async fn get_stock_by_symbol(&self, symbol: &str) -> Result<Stock, TradeError> {
        self.latency.simulate(Operation::StockDetail).await;
        debug!("Looking up stock {}", symbol);
        self.catalog
            .find(symbol)
            .cloned()
            .ok_or_else(|| TradeError::UnknownSymbol(normalize_symbol(symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_catalog_has_demo_stocks() {
        let catalog = MarketCatalog::builtin().unwrap();
        let symbols: Vec<&str> = catalog.stocks().iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "JPM"]);

        let aapl = catalog.find("aapl").unwrap();
        assert_eq!(aapl.price, dec!(178.72));
        assert_eq!(aapl.historical_data.len(), 7);
        assert_eq!(catalog.latest_price("TSLA"), Some(dec!(215.49)));
        assert_eq!(catalog.latest_price("NOPE"), None);
    }

    #[test]
    fn test_catalog_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stocks.json");
        std::fs::write(
            &path,
            r#"[{"symbol":"acme","name":"Acme","price":"12.50","change":"0","changePercent":"0",
                "volume":1,"marketCap":2,"pe":"3","dividend":"0","sector":"Tools",
                "description":"Anvils"}]"#,
        )
        .unwrap();

        let catalog = MarketCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.latest_price("ACME"), Some(dec!(12.50)));
        assert!(catalog.find("ACME").unwrap().historical_data.is_empty());
    }

    #[tokio::test]
    async fn test_market_service_lookup() {
        let catalog = Arc::new(MarketCatalog::builtin().unwrap());
        let service = MarketService::new(catalog, Latency::disabled());
        assert_eq!(service.get_trending_stocks().await.len(), 6);
        assert_eq!(service.get_stock_by_symbol("JPM").await.unwrap().name, "JPMorgan Chase & Co.");
        assert!(matches!(
            service.get_stock_by_symbol("zzz").await,
            Err(TradeError::UnknownSymbol(s)) if s == "ZZZ"
        ));
    }
}
