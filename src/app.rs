//! Wires configuration, storage, catalog and services together.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::auth::{AuthService, SessionFile};
use crate::config::{Config, StorageKind};
use crate::db::Database;
use crate::latency::Latency;
use crate::market::{MarketCatalog, MarketService};
use crate::store::seed::seed_demo_data;
use crate::store::{Ledger, MemoryStore, UserStore};
use crate::trading::TradeService;

pub struct App {
    pub config: Config,
    pub market: MarketService,
    pub auth: AuthService,
    pub trading: TradeService,
    pub session: SessionFile,
}

impl App {
    pub fn open(config: Config) -> Result<Self> {
        let (ledger, users): (Arc<dyn Ledger>, Arc<dyn UserStore>) = match config.storage {
            StorageKind::Sqlite => {
                let db = Arc::new(Database::open(&config.database_path()?)?);
                (db.clone(), db)
            }
            StorageKind::Memory => {
                let store = Arc::new(MemoryStore::new());
                (store.clone(), store)
            }
        };

        if config.seed_demo_data {
            seed_demo_data(users.as_ref(), ledger.as_ref()).context("Failed to seed demo data")?;
        }

        let catalog = Arc::new(match &config.catalog {
            Some(path) => MarketCatalog::from_path(path)?,
            None => MarketCatalog::builtin()?,
        });

        let latency = Latency::new(config.simulate_latency);
        info!(
            "Opened {:?} storage with {} listed stocks (latency simulation: {})",
            config.storage,
            catalog.stocks().len(),
            latency.is_enabled()
        );

        Ok(Self {
            market: MarketService::new(catalog.clone(), latency),
            auth: AuthService::new(users, latency),
            trading: TradeService::new(ledger, catalog, latency),
            session: SessionFile::new(config.session_path()?),
            config,
        })
    }
}
