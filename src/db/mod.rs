// Database module - SQLite connection and models

pub mod models;

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::store::{Ledger, UserStore};
pub use models::{
    normalize_symbol, AccountId, HistoricalDataPoint, NewUser, PublicUser, Stock, Transaction,
    TransactionType, User,
};

/// Get the default data directory (~/.investo)
pub fn get_default_data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".investo"))
}

/// SQLite-backed ledger and user store.
///
/// `rusqlite::Connection` is not `Sync`, so the connection sits behind a
/// mutex and every statement runs while holding it.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database file and apply the schema
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        info!("Opening database at: {:?}", path);
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {:?}", path))?;
        Self::init(conn)
    }

    /// Private in-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(include_str!("schema.sql"))
            .context("Failed to execute schema")?;
        debug!("Database schema ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("database lock poisoned"))
    }
}

impl Ledger for Database {
    fn append(&self, account_id: AccountId, tx: &Transaction) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO transactions (
                account_id, symbol, transaction_type, quantity,
                price, total, trade_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                account_id,
                tx.symbol,
                tx.transaction_type.as_str(),
                tx.quantity,
                tx.price.to_string(),
                tx.total.to_string(),
                tx.trade_date,
                tx.created_at,
            ],
        )
        .with_context(|| format!("Failed to append {} transaction", tx.symbol))?;

        Ok(conn.last_insert_rowid())
    }

    fn list_all(&self, account_id: AccountId) -> Result<Vec<Transaction>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, symbol, transaction_type, quantity, price, total, trade_date, created_at
             FROM transactions
             WHERE account_id = ?1
             ORDER BY id ASC",
        )?;

        let transactions = stmt
            .query_map([account_id], |row| {
                let tx_type: String = row.get(2)?;
                let transaction_type = tx_type.parse::<TransactionType>().map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        2,
                        "transaction_type".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?;

                Ok(Transaction {
                    id: Some(row.get(0)?),
                    symbol: row.get(1)?,
                    transaction_type,
                    quantity: row.get(3)?,
                    price: get_decimal_value(row, 4)?,
                    total: get_decimal_value(row, 5)?,
                    trade_date: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }
}

impl UserStore for Database {
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                "SELECT id, name, email, password_hash FROM users WHERE email = ?1",
                [email],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                "SELECT id, name, email, password_hash FROM users WHERE id = ?1",
                [id],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    fn insert(&self, user: NewUser) -> Result<User> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO users (name, email, password_hash) VALUES (?1, ?2, ?3)",
            params![user.name, user.email, user.password_hash],
        )
        .with_context(|| format!("Failed to insert user {}", user.email))?;

        Ok(User {
            id: conn.last_insert_rowid(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        })
    }
}

fn map_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
    })
}

/// Helper to read Decimal from SQLite (handles both INTEGER and TEXT)
fn get_decimal_value(row: &rusqlite::Row, idx: usize) -> Result<Decimal, rusqlite::Error> {
    if let Ok(s) = row.get::<_, String>(idx) {
        return Decimal::from_str(&s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        });
    }

    // SQLite type affinity may hand back whole numbers as INTEGER
    if let Ok(i) = row.get::<_, i64>(idx) {
        return Ok(Decimal::from(i));
    }

    Err(rusqlite::Error::InvalidColumnType(
        idx,
        "decimal".to_string(),
        rusqlite::types::Type::Null,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn sample(symbol: &str, kind: TransactionType, qty: i64, price: Decimal) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        Transaction::new(symbol, kind, qty, price, date)
    }

    #[test]
    fn test_ledger_round_trips_decimals_in_order() {
        let db = Database::open_in_memory().unwrap();
        db.append(1, &sample("AAPL", TransactionType::Buy, 10, dec!(165.35)))
            .unwrap();
        db.append(1, &sample("AAPL", TransactionType::Sell, 4, dec!(170.10)))
            .unwrap();

        let txs = db.list_all(1).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].total, dec!(1653.50));
        assert_eq!(txs[1].transaction_type, TransactionType::Sell);
        assert_eq!(txs[1].price, dec!(170.10));
        assert_eq!(txs[1].trade_date, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert!(txs[0].id < txs[1].id);
        assert!(db.list_all(2).unwrap().is_empty());
    }

    #[test]
    fn test_ledger_rejects_updates_and_deletes() {
        let db = Database::open_in_memory().unwrap();
        db.append(1, &sample("MSFT", TransactionType::Buy, 1, dec!(300)))
            .unwrap();

        let conn = db.lock().unwrap();
        assert!(conn.execute("UPDATE transactions SET quantity = 2", []).is_err());
        assert!(conn.execute("DELETE FROM transactions", []).is_err());
    }

    #[test]
    fn test_users_persist_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data.db");
        {
            let db = Database::open(&path).unwrap();
            let user = db
                .insert(NewUser {
                    name: "Ana".into(),
                    email: "ana@example.com".into(),
                    password_hash: "digest".into(),
                })
                .unwrap();
            assert_eq!(user.id, 1);
        }

        let db = Database::open(&path).unwrap();
        let found = db.find_by_email("ANA@example.com").unwrap().unwrap();
        assert_eq!(found.name, "Ana");
        assert_eq!(db.find_by_id(1).unwrap(), Some(found));
        assert!(db
            .insert(NewUser {
                name: "Dup".into(),
                email: "ana@example.com".into(),
                password_hash: "x".into(),
            })
            .is_err());
    }
}
