//! Demo fixtures: two users and a starter portfolio for the first one.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;

use super::{Ledger, UserStore};
use crate::auth::hash_password;
use crate::db::{NewUser, Transaction, TransactionType};

pub const DEMO_PASSWORD: &str = "password123";

const DEMO_USERS: [(&str, &str); 2] = [
    ("John Doe", "john@example.com"),
    ("Jane Smith", "jane@example.com"),
];

// (symbol, quantity, price, date), all buys for the first demo user
const DEMO_PORTFOLIO: [(&str, i64, &str, &str); 3] = [
    ("AAPL", 10, "165.35", "2023-03-15"),
    ("MSFT", 5, "305.17", "2023-04-10"),
    ("GOOGL", 8, "110.25", "2023-04-22"),
];

/// Insert demo users and the starter portfolio unless already present.
///
/// Returns true when anything was written.
pub fn seed_demo_data(users: &dyn UserStore, ledger: &dyn Ledger) -> Result<bool> {
    if users.find_by_email(DEMO_USERS[0].1)?.is_some() {
        return Ok(false);
    }

    let mut first_id = None;
    for (name, email) in DEMO_USERS {
        let user = users.insert(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(email, DEMO_PASSWORD),
        })?;
        first_id.get_or_insert(user.id);
    }

    let account_id = first_id.context("no demo user inserted")?;
    for (symbol, quantity, price, date) in DEMO_PORTFOLIO {
        let price = Decimal::from_str(price).context("invalid demo price")?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").context("invalid demo date")?;
        let tx = Transaction::new(symbol, TransactionType::Buy, quantity, price, date);
        ledger.append(account_id, &tx)?;
    }

    info!("Seeded demo users and starter portfolio");
    Ok(true)
}
