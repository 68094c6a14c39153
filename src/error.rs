//! Error handling for investo
//!
//! Domain failures are typed enums so callers can match on them; everything
//! else travels as `anyhow` with context chains.

use rust_decimal::Decimal;
use thiserror::Error;

/// Trade validation and recording failures
#[derive(Error, Debug)]
pub enum TradeError {
    #[error("invalid quantity {0}: quantity must be greater than zero")]
    InvalidQuantity(i64),

    #[error("invalid price {0}: price must be greater than zero")]
    InvalidPrice(Decimal),

    #[error("you don't own enough {symbol} shares to sell {requested} (owned: {owned})")]
    InsufficientHoldings {
        symbol: String,
        owned: i64,
        requested: i64,
    },

    #[error("stock with symbol {0} not found")]
    UnknownSymbol(String),

    #[error("order of {quantity} {symbol} @ {price} is too large to record")]
    Overflow {
        symbol: String,
        quantity: i64,
        price: Decimal,
    },

    #[error("ledger error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Authentication failures
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not logged in; run `investo login <email> <password>` first")]
    NotLoggedIn,

    #[error("user store error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Result type alias for application-level operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = TradeError::InsufficientHoldings {
            symbol: "AAPL".to_string(),
            owned: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "you don't own enough AAPL shares to sell 5 (owned: 3)"
        );
        assert_eq!(
            TradeError::InvalidPrice(dec!(-1)).to_string(),
            "invalid price -1: price must be greater than zero"
        );
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> = Err(TradeError::UnknownSymbol("ZZZ".to_string()))
            .context("failed to record trade");
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "failed to record trade");
        assert!(format!("{:?}", err).contains("stock with symbol ZZZ not found"));
        assert!(err.chain().any(|e| e.downcast_ref::<TradeError>().is_some()));
    }

    #[test]
    fn test_storage_errors_wrap_anyhow() {
        let err: AuthError = anyhow::anyhow!("disk full").into();
        assert!(err.to_string().starts_with("user store error"));
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid email or password");
    }
}
