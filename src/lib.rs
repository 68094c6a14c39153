//! Investo - demo stock trading backend
//!
//! This library provides a stock catalog, mock authentication, an
//! append-only transaction ledger with buy/sell validation, and portfolio
//! valuation over that ledger.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod latency;
pub mod market;
pub mod reports;
pub mod store;
pub mod trading;
pub mod utils;
