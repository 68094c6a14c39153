use anyhow::{Context, Result};
use investo::app::App;
use investo::db::{normalize_symbol, TransactionType};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::cli::{formatters, TradeArgs};

pub async fn dispatch_buy(app: &App, args: &TradeArgs, json_output: bool) -> Result<()> {
    dispatch_trade(app, args, TransactionType::Buy, json_output).await
}

pub async fn dispatch_sell(app: &App, args: &TradeArgs, json_output: bool) -> Result<()> {
    dispatch_trade(app, args, TransactionType::Sell, json_output).await
}

async fn dispatch_trade(
    app: &App,
    args: &TradeArgs,
    kind: TransactionType,
    json_output: bool,
) -> Result<()> {
    let user = super::require_user(app).await?;

    let quantity = i64::from_str(args.quantity.trim())
        .context("Invalid quantity. Must be a whole number of shares")?;

    // Without an explicit price the trade goes through at the latest quote
    let price = match args.price.as_deref() {
        Some(p) => Decimal::from_str(p.trim()).context("Invalid price. Must be a decimal number")?,
        None => app.market.get_stock_by_symbol(&args.symbol).await?.price,
    };

    tracing::info!(
        "{} {} {} @ {} for account {}",
        kind.as_str(),
        quantity,
        args.symbol,
        price,
        user.id
    );

    let tx = match kind {
        TransactionType::Buy => app.trading.buy(user.id, &args.symbol, quantity, price).await?,
        TransactionType::Sell => app.trading.sell(user.id, &args.symbol, quantity, price).await?,
    };

    if json_output {
        println!("{}", formatters::format_json(&tx));
    } else {
        print!("{}", formatters::format_trade_confirmation(&tx));
    }
    Ok(())
}

pub async fn dispatch_transactions_list(
    app: &App,
    symbol: Option<&str>,
    json_output: bool,
) -> Result<()> {
    let user = super::require_user(app).await?;
    let symbol = symbol.map(normalize_symbol);

    let transactions: Vec<_> = app
        .trading
        .transactions(user.id)
        .await?
        .into_iter()
        .filter(|tx| symbol.as_deref().map_or(true, |s| tx.symbol == s))
        .collect();

    if json_output {
        println!("{}", formatters::format_json(&transactions));
    } else {
        print!("{}", formatters::format_transactions(&transactions));
    }
    Ok(())
}
