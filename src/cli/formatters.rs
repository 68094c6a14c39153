//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::{ColoredString, Colorize};
use investo::db::{PublicUser, Stock, Transaction};
use investo::reports::{ActivitySummary, PortfolioReport};
use investo::utils::{
    format_currency, format_percent, format_signed_currency, format_signed_percent,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

fn gain_or_loss(value: Decimal, text: String) -> ColoredString {
    if value >= Decimal::ZERO {
        text.green()
    } else {
        text.red()
    }
}

/// Pretty JSON for any serializable report
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format a portfolio report for terminal table output
pub fn format_portfolio_table(report: &PortfolioReport) -> String {
    let mut output = format!("\n{} Your Portfolio\n\n", "📊".cyan().bold());

    #[derive(Tabled)]
    struct PositionRow {
        #[tabled(rename = "Stock")]
        symbol: String,
        #[tabled(rename = "Shares")]
        quantity: String,
        #[tabled(rename = "Avg. Price")]
        avg_price: String,
        #[tabled(rename = "Current Price")]
        price: String,
        #[tabled(rename = "Market Value")]
        value: String,
        #[tabled(rename = "Profit/Loss")]
        profit: String,
        #[tabled(rename = "Return %")]
        return_pct: String,
    }

    let rows: Vec<PositionRow> = report
        .positions
        .iter()
        .map(|p| PositionRow {
            symbol: p.symbol.clone(),
            quantity: p.quantity.to_string(),
            avg_price: format_currency(p.avg_buy_price),
            price: format_currency(p.current_price),
            value: format_currency(p.current_value),
            profit: gain_or_loss(p.profit, format_signed_currency(p.profit)).to_string(),
            return_pct: gain_or_loss(p.profit, format_signed_percent(p.profit_percent))
                .to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());

    output.push_str(&format!("\n\n{} Summary", "━".repeat(60).bright_black()));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Total Value:".bold(),
        format_currency(report.total_value)
    ));
    output.push_str(&format!(
        "\n{:<20} {}",
        "Total Cost:".bold(),
        format_currency(report.total_cost)
    ));
    output.push_str(&format!(
        "\n{:<20} {} ({})\n",
        "Total P&L:".bold(),
        gain_or_loss(report.total_profit, format_signed_currency(report.total_profit)),
        gain_or_loss(
            report.total_profit,
            format_signed_percent(report.total_profit_percent)
        )
    ));

    output
}

/// Format empty portfolio message
pub fn format_empty_portfolio() -> String {
    format!(
        "{} You don't own any stocks yet.\nBrowse stocks with: {} stocks list\n",
        "ℹ".blue().bold(),
        "investo".bold()
    )
}

/// Format the trending stocks listing
pub fn format_stock_list(stocks: &[Stock]) -> String {
    #[derive(Tabled)]
    struct StockRow {
        #[tabled(rename = "Symbol")]
        symbol: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Price")]
        price: String,
        #[tabled(rename = "Change")]
        change: String,
        #[tabled(rename = "Sector")]
        sector: String,
    }

    let rows: Vec<StockRow> = stocks
        .iter()
        .map(|s| StockRow {
            symbol: s.symbol.clone(),
            name: s.name.clone(),
            price: format_currency(s.price),
            change: gain_or_loss(
                s.change,
                format!(
                    "{} ({})",
                    format_signed_currency(s.change),
                    format_signed_percent(s.change_percent)
                ),
            )
            .to_string(),
            sector: s.sector.clone(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(2..4), Alignment::right());
    format!("\n{} Trending Stocks\n\n{}\n", "📈".cyan().bold(), table)
}

/// Format one stock with its history and, when logged in, the shares owned
pub fn format_stock_detail(stock: &Stock, owned: Option<i64>) -> String {
    let mut output = format!(
        "\n{} {}  {}\n",
        stock.symbol.bold(),
        stock.name,
        format_currency(stock.price).bold()
    );
    output.push_str(&format!(
        "{}\n\n{}\n\n",
        gain_or_loss(
            stock.change,
            format!(
                "{} ({}) today",
                format_signed_currency(stock.change),
                format_signed_percent(stock.change_percent)
            )
        ),
        stock.description
    ));

    output.push_str(&format!("{:<16} {}\n", "Sector:", stock.sector));
    output.push_str(&format!("{:<16} {}\n", "Volume:", stock.volume));
    output.push_str(&format!(
        "{:<16} {}\n",
        "Market Cap:",
        format_currency(Decimal::from(stock.market_cap))
    ));
    output.push_str(&format!("{:<16} {}\n", "P/E Ratio:", stock.pe));
    output.push_str(&format!("{:<16} {}\n", "Dividend:", format_percent(stock.dividend)));

    if !stock.historical_data.is_empty() {
        #[derive(Tabled)]
        struct HistoryRow {
            #[tabled(rename = "Date")]
            date: String,
            #[tabled(rename = "Price")]
            price: String,
        }

        let rows: Vec<HistoryRow> = stock
            .historical_data
            .iter()
            .map(|h| HistoryRow {
                date: h.date.format("%Y-%m-%d").to_string(),
                price: format_currency(h.price),
            })
            .collect();
        let mut table = Table::new(&rows);
        table.with(Style::rounded());
        table.modify(Columns::new(1..), Alignment::right());
        output.push_str(&format!("\nPrice history\n{}\n", table));
    }

    if let Some(shares) = owned {
        output.push_str(&format!(
            "\n{:<16} {} (worth {})\n",
            "You own:".bold(),
            shares,
            format_currency(Decimal::from(shares) * stock.price)
        ));
    }

    output
}

fn describe_transaction(tx: &Transaction) -> String {
    let verb = if tx.is_buy() { "Bought" } else { "Sold" };
    format!("{} {} shares of {} @ {}", verb, tx.quantity, tx.symbol, format_currency(tx.price))
}

/// Signed cash movement: buys spend money, sells bring it in
fn cash_flow(tx: &Transaction) -> ColoredString {
    if tx.is_buy() {
        format!("-{}", format_currency(tx.total)).red()
    } else {
        format!("+{}", format_currency(tx.total)).green()
    }
}

/// Format a successful trade
pub fn format_trade_confirmation(tx: &Transaction) -> String {
    format!(
        "{} {} (total {})\n",
        "✓".green().bold(),
        describe_transaction(tx),
        format_currency(tx.total)
    )
}

/// Format the transaction history table
pub fn format_transactions(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return format!("{} No transactions yet\n", "ℹ".blue().bold());
    }

    #[derive(Tabled)]
    struct TransactionRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Type")]
        kind: String,
        #[tabled(rename = "Symbol")]
        symbol: String,
        #[tabled(rename = "Shares")]
        quantity: String,
        #[tabled(rename = "Price")]
        price: String,
        #[tabled(rename = "Total")]
        total: String,
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|tx| TransactionRow {
            id: tx.id.map(|id| id.to_string()).unwrap_or_default(),
            date: tx.trade_date.format("%Y-%m-%d").to_string(),
            kind: tx.transaction_type.as_str().to_string(),
            symbol: tx.symbol.clone(),
            quantity: tx.quantity.to_string(),
            price: format_currency(tx.price),
            total: cash_flow(tx).to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.modify(Columns::new(4..), Alignment::right());
    format!("{}\n", table)
}

/// Format the dashboard summary with recent activity
pub fn format_activity_summary(summary: &ActivitySummary) -> String {
    let mut output = format!("\n{} Portfolio Dashboard\n\n", "📋".cyan().bold());
    output.push_str(&format!(
        "{:<20} {}\n",
        "Total Invested:".bold(),
        format_currency(summary.total_invested)
    ));
    output.push_str(&format!(
        "{:<20} {}\n",
        "Stocks Traded:".bold(),
        summary.symbols_traded
    ));
    output.push_str(&format!(
        "{:<20} {}\n",
        "Transactions:".bold(),
        summary.transaction_count
    ));

    output.push_str(&format!("\n{}\n", "Recent Activity".bold()));
    if summary.recent.is_empty() {
        output.push_str("No recent activity\n");
    }
    for tx in &summary.recent {
        output.push_str(&format!(
            "  {}  {:<36} {}\n",
            tx.trade_date.format("%Y-%m-%d"),
            describe_transaction(tx),
            cash_flow(tx)
        ));
    }

    output
}

/// Format the logged-in user
pub fn format_user(user: &PublicUser) -> String {
    format!("{} (#{}) <{}>\n", user.name.bold(), user.id, user.email)
}
