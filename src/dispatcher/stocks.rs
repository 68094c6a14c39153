use anyhow::Result;
use investo::app::App;
use serde::Serialize;

use crate::cli::formatters;

pub async fn dispatch_stock_list(app: &App, json_output: bool) -> Result<()> {
    tracing::info!("Listing trending stocks");
    let stocks = app.market.get_trending_stocks().await;

    if json_output {
        println!("{}", formatters::format_json(&stocks));
    } else {
        println!("{}", formatters::format_stock_list(&stocks));
    }
    Ok(())
}

pub async fn dispatch_stock_show(app: &App, symbol: &str, json_output: bool) -> Result<()> {
    let stock = app.market.get_stock_by_symbol(symbol).await?;
    let owned = match super::optional_user(app).await? {
        Some(user) => Some(app.trading.holdings(user.id, &stock.symbol)?),
        None => None,
    };

    if json_output {
        #[derive(Serialize)]
        struct StockDetail<'a> {
            #[serde(flatten)]
            stock: &'a investo::db::Stock,
            owned: Option<i64>,
        }
        println!(
            "{}",
            formatters::format_json(&StockDetail {
                stock: &stock,
                owned
            })
        );
    } else {
        println!("{}", formatters::format_stock_detail(&stock, owned));
    }
    Ok(())
}
