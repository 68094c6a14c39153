use anyhow::Result;
use investo::app::App;

use crate::cli::formatters;

pub async fn dispatch_portfolio_show(app: &App, json_output: bool) -> Result<()> {
    let user = super::require_user(app).await?;
    tracing::info!("Generating portfolio report for account {}", user.id);

    let report = app.trading.get_portfolio(user.id).await?;

    if json_output {
        println!("{}", formatters::format_json(&report));
    } else if report.is_empty() {
        println!("{}", formatters::format_empty_portfolio());
    } else {
        println!("{}", formatters::format_portfolio_table(&report));
    }
    Ok(())
}

pub async fn dispatch_portfolio_summary(app: &App, json_output: bool) -> Result<()> {
    let user = super::require_user(app).await?;
    let summary = app.trading.summary(user.id).await?;

    if json_output {
        println!("{}", formatters::format_json(&summary));
    } else {
        println!("{}", formatters::format_activity_summary(&summary));
    }
    Ok(())
}
