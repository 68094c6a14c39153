//! Command dispatcher that routes parsed clap commands to their handlers.

mod auth;
mod portfolio;
mod stocks;
mod trades;

use anyhow::{Context, Result};
use investo::app::App;
use investo::db::PublicUser;
use investo::error::AuthError;

use crate::cli::{Commands, PortfolioCommands, StockCommands, TransactionCommands};

/// Route a parsed command to its handler
pub async fn dispatch_command(command: &Commands, app: &App, json_output: bool) -> Result<()> {
    match command {
        Commands::Stocks { action } => match action {
            StockCommands::List => stocks::dispatch_stock_list(app, json_output).await,
            StockCommands::Show { symbol } => {
                stocks::dispatch_stock_show(app, symbol, json_output).await
            }
        },
        Commands::Portfolio { action } => match action {
            PortfolioCommands::Show => portfolio::dispatch_portfolio_show(app, json_output).await,
            PortfolioCommands::Summary => {
                portfolio::dispatch_portfolio_summary(app, json_output).await
            }
        },
        Commands::Buy(args) => trades::dispatch_buy(app, args, json_output).await,
        Commands::Sell(args) => trades::dispatch_sell(app, args, json_output).await,
        Commands::Transactions { action } => match action {
            TransactionCommands::List { symbol } => {
                trades::dispatch_transactions_list(app, symbol.as_deref(), json_output).await
            }
        },
        Commands::Login { email, password } => {
            auth::dispatch_login(app, email, password, json_output).await
        }
        Commands::Signup {
            name,
            email,
            password,
        } => auth::dispatch_signup(app, name, email, password, json_output).await,
        Commands::Whoami => auth::dispatch_whoami(app, json_output).await,
        Commands::Logout => auth::dispatch_logout(app, json_output),
    }
}

/// Logged-in user or a `NotLoggedIn` error
async fn require_user(app: &App) -> Result<PublicUser> {
    let session = app.session.load().context("Failed to load session")?;
    let user = app.auth.require_user(session.as_ref()).await?;
    Ok(user)
}

/// Logged-in user, `None` for anonymous use
async fn optional_user(app: &App) -> Result<Option<PublicUser>> {
    match require_user(app).await {
        Ok(user) => Ok(Some(user)),
        Err(e) if matches!(e.downcast_ref::<AuthError>(), Some(AuthError::NotLoggedIn)) => Ok(None),
        Err(e) => Err(e),
    }
}
