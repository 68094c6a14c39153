use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "investo")]
#[command(version, about = "Demo stock trading: browse stocks, trade, track your portfolio")]
#[command(
    long_about = "Browse a catalog of listed stocks, log in with a demo account, buy and sell shares, and follow your portfolio's value and profit/loss."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Config file (defaults to ~/.investo/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse listed stocks
    Stocks {
        #[command(subcommand)]
        action: StockCommands,
    },

    /// Portfolio valuation and activity
    Portfolio {
        #[command(subcommand)]
        action: PortfolioCommands,
    },

    /// Buy shares of a stock
    Buy(TradeArgs),

    /// Sell shares you own
    Sell(TradeArgs),

    /// Transaction history
    Transactions {
        #[command(subcommand)]
        action: TransactionCommands,
    },

    /// Log in with email and password
    Login {
        email: String,
        password: String,
    },

    /// Create an account and log in
    Signup {
        name: String,
        email: String,
        password: String,
    },

    /// Show the logged-in user
    Whoami,

    /// Forget the current session
    Logout,
}

#[derive(Subcommand)]
pub enum StockCommands {
    /// List trending stocks with latest quotes
    List,

    /// Show one stock with price history and your holdings
    Show {
        /// Ticker symbol (e.g., AAPL)
        symbol: String,
    },
}

#[derive(Subcommand)]
pub enum PortfolioCommands {
    /// Show current positions with P&L
    Show,

    /// Show invested total, symbols traded and recent activity
    Summary,
}

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List your transactions, oldest first
    List {
        /// Only transactions for this symbol
        #[arg(short, long)]
        symbol: Option<String>,
    },
}

#[derive(clap::Args)]
pub struct TradeArgs {
    /// Ticker symbol (e.g., AAPL)
    pub symbol: String,

    /// Number of shares
    #[arg(allow_hyphen_values = true)]
    pub quantity: String,

    /// Price per share (defaults to the latest quote)
    #[arg(short, long)]
    pub price: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_trade_with_price() {
        let cli = Cli::try_parse_from(["investo", "--json", "buy", "AAPL", "3", "--price", "101.5"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Buy(args) => {
                assert_eq!(args.symbol, "AAPL");
                assert_eq!(args.quantity, "3");
                assert_eq!(args.price.as_deref(), Some("101.5"));
            }
            _ => panic!("expected buy"),
        }
    }

    #[test]
    fn negative_quantity_reaches_validation() {
        let cli = Cli::try_parse_from(["investo", "sell", "AAPL", "-2"]).unwrap();
        match cli.command {
            Commands::Sell(args) => assert_eq!(args.quantity, "-2"),
            _ => panic!("expected sell"),
        }
    }
}
