// Reports module - portfolio valuation and dashboard summaries

pub mod activity;
pub mod portfolio;

pub use activity::{summarize_activity, ActivitySummary};
pub use portfolio::{calculate_portfolio, owned_quantity, PortfolioReport, PositionSummary};
