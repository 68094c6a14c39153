//! Simulated network latency for the mock services.

use std::time::Duration;
use tracing::debug;

/// Service call being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    TrendingStocks,
    StockDetail,
    Portfolio,
    Trade,
    Login,
    Signup,
    CurrentUser,
}

impl Operation {
    pub fn delay(&self) -> Duration {
        let ms = match self {
            Operation::TrendingStocks => 800,
            Operation::StockDetail => 500,
            Operation::Portfolio => 700,
            Operation::Trade => 1000,
            Operation::Login | Operation::Signup => 800,
            Operation::CurrentUser => 300,
        };
        Duration::from_millis(ms)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Latency {
    enabled: bool,
}

impl Latency {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sleep for the operation's delay when enabled
    pub async fn simulate(&self, op: Operation) {
        if !self.enabled {
            return;
        }
        let delay = op.delay();
        debug!("Simulating {:?} latency of {}ms", op, delay.as_millis());
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_latency_returns_immediately() {
        let start = std::time::Instant::now();
        Latency::disabled().simulate(Operation::Trade).await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_operation_delays() {
        assert_eq!(Operation::Trade.delay(), Duration::from_millis(1000));
        assert_eq!(Operation::CurrentUser.delay(), Duration::from_millis(300));
        assert!(!Latency::default().is_enabled());
    }
}
