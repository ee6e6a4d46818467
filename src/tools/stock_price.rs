use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::info;

use super::{string_arg, string_params, Tool};
use crate::data::{history_window, PriceHistorySource};
use crate::error::ToolError;

pub const NAME: &str = "yahoo_finance_tool";

/// Fetches one year of daily prices up to today for a ticker.
pub struct StockPriceTool {
    source: Arc<dyn PriceHistorySource>,
    history_days: i64,
    max_table_rows: usize,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl StockPriceTool {
    pub fn new(source: Arc<dyn PriceHistorySource>, history_days: i64, max_table_rows: usize) -> Self {
        Self {
            source,
            history_days,
            max_table_rows,
            today: local_today,
        }
    }

    /// Fix the clock, for reproducible windows
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Fetches the stock prices of a ticker from one year ago until today using the Yahoo Finance API. \
         Returns daily open, high, low, close, adjusted close and volume."
    }

    fn parameters(&self) -> Value {
        string_params(&[("ticker", "Ticker symbol, e.g. AAPL or PETR4.SA")])
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let ticker = string_arg(NAME, &args, "ticker")?.to_uppercase();
        let (start, end) = history_window((self.today)(), self.history_days);

        info!("🔧 [TOOL] {} for {} ({} -> {})", NAME, ticker, start, end);
        let history = self.source.history(&ticker, start, end).await?;
        Ok(history.render(self.max_table_rows))
    }
}
