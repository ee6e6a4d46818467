//! Price history from Yahoo Finance

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};
use yahoo_finance_api as yahoo;

use crate::constants::market_data::TABLE_EDGE_ROWS;
use crate::error::DataError;

/// One daily candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub bars: Vec<PriceBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub first_close: f64,
    pub last_close: f64,
    pub change_pct: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub average_volume: f64,
}

/// `(today - days, today)`
pub fn history_window(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(days), today)
}

/// Trading day of a bar timestamp, in the exchange's local calendar
pub fn exchange_date(timestamp: i64, gmtoffset_secs: i64) -> Option<NaiveDate> {
    let local = timestamp.checked_add(gmtoffset_secs)?;
    Some(DateTime::from_timestamp(local, 0)?.date_naive())
}

impl PriceHistory {
    pub fn summary(&self) -> Option<PriceSummary> {
        let first = self.bars.first()?;
        let last = self.bars.last()?;

        let period_high = self.bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let period_low = self.bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let average_volume =
            self.bars.iter().map(|b| b.volume as f64).sum::<f64>() / self.bars.len() as f64;
        let change_pct = if first.close != 0.0 {
            (last.close - first.close) / first.close * 100.0
        } else {
            0.0
        };

        Some(PriceSummary {
            first_close: first.close,
            last_close: last.close,
            change_pct,
            period_high,
            period_low,
            average_volume,
        })
    }

    /// Tabular rendering; tables longer than `max_rows` keep only head and tail rows.
    pub fn to_table(&self, max_rows: usize) -> String {
        let mut out = format!(
            "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14}\n",
            "Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"
        );

        let row = |b: &PriceBar| {
            format!(
                "{:<10} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>12.4} {:>14}\n",
                b.date.format("%Y-%m-%d").to_string(),
                b.open,
                b.high,
                b.low,
                b.close,
                b.adj_close,
                b.volume
            )
        };

        if self.bars.len() > max_rows && self.bars.len() > TABLE_EDGE_ROWS * 2 {
            for bar in &self.bars[..TABLE_EDGE_ROWS] {
                out.push_str(&row(bar));
            }
            out.push_str(&format!(
                "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14}\n",
                "...", "...", "...", "...", "...", "...", "..."
            ));
            for bar in &self.bars[self.bars.len() - TABLE_EDGE_ROWS..] {
                out.push_str(&row(bar));
            }
        } else {
            for bar in &self.bars {
                out.push_str(&row(bar));
            }
        }

        out.push_str(&format!("\n[{} rows x 6 columns]", self.bars.len()));
        out
    }

    /// Summary block followed by the table, as handed to the model
    pub fn render(&self, max_rows: usize) -> String {
        let mut out = format!(
            "Price history for {} from {} to {}\n",
            self.ticker, self.start, self.end
        );
        if let Some(s) = self.summary() {
            out.push_str(&format!(
                "First close: {:.4} | Last close: {:.4} | Change: {:+.2}% | High: {:.4} | Low: {:.4} | Avg volume: {:.0}\n\n",
                s.first_close, s.last_close, s.change_pct, s.period_high, s.period_low, s.average_volume
            ));
        }
        out.push_str(&self.to_table(max_rows));
        out
    }
}

#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Daily bars in `[start, end)`
    async fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory, DataError>;
}

/// Yahoo Finance API client
pub struct YahooFinanceClient {
    timeout: std::time::Duration,
}

impl YahooFinanceClient {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: std::time::Duration::from_secs(timeout_secs),
        }
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[async_trait]
impl PriceHistorySource for YahooFinanceClient {
    async fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory, DataError> {
        info!("📈 [PRICES] Fetching {} from {} to {}", ticker, start, end);

        let provider = yahoo::YahooConnector::new().map_err(|e| DataError::Yahoo(e.to_string()))?;

        let start_odt = OffsetDateTime::from_unix_timestamp(midnight_utc(start).timestamp())
            .map_err(|e| DataError::Yahoo(format!("Invalid start timestamp: {}", e)))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(midnight_utc(end).timestamp())
            .map_err(|e| DataError::Yahoo(format!("Invalid end timestamp: {}", e)))?;

        let response = tokio::time::timeout(
            self.timeout,
            provider.get_quote_history(ticker, start_odt, end_odt),
        )
        .await
        .map_err(|_| DataError::Yahoo(format!("Timed out fetching {}", ticker)))?
        .map_err(|e| DataError::Yahoo(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::Yahoo(e.to_string()))?;

        // Exchange offset from UTC; without it bars fall back to UTC days
        let gmtoffset = match response.metadata() {
            Ok(meta) => meta.gmtoffset as i64,
            Err(e) => {
                warn!("📈 [PRICES] No metadata for {}: {}", ticker, e);
                0
            }
        };

        let bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(|q| {
                let date = exchange_date(q.timestamp as i64, gmtoffset)?;
                Some(PriceBar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    adj_close: q.adjclose,
                    volume: q.volume,
                })
            })
            .filter(|bar| bar.date >= start && bar.date < end)
            .collect();

        if bars.is_empty() {
            return Err(DataError::NoData {
                ticker: ticker.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        info!("📈 [PRICES] Received {} bars for {}", bars.len(), ticker);

        Ok(PriceHistory {
            ticker: ticker.to_string(),
            start,
            end,
            bars,
        })
    }
}
