pub mod duckduckgo;
pub mod yahoo;

pub use duckduckgo::{format_news_results, DuckDuckGoNews, NewsArticle, NewsSource};
pub use yahoo::{history_window, PriceBar, PriceHistory, PriceHistorySource, YahooFinanceClient};

#[cfg(test)]
mod data_tests;
