//! Application-wide constants and defaults
//!
//! Config defaults live here so `config.rs`, the tools and the tests agree
//! on the same values.

/// Language model defaults
pub mod llm {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const DEFAULT_MAX_CONCURRENT: usize = 4;
    pub const DEFAULT_QUEUE_SIZE: usize = 64;
}

/// Orchestration limits
pub mod crew {
    /// Manager turns per task in hierarchical mode
    pub const MANAGER_MAX_ITER: usize = 15;

    /// Model turns per agent execution
    pub const AGENT_MAX_ITER: usize = 5;

    pub const MANAGER_ROLE: &str = "Crew Manager";
}

/// Price history defaults
pub mod market_data {
    /// One year back from today
    pub const HISTORY_DAYS: i64 = 365;

    /// About a century; larger windows overflow date arithmetic
    pub const MAX_HISTORY_DAYS: i64 = 36_500;

    /// Longer tables are abbreviated to head/tail
    pub const MAX_TABLE_ROWS: usize = 60;

    /// Rows shown at each end of an abbreviated table
    pub const TABLE_EDGE_ROWS: usize = 5;

    pub const TIMEOUT_SECS: u64 = 30;
}

/// News search defaults
pub mod news {
    pub const BACKEND: &str = "news";
    pub const MAX_RESULTS: usize = 10;
    pub const REGION: &str = "wt-wt";
    pub const SAFESEARCH: &str = "moderate";
    pub const TIMEOUT_SECS: u64 = 30;

    pub const DUCKDUCKGO_URL: &str = "https://duckduckgo.com";
    pub const DUCKDUCKGO_NEWS_PATH: &str = "/news.js";

    pub const NO_RESULTS: &str = "No good DuckDuckGo Search Result was found";
}

/// Report output defaults
pub mod report {
    pub const OUTPUT_DIR: &str = "reports";
    pub const LANGUAGE: &str = "Brazilian Portuguese";
    pub const RUN_LOG_FILE: &str = "runs.jsonl";
    pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
}

/// HTTP server defaults
pub mod server {
    pub const BIND_ADDR: &str = "0.0.0.0:3000";
    pub const RECENT_RUNS_LIMIT: usize = 20;
    pub const MAX_TICKER_LEN: usize = 16;
}
