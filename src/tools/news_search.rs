use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::{string_arg, string_params, Tool};
use crate::constants::news::BACKEND;
use crate::data::{format_news_results, NewsSource};
use crate::error::ToolError;

pub const NAME: &str = "news_search";

/// Recent news search, limited to a fixed number of results.
pub struct NewsSearchTool {
    source: Arc<dyn NewsSource>,
    max_results: usize,
}

impl NewsSearchTool {
    pub fn new(source: Arc<dyn NewsSource>, max_results: usize) -> Self {
        Self { source, max_results }
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Searches recent news articles. Input is a search query such as a ticker or company name. \
         Returns snippet, title, link, date and source for each article."
    }

    fn parameters(&self) -> Value {
        string_params(&[("query", "News search query")])
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let query = string_arg(NAME, &args, "query")?;
        info!("🔧 [TOOL] {} (backend: {}) for '{}'", NAME, BACKEND, query);

        let articles = self.source.search_news(&query, self.max_results).await?;
        Ok(format_news_results(&articles))
    }
}
