//! Fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::data::{NewsArticle, NewsSource, PriceBar, PriceHistory, PriceHistorySource};
use crate::error::{DataError, LlmError};
use crate::llm::{ChatBackend, ChatReply, ChatRequest, LLMQueue, ToolCall};

/// Replays canned replies in order and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ChatReply>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<ChatReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyResponse)
    }
}

/// Single-slot queue so scripted replies are consumed in call order.
pub fn queue(backend: Arc<ScriptedBackend>) -> LLMQueue {
    LLMQueue::new(backend, 1, 8)
}

pub fn call(id: &str, name: &str, arguments: &str) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

#[derive(Default)]
pub struct FakePrices {
    pub calls: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

#[async_trait]
impl PriceHistorySource for FakePrices {
    async fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory, DataError> {
        self.calls
            .lock()
            .unwrap()
            .push((ticker.to_string(), start, end));

        if ticker == "NODATA" {
            return Err(DataError::NoData {
                ticker: ticker.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(PriceHistory {
            ticker: ticker.to_string(),
            start,
            end,
            bars: vec![
                PriceBar {
                    date: start,
                    open: 10.0,
                    high: 11.0,
                    low: 9.0,
                    close: 10.0,
                    adj_close: 10.0,
                    volume: 100,
                },
                PriceBar {
                    date: start.succ_opt().unwrap_or(start),
                    open: 10.0,
                    high: 12.0,
                    low: 10.0,
                    close: 11.0,
                    adj_close: 11.0,
                    volume: 300,
                },
            ],
        })
    }
}

#[derive(Default)]
pub struct FakeNews {
    pub calls: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl NewsSource for FakeNews {
    async fn search_news(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<NewsArticle>, DataError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));

        Ok(vec![NewsArticle {
            date: 1_760_000_000,
            title: format!("{} rallies", query),
            excerpt: "Shares climbed".to_string(),
            url: "https://example.com/news".to_string(),
            source: "Example Wire".to_string(),
        }])
    }
}
