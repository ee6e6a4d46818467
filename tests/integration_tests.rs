//! Integration tests for the research pipeline.
//! These tests drive the public API end to end with scripted model replies.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use stock_research_crew::agents::{build_stock_crew, news_analyst, price_analyst, report_writer};
use stock_research_crew::config::AppConfig;
use stock_research_crew::crew::Process;
use stock_research_crew::data::{NewsArticle, NewsSource, PriceBar, PriceHistory, PriceHistorySource};
use stock_research_crew::error::{DataError, LlmError};
use stock_research_crew::llm::{ChatBackend, ChatMessage, ChatReply, ChatRequest, LLMQueue, ToolCall};
use stock_research_crew::services::{ReportWriter, ResearchService, RunStatus};

struct Script {
    replies: Mutex<VecDeque<ChatReply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl Script {
    fn new(replies: Vec<ChatReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ChatBackend for Script {
    async fn complete(&self, request: ChatRequest) -> Result<ChatReply, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Default)]
struct Prices {
    windows: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

#[async_trait]
impl PriceHistorySource for Prices {
    async fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory, DataError> {
        self.windows
            .lock()
            .unwrap()
            .push((ticker.to_string(), start, end));
        Ok(PriceHistory {
            ticker: ticker.to_string(),
            start,
            end,
            bars: vec![PriceBar {
                date: start,
                open: 100.0,
                high: 105.0,
                low: 99.0,
                close: 104.0,
                adj_close: 104.0,
                volume: 5_000,
            }],
        })
    }
}

#[derive(Default)]
struct News {
    queries: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl NewsSource for News {
    async fn search_news(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<NewsArticle>, DataError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        Ok(vec![NewsArticle {
            date: 0,
            title: format!("{} beats estimates", query),
            excerpt: "Quarterly revenue grew.".to_string(),
            url: "https://example.com/a".to_string(),
            source: "Wire".to_string(),
        }])
    }
}

fn call(id: &str, name: &str, arguments: serde_json::Value) -> ChatReply {
    ChatReply::calls(vec![ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments: arguments.to_string(),
    }])
}

fn delegate(id: &str, coworker: &str, task: &str) -> ChatReply {
    call(
        id,
        "delegate_work_to_coworker",
        serde_json::json!({"task": task, "context": "Ticker is PETR4.SA", "coworker": coworker}),
    )
}

/// Manager delegates each task; coworkers use their tools and answer.
#[tokio::test]
async fn test_hierarchical_research_flow() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.crew.process = Process::Hierarchical;
    config.report.output_dir = dir.path().display().to_string();

    let script = Script::new(vec![
        // task 1: price analysis
        delegate("m1", price_analyst::ROLE, "Analyse the price history"),
        call("p1", "yahoo_finance_tool", serde_json::json!({"ticker": "PETR4.SA"})),
        ChatReply::text("Uptrend of 4%"),
        ChatReply::text("Price: uptrend of 4%"),
        // task 2: news analysis
        delegate("m2", news_analyst::ROLE, "Summarise the news"),
        call("n1", "news_search", serde_json::json!({"query": "PETR4.SA"})),
        ChatReply::text("News is positive"),
        ChatReply::text("News: positive"),
        // task 3: newsletter
        delegate("m3", report_writer::ROLE, "Write the newsletter"),
        ChatReply::text("# PETR4.SA\n\nPositive outlook."),
        ChatReply::text("```markdown\n# PETR4.SA\n\nPositive outlook.\n```"),
    ]);
    let prices = Arc::new(Prices::default());
    let news = Arc::new(News::default());

    let llm = LLMQueue::new(script.clone(), 1, 16);
    let crew = build_stock_crew(&config, prices.clone(), news.clone(), llm).unwrap();
    let service = ResearchService::new(crew, ReportWriter::new(dir.path()), &config);

    let report = service.run("petr4.sa").await.unwrap();

    assert_eq!(report.ticker, "PETR4.SA");
    assert_eq!(report.markdown, "# PETR4.SA\n\nPositive outlook.");
    assert_eq!(report.tasks.len(), 3);
    assert_eq!(report.tasks[0].agent, price_analyst::ROLE);
    assert_eq!(report.tasks[0].raw, "Price: uptrend of 4%");
    assert_eq!(report.tasks[2].agent, report_writer::ROLE);

    // one year of daily prices, ten news results
    let windows = prices.windows.lock().unwrap().clone();
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].0, "PETR4.SA");
    assert_eq!((windows[0].2 - windows[0].1).num_days(), 365);
    assert_eq!(
        news.queries.lock().unwrap().clone(),
        vec![("PETR4.SA".to_string(), 10)]
    );

    let saved = std::fs::read_to_string(dir.path().join(&report.output_file)).unwrap();
    assert_eq!(saved, "# PETR4.SA\n\nPositive outlook.\n");

    let runs = service.writer().recent_runs(5).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, RunStatus::Completed);

    // the manager only ever sees delegation tools
    let requests = script.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 11);
    let manager_tools: Vec<String> = requests[0].tools.iter().map(|t| t.name.clone()).collect();
    assert_eq!(
        manager_tools,
        vec!["delegate_work_to_coworker", "ask_question_to_coworker"]
    );
    let analyst_tools: Vec<String> = requests[1].tools.iter().map(|t| t.name.clone()).collect();
    assert_eq!(analyst_tools, vec!["yahoo_finance_tool"]);

    // the price table reaches the analyst as a tool result
    let tool_result = requests[2].messages.iter().find_map(|m| match m {
        ChatMessage::Tool { content, .. } => Some(content.clone()),
        _ => None,
    });
    assert!(tool_result.unwrap().contains("PETR4.SA"));
}

/// A manager that never answers stops at its iteration limit.
#[tokio::test]
async fn test_manager_iteration_limit_fails_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.crew.manager_max_iter = 2;
    config.report.output_dir = dir.path().display().to_string();

    // two empty turns, then an empty forced answer
    let script = Script::new(vec![
        ChatReply::text(""),
        ChatReply::text(""),
        ChatReply::text(""),
    ]);

    let llm = LLMQueue::new(script.clone(), 1, 16);
    let crew = build_stock_crew(
        &config,
        Arc::new(Prices::default()),
        Arc::new(News::default()),
        llm,
    )
    .unwrap();
    let service = ResearchService::new(crew, ReportWriter::new(dir.path()), &config);

    let err = service.run("AAPL").await.unwrap_err();
    assert!(!err.is_client_error());
    assert_eq!(script.requests.lock().unwrap().len(), 3);

    let runs = service.writer().recent_runs(5).await.unwrap();
    assert_eq!(runs[0].status, RunStatus::Failed);
    assert!(std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .all(|e| !e.file_name().to_string_lossy().ends_with(".md")));
}
