use std::sync::Arc;

use stock_research_crew::agents::build_stock_crew;
use stock_research_crew::api::{run_server, AppState};
use stock_research_crew::config::AppConfig;
use stock_research_crew::data::{DuckDuckGoNews, YahooFinanceClient};
use stock_research_crew::llm::{LLMClient, LLMQueue};
use stock_research_crew::services::{ReportWriter, ResearchService};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // Setup Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Stock Research Crew...");

    // Load Configuration
    let config = AppConfig::load()?;
    info!(
        "Loaded Configuration: process={:?}, manager_max_iter={}, agent_max_iter={}",
        config.crew.process, config.crew.manager_max_iter, config.crew.agent_max_iter
    );

    // Initialize Clients
    info!("Initializing AI Clients...");
    let api_key = config.llm.api_key.clone().unwrap_or_default();
    if api_key.is_empty() {
        warn!("⚠️ OPENAI_API_KEY is not set - research requests will fail");
    }
    let base_url = config.llm.base_url.clone();
    if let Some(url) = &base_url {
        info!("Using Custom OpenAI Base URL: {}", url);
    }

    let model = config.llm.model.clone();
    info!("Using LLM Model: {}", model);

    let llm_client =
        LLMClient::new(api_key, base_url, model).with_temperature(config.llm.temperature);

    info!(
        "📬 Initializing LLM Queue (max concurrent: {}, size: {})...",
        config.llm.max_concurrent, config.llm.queue_size
    );
    let llm_queue = LLMQueue::new(
        Arc::new(llm_client),
        config.llm.max_concurrent,
        config.llm.queue_size,
    );

    // Data sources
    let prices = Arc::new(YahooFinanceClient::new(config.market_data.timeout_secs));
    let news = Arc::new(DuckDuckGoNews::new(
        &config.news.region,
        &config.news.safesearch,
        config.news.timeout_secs,
    )?);

    let crew = build_stock_crew(&config, prices, news, llm_queue)?;
    let writer = ReportWriter::new(&config.report.output_dir);
    info!("📝 Reports will be written to {}", writer.output_dir().display());

    let bind_addr = config.server.bind_addr.clone();
    let app_state = Arc::new(AppState {
        research: ResearchService::new(crew, writer, &config),
    });

    // Start API Server
    info!("Initializing API Server...");
    run_server(app_state, &bind_addr).await?;

    Ok(())
}
