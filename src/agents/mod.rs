pub mod news_analyst;
pub mod price_analyst;
pub mod report_writer;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::crew::Crew;
use crate::data::{NewsSource, PriceHistorySource};
use crate::error::CrewError;
use crate::llm::LLMQueue;
use crate::tools::{NewsSearchTool, StockPriceTool, Tool};

/// The price analyst, news analyst and report writer, in that task order.
pub fn build_stock_crew(
    config: &AppConfig,
    prices: Arc<dyn PriceHistorySource>,
    news: Arc<dyn NewsSource>,
    llm: LLMQueue,
) -> Result<Crew, CrewError> {
    let price_tool: Arc<dyn Tool> = Arc::new(StockPriceTool::new(
        prices,
        config.market_data.history_days,
        config.market_data.max_table_rows,
    ));
    let news_tool: Arc<dyn Tool> = Arc::new(NewsSearchTool::new(news, config.news.max_results));

    let agent_max_iter = config.crew.agent_max_iter;
    let agents = vec![
        price_analyst::agent(vec![price_tool], agent_max_iter),
        news_analyst::agent(vec![news_tool], agent_max_iter),
        report_writer::agent(agent_max_iter),
    ];
    let tasks = vec![
        price_analyst::task(),
        news_analyst::task(),
        report_writer::task(),
    ];

    Ok(Crew::new(agents, tasks, config.crew.process, llm)?
        .with_manager_max_iter(config.crew.manager_max_iter))
}
