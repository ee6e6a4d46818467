use std::sync::Arc;

use crate::crew::{Agent, Task};
use crate::tools::Tool;

pub const ROLE: &str = "Senior Stock Price Financial Analyst";

pub fn agent(tools: Vec<Arc<dyn Tool>>, max_iter: usize) -> Agent {
    Agent::new(
        ROLE,
        "Fetch the price data for {ticker} and analyze its trends in detail, \
         providing precise insights into the stock's likely future behavior.",
        "You are an experienced financial analyst with years in the stock market. \
         You specialize in analyzing trends and forecasting price movements from historical and current data, \
         working mainly with technical and fundamental analysis to explain how a stock behaves.",
    )
    .with_tools(tools)
    .with_max_iter(max_iter)
}

pub fn task() -> Task {
    Task::new(
        "Fetch the historical price data for the ticker {ticker} using the yahoo_finance_tool. \
         The analysis must cover one year, starting one year before the current date ({current_date}) until today. \
         The result must include opening price, closing price, trading volume and other relevant data, \
         followed by your reading of the trend.",
        "The historical price data for {ticker} as a table with dates, open, close and volume, \
         ready for detailed financial analysis, plus a short description of the price trend over the year.",
        ROLE,
    )
}
