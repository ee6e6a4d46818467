use crate::crew::{Agent, Task};

pub const ROLE: &str = "Senior Stock Analyst Writer";

pub fn agent(max_iter: usize) -> Agent {
    Agent::new(
        ROLE,
        "Write an insightful, engaging and informative 3-paragraph newsletter based on the stock reports and price trends. \
         Synthesize the market analysis into a narrative that highlights promising opportunities and potential risks, \
         helping investors understand the current dynamics and make informed decisions.",
        "You are widely recognized as the best stock analyst in the market. With a deep grasp of complex financial concepts, \
         you craft stories that resonate with everyone from beginners to seasoned professionals. \
         You interpret macroeconomic factors and combine theories such as cycle theory and fundamental analysis \
         to give a comprehensive view of the market, and you communicate it clearly and convincingly.",
    )
    .with_max_iter(max_iter)
    .with_delegation(true)
}

/// Reads the price and news task outputs (indices 0 and 1).
pub fn task() -> Task {
    Task::new(
        "Use the stock price trend and the market news report to analyze {ticker} and write a newsletter about the company. \
         The report must be brief and highlight the most important points, focusing on the price trend, the news \
         and the fear/greed index. What are the considerations for the near future? \
         Include the previous analyses of the price trend and the news summary. \
         The report must be written in {report_language} and formatted as markdown.",
        "A brief, informative newsletter about {ticker} in markdown, highlighting the price trend, the news and the fear/greed index, \
         with considerations for the near future and a summary of the previous price and news analyses.",
        ROLE,
    )
    .with_context(vec![0, 1])
}
