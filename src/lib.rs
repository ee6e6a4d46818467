//! Stock Research Crew - multi-agent stock research reports
//!
//! This library provides a price-history tool, a news search tool and a
//! small crew of LLM agents that turn both into a markdown report.

pub mod agents;
pub mod api;
pub mod config;
pub mod constants;
pub mod crew;
pub mod data;
pub mod error;
pub mod llm;
pub mod page;
pub mod services;
pub mod tools;

// Re-export commonly used types
pub use config::AppConfig;
pub use crew::{Crew, CrewOutput, Process, TaskOutput};
pub use error::ResearchError;
pub use services::{ReportWriter, ResearchReport, ResearchService};

#[cfg(test)]
mod test_support;
