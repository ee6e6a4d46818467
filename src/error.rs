//! Custom error types for the research pipeline
//!
//! Each layer owns a typed error; the service layer wraps them.

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Language model errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("OpenAI API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("LLM returned no choices")]
    EmptyResponse,

    #[error("Failed to queue LLM request")]
    QueueClosed,

    #[error("LLM request was cancelled")]
    Cancelled,
}

/// Market data and news provider errors
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Yahoo Finance error: {0}")]
    Yahoo(String),

    #[error("No price data for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: String,
        end: String,
    },

    #[error("Search token not found in DuckDuckGo response for '{query}'")]
    MissingSearchToken { query: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

/// Tool invocation errors, reported back to the model as observations
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Crew(#[from] Box<CrewError>),
}

/// Orchestration errors
#[derive(Error, Debug)]
pub enum CrewError {
    #[error("Missing input '{name}' for placeholder in: {template}")]
    MissingInput { name: String, template: String },

    #[error("Task {task} is assigned to unknown agent '{role}'")]
    UnknownAgent { task: usize, role: String },

    #[error("Task {task} uses context from task {context}, which does not run before it")]
    InvalidContext { task: usize, context: usize },

    #[error("Crew has no tasks")]
    NoTasks,

    #[error("{role} produced no final answer after {iterations} iterations")]
    NoFinalAnswer { role: String, iterations: usize },

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Top-level errors for a research run
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("{0}")]
    InvalidTicker(String),

    #[error("Research pipeline failed: {0}")]
    Crew(#[from] CrewError),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode run log: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ResearchError {
    /// Whether the error was caused by the caller's input rather than the pipeline
    pub fn is_client_error(&self) -> bool {
        matches!(self, ResearchError::InvalidTicker(_))
    }
}
