use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::reporting::{strip_markdown_fence, ReportWriter, RunLogEntry, RunStatus};
use crate::config::AppConfig;
use crate::constants::server::MAX_TICKER_LEN;
use crate::crew::{Crew, TaskOutput};
use crate::error::ResearchError;

#[derive(Clone, Debug, Serialize)]
pub struct ResearchReport {
    pub run_id: String,
    pub ticker: String,
    pub markdown: String,
    pub output_file: String,
    pub tasks: Vec<TaskOutput>,
}

/// Trim and uppercase a user-supplied ticker.
pub fn validate_ticker(raw: &str) -> Result<String, ResearchError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(ResearchError::InvalidTicker("Please enter a ticker".to_string()));
    }
    if ticker.chars().count() > MAX_TICKER_LEN {
        return Err(ResearchError::InvalidTicker(format!(
            "Ticker is too long (max {} characters)",
            MAX_TICKER_LEN
        )));
    }
    if let Some(bad) = ticker
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
    {
        return Err(ResearchError::InvalidTicker(format!(
            "Invalid character '{}' in ticker",
            bad
        )));
    }
    Ok(ticker)
}

/// Sentence asking the news analyst to cover extra assets, minus the requested one.
pub fn always_include_clause(always_include: &[String], ticker: &str) -> String {
    let extra: Vec<&str> = always_include
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case(ticker))
        .collect();

    if extra.is_empty() {
        String::new()
    } else {
        format!(
            "Always include {} in the analysis, even if it was not requested.",
            extra.join(", ")
        )
    }
}

/// Runs the crew for one ticker and persists the resulting report.
pub struct ResearchService {
    crew: Crew,
    writer: ReportWriter,
    report_language: String,
    always_include: Vec<String>,
}

impl ResearchService {
    pub fn new(crew: Crew, writer: ReportWriter, config: &AppConfig) -> Self {
        Self {
            crew,
            writer,
            report_language: config.report.language.clone(),
            always_include: config.news.always_include.clone(),
        }
    }

    pub fn writer(&self) -> &ReportWriter {
        &self.writer
    }

    pub fn inputs(&self, ticker: &str, now: DateTime<Local>) -> HashMap<String, String> {
        HashMap::from([
            ("ticker".to_string(), ticker.to_string()),
            (
                "current_date".to_string(),
                now.format("%Y-%m-%d %H:%M").to_string(),
            ),
            ("report_language".to_string(), self.report_language.clone()),
            (
                "always_include".to_string(),
                always_include_clause(&self.always_include, ticker),
            ),
        ])
    }

    pub async fn run(&self, raw_ticker: &str) -> Result<ResearchReport, ResearchError> {
        let ticker = validate_ticker(raw_ticker)?;
        let run_id = Uuid::new_v4().to_string();

        let span = info_span!("research", run_id = %run_id, ticker = %ticker);
        self.run_validated(ticker, run_id).instrument(span).await
    }

    async fn run_validated(
        &self,
        ticker: String,
        run_id: String,
    ) -> Result<ResearchReport, ResearchError> {
        let started = Instant::now();
        let now = Local::now();
        info!("🔎 [RESEARCH] Starting research for {}", ticker);

        let output = match self.crew.kickoff(&self.inputs(&ticker, now)).await {
            Ok(output) => output,
            Err(e) => {
                error!("🔎 [RESEARCH] Crew failed for {}: {}", ticker, e);
                self.log_failure(run_id, ticker, started, e.to_string()).await;
                return Err(e.into());
            }
        };

        let markdown = strip_markdown_fence(&output.raw);
        let path = match self.writer.write_report(&ticker, &markdown, now).await {
            Ok(path) => path,
            Err(e) => {
                error!("🔎 [RESEARCH] Could not save report for {}: {}", ticker, e);
                self.log_failure(run_id, ticker, started, e.to_string()).await;
                return Err(e);
            }
        };
        let output_file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.log_run(RunLogEntry {
            ts: Local::now().to_rfc3339(),
            run_id: run_id.clone(),
            ticker: ticker.clone(),
            status: RunStatus::Completed,
            output_file: Some(output_file.clone()),
            duration_ms: started.elapsed().as_millis() as u64,
            error: None,
        })
        .await;

        info!(
            "🔎 [RESEARCH] Finished {} in {:?} -> {}",
            ticker,
            started.elapsed(),
            output_file
        );

        Ok(ResearchReport {
            run_id,
            ticker,
            markdown,
            output_file,
            tasks: output.tasks_output,
        })
    }

    async fn log_failure(
        &self,
        run_id: String,
        ticker: String,
        started: Instant,
        error: String,
    ) {
        self.log_run(RunLogEntry {
            ts: Local::now().to_rfc3339(),
            run_id,
            ticker,
            status: RunStatus::Failed,
            output_file: None,
            duration_ms: started.elapsed().as_millis() as u64,
            error: Some(error),
        })
        .await;
    }

    /// The run log is best-effort; a failure to append never fails the run.
    async fn log_run(&self, entry: RunLogEntry) {
        if let Err(e) = self.writer.append_run(&entry).await {
            warn!("📝 [REPORT] Failed to append run log: {}", e);
        }
    }
}
