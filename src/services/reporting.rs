use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::constants::report::{FILE_TIMESTAMP_FORMAT, RUN_LOG_FILE};
use crate::error::ResearchError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
}

/// One line of `runs.jsonl`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub ts: String,
    pub run_id: String,
    pub ticker: String,
    pub status: RunStatus,

    /// Report file name, relative to the output directory
    pub output_file: Option<String>,

    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Writes markdown reports and the run log under one directory.
#[derive(Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    log_lock: Arc<Mutex<()>>,
}

/// Keep ticker characters that are safe in file names.
fn file_safe(ticker: &str) -> String {
    ticker
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `report_{TICKER}_{YYYYmmdd_HHMMSS}.md`
pub fn report_file_name(ticker: &str, at: DateTime<Local>) -> String {
    format!(
        "report_{}_{}.md",
        file_safe(ticker),
        at.format(FILE_TIMESTAMP_FORMAT)
    )
}

/// Drop a ```markdown fence wrapped around the whole answer.
pub fn strip_markdown_fence(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed.to_string();
    };
    // first line holds the optional language tag
    match body.split_once('\n') {
        Some((tag, inner)) if !tag.trim().contains(' ') => inner.trim().to_string(),
        _ => trimmed.to_string(),
    }
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            log_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn run_log_path(&self) -> PathBuf {
        self.output_dir.join(RUN_LOG_FILE)
    }

    /// Write a new report file. Existing files are never overwritten; a numeric suffix is added instead.
    pub async fn write_report(
        &self,
        ticker: &str,
        markdown: &str,
        at: DateTime<Local>,
    ) -> Result<PathBuf, ResearchError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let base = report_file_name(ticker, at);
        let stem = base.trim_end_matches(".md").to_string();

        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                base.clone()
            } else {
                format!("{}_{}.md", stem, attempt)
            };
            let path = self.output_dir.join(&name);

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(markdown.as_bytes()).await?;
                    if !markdown.ends_with('\n') {
                        file.write_all(b"\n").await?;
                    }
                    file.flush().await?;
                    info!("📝 [REPORT] Saved {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub async fn append_run(&self, entry: &RunLogEntry) -> Result<(), ResearchError> {
        let _guard = self.log_lock.lock().await;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.run_log_path())
            .await?;

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Newest first. Unparseable lines are skipped.
    pub async fn recent_runs(&self, limit: usize) -> Result<Vec<RunLogEntry>, ResearchError> {
        let path = self.run_log_path();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries: Vec<RunLogEntry> = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| match serde_json::from_str(l) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("📝 [REPORT] Skipping bad run log line: {}", e);
                    None
                }
            })
            .collect();

        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }
}
