pub mod reporting;
pub mod research;

pub use reporting::{ReportWriter, RunLogEntry, RunStatus};
pub use research::{validate_ticker, ResearchReport, ResearchService};
