//! Markdown report files for completed analyses.
//!
//! Presentation artifacts only; the result store stays the source of truth.
//! One directory per request under `{reports_dir}/investment/`, one file per
//! phase payload that exists.

use std::fs;
use std::path::{Path, PathBuf};

use advisor_core::{AnalysisError, AnalysisRecord};

pub struct ReportWriter {
    reports_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    /// Directory the reports for `request_id` land in.
    pub fn report_dir(&self, request_id: &str) -> PathBuf {
        self.reports_dir.join("investment").join(request_id)
    }

    /// Write one markdown file per present phase payload. Absent payloads
    /// are skipped, so partial records produce partial report sets.
    pub fn save(&self, record: &AnalysisRecord) -> Result<(), AnalysisError> {
        let dir = self.report_dir(&record.request_id);
        fs::create_dir_all(&dir)
            .map_err(|e| AnalysisError::Report(format!("create {}: {e}", dir.display())))?;

        if let Some(stock) = &record.stock_analysis {
            let body = format!(
                "# Stock Analysis Report\n\n**Companies:** {}\n\n**Analysis Date:** {}\n\n\
                 ## Complete Analysis\n\n{}\n",
                stock.company_symbols,
                stock.analysis_date.to_rfc3339(),
                stock.market_analysis,
            );
            write_report(&dir.join("stock_analyst_report.md"), &body)?;
        }

        if let Some(ranking) = &record.investment_ranking {
            let body = format!(
                "# Investment Ranking Report\n\n**Analysis Date:** {}\n\n\
                 ## Complete Ranking Analysis\n\n{}\n",
                ranking.analysis_date.to_rfc3339(),
                ranking.ranked_companies,
            );
            write_report(&dir.join("research_analyst_report.md"), &body)?;
        }

        if let Some(allocation) = &record.portfolio_allocation {
            let body = format!(
                "# Investment Portfolio Report\n\n**Analysis Date:** {}\n\n\
                 ## Complete Portfolio Analysis\n\n{}\n",
                allocation.analysis_date.to_rfc3339(),
                allocation.allocation_strategy,
            );
            write_report(&dir.join("investment_report.md"), &body)?;
        }

        tracing::info!("Reports saved for analysis {}", record.request_id);
        Ok(())
    }
}

fn write_report(path: &Path, body: &str) -> Result<(), AnalysisError> {
    fs::write(path, body)
        .map_err(|e| AnalysisError::Report(format!("write {}: {e}", path.display())))
}
