//! Service facade over the orchestrator and result store.
//!
//! Both entry points (the HTTP API and the report CLI) go through this one
//! service, so there is exactly one pipeline implementation in the system.

use std::path::PathBuf;
use std::sync::Arc;

use advisor_core::{
    AnalysisError, AnalysisRecord, AnalysisRequest, AnalysisStatus, AnalysisSummary, ServiceStats,
};
use report_store::ReportStore;

use crate::{AgentSet, InvestmentAnalyzer, ReportWriter};

/// Default number of summaries returned by a listing.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Hard cap enforced at the caller-facing boundary.
pub const MAX_LIST_LIMIT: usize = 100;

const DEFAULT_MAX_REPORT_AGE_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Model identifier passed to every agent invocation.
    pub model: String,
    /// Where markdown reports land; `None` disables report files.
    pub reports_dir: Option<PathBuf>,
    /// Default horizon for `cleanup_old_analyses`.
    pub max_report_age_days: i64,
}

impl ServiceConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reports_dir: Some(PathBuf::from("reports")),
            max_report_age_days: DEFAULT_MAX_REPORT_AGE_DAYS,
        }
    }

    /// Apply `REPORTS_DIR` / `MAX_REPORT_AGE_DAYS` overrides from the
    /// environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var("REPORTS_DIR") {
            self.reports_dir = Some(PathBuf::from(dir));
        }
        if let Some(days) = std::env::var("MAX_REPORT_AGE_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.max_report_age_days = days;
        }
        self
    }

    pub fn without_reports(mut self) -> Self {
        self.reports_dir = None;
        self
    }
}

pub struct InvestmentService {
    analyzer: InvestmentAnalyzer,
    store: Arc<ReportStore>,
    reports: Option<ReportWriter>,
    max_report_age_days: i64,
}

impl InvestmentService {
    pub fn new(agents: AgentSet, store: Arc<ReportStore>, config: ServiceConfig) -> Self {
        Self {
            analyzer: InvestmentAnalyzer::new(agents, store.clone(), config.model),
            store,
            reports: config.reports_dir.map(ReportWriter::new),
            max_report_age_days: config.max_report_age_days,
        }
    }

    /// Run a new analysis. Validation problems are the only `Err` path; a
    /// pipeline failure comes back as an `Ok` record with `Failed` status.
    pub async fn create_analysis(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisRecord, AnalysisError> {
        tracing::info!("Creating analysis for companies: {:?}", request.companies);
        let record = self.analyzer.analyze(&request).await?;

        if record.status == AnalysisStatus::Completed {
            if let Some(writer) = &self.reports {
                // Report files are presentation artifacts; a write failure
                // never fails the analysis.
                if let Err(e) = writer.save(&record) {
                    tracing::error!(
                        "Failed to save reports for {}: {}",
                        record.request_id,
                        e
                    );
                }
            }
        }

        Ok(record)
    }

    pub fn get_analysis(&self, request_id: &str) -> Option<AnalysisRecord> {
        self.store.get(request_id)
    }

    /// Newest-first summaries, optionally filtered to one status.
    pub fn list_analyses(
        &self,
        status: Option<AnalysisStatus>,
        limit: usize,
    ) -> Vec<AnalysisSummary> {
        self.store
            .list(status, limit)
            .iter()
            .map(AnalysisRecord::summary)
            .collect()
    }

    pub fn delete_analysis(&self, request_id: &str) -> bool {
        let deleted = self.store.delete(request_id);
        if deleted {
            tracing::info!("Deleted analysis {}", request_id);
        }
        deleted
    }

    /// Remove analyses older than `days` (default from config). Returns the
    /// number removed.
    pub fn cleanup_old_analyses(&self, days: Option<i64>) -> usize {
        self.store
            .cleanup_older_than(days.unwrap_or(self.max_report_age_days))
    }

    pub fn get_service_stats(&self) -> ServiceStats {
        self.store.stats()
    }
}
