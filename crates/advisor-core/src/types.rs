use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Maximum number of company symbols per analysis request.
pub const MAX_COMPANIES: usize = 10;

/// Maximum length of a single ticker symbol.
pub const MAX_SYMBOL_LEN: usize = 10;

/// Lifecycle status of an analysis request.
///
/// `Pending` and `InProgress` are non-terminal; `Completed` and `Failed` are
/// terminal and a record never leaves them except by deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::InProgress => "in_progress",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incoming analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AnalysisRequest {
    pub companies: Vec<String>,
    #[serde(default = "default_message")]
    pub message: String,
}

pub fn default_message() -> String {
    "Generate comprehensive investment analysis and portfolio allocation recommendations"
        .to_string()
}

impl AnalysisRequest {
    pub fn new(companies: Vec<String>) -> Self {
        Self {
            companies,
            message: default_message(),
        }
    }
}

/// Validate and normalize company symbols: trim, upper-case, enforce the
/// 1..=10 count bound and per-symbol length. Order is preserved.
pub fn normalize_symbols(companies: &[String]) -> Result<Vec<String>, AnalysisError> {
    let normalized: Vec<String> = companies
        .iter()
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect();

    if normalized.is_empty() {
        return Err(AnalysisError::InvalidRequest(
            "at least one company symbol is required".to_string(),
        ));
    }
    if normalized.len() > MAX_COMPANIES {
        return Err(AnalysisError::InvalidRequest(format!(
            "too many company symbols: {} (max {})",
            normalized.len(),
            MAX_COMPANIES
        )));
    }
    if let Some(bad) = normalized.iter().find(|c| c.len() > MAX_SYMBOL_LEN) {
        return Err(AnalysisError::InvalidRequest(format!(
            "symbol too long: {bad}"
        )));
    }

    Ok(normalized)
}

/// Phase 1 payload: comprehensive stock analysis.
///
/// The four text sub-fields are best-effort views extracted from the raw
/// agent response (see [`crate::sections`]); when a heading is missing the
/// sub-field holds the full response text. They are advisory only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StockAnalysis {
    /// Comma-joined normalized symbols, exactly as analyzed.
    pub company_symbols: String,
    pub market_analysis: String,
    pub financial_metrics: String,
    pub risk_assessment: String,
    pub recommendations: String,
    pub analysis_date: DateTime<Utc>,
}

/// Phase 2 payload: investment potential ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InvestmentRanking {
    pub ranked_companies: String,
    pub investment_rationale: String,
    pub risk_evaluation: String,
    pub growth_potential: String,
    pub analysis_date: DateTime<Utc>,
}

/// Phase 3 payload: portfolio allocation strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PortfolioAllocation {
    pub allocation_strategy: String,
    pub investment_thesis: String,
    pub risk_management: String,
    pub final_recommendations: String,
    pub analysis_date: DateTime<Utc>,
}

/// The persisted unit of state for one analysis request.
///
/// `request_id` and `companies` are immutable after creation; only status,
/// payloads, error_message and completed_at mutate as the pipeline advances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AnalysisRecord {
    pub request_id: String,
    pub companies: Vec<String>,
    pub status: AnalysisStatus,
    pub stock_analysis: Option<StockAnalysis>,
    pub investment_ranking: Option<InvestmentRanking>,
    pub portfolio_allocation: Option<PortfolioAllocation>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AnalysisRecord {
    /// Build a fresh in-flight record. Written to the store before any phase
    /// runs so concurrent readers can observe it.
    pub fn new(request_id: String, companies: Vec<String>) -> Self {
        Self {
            request_id,
            companies,
            status: AnalysisStatus::InProgress,
            stock_analysis: None,
            investment_ranking: None,
            portfolio_allocation: None,
            error_message: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn mark_completed(&mut self) {
        self.status = AnalysisStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = AnalysisStatus::Failed;
        self.error_message = Some(error.into());
        self.completed_at = Some(Utc::now());
    }

    /// Listing view with the phase payload bodies omitted.
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            request_id: self.request_id.clone(),
            companies: self.companies.clone(),
            status: self.status,
            created_at: self.created_at,
            completed_at: self.completed_at,
            error_message: self.error_message.clone(),
        }
    }
}

/// Summary of an analysis for listing purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AnalysisSummary {
    pub request_id: String,
    pub companies: Vec<String>,
    pub status: AnalysisStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

/// Service-level counters over the result store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceStats {
    pub total_analyses: usize,
    /// Count per status, keyed by the snake_case status name.
    pub status_counts: std::collections::HashMap<String, usize>,
    /// Records created within the last 24 hours.
    pub recent_analyses: usize,
}
