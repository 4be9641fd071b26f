//! Investment analysis pipeline orchestrator.
//!
//! Drives the three-phase workflow for one request: stock analysis, then
//! investment ranking seeded with the analysis, then portfolio allocation
//! seeded with the ranking. The record is written to the store before the
//! first phase runs and after every phase completes, so pollers observe
//! partial progress; the store is never touched while an agent call is in
//! flight. A phase failure ends the run: the record keeps whatever payloads
//! were already produced and becomes `Failed` with the error message.

pub mod prompts;
pub mod reports;
pub mod service;

pub use reports::ReportWriter;
pub use service::{InvestmentService, ServiceConfig, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use advisor_core::sections::section_or_full;
use advisor_core::{
    normalize_symbols, AnalysisAgent, AnalysisError, AnalysisRecord, AnalysisRequest,
    InvestmentRanking, PortfolioAllocation, StockAnalysis,
};
use report_store::ReportStore;

/// The three collaborator roles, in phase order.
#[derive(Clone)]
pub struct AgentSet {
    pub stock_analyst: Arc<dyn AnalysisAgent>,
    pub research_analyst: Arc<dyn AnalysisAgent>,
    pub investment_lead: Arc<dyn AnalysisAgent>,
}

pub struct InvestmentAnalyzer {
    agents: AgentSet,
    store: Arc<ReportStore>,
    model: String,
}

impl InvestmentAnalyzer {
    pub fn new(agents: AgentSet, store: Arc<ReportStore>, model: impl Into<String>) -> Self {
        Self {
            agents,
            store,
            model: model.into(),
        }
    }

    /// Run the complete workflow for one request.
    ///
    /// Validation failures are returned as `Err` and leave no record behind.
    /// A collaborator failure mid-pipeline is NOT an `Err`: the caller gets
    /// `Ok` with a `Failed` record, observable like any other record.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisRecord, AnalysisError> {
        let companies = normalize_symbols(&request.companies)?;
        let companies_str = companies.join(", ");
        let request_id = Uuid::new_v4().to_string();

        let mut record = AnalysisRecord::new(request_id.clone(), companies);
        // Visible to concurrent get/list before any phase runs.
        self.store.put(record.clone());

        tracing::info!(
            "Starting analysis {} for companies: {}",
            request_id,
            companies_str
        );

        match self
            .run_phases(&mut record, &companies_str, &request.message)
            .await
        {
            Ok(()) => {
                record.mark_completed();
                tracing::info!("Analysis {} completed successfully", request_id);
            }
            Err(e) => {
                tracing::error!("Analysis {} failed: {}", request_id, e);
                record.mark_failed(e.to_string());
            }
        }

        self.store.put(record.clone());
        Ok(record)
    }

    /// Phases run strictly in sequence; each later prompt depends on the
    /// previous payload. Once a phase fails, later phases are never
    /// attempted and earlier payloads stay on the record.
    async fn run_phases(
        &self,
        record: &mut AnalysisRecord,
        companies: &str,
        message: &str,
    ) -> Result<(), AnalysisError> {
        tracing::info!("Phase 1: stock analysis for {}", record.request_id);
        let stock_analysis = self.analyze_stocks(companies, message).await?;
        record.stock_analysis = Some(stock_analysis.clone());
        self.store.put(record.clone());

        tracing::info!("Phase 2: investment ranking for {}", record.request_id);
        let ranking = self.rank_investments(&stock_analysis).await?;
        record.investment_ranking = Some(ranking.clone());
        self.store.put(record.clone());

        tracing::info!("Phase 3: portfolio allocation for {}", record.request_id);
        let allocation = self.create_portfolio_allocation(&ranking).await?;
        record.portfolio_allocation = Some(allocation);
        self.store.put(record.clone());

        Ok(())
    }

    /// Phase 1: comprehensive stock analysis over the raw inputs.
    async fn analyze_stocks(
        &self,
        companies: &str,
        message: &str,
    ) -> Result<StockAnalysis, AnalysisError> {
        let prompt = prompts::stock_analysis_prompt(companies, message);
        let text = self
            .agents
            .stock_analyst
            .invoke(&prompt, &self.model)
            .await?;

        Ok(StockAnalysis {
            company_symbols: companies.to_string(),
            market_analysis: section_or_full(&text, "Market Analysis"),
            financial_metrics: section_or_full(&text, "Financial Metrics"),
            risk_assessment: section_or_full(&text, "Risk Assessment"),
            recommendations: section_or_full(&text, "Recommendations"),
            analysis_date: Utc::now(),
        })
    }

    /// Phase 2: ranking, seeded with the full phase-1 payload.
    async fn rank_investments(
        &self,
        stock_analysis: &StockAnalysis,
    ) -> Result<InvestmentRanking, AnalysisError> {
        let prompt = prompts::ranking_prompt(stock_analysis);
        let text = self
            .agents
            .research_analyst
            .invoke(&prompt, &self.model)
            .await?;

        Ok(InvestmentRanking {
            ranked_companies: section_or_full(&text, "Company Rankings"),
            investment_rationale: section_or_full(&text, "Investment Rationale"),
            risk_evaluation: section_or_full(&text, "Risk Evaluation"),
            growth_potential: section_or_full(&text, "Growth Potential"),
            analysis_date: Utc::now(),
        })
    }

    /// Phase 3: allocation strategy, seeded with the full phase-2 payload.
    async fn create_portfolio_allocation(
        &self,
        ranking: &InvestmentRanking,
    ) -> Result<PortfolioAllocation, AnalysisError> {
        let prompt = prompts::allocation_prompt(ranking);
        let text = self
            .agents
            .investment_lead
            .invoke(&prompt, &self.model)
            .await?;

        Ok(PortfolioAllocation {
            allocation_strategy: section_or_full(&text, "Allocation Strategy"),
            investment_thesis: section_or_full(&text, "Investment Thesis"),
            risk_management: section_or_full(&text, "Risk Management"),
            final_recommendations: section_or_full(&text, "Final Recommendations"),
            analysis_date: Utc::now(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted collaborator: either echoes a canned response or fails.
    pub struct MockAgent {
        pub agent_name: &'static str,
        pub response: Result<String, String>,
    }

    #[async_trait]
    impl AnalysisAgent for MockAgent {
        fn name(&self) -> &str {
            self.agent_name
        }

        async fn invoke(&self, _prompt: &str, _model: &str) -> Result<String, AnalysisError> {
            self.response
                .clone()
                .map_err(AnalysisError::Agent)
        }
    }

    /// Collaborator that answers with the prompt length, as text.
    pub struct EchoLenAgent;

    #[async_trait]
    impl AnalysisAgent for EchoLenAgent {
        fn name(&self) -> &str {
            "Echo"
        }

        async fn invoke(&self, prompt: &str, _model: &str) -> Result<String, AnalysisError> {
            Ok(prompt.len().to_string())
        }
    }

    /// Collaborator that records what the store looked like when invoked.
    pub struct ObservingAgent {
        pub store: Arc<ReportStore>,
        pub observed: Mutex<Vec<advisor_core::AnalysisStatus>>,
    }

    #[async_trait]
    impl AnalysisAgent for ObservingAgent {
        fn name(&self) -> &str {
            "Observer"
        }

        async fn invoke(&self, _prompt: &str, _model: &str) -> Result<String, AnalysisError> {
            let statuses = self.store.list(None, 10).into_iter().map(|r| r.status);
            self.observed.lock().unwrap().extend(statuses);
            Ok("## Market Analysis\nobserved".to_string())
        }
    }

    pub fn agent_set(
        phase1: Result<&str, &str>,
        phase2: Result<&str, &str>,
        phase3: Result<&str, &str>,
    ) -> AgentSet {
        let build = |name, outcome: Result<&str, &str>| -> Arc<dyn AnalysisAgent> {
            Arc::new(MockAgent {
                agent_name: name,
                response: outcome.map(str::to_string).map_err(str::to_string),
            })
        };
        AgentSet {
            stock_analyst: build("Stock Analyst", phase1),
            research_analyst: build("Research Analyst", phase2),
            investment_lead: build("Investment Lead", phase3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use advisor_core::AnalysisStatus;

    fn request(companies: &[&str]) -> AnalysisRequest {
        AnalysisRequest::new(companies.iter().map(|c| c.to_string()).collect())
    }

    #[tokio::test]
    async fn test_successful_pipeline_completes() {
        let store = Arc::new(ReportStore::new());
        let agents = agent_set(Ok("phase 1 text"), Ok("phase 2 text"), Ok("phase 3 text"));
        let analyzer = InvestmentAnalyzer::new(agents, store.clone(), "test-model");

        let record = analyzer.analyze(&request(&["aapl", " msft"])).await.unwrap();

        assert_eq!(record.status, AnalysisStatus::Completed);
        assert_eq!(record.companies, vec!["AAPL", "MSFT"]);
        assert!(record.stock_analysis.is_some());
        assert!(record.investment_ranking.is_some());
        assert!(record.portfolio_allocation.is_some());
        assert!(record.error_message.is_none());
        assert!(record.completed_at.unwrap() >= record.created_at);

        // Write-back: the stored record matches what was returned.
        let stored = store.get(&record.request_id).unwrap();
        assert_eq!(stored.status, AnalysisStatus::Completed);
    }

    #[tokio::test]
    async fn test_phase_two_failure_keeps_partial_progress() {
        let store = Arc::new(ReportStore::new());
        let agents = agent_set(Ok("phase 1 text"), Err("ranking agent timed out"), Ok("unused"));
        let analyzer = InvestmentAnalyzer::new(agents, store.clone(), "test-model");

        let record = analyzer.analyze(&request(&["NVDA", "AMD"])).await.unwrap();

        assert_eq!(record.status, AnalysisStatus::Failed);
        assert!(record.stock_analysis.is_some());
        assert!(record.investment_ranking.is_none());
        assert!(record.portfolio_allocation.is_none());
        let error = record.error_message.as_deref().unwrap();
        assert!(error.contains("ranking agent timed out"));

        // A failed analysis is a normal, gettable record.
        let stored = store.get(&record.request_id).unwrap();
        assert_eq!(stored.status, AnalysisStatus::Failed);
        assert!(stored.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_phase_one_failure_leaves_no_payloads() {
        let store = Arc::new(ReportStore::new());
        let agents = agent_set(Err("connection refused"), Ok("unused"), Ok("unused"));
        let analyzer = InvestmentAnalyzer::new(agents, store.clone(), "test-model");

        let record = analyzer.analyze(&request(&["TSLA"])).await.unwrap();

        assert_eq!(record.status, AnalysisStatus::Failed);
        assert!(record.stock_analysis.is_none());
        assert!(record.investment_ranking.is_none());
        assert!(record.portfolio_allocation.is_none());
    }

    #[tokio::test]
    async fn test_validation_rejects_before_any_record() {
        let store = Arc::new(ReportStore::new());
        let agents = agent_set(Ok("unused"), Ok("unused"), Ok("unused"));
        let analyzer = InvestmentAnalyzer::new(agents, store.clone(), "test-model");

        let err = analyzer.analyze(&request(&[])).await.unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty());

        let too_many: Vec<&str> = vec!["A"; 11];
        let err = analyzer.analyze(&request(&too_many)).await.unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_record_is_visible_in_progress_during_phase_one() {
        let store = Arc::new(ReportStore::new());
        let observer = Arc::new(ObservingAgent {
            store: store.clone(),
            observed: std::sync::Mutex::new(Vec::new()),
        });
        let agents = AgentSet {
            stock_analyst: observer.clone(),
            research_analyst: Arc::new(MockAgent {
                agent_name: "Research Analyst",
                response: Ok("ranked".to_string()),
            }),
            investment_lead: Arc::new(MockAgent {
                agent_name: "Investment Lead",
                response: Ok("allocated".to_string()),
            }),
        };
        let analyzer = InvestmentAnalyzer::new(agents, store, "test-model");

        analyzer.analyze(&request(&["AAPL"])).await.unwrap();

        let observed = observer.observed.lock().unwrap();
        assert_eq!(observed.as_slice(), &[AnalysisStatus::InProgress]);
    }

    #[tokio::test]
    async fn test_echo_collaborator_produces_completed_record() {
        let store = Arc::new(ReportStore::new());
        let echo: Arc<dyn AnalysisAgent> = Arc::new(EchoLenAgent);
        let agents = AgentSet {
            stock_analyst: echo.clone(),
            research_analyst: echo.clone(),
            investment_lead: echo,
        };
        let analyzer = InvestmentAnalyzer::new(agents, store, "test-model");

        let record = analyzer.analyze(&request(&["AAPL", "MSFT"])).await.unwrap();

        assert_eq!(record.status, AnalysisStatus::Completed);
        assert_eq!(record.companies, vec!["AAPL", "MSFT"]);
        let stock = record.stock_analysis.unwrap();
        assert_eq!(stock.company_symbols, "AAPL, MSFT");
        assert!(!stock.market_analysis.is_empty());
        assert!(!record.investment_ranking.unwrap().ranked_companies.is_empty());
        assert!(!record
            .portfolio_allocation
            .unwrap()
            .allocation_strategy
            .is_empty());
    }

    #[tokio::test]
    async fn test_sections_extracted_when_agent_uses_headings() {
        let structured = "\
## Market Analysis
growth is broad

## Financial Metrics
margins are thin

## Risk Assessment
rates are a headwind

## Recommendations
hold
";
        let store = Arc::new(ReportStore::new());
        let agents = agent_set(Ok(structured), Ok("plain"), Ok("plain"));
        let analyzer = InvestmentAnalyzer::new(agents, store, "test-model");

        let record = analyzer.analyze(&request(&["AAPL"])).await.unwrap();
        let stock = record.stock_analysis.unwrap();
        assert_eq!(stock.market_analysis, "growth is broad");
        assert_eq!(stock.recommendations, "hold");

        // Unstructured phase 2 output falls back to the full raw text.
        let ranking = record.investment_ranking.unwrap();
        assert_eq!(ranking.ranked_companies, "plain");
        assert_eq!(ranking.growth_potential, "plain");
    }
}
