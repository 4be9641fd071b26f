//! One-shot investment report generator.
//!
//! Thin caller of the same `InvestmentService` the HTTP API uses: runs the
//! three-phase pipeline once for the given symbols and prints the outcome.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;

use advisor_core::{default_message, AnalysisRequest, AnalysisStatus};
use agent_client::{roles, AgentClient, AgentClientConfig, RoleAgent};
use analysis_orchestrator::{AgentSet, InvestmentService, ServiceConfig};
use report_store::ReportStore;

#[derive(Parser)]
#[command(
    name = "report-generator",
    about = "Run a three-phase investment analysis and write markdown reports"
)]
struct Cli {
    /// Comma-separated ticker symbols, e.g. "AAPL,MSFT,GOOGL"
    #[arg(short, long)]
    symbols: String,

    /// Analysis instruction passed to the stock analyst
    #[arg(short, long)]
    message: Option<String>,

    /// Model identifier override (default from DEFAULT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Skip writing markdown report files
    #[arg(long)]
    no_reports: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let client = AgentClient::new(AgentClientConfig::from_env()?);
    let model = cli
        .model
        .unwrap_or_else(|| client.default_model().to_string());

    let agents = AgentSet {
        stock_analyst: Arc::new(RoleAgent::new(client.clone(), roles::stock_analyst())),
        research_analyst: Arc::new(RoleAgent::new(client.clone(), roles::research_analyst())),
        investment_lead: Arc::new(RoleAgent::new(client, roles::investment_lead())),
    };

    let mut config = ServiceConfig::new(model).with_env_overrides();
    if cli.no_reports {
        config = config.without_reports();
    }
    let reports_dir = config.reports_dir.clone();

    let store = Arc::new(ReportStore::new());
    let service = InvestmentService::new(agents, store, config);

    let companies: Vec<String> = cli.symbols.split(',').map(str::to_string).collect();
    let request = AnalysisRequest {
        companies,
        message: cli.message.unwrap_or_else(default_message),
    };

    println!(
        "Starting investment analysis for companies: {}",
        cli.symbols
    );
    let record = service.create_analysis(request).await?;

    match record.status {
        AnalysisStatus::Completed => {
            let divider = "=".repeat(70);
            println!("\n{divider}");
            println!("INVESTMENT ANALYSIS COMPLETED");
            println!("Companies analyzed: {}", record.companies.join(", "));
            if let Some(allocation) = &record.portfolio_allocation {
                println!("\nAllocation strategy:\n{}", allocation.allocation_strategy);
                println!("\nFinal recommendations:\n{}", allocation.final_recommendations);
            }
            if let Some(dir) = reports_dir {
                println!(
                    "\nReports written under {}",
                    dir.join("investment").join(&record.request_id).display()
                );
            }
            println!("\nDisclaimer: educational purposes only, not financial advice.");
            Ok(())
        }
        _ => {
            let reason = record
                .error_message
                .unwrap_or_else(|| "unknown error".to_string());
            bail!("Analysis {} failed: {}", record.request_id, reason);
        }
    }
}
