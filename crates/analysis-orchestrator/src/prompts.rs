//! Prompt builders for the three pipeline phases.
//!
//! Each prompt restates the exact ticker symbols and forbids placeholder
//! company names; phases 2 and 3 embed the full prior-phase payload as
//! context. The agents are asked for markdown headings matching the section
//! names the executor extracts, but compliance is not guaranteed.

use advisor_core::{InvestmentRanking, StockAnalysis};

/// Phase 1: comprehensive analysis of the given symbols.
pub fn stock_analysis_prompt(companies: &str, message: &str) -> String {
    format!(
        "{message}

CRITICAL INSTRUCTION: You MUST analyze ONLY these specific companies using their EXACT \
stock symbols: {companies}

Please conduct a comprehensive analysis of ONLY the following companies: {companies}

For EACH of these specific companies ({companies}), provide:
1. Current market position and financial metrics
2. Recent performance and analyst recommendations
3. Industry trends and competitive landscape
4. Risk factors and growth potential
5. News impact and market sentiment

Structure your answer with markdown headings for: Market Analysis, Financial Metrics, \
Risk Assessment, Recommendations.

IMPORTANT:
- Use ONLY the company symbols provided: {companies}
- Do NOT use generic names like \"Company A\", \"Tech Inc.\", etc.
- Reference each company by its actual stock symbol (e.g., AAPL for Apple, MSFT for Microsoft)

Companies to analyze: {companies}"
    )
}

/// Phase 2: rank the analyzed companies by investment potential.
pub fn ranking_prompt(stock_analysis: &StockAnalysis) -> String {
    let companies = &stock_analysis.company_symbols;
    format!(
        "Based on the comprehensive stock analysis below, please rank these EXACT companies \
by investment potential: {companies}

MANDATORY: ONLY rank these specific companies: {companies}

STOCK ANALYSIS:
- Market Analysis: {market_analysis}
- Financial Metrics: {financial_metrics}
- Risk Assessment: {risk_assessment}
- Initial Recommendations: {recommendations}

CRITICAL REQUIREMENTS:
- Use ONLY the actual company symbols: {companies}
- Do NOT create fictional companies or use generic names
- Reference each company by its stock ticker (e.g., NVDA, AMD, INTC)
- Rank ALL and ONLY the companies listed: {companies}

Please provide, under markdown headings for Company Rankings, Investment Rationale, \
Risk Evaluation, and Growth Potential:
1. Detailed ranking of THESE EXACT companies ({companies}) from best to worst investment potential
2. Investment rationale for each of these specific companies
3. Risk evaluation and mitigation strategies for each company
4. Growth potential assessment for each company

Remember: Analyze ONLY {companies} - no other companies!",
        market_analysis = stock_analysis.market_analysis,
        financial_metrics = stock_analysis.financial_metrics,
        risk_assessment = stock_analysis.risk_assessment,
        recommendations = stock_analysis.recommendations,
    )
}

/// Phase 3: allocation strategy across the ranked companies.
pub fn allocation_prompt(ranking: &InvestmentRanking) -> String {
    format!(
        "Based on the investment ranking and analysis below, create a strategic portfolio \
allocation for EXACTLY these companies.

MANDATORY CONSTRAINTS:
- Allocate ONLY to the companies from the ranking analysis
- Use the EXACT company stock symbols, not generic names
- Do NOT create or mention any other companies
- Allocations must total EXACTLY 100%
- Reference companies by their stock tickers (e.g., NVDA, AMD, INTC)

COMPANIES TO ALLOCATE (and ONLY these):
From the ranking analysis: {ranked_companies}

INVESTMENT RANKING DATA:
- Company Rankings: {ranked_companies}
- Investment Rationale: {investment_rationale}
- Risk Evaluation: {risk_evaluation}
- Growth Potential: {growth_potential}

REQUIRED OUTPUT, under markdown headings for Allocation Strategy, Investment Thesis, \
Risk Management, and Final Recommendations:
1. Specific allocation percentages for EACH company mentioned in the rankings (must total exactly 100%)
2. Investment thesis for EACH specific company
3. Risk management approach for the portfolio
4. Final actionable recommendations for THESE EXACT companies

IMPORTANT: Use ONLY the companies mentioned in the ranking analysis above. Do not invent new companies!",
        ranked_companies = ranking.ranked_companies,
        investment_rationale = ranking.investment_rationale,
        risk_evaluation = ranking.risk_evaluation,
        growth_potential = ranking.growth_potential,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_stock_prompt_restates_symbols_verbatim() {
        let prompt = stock_analysis_prompt("AAPL, MSFT", "Assess long-term value");
        assert!(prompt.contains("AAPL, MSFT"));
        assert!(prompt.contains("Assess long-term value"));
        assert!(prompt.contains("Do NOT use generic names"));
    }

    #[test]
    fn test_ranking_prompt_embeds_prior_phase() {
        let stock = StockAnalysis {
            company_symbols: "NVDA, AMD".to_string(),
            market_analysis: "datacenter demand is strong".to_string(),
            financial_metrics: "gross margin divergence".to_string(),
            risk_assessment: "export controls".to_string(),
            recommendations: "prefer NVDA".to_string(),
            analysis_date: Utc::now(),
        };
        let prompt = ranking_prompt(&stock);
        assert!(prompt.contains("NVDA, AMD"));
        assert!(prompt.contains("datacenter demand is strong"));
        assert!(prompt.contains("export controls"));
    }

    #[test]
    fn test_allocation_prompt_embeds_ranking() {
        let ranking = InvestmentRanking {
            ranked_companies: "1. NVDA 2. AMD".to_string(),
            investment_rationale: "scale advantages".to_string(),
            risk_evaluation: "customer concentration".to_string(),
            growth_potential: "installed-base growth".to_string(),
            analysis_date: Utc::now(),
        };
        let prompt = allocation_prompt(&ranking);
        assert!(prompt.contains("1. NVDA 2. AMD"));
        assert!(prompt.contains("total EXACTLY 100%"));
        assert!(prompt.contains("customer concentration"));
    }
}
