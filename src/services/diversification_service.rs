use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{
    AnalysisKind, DiversificationMetrics, DiversificationPlan, DiversificationReport,
    DiversificationRequest, PoolAllocation, PromptSpec,
};
use crate::services::llm_service::LlmService;
use crate::services::response_normalizer::{parse_structured, preserved_text, preview};
use crate::utils::{format_grouped, pretty_json, timestamp_now};

/// Spread the treasury across the available RWA pools
pub async fn diversify_portfolio(
    llm_service: &LlmService,
    request: &DiversificationRequest,
) -> Result<DiversificationReport, AppError> {
    info!(
        "Diversifying portfolio (total value: {}, target yield: {}%)",
        request.total_value, request.target_yield
    );

    llm_service.ensure_configured()?;

    let spec = PromptSpec::new(
        AnalysisKind::Diversification,
        build_diversification_prompt(request),
    );
    let response = llm_service.generate_completion(&spec).await?;

    Ok(DiversificationReport {
        plan: parse_diversification_response(&response, request),
        timestamp: timestamp_now(),
    })
}

fn build_diversification_prompt(request: &DiversificationRequest) -> String {
    format!(
        r#"You are an AI Portfolio Diversifier for multi-asset RWA treasury management.

Available RWA Pools:
{}

Current Portfolio:
- Total Value: ${}
- Current Allocation: {}
- Target Yield: {}%
- Risk Tolerance: {}

Analysis Task:
1. Analyze correlation between different RWA assets (T-Bills, Bonds, Gold, Real Estate, etc.)
2. Build an optimal portfolio using Modern Portfolio Theory (Efficient Frontier)
3. Diversify across non-correlated assets to reduce risk while meeting yield target
4. Calculate expected portfolio metrics: return, volatility, Sharpe ratio
5. Provide specific allocation percentages for each pool

Respond in JSON format:
{{
  "optimizedAllocation": [
    {{
      "pool": string,
      "percentage": number,
      "amount": number,
      "expectedYield": number,
      "assetClass": string,
      "reasoning": string
    }}
  ],
  "portfolioMetrics": {{
    "expectedReturn": number,
    "expectedVolatility": number,
    "sharpeRatio": number,
    "diversificationScore": number (0-100)
  }},
  "correlationMatrix": object,
  "reasoning": string,
  "executionPlan": string[]
}}"#,
        pretty_json(&request.available_pools),
        format_grouped(request.total_value),
        pretty_json(&request.current_allocation),
        request.target_yield,
        request.risk_tolerance,
    )
}

pub(crate) fn parse_diversification_response(
    response: &str,
    request: &DiversificationRequest,
) -> DiversificationPlan {
    if let Some(plan) = parse_structured::<DiversificationPlan>(response) {
        return plan;
    }

    warn!("Failed to parse diversification reply as JSON, using fallback: {}", preview(response));

    let mut fallback = diversification_fallback(request);
    if let Some(text) = preserved_text(response) {
        fallback.reasoning = text;
    }
    fallback
}

/// Keep the whole treasury in its first current pool, with zeroed metrics
pub fn diversification_fallback(request: &DiversificationRequest) -> DiversificationPlan {
    let optimized_allocation = request
        .current_allocation
        .as_object()
        .and_then(|allocation| allocation.keys().next())
        .map(|pool| {
            vec![PoolAllocation {
                pool: pool.clone(),
                percentage: 100.0,
                amount: request.total_value,
                expected_yield: 0.0,
                asset_class: "unknown".to_string(),
                reasoning: "Current allocation retained".to_string(),
            }]
        })
        .unwrap_or_default();

    DiversificationPlan {
        optimized_allocation,
        portfolio_metrics: DiversificationMetrics {
            expected_return: 0.0,
            expected_volatility: 0.0,
            sharpe_ratio: 0.0,
            diversification_score: 0.0,
        },
        correlation_matrix: serde_json::json!({}),
        reasoning: "Diversification analysis unavailable. Current allocation retained.".to_string(),
        execution_plan: Vec::new(),
    }
}
