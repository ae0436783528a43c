use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::reference_data::ReferenceDataProvider;
use crate::models::{
    AnalysisKind, FairValueAssessment, FairValueReport, FairValueRequest, PromptSpec, RiskLevel,
    TradeSignal,
};
use crate::services::llm_service::LlmService;
use crate::services::response_normalizer::{parse_structured, preserved_text, preview};
use crate::utils::{pretty_json, timestamp_now};

/// Price an RWA token against real-world treasury yields and flag dislocations
pub async fn assess_fair_value(
    llm_service: &LlmService,
    reference_data: &dyn ReferenceDataProvider,
    request: &FairValueRequest,
) -> Result<FairValueReport, AppError> {
    info!(
        "Assessing fair value for {} (on-chain price: {})",
        request.token_symbol, request.on_chain_price
    );

    llm_service.ensure_configured()?;

    let real_world_data = fetch_reference_data(reference_data).await;

    let spec = PromptSpec::new(
        AnalysisKind::FairValue,
        build_fair_value_prompt(request, &real_world_data),
    );
    let response = llm_service.generate_completion(&spec).await?;

    Ok(FairValueReport {
        assessment: parse_fair_value_response(&response, request),
        real_world_data,
        timestamp: timestamp_now(),
    })
}

/// Best-effort: a failed fetch never blocks the analysis
async fn fetch_reference_data(reference_data: &dyn ReferenceDataProvider) -> serde_json::Value {
    match reference_data.fetch_latest().await {
        Ok(data) => data,
        Err(e) => {
            error!("Error fetching treasury data: {}", e);
            serde_json::json!({ "note": "Using historical average" })
        }
    }
}

fn build_fair_value_prompt(request: &FairValueRequest, real_world_data: &serde_json::Value) -> String {
    format!(
        r#"You are an AI Fair Value Oracle for RWA (Real-World Assets) treasury management.

Token: {}
On-Chain Price: ${}
Real-World Data: {}
Pool Liquidity: {}

Analysis Task:
1. Calculate the fair value of this RWA token based on real-world treasury yields and maturity
2. Compare on-chain price vs fair value
3. Identify arbitrage opportunities if price dislocation exists
4. Recommend action: BUY (underpriced), SELL (overpriced), or HOLD (fairly priced)
5. Calculate expected profit/loss percentage

Respond in JSON format with:
{{
  "fairValue": number,
  "onChainPrice": number,
  "dislocation": number (percentage difference),
  "arbitrageOpportunity": boolean,
  "recommendation": "BUY" | "SELL" | "HOLD",
  "expectedReturn": number (percentage),
  "confidence": number (0-100),
  "reasoning": string,
  "riskLevel": "low" | "medium" | "high"
}}"#,
        request.token_symbol,
        request.on_chain_price,
        pretty_json(real_world_data),
        pretty_json(&request.pool_data),
    )
}

pub(crate) fn parse_fair_value_response(response: &str, request: &FairValueRequest) -> FairValueAssessment {
    if let Some(assessment) = parse_structured::<FairValueAssessment>(response) {
        return assessment;
    }

    warn!("Failed to parse fair value reply as JSON, using fallback: {}", preview(response));

    let mut fallback = fair_value_fallback(request.on_chain_price);
    if let Some(text) = preserved_text(response) {
        fallback.reasoning = text;
    }
    fallback
}

/// Treat the on-chain price as fair and hold
pub fn fair_value_fallback(on_chain_price: f64) -> FairValueAssessment {
    FairValueAssessment {
        fair_value: on_chain_price,
        on_chain_price,
        dislocation: 0.0,
        arbitrage_opportunity: false,
        recommendation: TradeSignal::Hold,
        expected_return: 0.0,
        confidence: 0.0,
        reasoning: "Fair value analysis unavailable. Holding position until pricing data can be verified."
            .to_string(),
        risk_level: RiskLevel::Medium,
    }
}
