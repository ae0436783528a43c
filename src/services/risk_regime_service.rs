use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{
    AlertLevel, AnalysisKind, MarketRegime, PromptSpec, RegimeRiskLevel, RiskRegimeAssessment,
    RiskRegimeReport, RiskRegimeRequest, TreasuryAction, VolatilityMetrics,
};
use crate::services::llm_service::LlmService;
use crate::services::response_normalizer::{parse_structured, preserved_text, preview};
use crate::utils::{pretty_json, timestamp_now};

/// Classify the current market regime and recommend a treasury exposure change
pub async fn detect_risk_regime(
    llm_service: &LlmService,
    request: &RiskRegimeRequest,
) -> Result<RiskRegimeReport, AppError> {
    info!(
        "Detecting risk regime (historical vol: {}%, current vol: {}%)",
        request.historical_volatility, request.current_volatility
    );

    llm_service.ensure_configured()?;

    let spec = PromptSpec::new(AnalysisKind::RiskRegime, build_risk_regime_prompt(request));
    let response = llm_service.generate_completion(&spec).await?;

    Ok(RiskRegimeReport {
        assessment: parse_risk_regime_response(&response),
        timestamp: timestamp_now(),
        volatility_metrics: VolatilityMetrics {
            historical: request.historical_volatility,
            current: request.current_volatility,
            spike: request.volatility_spike_label(),
        },
    })
}

fn build_risk_regime_prompt(request: &RiskRegimeRequest) -> String {
    format!(
        r#"You are an AI Risk Regime Detector for crypto treasury management.

Current Market Data:
- Pool Data: {}
- Historical Volatility (30d avg): {}%
- Current Volatility (1h): {}%
- Volatility Spike: {}%
- Market Metrics: {}

Analysis Task:
1. Determine the current market regime: BULL, BEAR, HIGH_VOLATILITY, NORMAL
2. Assess risk level: CRITICAL, HIGH, MEDIUM, LOW
3. Recommend treasury action: WITHDRAW_ALL, REDUCE_EXPOSURE, MAINTAIN, INCREASE_EXPOSURE
4. Calculate impermanent loss risk
5. Provide reasoning for regime classification

Respond in JSON format:
{{
  "regime": "BULL" | "BEAR" | "HIGH_VOLATILITY" | "NORMAL",
  "riskLevel": "CRITICAL" | "HIGH" | "MEDIUM" | "LOW",
  "action": "WITHDRAW_ALL" | "REDUCE_EXPOSURE" | "MAINTAIN" | "INCREASE_EXPOSURE",
  "recommendedAllocation": number (0-100 percentage),
  "impermanentLossRisk": number (percentage),
  "confidence": number (0-100),
  "reasoning": string,
  "alertLevel": "red" | "yellow" | "green"
}}"#,
        pretty_json(&request.pool_data),
        request.historical_volatility,
        request.current_volatility,
        request.volatility_spike_label(),
        pretty_json(&request.market_metrics),
    )
}

pub(crate) fn parse_risk_regime_response(response: &str) -> RiskRegimeAssessment {
    if let Some(assessment) = parse_structured::<RiskRegimeAssessment>(response) {
        return assessment;
    }

    warn!("Failed to parse risk regime reply as JSON, using fallback: {}", preview(response));

    let mut fallback = risk_regime_fallback();
    if let Some(text) = preserved_text(response) {
        fallback.reasoning = text;
    }
    fallback
}

/// Neutral regime: keep current exposure at a yellow alert
pub fn risk_regime_fallback() -> RiskRegimeAssessment {
    RiskRegimeAssessment {
        regime: MarketRegime::Normal,
        risk_level: RegimeRiskLevel::Medium,
        action: TreasuryAction::Maintain,
        recommended_allocation: 50.0,
        impermanent_loss_risk: 0.0,
        confidence: 0.0,
        reasoning: "Risk regime analysis unavailable. Maintaining current exposure.".to_string(),
        alert_level: AlertLevel::Yellow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm_service::testing::{service_with, FakeProvider};
    use std::sync::Arc;

    fn sample_request() -> RiskRegimeRequest {
        RiskRegimeRequest {
            pool_data: serde_json::json!({"tvl": 2500000, "volume24h": 450000}),
            historical_volatility: 20.0,
            current_volatility: 45.0,
            market_metrics: serde_json::json!({"solPrice": 180.5, "solChange24h": -3.2}),
        }
    }

    #[test]
    fn test_build_risk_regime_prompt() {
        let prompt = build_risk_regime_prompt(&sample_request());
        assert!(prompt.contains("- Historical Volatility (30d avg): 20%"));
        assert!(prompt.contains("- Current Volatility (1h): 45%"));
        assert!(prompt.contains("- Volatility Spike: 125.00%"));
        assert!(prompt.contains("\"solPrice\": 180.5"));
    }

    #[test]
    fn test_parse_lower_case_enums() {
        let reply = r#"{"regime":"high_volatility","riskLevel":"high","action":"reduce_exposure","recommendedAllocation":"30","impermanentLossRisk":4.5,"confidence":77,"reasoning":"Vol spike","alertLevel":"RED"}"#;
        let assessment = parse_risk_regime_response(reply);
        assert_eq!(assessment.regime, MarketRegime::HighVolatility);
        assert_eq!(assessment.risk_level, RegimeRiskLevel::High);
        assert_eq!(assessment.action, TreasuryAction::ReduceExposure);
        assert_eq!(assessment.recommended_allocation, 30.0);
        assert_eq!(assessment.alert_level, AlertLevel::Red);
    }

    #[test]
    fn test_parse_unknown_regime_falls_back() {
        let reply = r#"{"regime":"SIDEWAYS","riskLevel":"LOW","action":"MAINTAIN","recommendedAllocation":50,"impermanentLossRisk":1,"confidence":60,"reasoning":"r","alertLevel":"green"}"#;
        let assessment = parse_risk_regime_response(reply);
        assert_eq!(assessment.regime, MarketRegime::Normal);
        assert_eq!(assessment.confidence, 0.0);
        assert_eq!(assessment.reasoning, reply);
    }

    #[tokio::test]
    async fn test_detect_risk_regime_attaches_volatility_metrics() {
        let provider = Arc::new(FakeProvider::replying("Markets are choppy."));
        let service = service_with(provider);

        let report = detect_risk_regime(&service, &sample_request()).await.unwrap();

        assert_eq!(report.assessment.action, TreasuryAction::Maintain);
        assert_eq!(report.assessment.reasoning, "Markets are choppy.");
        assert_eq!(
            report.volatility_metrics,
            VolatilityMetrics { historical: 20.0, current: 45.0, spike: "125.00".to_string() }
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["regime"], "NORMAL");
        assert_eq!(json["alertLevel"], "yellow");
        assert_eq!(json["volatilityMetrics"]["spike"], "125.00");
        assert!(json["timestamp"].is_string());
    }
}
