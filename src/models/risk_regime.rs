use serde::{Deserialize, Serialize};

use crate::services::response_normalizer::lenient_f64;

/// Body of POST /api/risk-regime-detector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRegimeRequest {
    #[serde(default)]
    pub pool_data: serde_json::Value,
    pub historical_volatility: f64,
    pub current_volatility: f64,
    #[serde(default)]
    pub market_metrics: serde_json::Value,
}

impl RiskRegimeRequest {
    /// Relative jump of current over historical volatility, in percent
    pub fn volatility_spike(&self) -> f64 {
        (self.current_volatility - self.historical_volatility) / self.historical_volatility * 100.0
    }

    /// Spike rendered with two decimals; "N/A" when historical volatility is zero
    pub fn volatility_spike_label(&self) -> String {
        let spike = self.volatility_spike();
        if spike.is_finite() {
            format!("{:.2}", spike)
        } else {
            "N/A".to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRegime {
    #[serde(alias = "bull", alias = "Bull")]
    Bull,
    #[serde(alias = "bear", alias = "Bear")]
    Bear,
    #[serde(alias = "high_volatility", alias = "HIGH VOLATILITY")]
    HighVolatility,
    #[serde(alias = "normal", alias = "Normal")]
    Normal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegimeRiskLevel {
    #[serde(alias = "critical", alias = "Critical")]
    Critical,
    #[serde(alias = "high", alias = "High")]
    High,
    #[serde(alias = "medium", alias = "Medium")]
    Medium,
    #[serde(alias = "low", alias = "Low")]
    Low,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreasuryAction {
    #[serde(alias = "withdraw_all")]
    WithdrawAll,
    #[serde(alias = "reduce_exposure")]
    ReduceExposure,
    #[serde(alias = "maintain", alias = "Maintain")]
    Maintain,
    #[serde(alias = "increase_exposure")]
    IncreaseExposure,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    #[serde(alias = "RED", alias = "Red")]
    Red,
    #[serde(alias = "YELLOW", alias = "Yellow")]
    Yellow,
    #[serde(alias = "GREEN", alias = "Green")]
    Green,
}

/// Regime classification produced by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskRegimeAssessment {
    pub regime: MarketRegime,
    pub risk_level: RegimeRiskLevel,
    pub action: TreasuryAction,
    #[serde(deserialize_with = "lenient_f64")]
    pub recommended_allocation: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub impermanent_loss_risk: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub confidence: f64,
    pub reasoning: String,
    pub alert_level: AlertLevel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VolatilityMetrics {
    pub historical: f64,
    pub current: f64,
    pub spike: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskRegimeReport {
    #[serde(flatten)]
    pub assessment: RiskRegimeAssessment,
    pub timestamp: String,
    pub volatility_metrics: VolatilityMetrics,
}
