use serde::{Deserialize, Serialize};

use crate::models::RiskLevel;
use crate::services::response_normalizer::lenient_f64;

/// Body of POST /api/fair-value-oracle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FairValueRequest {
    pub token_symbol: String,
    pub on_chain_price: f64,
    #[serde(default)]
    pub pool_data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSignal {
    #[serde(alias = "buy", alias = "Buy")]
    Buy,
    #[serde(alias = "sell", alias = "Sell")]
    Sell,
    #[serde(alias = "hold", alias = "Hold")]
    Hold,
}

/// What the model is asked to produce for a fair value check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FairValueAssessment {
    #[serde(deserialize_with = "lenient_f64")]
    pub fair_value: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub on_chain_price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub dislocation: f64,
    pub arbitrage_opportunity: bool,
    pub recommendation: TradeSignal,
    #[serde(deserialize_with = "lenient_f64")]
    pub expected_return: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub confidence: f64,
    pub reasoning: String,
    pub risk_level: RiskLevel,
}

/// Assessment enriched with the reference data it was priced against
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FairValueReport {
    #[serde(flatten)]
    pub assessment: FairValueAssessment,
    pub real_world_data: serde_json::Value,
    pub timestamp: String,
}
