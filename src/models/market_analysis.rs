use serde::{Deserialize, Serialize};

use crate::models::RiskLevel;
use crate::services::response_normalizer::lenient_f64;

/// A tokenized real-world asset position held by the treasury
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RwaHolding {
    pub token: String,
    #[serde(default)]
    pub balance: serde_json::Value,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Body of POST /api/analyze-market
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisRequest {
    pub portfolio_value: f64,
    pub current_yield: f64,
    pub target_yield: f64,
    #[serde(default)]
    pub rwa_holdings: Vec<RwaHolding>,
}

/// Liquidity deployment recommendation for the treasury
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub recommendation: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub deployment_percentage: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub expected_yield: f64,
    pub risk_level: RiskLevel,
    #[serde(deserialize_with = "lenient_f64")]
    pub confidence: f64,
    pub reasoning: String,
    pub suggested_pairs: Vec<String>,
}
