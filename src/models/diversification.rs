use serde::{Deserialize, Serialize};

use crate::services::response_normalizer::lenient_f64;

/// Body of POST /api/portfolio-diversifier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiversificationRequest {
    #[serde(default)]
    pub available_pools: serde_json::Value,
    #[serde(default)]
    pub current_allocation: serde_json::Value,
    pub target_yield: f64,
    pub risk_tolerance: String,
    pub total_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PoolAllocation {
    pub pool: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub percentage: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub expected_yield: f64,
    pub asset_class: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiversificationMetrics {
    #[serde(deserialize_with = "lenient_f64")]
    pub expected_return: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub expected_volatility: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub sharpe_ratio: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub diversification_score: f64,
}

/// Multi-pool allocation proposed by the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiversificationPlan {
    pub optimized_allocation: Vec<PoolAllocation>,
    pub portfolio_metrics: DiversificationMetrics,
    #[serde(default)]
    pub correlation_matrix: serde_json::Value,
    pub reasoning: String,
    pub execution_plan: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiversificationReport {
    #[serde(flatten)]
    pub plan: DiversificationPlan,
    pub timestamp: String,
}
