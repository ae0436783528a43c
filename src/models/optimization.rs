use serde::{Deserialize, Serialize};

use crate::services::response_normalizer::lenient_f64;

/// Body of POST /api/optimize-portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    #[serde(default)]
    pub current_allocation: serde_json::Value,
    pub target_yield: f64,
    pub risk_tolerance: String,
}

/// A single rebalancing step, e.g. t-BILL 45% -> 50%
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationChange {
    pub asset: String,
    #[serde(deserialize_with = "percent_label")]
    pub from: String,
    #[serde(deserialize_with = "percent_label")]
    pub to: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOptimization {
    pub action: String,
    pub changes: Vec<AllocationChange>,
    #[serde(deserialize_with = "lenient_f64")]
    pub projected_yield: f64,
    pub risk_assessment: String,
}

/// Models emit `from`/`to` either as "45%" or as a bare number.
fn percent_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(format!("{}%", n)),
        other => Err(serde::de::Error::custom(format!(
            "expected percentage label, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_change_accepts_numeric_percentages() {
        let change: AllocationChange = serde_json::from_str(
            r#"{"asset":"USDC","from":40,"to":"35%","reason":"Reduce idle capital"}"#,
        )
        .unwrap();
        assert_eq!(change.from, "40%");
        assert_eq!(change.to, "35%");
    }
}
