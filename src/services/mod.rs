pub mod llm_service;
pub mod response_normalizer;
pub mod market_analysis_service;
pub mod optimization_service;
pub mod fair_value_service;
pub mod risk_regime_service;
pub mod diversification_service;
