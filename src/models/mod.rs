mod analysis;
pub mod market_analysis;
pub mod optimization;
pub mod fair_value;
pub mod risk_regime;
pub mod diversification;

pub use analysis::{AnalysisKind, PromptSpec, RiskLevel};
pub use market_analysis::{MarketAnalysis, MarketAnalysisRequest, RwaHolding};
pub use optimization::{AllocationChange, OptimizationRequest, PortfolioOptimization};
pub use fair_value::{FairValueAssessment, FairValueReport, FairValueRequest, TradeSignal};
pub use risk_regime::{
    AlertLevel, MarketRegime, RegimeRiskLevel, RiskRegimeAssessment, RiskRegimeReport,
    RiskRegimeRequest, TreasuryAction, VolatilityMetrics,
};
pub use diversification::{
    DiversificationMetrics, DiversificationPlan, DiversificationReport, DiversificationRequest,
    PoolAllocation,
};
