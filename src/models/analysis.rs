use serde::{Deserialize, Serialize};

/// The analyses the relay knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    MarketAnalysis,
    PortfolioOptimization,
    FairValue,
    RiskRegime,
    Diversification,
}

impl AnalysisKind {
    /// System role sent to the gateway for this kind
    pub fn persona(&self) -> &'static str {
        match self {
            AnalysisKind::MarketAnalysis => {
                "You are a professional treasury manager. Always respond with valid JSON."
            }
            AnalysisKind::PortfolioOptimization => {
                "You are a professional portfolio manager. Always respond with valid JSON."
            }
            AnalysisKind::FairValue => {
                "You are a quantitative analyst specializing in RWA valuation. Always respond with valid JSON."
            }
            AnalysisKind::RiskRegime => {
                "You are a risk management expert for DeFi treasuries. Always respond with valid JSON."
            }
            AnalysisKind::Diversification => {
                "You are a quantitative portfolio manager specializing in diversified RWA strategies. Always respond with valid JSON."
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::MarketAnalysis => "analyze-market",
            AnalysisKind::PortfolioOptimization => "optimize-portfolio",
            AnalysisKind::FairValue => "fair-value-oracle",
            AnalysisKind::RiskRegime => "risk-regime-detector",
            AnalysisKind::Diversification => "portfolio-diversifier",
        }
    }
}

/// Instruction text plus the persona it is sent under. Lives for one gateway call.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub kind: AnalysisKind,
    pub prompt: String,
}

impl PromptSpec {
    pub fn new(kind: AnalysisKind, prompt: String) -> Self {
        Self { kind, prompt }
    }

    pub fn system(&self) -> &'static str {
        self.kind.persona()
    }
}

/// low / medium / high, as used by the market, fair value and diversification results
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[serde(alias = "LOW", alias = "Low")]
    Low,
    #[serde(alias = "MEDIUM", alias = "Medium", alias = "moderate", alias = "Moderate")]
    Medium,
    #[serde(alias = "HIGH", alias = "High")]
    High,
}
