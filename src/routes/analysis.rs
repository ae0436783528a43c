use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    AnalysisKind, DiversificationReport, DiversificationRequest, FairValueReport, FairValueRequest,
    MarketAnalysis, MarketAnalysisRequest, OptimizationRequest, PortfolioOptimization,
    RiskRegimeReport, RiskRegimeRequest,
};
use crate::services::{
    diversification_service, fair_value_service, market_analysis_service, optimization_service,
    risk_regime_service,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze-market", post(analyze_market))
        .route("/optimize-portfolio", post(optimize_portfolio))
        .route("/fair-value-oracle", post(fair_value_oracle))
        .route("/risk-regime-detector", post(risk_regime_detector))
        .route("/portfolio-diversifier", post(portfolio_diversifier))
}

/// POST /api/analyze-market
pub async fn analyze_market(
    State(state): State<AppState>,
    body: Result<Json<MarketAnalysisRequest>, JsonRejection>,
) -> Result<Json<MarketAnalysis>, AppError> {
    let request = accept(AnalysisKind::MarketAnalysis, body)?;
    relay(AnalysisKind::MarketAnalysis, async {
        market_analysis_service::analyze_market(&state.llm_service, &request).await
    })
    .await
}

/// POST /api/optimize-portfolio
pub async fn optimize_portfolio(
    State(state): State<AppState>,
    body: Result<Json<OptimizationRequest>, JsonRejection>,
) -> Result<Json<PortfolioOptimization>, AppError> {
    let request = accept(AnalysisKind::PortfolioOptimization, body)?;
    relay(AnalysisKind::PortfolioOptimization, async {
        optimization_service::optimize_portfolio(&state.llm_service, &request).await
    })
    .await
}

/// POST /api/fair-value-oracle
pub async fn fair_value_oracle(
    State(state): State<AppState>,
    body: Result<Json<FairValueRequest>, JsonRejection>,
) -> Result<Json<FairValueReport>, AppError> {
    let request = accept(AnalysisKind::FairValue, body)?;
    relay(AnalysisKind::FairValue, async {
        fair_value_service::assess_fair_value(
            &state.llm_service,
            state.reference_data.as_ref(),
            &request,
        )
        .await
    })
    .await
}

/// POST /api/risk-regime-detector
pub async fn risk_regime_detector(
    State(state): State<AppState>,
    body: Result<Json<RiskRegimeRequest>, JsonRejection>,
) -> Result<Json<RiskRegimeReport>, AppError> {
    let request = accept(AnalysisKind::RiskRegime, body)?;
    relay(AnalysisKind::RiskRegime, async {
        risk_regime_service::detect_risk_regime(&state.llm_service, &request).await
    })
    .await
}

/// POST /api/portfolio-diversifier
pub async fn portfolio_diversifier(
    State(state): State<AppState>,
    body: Result<Json<DiversificationRequest>, JsonRejection>,
) -> Result<Json<DiversificationReport>, AppError> {
    let request = accept(AnalysisKind::Diversification, body)?;
    relay(AnalysisKind::Diversification, async {
        diversification_service::diversify_portfolio(&state.llm_service, &request).await
    })
    .await
}

fn accept<T>(kind: AnalysisKind, body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            error!("Rejected {} request body: {}", kind.as_str(), rejection.body_text());
            Err(AppError::Validation(rejection.body_text()))
        }
    }
}

/// Run one analysis under a request span and log its failure once
async fn relay<T, F>(kind: AnalysisKind, analysis: F) -> Result<Json<T>, AppError>
where
    F: std::future::Future<Output = Result<T, AppError>>,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("relay", kind = kind.as_str(), %request_id);

    async move {
        info!("POST /api/{}", kind.as_str());
        match analysis.await {
            Ok(result) => Ok(Json(result)),
            Err(e) => {
                error!("Error in {} relay: {}", kind.as_str(), log_detail(&e));
                Err(e)
            }
        }
    }
    .instrument(span)
    .await
}

fn log_detail(err: &AppError) -> String {
    match err {
        AppError::Gateway(crate::errors::GatewayError::Api { status, body }) => {
            format!("AI gateway error: {} {}", status, body)
        }
        other => other.to_string(),
    }
}
