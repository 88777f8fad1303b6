//! Financial calculators endpoint.

use axum::Json;
use fb_core::finance::{self, FinanceAnalysis, FinanceInput};

/// POST /api/finance/analysis
#[utoipa::path(
    post,
    path = "/api/finance/analysis",
    request_body = FinanceInput,
    responses(
        (status = 200, description = "Risk score, funding need, and revenue projection", body = FinanceAnalysis)
    )
)]
pub async fn analyze(Json(input): Json<FinanceInput>) -> Json<FinanceAnalysis> {
    let analysis = finance::analyze(&input);
    tracing::debug!(
        risk_score = analysis.risk_score,
        required_funding = analysis.required_funding,
        "finance analysis"
    );
    Json(analysis)
}
