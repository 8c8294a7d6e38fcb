// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState, models::dashboard::DashboardSummary};

// GET /api/dashboard/status
#[utoipa::path(
    get,
    path = "/api/dashboard/status",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Today's and all-time figures", body = DashboardSummary),
        (status = 500, description = "One of the figures could not be computed")
    )
)]
pub async fn get_status(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.compute_summary().await?;
    Ok((StatusCode::OK, Json(summary)))
}
