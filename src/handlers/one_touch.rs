// src/handlers/one_touch.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState, models::one_touch::OneTouchMenu};

// GET /api/one-touch
#[utoipa::path(
    get,
    path = "/api/one-touch",
    tag = "One-touch",
    responses(
        (status = 200, description = "Quick-sale menu, by seqCode", body = Vec<OneTouchMenu>)
    )
)]
pub async fn list_one_touch(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let menus = app_state.catalog_service.list_one_touch().await?;
    Ok((StatusCode::OK, Json(menus)))
}
