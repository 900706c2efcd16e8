// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{db_utils::begin_rls_tx, error::AppError},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{DashboardSummary, SalesChartEntry, TopProductEntry},
};

// GET /api/dashboard/summary
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo do dia e contagens gerais", body = DashboardSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let summary = app_state.dashboard_service.get_summary(&mut *tx).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/sales-chart
#[utoipa::path(
    get,
    path = "/api/dashboard/sales-chart",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Total vendido por dia (últimos 30 dias)", body = Vec<SalesChartEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sales_chart(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let chart = app_state.dashboard_service.get_sales_chart(&mut *tx).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(chart)))
}

// GET /api/dashboard/top-products
#[utoipa::path(
    get,
    path = "/api/dashboard/top-products",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Produtos mais vendidos", body = Vec<TopProductEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_top_products(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let products = app_state.dashboard_service.get_top_products(&mut *tx).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(products)))
}
