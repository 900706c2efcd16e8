// src/handlers/sales.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{db_utils::begin_rls_tx, error::AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CanSell, RequireRole, SellScope, Visibility},
    },
    models::sales::{CreateSalePayload, SalesQuery, Venta, VentaDetail},
};

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    params(SalesQuery),
    responses((status = 200, description = "Vendas mais recentes primeiro", body = Vec<Venta>)),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Visibility(visibility): Visibility,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let ventas = app_state
        .sales_service
        .list(&mut *tx, &visibility, &query)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(ventas)))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com linhas", body = VentaDetail),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Visibility(visibility): Visibility,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let venta = app_state.sales_service.get(&mut *tx, id, &visibility).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(venta)))
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda registrada", body = VentaDetail),
        (status = 400, description = "Itens inválidos"),
        (status = 403, description = "Sem cargo de venda ou almacén não permitido"),
        (status = 409, description = "Estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<CanSell>,
    SellScope(sell_scope): SellScope,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let venta = app_state
        .sales_service
        .create_sale(&mut *tx, user.id(), &sell_scope, &payload)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(venta)))
}
