// src/handlers/stores.rs

use axum::{
    extract::{Path, State},
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
        rbac::{AdminOnly, AdminOrManager, RequireRole},
    },
    models::stores::{Almacen, StorePayload},
};

// GET /api/stores
#[utoipa::path(
    get,
    path = "/api/stores",
    tag = "Stores",
    responses((status = 200, description = "Almacenes ordenados por nome", body = Vec<Almacen>)),
    security(("api_jwt" = []))
)]
pub async fn list_stores(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let stores = app_state.store_service.list(&mut *tx).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(stores)))
}

// POST /api/stores
#[utoipa::path(
    post,
    path = "/api/stores",
    tag = "Stores",
    request_body = StorePayload,
    responses(
        (status = 201, description = "Almacén criado", body = Almacen),
        (status = 403, description = "Apenas admin ou manager"),
        (status = 409, description = "Nome já usado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_store(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOrManager>,
    Json(payload): Json<StorePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let store = app_state.store_service.create(&mut *tx, &payload).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(store)))
}

// PUT /api/stores/{id}
#[utoipa::path(
    put,
    path = "/api/stores/{id}",
    tag = "Stores",
    request_body = StorePayload,
    params(("id" = Uuid, Path, description = "ID do almacén")),
    responses(
        (status = 200, description = "Almacén atualizado", body = Almacen),
        (status = 404, description = "Almacén não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_store(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StorePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let store = app_state.store_service.update(&mut *tx, id, &payload).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(store)))
}

// DELETE /api/stores/{id}
#[utoipa::path(
    delete,
    path = "/api/stores/{id}",
    tag = "Stores",
    params(("id" = Uuid, Path, description = "ID do almacén")),
    responses(
        (status = 204, description = "Almacén removido"),
        (status = 404, description = "Almacén não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_store(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    app_state.store_service.delete(&mut *tx, id).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
