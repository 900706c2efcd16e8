// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{db_utils::begin_rls_tx, error::AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminOnly, AdminOrManager, RequireRole},
    },
    models::users::{AssignRolePayload, ReplaceRolesPayload, SyncReport, UserWithRoles},
};

// POST /api/users/me/sync
// Chamado logo após o login: garante perfil e cargo padrão e devolve o usuário.
#[utoipa::path(
    post,
    path = "/api/users/me/sync",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário com cargos após sincronização", body = UserWithRoles),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn sync_me(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .user_service
        .ensure_profile_and_role(user.id(), user.email(), user.full_name())
        .await?;

    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let me = app_state
        .user_service
        .get_user_with_roles(&mut *tx, user.id())
        .await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(me)))
}

// POST /api/users/me/repair
#[utoipa::path(
    post,
    path = "/api/users/me/repair",
    tag = "Users",
    responses(
        (status = 200, description = "O que precisou ser criado", body = SyncReport),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn repair_me(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .user_service
        .ensure_profile_and_role(user.id(), user.email(), user.full_name())
        .await?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário atual com cargos", body = UserWithRoles),
        (status = 404, description = "Perfil ainda não sincronizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let me = app_state
        .user_service
        .get_user_with_roles(&mut *tx, user.id())
        .await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(me)))
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários com cargos", body = Vec<UserWithRoles>),
        (status = 403, description = "Apenas admin ou manager")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOrManager>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let users = app_state.user_service.list_users_with_roles(&mut *tx).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(users)))
}

// POST /api/users/{id}/roles
#[utoipa::path(
    post,
    path = "/api/users/{id}/roles",
    tag = "Users",
    request_body = AssignRolePayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 201, description = "Cargo atribuído", body = UserWithRoles),
        (status = 400, description = "Cargo de vendas sem almacén"),
        (status = 403, description = "Apenas admin"),
        (status = 409, description = "Cargo já atribuído")
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_role(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AssignRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;

    app_state
        .role_service
        .assign_role(&mut *tx, user_id, payload.role, payload.almacen_id)
        .await?;
    let updated = app_state
        .user_service
        .get_user_with_roles(&mut *tx, user_id)
        .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(updated)))
}

// PUT /api/users/{id}/roles
#[utoipa::path(
    put,
    path = "/api/users/{id}/roles",
    tag = "Users",
    request_body = ReplaceRolesPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Cargos substituídos", body = UserWithRoles),
        (status = 400, description = "Cargo de vendas sem almacenes"),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn replace_roles(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ReplaceRolesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;

    app_state
        .role_service
        .replace_roles(&mut *tx, user_id, payload.role, &payload.almacen_ids)
        .await?;
    let updated = app_state
        .user_service
        .get_user_with_roles(&mut *tx, user_id)
        .await?;

    tx.commit().await?;

    Ok((StatusCode::OK, Json(updated)))
}

// DELETE /api/users/{id}/roles/{roleId}
#[utoipa::path(
    delete,
    path = "/api/users/{id}/roles/{roleId}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "ID do usuário"),
        ("roleId" = Uuid, Path, description = "ID da linha em user_roles")
    ),
    responses(
        (status = 204, description = "Cargo removido"),
        (status = 403, description = "Apenas admin"),
        (status = 404, description = "Cargo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_role(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path((user_id, role_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    app_state
        .role_service
        .remove_role(&mut *tx, user_id, role_id)
        .await?;
    tx.commit().await?;

    tracing::info!(%user_id, %role_id, "Cargo removido");
    Ok(StatusCode::NO_CONTENT)
}
