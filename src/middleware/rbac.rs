// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::users::{AppRole, UserRole},
    utils::stock::StoreVisibility,
};

/// Falha com 403 se o usuário não tiver nenhum dos cargos.
pub async fn ensure_any_role(
    app_state: &AppState,
    user: &AuthenticatedUser,
    allowed: &[AppRole],
) -> Result<(), AppError> {
    let has_role = app_state
        .role_service
        .user_has_any_role(user.id(), allowed)
        .await?;

    require_any_role(has_role, allowed)
}

pub fn require_any_role(has_role: bool, allowed: &[AppRole]) -> Result<(), AppError> {
    if !has_role {
        let names: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
        return Err(AppError::Forbidden(format!(
            "Esta ação exige um dos cargos: {}.",
            names.join(", ")
        )));
    }
    Ok(())
}

/// 1. O Trait que define quais cargos liberam a rota
pub trait RoleDef: Send + Sync + 'static {
    fn roles() -> &'static [AppRole];
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Extrai Usuário (colocado pelo auth_guard)
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        // B. Verifica no Banco (fora do RLS)
        ensure_any_role(&app_state, user, T::roles()).await?;

        Ok(RequireRole(PhantomData))
    }
}

async fn roles_from_parts(parts: &Parts, app_state: &AppState) -> Result<Vec<UserRole>, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or(AppError::InvalidToken)?;

    app_state.user_service.roles_of(user.id()).await
}

// Almacenes que o usuário enxerga, derivados dos cargos dele
pub struct Visibility(pub StoreVisibility);

impl<S> FromRequestParts<S> for Visibility
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let roles = roles_from_parts(parts, &app_state).await?;
        Ok(Visibility(StoreVisibility::from_roles(&roles)))
    }
}

// Almacenes onde o usuário pode vender (só cargos admin, manager ou sales contam)
pub struct SellScope(pub StoreVisibility);

impl<S> FromRequestParts<S> for SellScope
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let roles = roles_from_parts(parts, &app_state).await?;
        Ok(SellScope(StoreVisibility::sell_scope(&roles)))
    }
}

// ---
// DEFINIÇÃO DOS GRUPOS DE CARGOS (TIPOS)
// ---

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn roles() -> &'static [AppRole] { &[AppRole::Admin] }
}

pub struct AdminOrManager;
impl RoleDef for AdminOrManager {
    fn roles() -> &'static [AppRole] { &[AppRole::Admin, AppRole::Manager] }
}

pub struct CanSell;
impl RoleDef for CanSell {
    fn roles() -> &'static [AppRole] { &[AppRole::Admin, AppRole::Manager, AppRole::Sales] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_role_is_403_naming_the_roles() {
        let err = require_any_role(false, AdminOnly::roles()).unwrap_err();
        match err {
            AppError::Forbidden(msg) => assert!(msg.contains("admin")),
            other => panic!("esperava Forbidden, veio {:?}", other),
        }
    }

    #[test]
    fn test_role_present_passes() {
        assert!(require_any_role(true, CanSell::roles()).is_ok());
    }

    #[test]
    fn test_sales_role_cannot_reach_admin_routes() {
        assert!(!AdminOnly::roles().contains(&AppRole::Sales));
        assert!(!AdminOrManager::roles().contains(&AppRole::Viewer));
        assert!(CanSell::roles().contains(&AppRole::Sales));
    }
}
