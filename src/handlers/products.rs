// src/handlers/products.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    common::{db_utils::begin_rls_tx, error::AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminOnly, AdminOrManager, RequireRole, Visibility},
    },
    models::products::{ProductFilter, ProductPayload, ProductWithStock, SetStockPayload},
};

// Validação padrão + consistência mínimo/máximo
fn validate_product(payload: &ProductPayload) -> Result<(), AppError> {
    payload.validate()?;

    payload.validate_consistency().map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("stockMaximo", e);
        AppError::ValidationError(errors)
    })
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductFilter),
    responses((status = 200, description = "Produtos com estoque agregado", body = Vec<ProductWithStock>)),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Visibility(visibility): Visibility,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let products = app_state
        .product_service
        .list(&mut *tx, &visibility, &filter)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto com estoque agregado", body = ProductWithStock),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Visibility(visibility): Visibility,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let product = app_state.product_service.get(&mut *tx, id, &visibility).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(product)))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = ProductWithStock),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Apenas admin ou manager")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOrManager>,
    Visibility(visibility): Visibility,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    validate_product(&payload)?;

    let mut tx = begin_rls_tx(&app_state, &user).await?;
    let producto = app_state.product_service.create(&mut *tx, &payload).await?;
    let view = app_state
        .product_service
        .get(&mut *tx, producto.id, &visibility)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(view)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = ProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = ProductWithStock),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOrManager>,
    Visibility(visibility): Visibility,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    validate_product(&payload)?;

    let mut tx = begin_rls_tx(&app_state, &user).await?;
    app_state.product_service.update(&mut *tx, id, &payload).await?;
    let view = app_state.product_service.get(&mut *tx, id, &visibility).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(view)))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = begin_rls_tx(&app_state, &user).await?;
    app_state.product_service.delete(&mut *tx, id).await?;
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/products/{id}/stock/{storeId}
#[utoipa::path(
    put,
    path = "/api/products/{id}/stock/{storeId}",
    tag = "Products",
    request_body = SetStockPayload,
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("storeId" = Uuid, Path, description = "ID do almacén")
    ),
    responses(
        (status = 200, description = "Saldo gravado; devolve o produto recalculado", body = ProductWithStock),
        (status = 404, description = "Produto ou almacén não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_stock(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<AdminOrManager>,
    Visibility(visibility): Visibility,
    Path((producto_id, almacen_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetStockPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = begin_rls_tx(&app_state, &user).await?;
    app_state
        .product_service
        .set_stock(&mut *tx, producto_id, almacen_id, payload.cantidad)
        .await?;
    let view = app_state
        .product_service
        .get(&mut *tx, producto_id, &visibility)
        .await?;
    tx.commit().await?;

    Ok((StatusCode::OK, Json(view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(num: i64, scale: u32) -> Decimal {
        Decimal::new(num, scale)
    }

    fn payload(min: i64, max: i64) -> ProductPayload {
        ProductPayload {
            nombre: "Café molido".into(),
            categoria: Some("Abarrotes".into()),
            unidad: "g".into(),
            precio_venta: dec(450, 2),
            precio_compra: dec(300, 2),
            stock_minimo: dec(min, 0),
            stock_maximo: dec(max, 0),
            stock_inicial: vec![],
        }
    }

    #[test]
    fn test_max_below_min_is_rejected_on_stock_maximo() {
        let err = validate_product(&payload(10, 5)).unwrap_err();
        match err {
            AppError::ValidationError(errors) => {
                assert!(errors.field_errors().contains_key("stockMaximo"));
            }
            other => panic!("esperava ValidationError, veio {:?}", other),
        }
    }

    #[test]
    fn test_zero_max_means_no_ceiling() {
        assert!(validate_product(&payload(10, 0)).is_ok());
        assert!(validate_product(&payload(10, 50)).is_ok());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut p = payload(0, 0);
        p.nombre.clear();
        assert!(matches!(validate_product(&p), Err(AppError::ValidationError(_))));
    }
}
