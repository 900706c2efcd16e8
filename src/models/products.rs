// src/models/products.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::utils::format::StockStatus;

// --- Catálogo (tabela `productos`) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    pub id: Uuid,
    #[schema(example = "Arroz Extra")]
    pub nombre: String,
    #[schema(example = "Abarrotes")]
    pub categoria: Option<String>,
    #[schema(example = "kg")]
    pub unidad: String,
    #[schema(example = "4.50")]
    pub precio_venta: Decimal,
    #[schema(example = "3.20")]
    pub precio_compra: Decimal,
    pub stock_minimo: Decimal,
    pub stock_maximo: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

// --- Saldo por almacén (tabela `inventario`) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    pub producto_id: Uuid,
    pub almacen_id: Uuid,
    pub cantidad: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreStock {
    pub almacen_id: Uuid,
    pub almacen_nombre: Option<String>,
    pub cantidad: Decimal,
    #[schema(example = "12kg")]
    pub cantidad_formateada: String,
}

// View model de um produto com o estoque agregado
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithStock {
    #[serde(flatten)]
    pub producto: Producto,
    pub stock_total: Decimal,
    #[schema(example = "1.5kg")]
    pub stock_total_formateado: String,
    #[schema(example = "$4.50")]
    pub precio_venta_formateado: String,
    pub estado_stock: StockStatus,
    #[schema(example = "green")]
    pub color_estado: String,
    pub stock_por_almacen: Vec<StoreStock>,
}

// Filtros da listagem (?almacenId=&categoria=&search=&soloStockBajo=)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub almacen_id: Option<Uuid>,
    pub categoria: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub solo_stock_bajo: bool,
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitialStock {
    pub almacen_id: Uuid,
    #[validate(custom(function = "validate_not_negative"))]
    pub cantidad: Decimal,
}

// Payload de criação / edição
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nombre: String,

    pub categoria: Option<String>,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    #[schema(example = "g")]
    pub unidad: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub precio_venta: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub precio_compra: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub stock_minimo: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub stock_maximo: Decimal,

    // Só é usado na criação
    #[validate(nested)]
    #[serde(default)]
    pub stock_inicial: Vec<InitialStock>,
}

impl ProductPayload {
    pub fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.stock_maximo > Decimal::ZERO && self.stock_maximo < self.stock_minimo {
            let mut err = ValidationError::new("StockMaxBelowMin");
            err.message = Some("O estoque máximo deve ser maior que o mínimo.".into());
            return Err(err);
        }
        Ok(())
    }
}

// PUT /api/products/{id}/stock/{storeId}
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStockPayload {
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "25")]
    pub cantidad: Decimal,
}
