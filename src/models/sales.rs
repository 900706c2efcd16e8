// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::products::validate_not_negative;

// Tabela `ventas`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Venta {
    pub id: Uuid,
    pub almacen_id: Uuid,
    pub usuario_id: Uuid,
    #[schema(example = "150.50")]
    pub total: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

// Tabela `detalles_venta`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetalleVenta {
    pub id: Uuid,
    pub venta_id: Uuid,
    pub producto_id: Uuid,
    pub cantidad: Decimal,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

// Linha de detalhe com o nome do produto (para o recibo)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetalleVentaView {
    pub id: Uuid,
    pub producto_id: Uuid,
    pub producto_nombre: Option<String>,
    pub cantidad: Decimal,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentaDetail {
    #[serde(flatten)]
    pub venta: Venta,
    #[schema(example = "$150.50")]
    pub total_formateado: String,
    pub detalles: Vec<DetalleVentaView>,
}

// Linha já calculada, pronta para inserir
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedLine {
    pub producto_id: Uuid,
    pub cantidad: Decimal,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleLinePayload {
    pub producto_id: Uuid,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "2")]
    pub cantidad: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "4.50")]
    pub precio_unitario: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub almacen_id: Uuid,

    #[validate(length(min = 1, message = "A venda precisa de ao menos um item."), nested)]
    pub items: Vec<SaleLinePayload>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SalesQuery {
    pub almacen_id: Option<Uuid>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(cantidad: i64, precio: i64) -> SaleLinePayload {
        SaleLinePayload {
            producto_id: Uuid::new_v4(),
            cantidad: Decimal::from(cantidad),
            precio_unitario: Decimal::from(precio),
        }
    }

    #[test]
    fn test_sale_without_items_is_rejected() {
        let payload = CreateSalePayload { almacen_id: Uuid::new_v4(), items: vec![] };
        let errors = payload.validate().unwrap_err();
        assert!(errors.errors().contains_key("items"));
    }

    #[test]
    fn test_invalid_line_is_reported_through_items() {
        let payload = CreateSalePayload {
            almacen_id: Uuid::new_v4(),
            items: vec![line(2, 5), line(0, 5)],
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.errors().contains_key("items"));
    }

    #[test]
    fn test_valid_sale_passes() {
        let payload = CreateSalePayload {
            almacen_id: Uuid::new_v4(),
            items: vec![line(1, 10), line(3, 0)],
        };
        assert!(payload.validate().is_ok());
    }
}
