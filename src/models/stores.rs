// src/models/stores.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Tabela `almacenes` (lojas / depósitos)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Almacen {
    pub id: Uuid,
    #[schema(example = "Sucursal Centro")]
    pub nombre: String,
    #[schema(example = "Av. Principal 123")]
    pub direccion: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorePayload {
    #[validate(length(min = 1, max = 120, message = "O nome do almacén é obrigatório."))]
    #[schema(example = "Depósito Norte")]
    pub nombre: String,
    pub direccion: Option<String>,
}
